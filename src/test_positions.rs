//! 象棋测试局面库
//!
//! 提供命名的 FEN 测试局面，方便测试和调试
//!
//! 命名规范:
//! - START: 初始局面
//! - EARLY_n: 开局后 1-2 步
//! - CHECK_n: 将军测试
//! - MATE_n: 杀棋测试
//! - END_n: 残局
//! - SPECIAL_n: 特殊情况测试

use crate::fen::START_FEN;

// =============================================================================
// 开局 (START / EARLY)
// =============================================================================

/// 初始局面
pub const START: &str = START_FEN;

/// 红方第一步: 中炮 (炮二平五)
pub const EARLY_1: &str = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C2C4/9/RNBAKABNR b";

/// 黑方回应: 马8进7
pub const EARLY_2: &str = "rnbakab1r/9/1c4nc1/p1p1p1p1p/9/9/P1P1P1P1P/1C2C4/9/RNBAKABNR w";

// =============================================================================
// 将军 (CHECK)
// =============================================================================

/// 车将军
pub const CHECK_1: &str = "3k5/9/9/3R5/9/9/9/9/9/5K3 b";

/// 炮隔卒将军
pub const CHECK_2: &str = "4k4/9/9/9/4p4/9/9/4C4/9/3K5 b";

/// 马将军
pub const CHECK_3: &str = "4k4/9/3N5/9/9/9/9/9/9/3K5 b";

// =============================================================================
// 杀棋 (MATE)
// =============================================================================

/// 炮将军，黑方无子可动
pub const MATE_1: &str = "3aka3/3PnP3/4C4/9/9/9/9/9/9/5K3 b";

/// 一步杀：红炮平中
pub const MATE_IN_ONE_1: &str = "3aka3/3PnP3/C8/9/9/9/9/9/9/5K3 w";

/// 困毙：黑将未被将军但无路可走
pub const STALEMATE_1: &str = "3k5/R8/4R4/9/9/9/9/9/9/5K3 b";

// =============================================================================
// 残局 (END)
// =============================================================================

/// 单车对光将
pub const END_1: &str = "3k5/9/9/9/9/9/9/9/R8/5K3 w";

/// 马兵对光将
pub const END_2: &str = "4k4/9/4P4/9/9/9/9/2N6/9/3K5 w";

// =============================================================================
// 特殊 (SPECIAL)
// =============================================================================

/// 车被将帅对脸牵制，只能沿中线移动
pub const SPECIAL_1: &str = "4k4/9/9/9/9/9/9/4R4/9/4K4 w";

/// 车可以直接吃将
pub const SPECIAL_2: &str = "p3k4/P8/C8/9/9/4R4/9/9/9/3K5 w";

/// 黑车悬空，可以白吃
pub const SPECIAL_3: &str = "3k5/9/9/9/r3R4/9/9/9/9/5K3 w";

/// 所有局面 (名称, FEN)
pub const ALL_POSITIONS: &[(&str, &str)] = &[
    ("START", START),
    ("EARLY_1", EARLY_1),
    ("EARLY_2", EARLY_2),
    ("CHECK_1", CHECK_1),
    ("CHECK_2", CHECK_2),
    ("CHECK_3", CHECK_3),
    ("MATE_1", MATE_1),
    ("MATE_IN_ONE_1", MATE_IN_ONE_1),
    ("STALEMATE_1", STALEMATE_1),
    ("END_1", END_1),
    ("END_2", END_2),
    ("SPECIAL_1", SPECIAL_1),
    ("SPECIAL_2", SPECIAL_2),
    ("SPECIAL_3", SPECIAL_3),
];

/// 按名称查找局面
pub fn get_position(name: &str) -> Option<&'static str> {
    ALL_POSITIONS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, fen)| *fen)
}
