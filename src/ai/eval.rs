//! 局面评估
//!
//! 从 AI 一方的视角给局面打分：己方棋子加分，对方棋子减分。
//! - 子力基础价值（见 [`PieceKind::value`]）
//! - 过河兵奖励
//! - 将帅安全：同行/同列两格内每个己方棋子 +5，被攻击 -30
//! - 每次评估加一个 -1..=1 的随机扰动，避免相同局面总走同一步

use crate::board::Board;
use crate::rules::MoveRules;
use crate::types::{Piece, PieceKind, Side};
use rand::Rng;

/// 过河兵奖励
pub const CROSSED_SOLDIER_BONUS: i32 = 20;
/// 每个护卫将帅的己方棋子
pub const GENERAL_GUARD_BONUS: i32 = 5;
/// 将帅被攻击的惩罚
pub const GENERAL_ATTACKED_PENALTY: i32 = 30;
/// 护卫判定范围（切比雪夫距离）
const GUARD_RANGE: i8 = 2;

/// 统计护卫将帅的己方棋子：与将帅同行或同列，且距离不超过 2
pub fn count_guards(board: &Board, general: &Piece) -> usize {
    let at = general.position;
    board
        .pieces(Some(general.side))
        .filter(|p| p.position != at)
        .filter(|p| p.position.x == at.x || p.position.y == at.y)
        .filter(|p| p.position.chebyshev_distance(at) <= GUARD_RANGE)
        .count()
}

/// 单个棋子对其所属方的贡献值
fn piece_value<M>(board: &Board, piece: &Piece, rules: &M) -> i32
where
    M: MoveRules + ?Sized,
{
    let mut value = piece.kind.value();
    match piece.kind {
        PieceKind::Soldier if piece.position.has_crossed_river(piece.side) => {
            value += CROSSED_SOLDIER_BONUS;
        }
        PieceKind::General => {
            value += GENERAL_GUARD_BONUS * count_guards(board, piece) as i32;
            if rules.is_king_in_check(piece.side, board) {
                value -= GENERAL_ATTACKED_PENALTY;
            }
        }
        _ => {}
    }
    value
}

/// 不含随机扰动的静态评估
pub fn static_score<M>(board: &Board, ai_side: Side, rules: &M) -> i32
where
    M: MoveRules + ?Sized,
{
    board
        .pieces(None)
        .map(|piece| {
            let value = piece_value(board, piece, rules);
            if piece.side == ai_side {
                value
            } else {
                -value
            }
        })
        .sum()
}

/// 完整评估（静态分 + 随机扰动）
pub fn evaluate<M, G>(board: &Board, ai_side: Side, rules: &M, rng: &mut G) -> i32
where
    M: MoveRules + ?Sized,
    G: Rng + ?Sized,
{
    static_score(board, ai_side, rules) + rng.gen_range(-1..=1)
}
