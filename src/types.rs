//! 象棋核心类型定义
//!
//! 坐标系：x 为列 (0-8，从左到右)，y 为行 (0-9，从上到下)。
//! 黑方在上 (y 0-4)，红方在下 (y 5-9)，红方向 y 减小的方向前进。

use std::fmt;

/// 棋盘列数
pub const BOARD_WIDTH: i8 = 9;
/// 棋盘行数
pub const BOARD_HEIGHT: i8 = 10;

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Red,
    Black,
}

impl Side {
    /// 获取对方阵营
    pub fn opposite(&self) -> Side {
        match self {
            Side::Red => Side::Black,
            Side::Black => Side::Red,
        }
    }

    /// 从 FEN 回合字符解析
    pub fn from_fen_char(c: char) -> Option<Side> {
        match c {
            'w' | 'r' => Some(Side::Red),
            'b' => Some(Side::Black),
            _ => None,
        }
    }

    /// 转换为 FEN 回合字符
    pub fn to_fen_char(&self) -> char {
        match self {
            Side::Red => 'w',
            Side::Black => 'b',
        }
    }

    /// 兵卒前进方向（y 增量）
    #[inline]
    pub fn forward(&self) -> i8 {
        match self {
            Side::Red => -1,
            Side::Black => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Red => write!(f, "Red"),
            Side::Black => write!(f, "Black"),
        }
    }
}

/// 棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    /// 将/帅
    General,
    /// 士/仕
    Advisor,
    /// 象/相
    Elephant,
    /// 车
    Chariot,
    /// 马
    Horse,
    /// 炮
    Cannon,
    /// 卒/兵
    Soldier,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::General,
        PieceKind::Advisor,
        PieceKind::Elephant,
        PieceKind::Chariot,
        PieceKind::Horse,
        PieceKind::Cannon,
        PieceKind::Soldier,
    ];

    /// 从 FEN 字符解析（大小写均可）
    pub fn from_fen_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'k' | 'g' => Some(PieceKind::General),
            'a' => Some(PieceKind::Advisor),
            'b' | 'e' => Some(PieceKind::Elephant),
            'r' => Some(PieceKind::Chariot),
            'n' | 'h' => Some(PieceKind::Horse),
            'c' => Some(PieceKind::Cannon),
            'p' => Some(PieceKind::Soldier),
            _ => None,
        }
    }

    /// 转换为 FEN 字符（小写）
    pub fn to_fen_char(&self) -> char {
        match self {
            PieceKind::General => 'k',
            PieceKind::Advisor => 'a',
            PieceKind::Elephant => 'b',
            PieceKind::Chariot => 'r',
            PieceKind::Horse => 'n',
            PieceKind::Cannon => 'c',
            PieceKind::Soldier => 'p',
        }
    }

    /// 棋子基础子力价值
    pub fn value(&self) -> i32 {
        match self {
            PieceKind::General => 10000,
            PieceKind::Chariot => 90,
            PieceKind::Cannon => 45,
            PieceKind::Horse => 40,
            PieceKind::Advisor => 20,
            PieceKind::Elephant => 20,
            PieceKind::Soldier => 10,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceKind::General => "General",
            PieceKind::Advisor => "Advisor",
            PieceKind::Elephant => "Elephant",
            PieceKind::Chariot => "Chariot",
            PieceKind::Horse => "Horse",
            PieceKind::Cannon => "Cannon",
            PieceKind::Soldier => "Soldier",
        };
        write!(f, "{}", name)
    }
}

/// 棋盘位置 (x, y)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i8,
    pub y: i8,
}

impl Position {
    pub fn new(x: i8, y: i8) -> Self {
        Position { x, y }
    }

    /// 检查位置是否在棋盘范围内
    #[inline]
    pub fn is_valid(&self) -> bool {
        (0..BOARD_WIDTH).contains(&self.x) && (0..BOARD_HEIGHT).contains(&self.y)
    }

    /// 检查位置是否在该方九宫内
    pub fn is_in_palace(&self, side: Side) -> bool {
        if !(3..=5).contains(&self.x) {
            return false;
        }
        match side {
            Side::Red => (7..=9).contains(&self.y),
            Side::Black => (0..=2).contains(&self.y),
        }
    }

    /// 检查位置是否在己方半场（象不过河）
    pub fn is_on_own_side(&self, side: Side) -> bool {
        match side {
            Side::Red => self.y >= 5,
            Side::Black => self.y <= 4,
        }
    }

    /// 兵卒是否已过河
    pub fn has_crossed_river(&self, side: Side) -> bool {
        !self.is_on_own_side(side)
    }

    /// 位置加偏移量
    #[inline]
    pub fn offset(&self, dx: i8, dy: i8) -> Position {
        Position {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// 转换为数组索引 (y * 9 + x)
    #[inline]
    pub fn to_index(&self) -> usize {
        (self.y as usize) * (BOARD_WIDTH as usize) + (self.x as usize)
    }

    /// 从数组索引还原
    #[inline]
    pub fn from_index(idx: usize) -> Position {
        Position {
            x: (idx % BOARD_WIDTH as usize) as i8,
            y: (idx / BOARD_WIDTH as usize) as i8,
        }
    }

    /// 两点间的切比雪夫距离
    pub fn chebyshev_distance(&self, other: Position) -> i8 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// 从 ICCS 坐标解析（如 "h2"，行号 0 为红方底线）
    pub fn from_iccs(s: &str) -> Option<Position> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let x = match bytes[0] {
            b'a'..=b'i' => (bytes[0] - b'a') as i8,
            _ => return None,
        };
        let rank = match bytes[1] {
            b'0'..=b'9' => (bytes[1] - b'0') as i8,
            _ => return None,
        };
        Some(Position::new(x, BOARD_HEIGHT - 1 - rank))
    }

    /// 转换为 ICCS 坐标
    pub fn to_iccs(&self) -> String {
        let file = (b'a' + self.x as u8) as char;
        format!("{}{}", file, BOARD_HEIGHT - 1 - self.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// 棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
    pub position: Position,
}

impl Piece {
    pub fn new(kind: PieceKind, side: Side, x: i8, y: i8) -> Self {
        Piece {
            kind,
            side,
            position: Position::new(x, y),
        }
    }

    /// FEN 字符，红方大写
    pub fn to_fen_char(&self) -> char {
        let c = self.kind.to_fen_char();
        match self.side {
            Side::Red => c.to_ascii_uppercase(),
            Side::Black => c,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.side, self.kind, self.position)
    }
}

/// 走法（创建后不可变）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub side: Side,
    pub kind: PieceKind,
    /// 被吃的棋子
    pub captured: Option<Piece>,
}

impl Move {
    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// 是否直接吃掉对方将帅
    #[inline]
    pub fn captures_general(&self) -> bool {
        self.captured
            .is_some_and(|p| p.kind == PieceKind::General)
    }

    /// ICCS 走法字符串，如 `h2e2`
    pub fn to_iccs(&self) -> String {
        format!("{}{}", self.from.to_iccs(), self.to.to_iccs())
    }

    /// 解析 ICCS 走法字符串为起止坐标
    pub fn parse_iccs(s: &str) -> Option<(Position, Position)> {
        let s = s.trim();
        if s.len() != 4 || !s.is_ascii() {
            return None;
        }
        let from = Position::from_iccs(&s[0..2])?;
        let to = Position::from_iccs(&s[2..4])?;
        Some((from, to))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_iccs())
    }
}

/// 单步走法的合法性检查结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegalityResult {
    Valid,
    /// 违反棋子走法规则
    InvalidByRule,
    /// 走后己方被将军或将帅对脸
    InvalidSelfCheck,
}

impl LegalityResult {
    #[inline]
    pub fn is_valid(&self) -> bool {
        *self == LegalityResult::Valid
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LegalityResult::Valid => "valid",
            LegalityResult::InvalidByRule => "invalid_rule",
            LegalityResult::InvalidSelfCheck => "invalid_self_check",
        }
    }
}

/// 对局状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    /// 被将军且无子可动
    Checkmate { winner: Side },
    /// 未被将军但无子可动（困毙，判和）
    Stalemate,
    /// 将帅被吃
    GeneralCaptured { winner: Side },
    /// 认输
    Resigned { winner: Side },
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }

    pub fn winner(&self) -> Option<Side> {
        match self {
            GameStatus::Checkmate { winner }
            | GameStatus::GeneralCaptured { winner }
            | GameStatus::Resigned { winner } => Some(*winner),
            GameStatus::Ongoing | GameStatus::Stalemate => None,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Ongoing => write!(f, "ongoing"),
            GameStatus::Checkmate { winner } => write!(f, "{} wins by checkmate", winner),
            GameStatus::Stalemate => write!(f, "draw by stalemate"),
            GameStatus::GeneralCaptured { winner } => {
                write!(f, "{} wins by capturing the general", winner)
            }
            GameStatus::Resigned { winner } => write!(f, "{} wins by resignation", winner),
        }
    }
}
