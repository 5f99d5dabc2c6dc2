//! 棋盘
//!
//! 使用定长数组存储棋子，克隆即可得到独立的棋盘副本，
//! 搜索时每个分支都在自己的副本上走子。

use crate::error::BoardError;
use crate::types::{Move, Piece, PieceKind, Position, Side, BOARD_HEIGHT, BOARD_WIDTH};

const SQUARES: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// 底线棋子排列（从左到右）
const BACK_RANK: [PieceKind; 9] = [
    PieceKind::Chariot,
    PieceKind::Horse,
    PieceKind::Elephant,
    PieceKind::Advisor,
    PieceKind::General,
    PieceKind::Advisor,
    PieceKind::Elephant,
    PieceKind::Horse,
    PieceKind::Chariot,
];

/// 棋盘（90 个格子，10 行 x 9 列）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; SQUARES],
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}

impl Board {
    /// 空棋盘
    pub fn empty() -> Board {
        Board {
            squares: [None; SQUARES],
        }
    }

    /// 标准开局
    pub fn standard() -> Board {
        let mut board = Board::empty();
        for (side, back, cannon, soldier) in [(Side::Black, 0, 2, 3), (Side::Red, 9, 7, 6)] {
            for (x, kind) in BACK_RANK.iter().enumerate() {
                board.put(Piece::new(*kind, side, x as i8, back));
            }
            for x in [1, 7] {
                board.put(Piece::new(PieceKind::Cannon, side, x, cannon));
            }
            for x in [0, 2, 4, 6, 8] {
                board.put(Piece::new(PieceKind::Soldier, side, x, soldier));
            }
        }
        board
    }

    /// 从棋子列表构造（FEN 解析时使用）
    pub fn from_pieces<I>(pieces: I) -> Result<Board, BoardError>
    where
        I: IntoIterator<Item = Piece>,
    {
        let mut board = Board::empty();
        for piece in pieces {
            board.place(piece)?;
        }
        Ok(board)
    }

    #[inline]
    fn put(&mut self, piece: Piece) {
        self.squares[piece.position.to_index()] = Some(piece);
    }

    /// 放置棋子，目标格必须在棋盘内且为空
    pub fn place(&mut self, piece: Piece) -> Result<(), BoardError> {
        let pos = piece.position;
        if !pos.is_valid() {
            return Err(BoardError::OutOfBounds(pos));
        }
        if self.squares[pos.to_index()].is_some() {
            return Err(BoardError::Occupied(pos));
        }
        self.put(piece);
        Ok(())
    }

    /// 移除某位置的棋子
    pub fn remove(&mut self, pos: Position) -> Option<Piece> {
        if !pos.is_valid() {
            return None;
        }
        self.squares[pos.to_index()].take()
    }

    /// 获取某位置的棋子
    #[inline]
    pub fn piece_at(&self, pos: Position) -> Option<&Piece> {
        if !pos.is_valid() {
            return None;
        }
        self.squares[pos.to_index()].as_ref()
    }

    /// 检查位置是否有棋子
    #[inline]
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.piece_at(pos).is_some()
    }

    /// 获取所有棋子（按格子索引顺序），可按阵营过滤
    pub fn pieces(&self, side: Option<Side>) -> impl Iterator<Item = &Piece> + '_ {
        self.squares
            .iter()
            .filter_map(|p| p.as_ref())
            .filter(move |p| side.map_or(true, |s| p.side == s))
    }

    pub fn piece_count(&self) -> usize {
        self.pieces(None).count()
    }

    /// 找到将帅的位置
    pub fn find_general(&self, side: Side) -> Option<Position> {
        self.pieces(Some(side))
            .find(|p| p.kind == PieceKind::General)
            .map(|p| p.position)
    }

    /// 该方将帅数量
    pub fn general_count(&self, side: Side) -> usize {
        self.pieces(Some(side))
            .filter(|p| p.kind == PieceKind::General)
            .count()
    }

    /// 任一方没有将帅即终局
    pub fn is_game_over(&self) -> bool {
        self.general_count(Side::Red) == 0 || self.general_count(Side::Black) == 0
    }

    /// 两点之间（不含端点）的棋子数，两点不在同一直线时为 0
    pub fn count_between(&self, a: Position, b: Position) -> usize {
        if a.x == b.x {
            let (lo, hi) = (a.y.min(b.y), a.y.max(b.y));
            ((lo + 1)..hi)
                .filter(|&y| self.is_occupied(Position::new(a.x, y)))
                .count()
        } else if a.y == b.y {
            let (lo, hi) = (a.x.min(b.x), a.x.max(b.x));
            ((lo + 1)..hi)
                .filter(|&x| self.is_occupied(Position::new(x, a.y)))
                .count()
        } else {
            0
        }
    }

    /// 执行走法：移除被吃的子，移动棋子。返回被吃的棋子
    pub fn apply_move(&mut self, mv: &Move) -> Option<Piece> {
        let mut piece = self.remove(mv.from)?;
        let captured = self.remove(mv.to);
        piece.position = mv.to;
        self.put(piece);
        captured
    }

    /// 撤销走法，恢复被吃的棋子
    pub fn unapply_move(&mut self, mv: &Move) {
        if let Some(mut piece) = self.remove(mv.to) {
            piece.position = mv.from;
            self.put(piece);
        }
        if let Some(captured) = mv.captured {
            self.put(captured);
        }
    }

    /// 在副本上执行走法
    pub fn with_move(&self, mv: &Move) -> Board {
        let mut next = self.clone();
        next.apply_move(mv);
        next
    }

    /// 文本棋盘（调试用）
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(SQUARES * 2 + 40);
        for y in 0..BOARD_HEIGHT {
            out.push_str(&format!("{} ", BOARD_HEIGHT - 1 - y));
            for x in 0..BOARD_WIDTH {
                let c = self
                    .piece_at(Position::new(x, y))
                    .map_or('.', |p| p.to_fen_char());
                out.push(c);
                out.push(' ');
            }
            out.push('\n');
        }
        out.push_str("  a b c d e f g h i\n");
        out
    }
}
