//! 错误类型
//!
//! 走法合法性不是错误，用 [`LegalityResult`](crate::types::LegalityResult) 表达；
//! 这里只有局面构造、FEN 解析和对局流程中可恢复的错误。

use crate::types::{LegalityResult, Position, Side};
use thiserror::Error;

/// 构造棋盘时的错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("position {0} is off the board")]
    OutOfBounds(Position),
    #[error("square {0} is already occupied")]
    Occupied(Position),
}

/// FEN 解析错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("empty FEN string")]
    Empty,
    #[error("expected 10 ranks, got {0}")]
    RankCount(usize),
    #[error("rank {rank} has {width} columns, expected 9")]
    RankWidth { rank: usize, width: usize },
    #[error("invalid piece character: {0}")]
    InvalidPiece(char),
    #[error("invalid side to move: {0}")]
    InvalidTurn(String),
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// 对局流程错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("the game is already over")]
    GameOver,
    #[error("no moves to undo")]
    NoHistory,
    #[error("no piece at {0}")]
    NoPiece(Position),
    #[error("it is {expected}'s turn, but the piece at {at} belongs to {found}")]
    WrongSide {
        expected: Side,
        found: Side,
        at: Position,
    },
    #[error("illegal move {from} -> {to}: {reason:?}")]
    IllegalMove {
        from: Position,
        to: Position,
        reason: LegalityResult,
    },
    #[error("{0} has no legal move")]
    NoLegalMove(Side),
}
