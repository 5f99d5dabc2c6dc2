//! Xiangqi AI Engine
//!
//! 象棋规则校验与 Alpha-Beta 搜索引擎 - 支持 FEN 输入输出

pub mod ai;
pub mod board;
pub mod error;
pub mod fen;
pub mod game;
pub mod rules;
pub mod test_positions;
pub mod types;

pub use ai::{
    best_move, evaluate, static_score, AIConfig, AIEngine, AIStrategy, MinimaxAI, ScoredMove,
    AVAILABLE_STRATEGIES, DEFAULT_STRATEGY,
};
pub use board::Board;
pub use error::{BoardError, FenError, GameError};
pub use fen::{board_to_fen, parse_fen, START_FEN};
pub use game::{Game, MoveRecord};
pub use rules::{
    check_move, game_status, is_king_in_check, legal_destinations, legal_moves, MoveRules,
    StandardRules,
};
pub use types::{GameStatus, LegalityResult, Move, Piece, PieceKind, Position, Side};
