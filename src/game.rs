//! 对局流程
//!
//! 维护棋盘、走子方、走法历史和对局状态，负责校验玩家走法、
//! 调用 AI、悔棋和认输。

use crate::ai::AIStrategy;
use crate::board::Board;
use crate::error::{FenError, GameError};
use crate::fen::parse_fen;
use crate::rules::{self, check_move, game_status, make_move};
use crate::types::{GameStatus, LegalityResult, Move, Position, Side};
use log::{debug, info};
use std::fmt;

/// 一条走法记录
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    /// 从 1 开始的手数
    pub number: usize,
    pub mv: Move,
}

impl MoveRecord {
    /// 可读描述，如 `3. Red Cannon (7,7) -> (4,7)`
    pub fn description(&self) -> String {
        let mut text = format!(
            "{}. {} {} {} -> {}",
            self.number, self.mv.side, self.mv.kind, self.mv.from, self.mv.to
        );
        if let Some(captured) = self.mv.captured {
            text.push_str(&format!(" x {}", captured.kind));
        }
        text
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

/// 一局棋
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    initial: Board,
    initial_turn: Side,
    turn: Side,
    history: Vec<MoveRecord>,
    status: GameStatus,
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

impl Game {
    /// 标准开局，红方先走
    pub fn new() -> Game {
        Game::from_position(Board::standard(), Side::Red)
    }

    /// 从任意局面开始
    pub fn from_position(board: Board, turn: Side) -> Game {
        let status = game_status(&board, turn);
        Game {
            initial: board.clone(),
            board,
            initial_turn: turn,
            turn,
            history: Vec::new(),
            status,
        }
    }

    pub fn from_fen(fen: &str) -> Result<Game, FenError> {
        let (board, turn) = parse_fen(fen)?;
        Ok(Game::from_position(board, turn))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn is_over(&self) -> bool {
        self.status.is_over()
    }

    /// 走子方是否被将军
    pub fn in_check(&self) -> bool {
        rules::is_king_in_check(self.turn, &self.board)
    }

    /// 选中棋子的可走位置
    pub fn legal_destinations(&self, from: Position) -> Vec<Position> {
        rules::legal_destinations(&self.board, from)
    }

    /// 尝试走一步（玩家输入）
    pub fn try_move(&mut self, from: Position, to: Position) -> Result<&MoveRecord, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        let piece = *self.board.piece_at(from).ok_or(GameError::NoPiece(from))?;
        if piece.side != self.turn {
            return Err(GameError::WrongSide {
                expected: self.turn,
                found: piece.side,
                at: from,
            });
        }

        let reason = check_move(&self.board, from, to);
        let mv = match (reason, make_move(&self.board, from, to)) {
            (LegalityResult::Valid, Some(mv)) => mv,
            (reason, _) => {
                debug!("rejected {} -> {}: {}", from, to, reason.as_str());
                return Err(GameError::IllegalMove { from, to, reason });
            }
        };
        Ok(self.commit(mv))
    }

    /// 让 AI 为当前走子方走一步
    pub fn play_ai(&mut self, ai: &mut dyn AIStrategy) -> Result<&MoveRecord, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        let mv = ai
            .select_move(&self.board, self.turn)
            .ok_or(GameError::NoLegalMove(self.turn))?;
        debug!("{} ({}) plays {}", self.turn, ai.name(), mv);
        Ok(self.commit(mv))
    }

    /// 执行走法、记录、换边并判定终局
    fn commit(&mut self, mv: Move) -> &MoveRecord {
        self.board.apply_move(&mv);
        self.turn = mv.side.opposite();

        self.status = if mv.captures_general() {
            GameStatus::GeneralCaptured { winner: mv.side }
        } else {
            game_status(&self.board, self.turn)
        };
        if self.status.is_over() {
            info!("game over after {} moves: {}", self.history.len() + 1, self.status);
        }

        self.history.push(MoveRecord {
            number: self.history.len() + 1,
            mv,
        });
        &self.history[self.history.len() - 1]
    }

    /// 悔棋：撤销最后一步，终局后不可悔棋
    pub fn undo(&mut self) -> Result<MoveRecord, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        let record = self.history.pop().ok_or(GameError::NoHistory)?;
        self.board.unapply_move(&record.mv);
        self.turn = record.mv.side;
        self.status = GameStatus::Ongoing;
        Ok(record)
    }

    /// 认输
    pub fn resign(&mut self, side: Side) -> Result<GameStatus, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        self.status = GameStatus::Resigned {
            winner: side.opposite(),
        };
        info!("{} resigns", side);
        Ok(self.status)
    }

    /// 复盘：从初始局面起每一步之后的局面
    pub fn replay(&self) -> Vec<Board> {
        let mut boards = Vec::with_capacity(self.history.len() + 1);
        let mut board = self.initial.clone();
        boards.push(board.clone());
        for record in &self.history {
            board.apply_move(&record.mv);
            boards.push(board.clone());
        }
        boards
    }

    /// 初始局面和走子方
    pub fn initial(&self) -> (&Board, Side) {
        (&self.initial, self.initial_turn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AIConfig, MinimaxAI};
    use crate::types::PieceKind;

    fn pos(x: i8, y: i8) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn test_new_game() {
        let game = Game::new();
        assert_eq!(game.turn(), Side::Red);
        assert_eq!(game.status(), GameStatus::Ongoing);
        assert!(game.history().is_empty());
        assert!(!game.in_check());
    }

    #[test]
    fn test_try_move_records_and_switches_turn() {
        let mut game = Game::new();
        let record = *game.try_move(pos(7, 7), pos(4, 7)).unwrap();
        assert_eq!(record.number, 1);
        assert_eq!(record.mv.kind, PieceKind::Cannon);
        assert_eq!(record.description(), "1. Red Cannon (7,7) -> (4,7)");
        assert_eq!(game.turn(), Side::Black);
        assert!(game.board().piece_at(pos(7, 7)).is_none());
    }

    #[test]
    fn test_try_move_errors() {
        let mut game = Game::new();
        assert_eq!(
            game.try_move(pos(4, 5), pos(4, 4)).unwrap_err(),
            GameError::NoPiece(pos(4, 5))
        );
        assert_eq!(
            game.try_move(pos(0, 3), pos(0, 4)).unwrap_err(),
            GameError::WrongSide {
                expected: Side::Red,
                found: Side::Black,
                at: pos(0, 3),
            }
        );
        assert_eq!(
            game.try_move(pos(0, 9), pos(1, 8)).unwrap_err(),
            GameError::IllegalMove {
                from: pos(0, 9),
                to: pos(1, 8),
                reason: LegalityResult::InvalidByRule,
            }
        );
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_self_check_is_rejected() {
        let mut game = Game::from_fen("3k5/9/4r4/9/9/9/9/4R4/9/4K4 w").unwrap();
        assert_eq!(
            game.try_move(pos(4, 7), pos(0, 7)).unwrap_err(),
            GameError::IllegalMove {
                from: pos(4, 7),
                to: pos(0, 7),
                reason: LegalityResult::InvalidSelfCheck,
            }
        );
    }

    #[test]
    fn test_capturing_general_ends_game() {
        let mut game = Game::from_fen("p3k4/P8/C8/9/9/4R4/9/9/9/3K5 w").unwrap();
        game.try_move(pos(4, 5), pos(4, 0)).unwrap();
        assert_eq!(
            game.status(),
            GameStatus::GeneralCaptured { winner: Side::Red }
        );
        assert_eq!(
            game.try_move(pos(0, 0), pos(0, 1)).unwrap_err(),
            GameError::GameOver
        );
        assert_eq!(game.undo().unwrap_err(), GameError::GameOver);
    }

    #[test]
    fn test_checkmate_detected() {
        let mut game = Game::from_fen("3aka3/3PnP3/C8/9/9/9/9/9/9/5K3 w").unwrap();
        game.try_move(pos(0, 2), pos(4, 2)).unwrap();
        assert_eq!(game.status(), GameStatus::Checkmate { winner: Side::Red });
        assert!(game.in_check());
    }

    #[test]
    fn test_undo_restores_capture() {
        let mut game = Game::new();
        game.try_move(pos(1, 7), pos(1, 0)).unwrap();
        assert_eq!(game.board().piece_count(), 31);

        let record = game.undo().unwrap();
        assert_eq!(record.mv.captured.map(|p| p.kind), Some(PieceKind::Horse));
        assert_eq!(game.board(), &Board::standard());
        assert_eq!(game.turn(), Side::Red);
        assert_eq!(game.undo().unwrap_err(), GameError::NoHistory);
    }

    #[test]
    fn test_replay() {
        let mut game = Game::new();
        game.try_move(pos(7, 7), pos(4, 7)).unwrap();
        game.try_move(pos(7, 0), pos(6, 2)).unwrap();
        let boards = game.replay();
        assert_eq!(boards.len(), 3);
        assert_eq!(boards[0], Board::standard());
        assert_eq!(&boards[2], game.board());
    }

    #[test]
    fn test_resign() {
        let mut game = Game::new();
        assert_eq!(
            game.resign(Side::Red).unwrap(),
            GameStatus::Resigned {
                winner: Side::Black
            }
        );
        assert!(game.is_over());
        assert_eq!(game.resign(Side::Black).unwrap_err(), GameError::GameOver);
    }

    #[test]
    fn test_play_ai() {
        let mut game = Game::new();
        let mut ai = MinimaxAI::new(&AIConfig {
            depth: 1,
            seed: Some(7),
            ..Default::default()
        });
        let record = *game.play_ai(&mut ai).unwrap();
        assert_eq!(record.mv.side, Side::Red);
        assert_eq!(game.turn(), Side::Black);
        game.play_ai(&mut ai).unwrap();
        assert_eq!(game.history().len(), 2);
    }

    #[test]
    fn test_legal_destinations() {
        let game = Game::new();
        assert_eq!(
            game.legal_destinations(pos(1, 9)),
            vec![pos(0, 7), pos(2, 7)]
        );
        assert!(game.legal_destinations(pos(4, 4)).is_empty());
    }
}
