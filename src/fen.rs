//! FEN 解析和生成
//!
//! 格式: `<棋盘> <回合> [其余字段忽略]`
//!
//! 棋盘从上往下依次是 y=0（黑方底线）到 y=9（红方底线），行之间用 `/` 分隔：
//! - 红方：K(帅) A(仕) B(相) N(马) R(车) C(炮) P(兵)，大写
//! - 黑方：对应小写
//! - 空格：数字 (1-9)
//!
//! 回合：`w`/`r` 红方，`b` 黑方。

use crate::board::Board;
use crate::error::FenError;
use crate::types::{Piece, PieceKind, Position, Side, BOARD_HEIGHT, BOARD_WIDTH};

/// 标准开局 FEN
pub const START_FEN: &str = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w";

/// 解析 FEN 字符串，返回棋盘和走子方
pub fn parse_fen(fen: &str) -> Result<(Board, Side), FenError> {
    let mut parts = fen.split_whitespace();
    let board_str = parts.next().ok_or(FenError::Empty)?;
    let board = parse_board(board_str)?;

    let turn = match parts.next() {
        None => Side::Red,
        Some(t) => {
            let mut chars = t.chars();
            match (chars.next().and_then(Side::from_fen_char), chars.next()) {
                (Some(side), None) => side,
                _ => return Err(FenError::InvalidTurn(t.to_string())),
            }
        }
    };

    Ok((board, turn))
}

/// 解析棋盘部分
fn parse_board(board_str: &str) -> Result<Board, FenError> {
    let ranks: Vec<&str> = board_str.split('/').collect();
    if ranks.len() != BOARD_HEIGHT as usize {
        return Err(FenError::RankCount(ranks.len()));
    }

    let mut pieces = Vec::with_capacity(32);
    for (y, rank) in ranks.iter().enumerate() {
        let mut x: usize = 0;
        for ch in rank.chars() {
            if let Some(run) = ch.to_digit(10) {
                x += run as usize;
                continue;
            }
            let kind = PieceKind::from_fen_char(ch).ok_or(FenError::InvalidPiece(ch))?;
            let side = if ch.is_ascii_uppercase() {
                Side::Red
            } else {
                Side::Black
            };
            pieces.push(Piece::new(kind, side, x as i8, y as i8));
            x += 1;
        }
        if x != BOARD_WIDTH as usize {
            return Err(FenError::RankWidth { rank: y, width: x });
        }
    }

    Ok(Board::from_pieces(pieces)?)
}

/// 生成 FEN 字符串
pub fn board_to_fen(board: &Board, turn: Side) -> String {
    let mut ranks = Vec::with_capacity(BOARD_HEIGHT as usize);
    for y in 0..BOARD_HEIGHT {
        let mut rank = String::new();
        let mut empty = 0;
        for x in 0..BOARD_WIDTH {
            match board.piece_at(Position::new(x, y)) {
                None => empty += 1,
                Some(piece) => {
                    if empty > 0 {
                        rank.push_str(&empty.to_string());
                        empty = 0;
                    }
                    rank.push(piece.to_fen_char());
                }
            }
        }
        if empty > 0 {
            rank.push_str(&empty.to_string());
        }
        ranks.push(rank);
    }
    format!("{} {}", ranks.join("/"), turn.to_fen_char())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_fen_matches_standard_board() {
        let (board, turn) = parse_fen(START_FEN).unwrap();
        assert_eq!(board, Board::standard());
        assert_eq!(turn, Side::Red);
        assert_eq!(board_to_fen(&board, turn), START_FEN);
    }

    #[test]
    fn test_alias_letters() {
        let (board, turn) = parse_fen("4g4/9/9/9/4h4/4E4/9/9/9/4K4 b").unwrap();
        assert_eq!(turn, Side::Black);
        assert_eq!(
            board.piece_at(Position::new(4, 4)).map(|p| p.kind),
            Some(PieceKind::Horse)
        );
        assert_eq!(
            board.piece_at(Position::new(4, 5)).map(|p| (p.kind, p.side)),
            Some((PieceKind::Elephant, Side::Red))
        );
    }

    #[test]
    fn test_turn_defaults_and_extra_fields() {
        let (_, turn) = parse_fen("4k4/9/9/9/9/9/9/9/9/4K4").unwrap();
        assert_eq!(turn, Side::Red);
        let (_, turn) = parse_fen("4k4/9/9/9/9/9/9/9/9/4K4 b - - 0 1").unwrap();
        assert_eq!(turn, Side::Black);
    }

    #[test]
    fn test_invalid_fen() {
        assert_eq!(parse_fen(""), Err(FenError::Empty));
        assert_eq!(
            parse_fen("4k4/9/9/9/9/9/9/9/4K4 w"),
            Err(FenError::RankCount(9))
        );
        assert_eq!(
            parse_fen("4k5/9/9/9/9/9/9/9/9/4K4 w"),
            Err(FenError::RankWidth { rank: 0, width: 10 })
        );
        assert_eq!(
            parse_fen("4k3x/9/9/9/9/9/9/9/9/4K4 w"),
            Err(FenError::InvalidPiece('x'))
        );
        assert!(matches!(
            parse_fen("4k4/9/9/9/9/9/9/9/9/4K4 x"),
            Err(FenError::InvalidTurn(_))
        ));
    }
}
