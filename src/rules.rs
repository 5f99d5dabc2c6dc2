//! 走法规则校验
//!
//! 单步走法的合法性分三种结果（见 [`LegalityResult`]）：
//! 1. 违反棋子走法规则（含出界、吃己方子、蹩马腿、塞象眼、炮架数不对等）
//! 2. 走法本身合规，但走后己方将帅被攻击或将帅对脸
//! 3. 合法
//!
//! 注意：只有走子方当前 *未被将军* 时才做第 2 类检查。已被将军时任何
//! 合规的走法都会被接受，即使没有解除将军。

use crate::board::Board;
use crate::types::{GameStatus, LegalityResult, Move, Piece, PieceKind, Position, Side};

/// 走法校验器接口
///
/// 搜索引擎通过它获取走法，便于替换规则实现。
pub trait MoveRules {
    /// 校验一步走法
    fn check_move(&self, board: &Board, from: Position, to: Position) -> LegalityResult;

    /// 某方将帅当前是否被攻击
    fn is_king_in_check(&self, side: Side, board: &Board) -> bool;

    /// 某方的所有合法走法
    fn legal_moves(&self, board: &Board, side: Side) -> Vec<Move> {
        let mut moves = Vec::with_capacity(48);
        for piece in board.pieces(Some(side)) {
            for to in all_positions() {
                if self.check_move(board, piece.position, to).is_valid() {
                    moves.push(build_move(board, piece, to));
                }
            }
        }
        moves
    }
}

/// 标准象棋规则
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRules;

impl MoveRules for StandardRules {
    fn check_move(&self, board: &Board, from: Position, to: Position) -> LegalityResult {
        check_move(board, from, to)
    }

    fn is_king_in_check(&self, side: Side, board: &Board) -> bool {
        is_king_in_check(side, board)
    }

    fn legal_moves(&self, board: &Board, side: Side) -> Vec<Move> {
        legal_moves(board, side)
    }
}

/// 按格子索引顺序遍历所有位置
fn all_positions() -> impl Iterator<Item = Position> {
    (0..90).map(Position::from_index)
}

fn build_move(board: &Board, piece: &Piece, to: Position) -> Move {
    Move {
        from: piece.position,
        to,
        side: piece.side,
        kind: piece.kind,
        captured: board.piece_at(to).copied(),
    }
}

/// 为起点上的棋子构造一步走法（不做合法性校验）
pub fn make_move(board: &Board, from: Position, to: Position) -> Option<Move> {
    let piece = board.piece_at(from)?;
    Some(build_move(board, piece, to))
}

/// 只按棋子走法规则判断（不考虑走后己方是否被将）
pub fn is_movement_valid(board: &Board, from: Position, to: Position) -> bool {
    let piece = match board.piece_at(from) {
        Some(p) => p,
        None => return false,
    };
    if !to.is_valid() {
        return false;
    }
    if board.piece_at(to).is_some_and(|t| t.side == piece.side) {
        return false;
    }

    match piece.kind {
        PieceKind::General => is_valid_general_move(piece, to),
        PieceKind::Advisor => is_valid_advisor_move(piece, to),
        PieceKind::Elephant => is_valid_elephant_move(board, piece, to),
        PieceKind::Chariot => is_valid_chariot_move(board, piece, to),
        PieceKind::Horse => is_valid_horse_move(board, piece, to),
        PieceKind::Cannon => is_valid_cannon_move(board, piece, to),
        PieceKind::Soldier => is_valid_soldier_move(piece, to),
    }
}

fn is_valid_general_move(piece: &Piece, to: Position) -> bool {
    let dx = (to.x - piece.position.x).abs();
    let dy = (to.y - piece.position.y).abs();
    dx + dy == 1 && to.is_in_palace(piece.side)
}

fn is_valid_advisor_move(piece: &Piece, to: Position) -> bool {
    let dx = (to.x - piece.position.x).abs();
    let dy = (to.y - piece.position.y).abs();
    dx == 1 && dy == 1 && to.is_in_palace(piece.side)
}

fn is_valid_elephant_move(board: &Board, piece: &Piece, to: Position) -> bool {
    let from = piece.position;
    if (to.x - from.x).abs() != 2 || (to.y - from.y).abs() != 2 {
        return false;
    }
    // 象不能过河
    if !to.is_on_own_side(piece.side) {
        return false;
    }
    // 塞象眼
    let eye = Position::new((from.x + to.x) / 2, (from.y + to.y) / 2);
    !board.is_occupied(eye)
}

fn is_valid_chariot_move(board: &Board, piece: &Piece, to: Position) -> bool {
    let from = piece.position;
    if from.x != to.x && from.y != to.y {
        return false;
    }
    board.count_between(from, to) == 0
}

fn is_valid_horse_move(board: &Board, piece: &Piece, to: Position) -> bool {
    let from = piece.position;
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    // 蹩马腿：长边方向上紧挨起点的一格
    let leg = match (dx.abs(), dy.abs()) {
        (1, 2) => from.offset(0, dy.signum()),
        (2, 1) => from.offset(dx.signum(), 0),
        _ => return false,
    };
    !board.is_occupied(leg)
}

fn is_valid_cannon_move(board: &Board, piece: &Piece, to: Position) -> bool {
    let from = piece.position;
    if from.x != to.x && from.y != to.y {
        return false;
    }
    let between = board.count_between(from, to);
    if board.is_occupied(to) {
        // 吃子需要恰好一个炮架
        between == 1
    } else {
        between == 0
    }
}

fn is_valid_soldier_move(piece: &Piece, to: Position) -> bool {
    let from = piece.position;
    let dx = (to.x - from.x).abs();
    let dy = to.y - from.y;
    let forward = piece.side.forward();

    if dx == 0 && dy == forward {
        return true;
    }
    // 过河前只能直走，过河后可以平移，永远不能后退
    dx == 1 && dy == 0 && from.has_crossed_river(piece.side)
}

/// 某方将帅是否被对方任一棋子按走法规则攻击到
///
/// 没有将帅时返回 false。
pub fn is_king_in_check(side: Side, board: &Board) -> bool {
    let general = match board.find_general(side) {
        Some(pos) => pos,
        None => return false,
    };
    board
        .pieces(Some(side.opposite()))
        .any(|p| is_movement_valid(board, p.position, general))
}

/// 两将是否在同一列且中间无子
pub fn generals_facing(board: &Board) -> bool {
    match (
        board.find_general(Side::Red),
        board.find_general(Side::Black),
    ) {
        (Some(red), Some(black)) => red.x == black.x && board.count_between(red, black) == 0,
        _ => false,
    }
}

/// 在已知走子方是否被将军的情况下分类
fn classify(board: &Board, from: Position, to: Position, already_in_check: bool) -> LegalityResult {
    if !is_movement_valid(board, from, to) {
        return LegalityResult::InvalidByRule;
    }
    if already_in_check {
        return LegalityResult::Valid;
    }
    let side = match board.piece_at(from) {
        Some(p) => p.side,
        None => return LegalityResult::InvalidByRule,
    };

    let mut next = board.clone();
    if let Some(mv) = make_move(board, from, to) {
        next.apply_move(&mv);
    }
    if is_king_in_check(side, &next) || generals_facing(&next) {
        LegalityResult::InvalidSelfCheck
    } else {
        LegalityResult::Valid
    }
}

/// 校验从 `from` 到 `to` 的一步走法
pub fn check_move(board: &Board, from: Position, to: Position) -> LegalityResult {
    let side = match board.piece_at(from) {
        Some(p) => p.side,
        None => return LegalityResult::InvalidByRule,
    };
    if !is_movement_valid(board, from, to) {
        return LegalityResult::InvalidByRule;
    }
    classify(board, from, to, is_king_in_check(side, board))
}

/// 某方的所有合法走法
///
/// 顺序：棋子按格子索引，目标格按格子索引。
pub fn legal_moves(board: &Board, side: Side) -> Vec<Move> {
    let in_check = is_king_in_check(side, board);
    let mut moves = Vec::with_capacity(48);
    for piece in board.pieces(Some(side)) {
        for to in all_positions() {
            if classify(board, piece.position, to, in_check).is_valid() {
                moves.push(build_move(board, piece, to));
            }
        }
    }
    moves
}

/// 选中棋子的所有可走位置（用于界面高亮）
pub fn legal_destinations(board: &Board, from: Position) -> Vec<Position> {
    let side = match board.piece_at(from) {
        Some(p) => p.side,
        None => return Vec::new(),
    };
    let in_check = is_king_in_check(side, board);
    all_positions()
        .filter(|&to| classify(board, from, to, in_check).is_valid())
        .collect()
}

/// 某方是否还有合法走法
pub fn has_legal_move(board: &Board, side: Side) -> bool {
    let in_check = is_king_in_check(side, board);
    board.pieces(Some(side)).any(|piece| {
        all_positions().any(|to| classify(board, piece.position, to, in_check).is_valid())
    })
}

/// 判断对局状态
pub fn game_status(board: &Board, side_to_move: Side) -> GameStatus {
    if board.general_count(Side::Red) == 0 {
        return GameStatus::GeneralCaptured { winner: Side::Black };
    }
    if board.general_count(Side::Black) == 0 {
        return GameStatus::GeneralCaptured { winner: Side::Red };
    }
    if has_legal_move(board, side_to_move) {
        return GameStatus::Ongoing;
    }
    if is_king_in_check(side_to_move, board) {
        GameStatus::Checkmate {
            winner: side_to_move.opposite(),
        }
    } else {
        GameStatus::Stalemate
    }
}
