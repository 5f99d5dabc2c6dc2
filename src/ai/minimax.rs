//! Minimax AI 策略（Alpha-Beta 剪枝）
//!
//! 每层都在棋盘副本上走子，分支之间不共享可变状态。
//! 随机性（评估扰动、将帅走法的随机放行）全部来自外部传入的随机数生成器。

use super::eval::{evaluate, static_score};
use super::{AIConfig, AIStrategy, ScoredMove};
use crate::board::Board;
use crate::rules::{MoveRules, StandardRules};
use crate::types::{Move, PieceKind, Side};
use log::{debug, trace};
use rand::prelude::*;

/// 极值哨兵（有限值）
pub const INF: i32 = 999_999;

/// 吃子走法排在前面，其余保持原顺序（稳定排序）
pub fn order_moves(moves: &mut [Move]) {
    moves.sort_by_key(|mv| !mv.is_capture());
}

/// 搜索用的走法生成
///
/// 未被将军时，将帅的非吃子走法只按 `king_move_allowance` 的概率保留。
/// 如果筛完一步都不剩，退回完整的合法走法列表。
pub fn search_moves<M, G>(
    board: &Board,
    side: Side,
    rules: &M,
    king_move_allowance: f64,
    rng: &mut G,
) -> Vec<Move>
where
    M: MoveRules + ?Sized,
    G: Rng + ?Sized,
{
    let legal = rules.legal_moves(board, side);
    let in_check = rules.is_king_in_check(side, board);
    if in_check {
        return legal;
    }

    let throttled: Vec<Move> = legal
        .iter()
        .copied()
        .filter(|mv| {
            mv.kind != PieceKind::General
                || mv.is_capture()
                || rng.gen::<f64>() < king_move_allowance
        })
        .collect();

    if throttled.is_empty() {
        legal
    } else {
        throttled
    }
}

/// 一次搜索的上下文
struct Search<'a, M: ?Sized, G: ?Sized> {
    rules: &'a M,
    rng: &'a mut G,
    ai_side: Side,
    king_move_allowance: f64,
    jitter: bool,
    nodes: u64,
}

impl<'a, M, G> Search<'a, M, G>
where
    M: MoveRules + ?Sized,
    G: Rng + ?Sized,
{
    fn evaluate(&mut self, board: &Board) -> i32 {
        if self.jitter {
            evaluate(board, self.ai_side, self.rules, &mut *self.rng)
        } else {
            static_score(board, self.ai_side, self.rules)
        }
    }

    fn ordered_moves(&mut self, board: &Board, side: Side) -> Vec<Move> {
        let mut moves = search_moves(
            board,
            side,
            self.rules,
            self.king_move_allowance,
            &mut *self.rng,
        );
        order_moves(&mut moves);
        moves
    }

    /// 根节点：返回最佳走法及其分数
    fn root(&mut self, board: &Board, depth: u32) -> Option<ScoredMove> {
        if board.is_game_over() {
            return None;
        }
        let moves = self.ordered_moves(board, self.ai_side);

        let mut best: Option<ScoredMove> = None;
        let mut alpha = -INF;
        let beta = INF;

        for mv in moves {
            // 能直接吃掉对方将帅就立即返回
            if mv.captures_general() {
                debug!("{} captures the general, skipping search", mv);
                return Some(ScoredMove { mv, score: INF });
            }

            let next = board.with_move(&mv);
            let score = self.minimax(&next, depth.saturating_sub(1), false, alpha, beta);
            trace!("root move {} scored {}", mv, score);

            // 分数相同时保留先找到的走法
            if best.is_none() || score > alpha {
                alpha = score;
                best = Some(ScoredMove { mv, score });
            }
        }

        best
    }

    fn minimax(
        &mut self,
        board: &Board,
        depth: u32,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.nodes += 1;

        if depth == 0 || board.is_game_over() {
            return self.evaluate(board);
        }

        let turn = if maximizing {
            self.ai_side
        } else {
            self.ai_side.opposite()
        };
        let moves = self.ordered_moves(board, turn);

        if moves.is_empty() {
            return if maximizing { -INF } else { INF };
        }

        if maximizing {
            let mut max_eval = -INF;
            for mv in moves {
                let next = board.with_move(&mv);
                let eval = self.minimax(&next, depth - 1, false, alpha, beta);
                max_eval = max_eval.max(eval);
                alpha = alpha.max(eval);
                if beta <= alpha {
                    break;
                }
            }
            max_eval
        } else {
            let mut min_eval = INF;
            for mv in moves {
                let next = board.with_move(&mv);
                let eval = self.minimax(&next, depth - 1, true, alpha, beta);
                min_eval = min_eval.min(eval);
                beta = beta.min(eval);
                if beta <= alpha {
                    break;
                }
            }
            min_eval
        }
    }
}

/// 为 `ai_side` 选出最佳走法
///
/// 没有合法走法（或任一方已没有将帅）时返回 `None`。
pub fn best_move<M, G>(
    board: &Board,
    depth: u32,
    ai_side: Side,
    rules: &M,
    rng: &mut G,
) -> Option<Move>
where
    M: MoveRules + ?Sized,
    G: Rng + ?Sized,
{
    let config = AIConfig {
        depth,
        ..AIConfig::default()
    };
    search_with_config(board, ai_side, rules, &config, rng).map(|(sm, _)| sm.mv)
}

/// 按配置搜索，返回最佳走法和访问的节点数
pub fn search_with_config<M, G>(
    board: &Board,
    ai_side: Side,
    rules: &M,
    config: &AIConfig,
    rng: &mut G,
) -> Option<(ScoredMove, u64)>
where
    M: MoveRules + ?Sized,
    G: Rng + ?Sized,
{
    let mut search = Search {
        rules,
        rng,
        ai_side,
        king_move_allowance: config.king_move_allowance,
        jitter: config.jitter,
        nodes: 0,
    };
    let best = search.root(board, config.depth);
    let nodes = search.nodes;
    best.map(|sm| (sm, nodes))
}

/// Minimax AI - 使用 Alpha-Beta 剪枝
pub struct MinimaxAI<M: MoveRules = StandardRules> {
    config: AIConfig,
    rules: M,
    rng: StdRng,
    last_nodes: u64,
}

impl MinimaxAI<StandardRules> {
    pub fn new(config: &AIConfig) -> Self {
        MinimaxAI::with_rules(config, StandardRules)
    }
}

impl<M: MoveRules> MinimaxAI<M> {
    pub fn with_rules(config: &AIConfig, rules: M) -> Self {
        let rng = match config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        MinimaxAI {
            config: config.clone(),
            rules,
            rng,
            last_nodes: 0,
        }
    }

    pub fn config(&self) -> &AIConfig {
        &self.config
    }
}

impl<M: MoveRules> AIStrategy for MinimaxAI<M> {
    fn name(&self) -> &'static str {
        "minimax"
    }

    fn last_nodes(&self) -> u64 {
        self.last_nodes
    }

    fn search(&mut self, board: &Board, side: Side) -> Option<ScoredMove> {
        let result = search_with_config(board, side, &self.rules, &self.config, &mut self.rng);
        match result {
            Some((sm, nodes)) => {
                self.last_nodes = nodes;
                debug!(
                    "minimax depth={} side={} best={} score={} nodes={}",
                    self.config.depth, side, sm.mv, sm.score, nodes
                );
                Some(sm)
            }
            None => {
                self.last_nodes = 0;
                debug!("minimax: {} has no move", side);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::parse_fen;
    use crate::rules::{check_move, legal_moves};
    use crate::types::{LegalityResult, Position};

    fn board(fen: &str) -> Board {
        parse_fen(fen).unwrap().0
    }

    fn pos(x: i8, y: i8) -> Position {
        Position::new(x, y)
    }

    fn quiet_config(depth: u32) -> AIConfig {
        AIConfig {
            depth,
            seed: Some(1),
            king_move_allowance: 1.0,
            jitter: false,
        }
    }

    #[test]
    fn test_order_moves_captures_first_and_stable() {
        let b = Board::standard();
        let mut moves = legal_moves(&b, Side::Red);
        let original = moves.clone();
        order_moves(&mut moves);

        let captures: Vec<Move> = original.iter().copied().filter(|m| m.is_capture()).collect();
        let quiet: Vec<Move> = original.iter().copied().filter(|m| !m.is_capture()).collect();
        assert_eq!(captures.len(), 2);
        assert_eq!(&moves[..2], &captures[..]);
        assert_eq!(&moves[2..], &quiet[..]);
    }

    #[test]
    fn test_captures_general_immediately() {
        // 红炮可以吃卒，红兵可以吃卒，红车可以吃将
        let b = board("p3k4/P8/C8/9/9/4R4/9/9/9/3K5 w");
        for depth in [1, 3] {
            let mut rng = StdRng::seed_from_u64(3);
            let mv = best_move(&b, depth, Side::Red, &StandardRules, &mut rng).unwrap();
            assert_eq!((mv.from, mv.to), (pos(4, 5), pos(4, 0)));
            assert!(mv.captures_general());
        }
    }

    #[test]
    fn test_standard_opening_returns_valid_move() {
        let b = Board::standard();
        for side in [Side::Red, Side::Black] {
            for depth in [1, 2] {
                let mut rng = StdRng::seed_from_u64(11);
                let mv = best_move(&b, depth, side, &StandardRules, &mut rng)
                    .expect("opening always has a move");
                assert_eq!(mv.side, side);
                assert_eq!(check_move(&b, mv.from, mv.to), LegalityResult::Valid);
            }
        }
    }

    #[test]
    fn test_no_legal_move_returns_none() {
        let b = board("3aka3/3PnP3/4C4/9/9/9/9/9/9/5K3 b");
        let mut rng = StdRng::seed_from_u64(5);
        assert!(best_move(&b, 2, Side::Black, &StandardRules, &mut rng).is_none());
    }

    #[test]
    fn test_game_over_board_returns_none() {
        let b = board("9/9/9/9/9/9/9/9/R8/5K3 w");
        let mut rng = StdRng::seed_from_u64(5);
        assert!(best_move(&b, 2, Side::Red, &StandardRules, &mut rng).is_none());
    }

    #[test]
    fn test_wins_hanging_chariot() {
        let b = board("3k5/9/9/9/r3R4/9/9/9/9/5K3 w");
        for depth in [1, 2] {
            let mut rng = StdRng::seed_from_u64(9);
            let (sm, _) =
                search_with_config(&b, Side::Red, &StandardRules, &quiet_config(depth), &mut rng)
                    .unwrap();
            assert_eq!((sm.mv.from, sm.mv.to), (pos(4, 4), pos(0, 4)));
        }
    }

    #[test]
    fn test_prefers_move_that_leaves_opponent_without_moves() {
        // 红炮平到 (4,2) 后黑方无子可动
        let b = board("3aka3/3PnP3/C8/9/9/9/9/9/9/5K3 w");
        let mut rng = StdRng::seed_from_u64(2);
        let (sm, _) =
            search_with_config(&b, Side::Red, &StandardRules, &quiet_config(2), &mut rng)
                .unwrap();
        assert_eq!((sm.mv.from, sm.mv.to), (pos(0, 2), pos(4, 2)));
        assert_eq!(sm.score, INF);
    }

    #[test]
    fn test_ties_keep_first_move() {
        // 只有两个将，所有走法分数相同
        let b = board("3k5/9/9/9/9/9/9/9/9/5K3 w");
        for depth in [1, 2] {
            let mut rng = StdRng::seed_from_u64(4);
            let (sm, _) =
                search_with_config(&b, Side::Red, &StandardRules, &quiet_config(depth), &mut rng)
                    .unwrap();
            assert_eq!((sm.mv.from, sm.mv.to), (pos(5, 9), pos(5, 8)));
        }
    }

    #[test]
    fn test_king_move_throttling() {
        let b = board("3k5/9/9/9/9/9/9/9/9/R4K3 w");
        let mut rng = StdRng::seed_from_u64(8);

        let none = search_moves(&b, Side::Red, &StandardRules, 0.0, &mut rng);
        assert!(none.iter().all(|m| m.kind != PieceKind::General));
        assert!(!none.is_empty());

        let all = search_moves(&b, Side::Red, &StandardRules, 1.0, &mut rng);
        assert_eq!(all, legal_moves(&b, Side::Red));
        assert!(all.iter().any(|m| m.kind == PieceKind::General));
    }

    #[test]
    fn test_king_moves_kept_when_in_check_or_alone() {
        // 黑车将军：将帅走法不受限制
        let checked = board("3k5/9/9/9/9/9/9/9/5r3/R4K3 w");
        let mut rng = StdRng::seed_from_u64(8);
        let moves = search_moves(&checked, Side::Red, &StandardRules, 0.0, &mut rng);
        assert_eq!(moves, legal_moves(&checked, Side::Red));

        // 只剩将帅能走时退回完整列表
        let alone = board("3k5/9/9/9/9/9/9/9/9/5K3 w");
        let moves = search_moves(&alone, Side::Red, &StandardRules, 0.0, &mut rng);
        assert_eq!(moves, legal_moves(&alone, Side::Red));
        assert!(!moves.is_empty());
    }

    #[test]
    fn test_seeded_search_is_reproducible() {
        let b = Board::standard();
        let config = AIConfig {
            depth: 2,
            seed: Some(42),
            ..AIConfig::default()
        };
        let mut first = MinimaxAI::new(&config);
        let mut second = MinimaxAI::new(&config);
        let a = first.select_move(&b, Side::Red);
        let c = second.select_move(&b, Side::Red);
        assert_eq!(a, c);
        assert!(first.last_nodes() > 0);
    }
}
