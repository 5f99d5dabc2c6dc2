//! AI 策略模块
//!
//! Minimax + Alpha-Beta 搜索，以及局面评估

mod eval;
mod minimax;

pub use eval::{
    count_guards, evaluate, static_score, CROSSED_SOLDIER_BONUS, GENERAL_ATTACKED_PENALTY,
    GENERAL_GUARD_BONUS,
};
pub use minimax::{best_move, order_moves, search_moves, search_with_config, MinimaxAI, INF};

use crate::board::Board;
use crate::fen::parse_fen;
use crate::types::{Move, Side};

/// 可用策略
pub const AVAILABLE_STRATEGIES: &[&str] = &["minimax"];

/// 默认策略
pub const DEFAULT_STRATEGY: &str = "minimax";

/// AI 配置
#[derive(Debug, Clone, PartialEq)]
pub struct AIConfig {
    /// 搜索深度
    pub depth: u32,
    /// 随机种子
    pub seed: Option<u64>,
    /// 未被将军时，将帅非吃子走法进入搜索的概率
    pub king_move_allowance: f64,
    /// 评估时是否加入 -1..=1 的随机扰动
    pub jitter: bool,
}

impl Default for AIConfig {
    fn default() -> Self {
        AIConfig {
            depth: 3,
            seed: None,
            king_move_allowance: 0.2,
            jitter: true,
        }
    }
}

/// 走法评分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: i32,
}

/// AI 策略接口
pub trait AIStrategy {
    /// 策略名称
    fn name(&self) -> &'static str;

    /// 搜索最佳走法（带评分）
    fn search(&mut self, board: &Board, side: Side) -> Option<ScoredMove>;

    /// 上一次搜索访问的节点数
    fn last_nodes(&self) -> u64 {
        0
    }

    /// 选择最佳走法
    fn select_move(&mut self, board: &Board, side: Side) -> Option<Move> {
        self.search(board, side).map(|sm| sm.mv)
    }
}

/// AI 引擎 - 统一的 AI 接口
pub struct AIEngine {
    strategy: Box<dyn AIStrategy>,
}

impl AIEngine {
    /// 创建 Minimax AI
    pub fn minimax(config: &AIConfig) -> Self {
        AIEngine {
            strategy: Box::new(MinimaxAI::new(config)),
        }
    }

    /// 从策略名称创建
    pub fn from_strategy(name: &str, config: &AIConfig) -> Result<Self, String> {
        match name.to_lowercase().as_str() {
            "minimax" | "alphabeta" => Ok(Self::minimax(config)),
            _ => Err(format!(
                "Unknown strategy: {}. Available: {}",
                name,
                AVAILABLE_STRATEGIES.join(", ")
            )),
        }
    }

    pub fn name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn strategy_mut(&mut self) -> &mut dyn AIStrategy {
        self.strategy.as_mut()
    }

    pub fn search(&mut self, board: &Board, side: Side) -> Option<ScoredMove> {
        self.strategy.search(board, side)
    }

    pub fn last_nodes(&self) -> u64 {
        self.strategy.last_nodes()
    }

    /// 从 FEN 选择最佳走法（ICCS 格式），走子方取 FEN 中的回合
    pub fn select_move_fen(&mut self, fen: &str) -> Result<Option<String>, String> {
        let (board, turn) = parse_fen(fen).map_err(|e| e.to_string())?;
        Ok(self.strategy.select_move(&board, turn).map(|m| m.to_iccs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::START_FEN;

    #[test]
    fn test_default_config() {
        let config = AIConfig::default();
        assert_eq!(config.depth, 3);
        assert_eq!(config.seed, None);
        assert!((config.king_move_allowance - 0.2).abs() < f64::EPSILON);
        assert!(config.jitter);
    }

    #[test]
    fn test_strategy_from_name() {
        let config = AIConfig::default();
        for name in AVAILABLE_STRATEGIES {
            let engine = AIEngine::from_strategy(name, &config);
            assert!(engine.is_ok(), "Failed to create strategy: {}", name);
        }
        assert!(AIEngine::from_strategy("MiniMax", &config).is_ok());
        assert!(AIEngine::from_strategy("mcts", &config).is_err());
    }

    #[test]
    fn test_select_move_fen() {
        let config = AIConfig {
            depth: 2,
            seed: Some(42),
            ..Default::default()
        };
        let mut engine = AIEngine::minimax(&config);
        let best = engine.select_move_fen(START_FEN).unwrap();
        assert!(best.is_some());
        assert_eq!(best.map(|s| s.len()), Some(4));
    }

    #[test]
    fn test_capture_preference() {
        // 红车吃黑炮
        let fen = "4k4/9/9/9/4c4/4R4/9/9/9/3K5 w";
        let config = AIConfig {
            depth: 1,
            seed: Some(1),
            ..Default::default()
        };
        let mut engine = AIEngine::minimax(&config);
        let best = engine.select_move_fen(fen).unwrap().unwrap();
        assert_eq!(best, "e4e5");
    }

    #[test]
    fn test_invalid_fen_is_error() {
        let mut engine = AIEngine::minimax(&AIConfig::default());
        assert!(engine.select_move_fen("not a fen").is_err());
    }
}
