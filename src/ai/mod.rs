//! AI 策略模块
//!
//! 提供多种 AI 策略实现，包括随机、贪婪、蒙特卡洛树搜索

mod greedy;
pub mod mcts;
pub mod playout;
mod random;

pub use greedy::GreedyAI;
pub use mcts::{run_search, MCTSAI, MctsNode, MctsTree, SearchConfig};
pub use random::RandomAI;

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// 全局节点计数器（MCTS 每展开一个节点 +1）
pub static NODE_COUNT: AtomicU64 = AtomicU64::new(0);

/// 重置节点计数器
pub fn reset_node_count() {
    NODE_COUNT.store(0, AtomicOrdering::Relaxed);
}

/// 获取当前节点计数
pub fn get_node_count() -> u64 {
    NODE_COUNT.load(AtomicOrdering::Relaxed)
}

use crate::notation::{parse_state, state_string};
use crate::state::GameState;
use crate::types::Action;
use std::cmp::Ordering;

/// 可用策略
pub const AVAILABLE_STRATEGIES: [&str; 3] = ["random", "greedy", "mcts"];

/// 默认策略
pub const DEFAULT_STRATEGY: &str = "mcts";

/// AI 配置
#[derive(Debug, Clone)]
pub struct AIConfig {
    /// MCTS 迭代次数
    pub iterations: u32,
    /// UCT 探索常数
    pub exploration: f64,
    /// 单次模拟最大步数
    pub max_rollout_depth: u32,
    /// 模拟时优先不送将
    pub smart_rollouts: bool,
    /// 随机性（0.0-1.0，贪婪策略的噪声）
    pub randomness: f64,
    /// 随机种子
    pub seed: Option<u64>,
    /// 时间限制（秒）
    pub time_limit: Option<f64>,
}

impl Default for AIConfig {
    fn default() -> Self {
        AIConfig {
            iterations: 10_000,
            exploration: 1.4,
            max_rollout_depth: 200,
            smart_rollouts: true,
            randomness: 0.0,
            seed: None,
            time_limit: None,
        }
    }
}

/// 走法评分
#[derive(Debug, Clone)]
pub struct ScoredAction {
    pub action: Action,
    pub score: f64,
}

/// AI 策略接口
pub trait AIStrategy {
    /// 选择走法（返回带评分的走法列表）
    fn select_actions(&self, state: &GameState, n: usize) -> Vec<ScoredAction>;

    /// 选择最佳走法
    fn select_best_action(&self, state: &GameState) -> Option<Action> {
        self.select_actions(state, 1).first().map(|sa| sa.action)
    }

    /// 走出最佳走法后的局面；没有可走的棋时返回原局面
    fn next_state(&self, state: &GameState) -> GameState {
        match self.select_best_action(state) {
            Some(action) => state.apply_action(&action),
            None => state.clone(),
        }
    }
}

/// 排序辅助函数
pub(crate) fn sort_and_truncate(scored: &mut Vec<ScoredAction>, n: usize) {
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(n);
}

/// AI 引擎 - 统一的 AI 接口
pub struct AIEngine {
    strategy: Box<dyn AIStrategy>,
}

impl AIEngine {
    /// 创建随机 AI
    pub fn random(seed: Option<u64>) -> Self {
        AIEngine {
            strategy: Box::new(RandomAI::new(seed)),
        }
    }

    /// 创建贪婪 AI
    pub fn greedy(config: &AIConfig) -> Self {
        AIEngine {
            strategy: Box::new(GreedyAI::new(config)),
        }
    }

    /// 创建 MCTS AI
    pub fn mcts(config: &AIConfig) -> Self {
        AIEngine {
            strategy: Box::new(MCTSAI::new(config)),
        }
    }

    /// 从策略名称创建
    pub fn from_strategy(name: &str, config: &AIConfig) -> Result<Self, String> {
        match name.to_lowercase().as_str() {
            "random" => Ok(Self::random(config.seed)),
            "greedy" => Ok(Self::greedy(config)),
            "mcts" | "montecarlo" => Ok(Self::mcts(config)),
            _ => Err(format!(
                "Unknown strategy: {}. Available: {}",
                name,
                AVAILABLE_STRATEGIES.join(", ")
            )),
        }
    }

    pub fn select_actions(&self, state: &GameState, n: usize) -> Vec<ScoredAction> {
        self.strategy.select_actions(state, n)
    }

    pub fn select_best_action(&self, state: &GameState) -> Option<Action> {
        self.strategy.select_best_action(state)
    }

    pub fn next_state(&self, state: &GameState) -> GameState {
        self.strategy.next_state(state)
    }

    /// 从局面字符串选择走法（返回带评分的走法字符串）
    pub fn select_actions_text(&self, position: &str, n: usize) -> Result<Vec<(String, f64)>, String> {
        let state = parse_state(position)?;
        Ok(self
            .strategy
            .select_actions(&state, n)
            .into_iter()
            .map(|sa| (sa.action.to_string(), sa.score))
            .collect())
    }

    /// 从局面字符串走一步，返回新局面字符串
    pub fn next_state_text(&self, position: &str) -> Result<String, String> {
        let state = parse_state(position)?;
        Ok(state_string(&self.strategy.next_state(&state)))
    }
}
