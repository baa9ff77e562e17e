//! 随机 AI 策略
//!
//! 把后继局面洗牌，排在前面的分数高。`next_state` 直接取洗牌后的第一个后继，
//! 不再重新走一遍。

use super::{sort_and_truncate, AIStrategy, ScoredAction};
use crate::state::GameState;
use crate::types::Action;
use rand::prelude::*;

/// 随机 AI - 在后继局面里随机挑一个
pub struct RandomAI {
    rng: StdRng,
}

impl RandomAI {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        RandomAI { rng }
    }

    /// 洗牌后的 (走法, 后继) 列表，同一种子同一局面结果相同
    fn shuffled(&self, state: &GameState) -> Vec<(Action, GameState)> {
        let mut successors = state.successors_with_actions();
        let mut rng = self.rng.clone();
        successors.shuffle(&mut rng);
        successors
    }
}

impl AIStrategy for RandomAI {
    fn select_actions(&self, state: &GameState, n: usize) -> Vec<ScoredAction> {
        let successors = self.shuffled(state);
        let total = successors.len();

        let mut scored: Vec<ScoredAction> = successors
            .into_iter()
            .enumerate()
            .map(|(rank, (action, _))| ScoredAction {
                action,
                score: (total - rank) as f64,
            })
            .collect();

        sort_and_truncate(&mut scored, n);
        scored
    }

    fn next_state(&self, state: &GameState) -> GameState {
        match self.shuffled(state).into_iter().next() {
            Some((action, next)) => {
                log::trace!("random: {} plays {}", state.attacker(), action);
                next
            }
            None => state.clone(),
        }
    }
}
