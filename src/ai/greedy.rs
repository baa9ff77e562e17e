//! 贪婪 AI 策略

use super::{sort_and_truncate, AIConfig, AIStrategy, ScoredAction};
use crate::eval::tactical_score;
use crate::state::GameState;
use rand::prelude::*;

/// 贪婪 AI - 只看一步，选战术评分对自己最有利的后继
pub struct GreedyAI {
    rng: StdRng,
    randomness: f64,
}

impl GreedyAI {
    pub fn new(config: &AIConfig) -> Self {
        let rng = match config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        GreedyAI {
            rng,
            randomness: config.randomness,
        }
    }

    /// 后继局面对行棋方的分数（最小化方取反）
    fn evaluate_successor(&self, mover_is_max: bool, next: &GameState) -> f64 {
        let score = tactical_score(next);
        if mover_is_max {
            score
        } else {
            -score
        }
    }
}

impl AIStrategy for GreedyAI {
    fn select_actions(&self, state: &GameState, n: usize) -> Vec<ScoredAction> {
        let mover_is_max = state.attacker().is_maximizer();
        let mut rng = self.rng.clone();

        let mut scored: Vec<ScoredAction> = state
            .successors_with_actions()
            .into_iter()
            .map(|(action, next)| {
                let base_score = self.evaluate_successor(mover_is_max, &next);
                let noise = if self.randomness > 0.0 {
                    rng.gen::<f64>() * self.randomness * 100.0
                } else {
                    0.0
                };
                ScoredAction {
                    action,
                    score: base_score + noise,
                }
            })
            .collect();

        sort_and_truncate(&mut scored, n);
        scored
    }
}
