//! 走子模拟（rollout）
//!
//! 从给定局面随机走到终局或步数上限。

use std::collections::HashSet;

use rand::Rng;

use crate::state::GameState;

/// 随机走子直到终局、步数上限或所有后继都已出现过
///
/// `smart` 为真时优先从不送将的后继中选（为空则退回全部后继）。
/// 同一次模拟内重复出现的局面不会再走进去。
pub fn rollout<R: Rng>(start: &GameState, max_depth: u32, smart: bool, rng: &mut R) -> GameState {
    let mut visited: HashSet<u64> = HashSet::new();
    let mut current = start.clone();
    visited.insert(current.key());

    for _ in 0..max_depth {
        if current.is_terminal() {
            break;
        }

        let mut candidates = if smart {
            let safe = current.threat_aware_successors();
            if safe.is_empty() {
                current.successors()
            } else {
                safe
            }
        } else {
            current.successors()
        };
        candidates.retain(|s| !visited.contains(&s.key()));

        if candidates.is_empty() {
            log::trace!("rollout cut at turn {}: every successor repeats", current.turn_number());
            break;
        }

        let next = candidates.swap_remove(rng.gen_range(0..candidates.len()));
        visited.insert(next.key());
        current = next;
    }

    current
}
