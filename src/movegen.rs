//! 合法走法生成
//!
//! 汇总行棋方每个棋子的可达格，并套用“强制吃将”规则：
//! 只要能吃掉对方王/将，就只能走吃将的走法。
//!
//! 威胁检测不另做攻击表，而是把局面换成对方走，复用同一个生成器。

use std::collections::HashSet;

use crate::rules::destinations;
use crate::state::GameState;
use crate::types::Action;

/// 行棋方的所有合法走法
///
/// 没有王/将或只剩一个子时返回空列表（这是负局，由调用方判定）。
pub fn legal_actions(state: &GameState) -> Vec<Action> {
    let board = state.board();
    let attacker = state.attacker();

    let pieces = board.positions_of(attacker);
    if board.leader_in(&pieces).is_none() || pieces.len() == 1 {
        return Vec::new();
    }

    let mut actions = Vec::with_capacity(pieces.len() * 4);
    for from in pieces {
        for to in destinations(board, from) {
            actions.push(Action::new(from, to));
        }
    }

    // 强制吃将
    if let Some(enemy_leader) = board.leader_of(attacker.opposite()) {
        let winning: Vec<Action> = actions
            .iter()
            .copied()
            .filter(|a| a.to == enemy_leader)
            .collect();
        if !winning.is_empty() {
            return winning;
        }
    }

    actions
}

/// 对方在当前棋盘上的所有走法（假设轮到对方）
pub fn enemy_threats(state: &GameState) -> Vec<Action> {
    legal_actions(&state.flipped())
}

/// 行棋方的王/将是否会被对方立即吃掉
pub fn is_leader_under_threat(state: &GameState) -> bool {
    let threats = enemy_threats(state);
    if threats.is_empty() {
        return false;
    }

    let board = state.board();
    let leader = match board.leader_of(state.attacker()) {
        Some(pos) => pos,
        None => {
            assert!(
                board.piece_count(state.attacker()) == 0,
                "{} side has pieces but no leader while being threatened",
                state.attacker()
            );
            return false;
        }
    };

    threats.iter().any(|a| a.to == leader)
}

/// 行棋方能否立即吃掉对方王/将
pub fn can_capture_enemy_leader(state: &GameState) -> bool {
    is_leader_under_threat(&state.flipped())
}

/// 威胁感知过滤
///
/// 后继局面轮到对方走；去掉对方能立即吃将的局面。
/// 己方刚吃掉对方王/将的局面对方无子可走，不会被过滤掉。
pub fn filter_threat_aware(next_states: Vec<GameState>) -> Vec<GameState> {
    next_states
        .into_iter()
        .filter(|s| !can_capture_enemy_leader(s))
        .collect()
}

/// 按层统计不同局面数量（宽度优先，跳过已见局面和终局）
///
/// 返回每一层的新局面数，第 0 层为根局面本身。
pub fn level_census(root: &GameState, max_depth: usize) -> Vec<usize> {
    let mut visited: HashSet<u64> = HashSet::new();
    let mut level = vec![root.clone()];
    let mut sizes = Vec::with_capacity(max_depth + 1);
    visited.insert(root.key());

    for depth in 0..=max_depth {
        sizes.push(level.len());
        if depth == max_depth {
            break;
        }

        let mut next_level = Vec::new();
        for state in &level {
            if state.is_terminal() {
                continue;
            }
            for next in state.successors() {
                if visited.insert(next.key()) {
                    next_level.push(next);
                }
            }
        }
        log::trace!("census depth {}: {} new positions", depth + 1, next_level.len());
        level = next_level;
    }

    sizes
}
