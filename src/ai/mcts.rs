//! MCTS AI 策略
//!
//! 蒙特卡洛树搜索：选择 (UCT) → 扩展 → 模拟 → 回传。
//!
//! 节点存放在 `Vec` 里，父节点用下标表示，回传时沿下标一路走到根。
//! 所有节点的奖励都以根节点行棋方为视角：根方赢记 1，其余记 0，回传时不翻转。

use std::cmp::Ordering;
use std::time::Instant;

use rand::prelude::*;

use super::playout::rollout;
use super::{AIConfig, AIStrategy, ScoredAction, NODE_COUNT};
use crate::eval::{decisive_winner, tactical_score};
use crate::state::GameState;
use crate::types::{Action, AttackDirection, GameResult};

/// 被判定为必败的节点的奖励值，这类节点不会被选为最佳走法
pub const EXCLUDED_REWARD: f64 = f64::NEG_INFINITY;

/// 搜索参数
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// 迭代次数上限
    pub iterations: u32,
    /// UCT 探索常数
    pub exploration: f64,
    /// 单次模拟的最大步数
    pub max_rollout_depth: u32,
    /// 模拟时优先不送将的走法
    pub smart_rollouts: bool,
    /// 时间限制（秒），每次迭代之间检查
    pub time_limit: Option<f64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig::from(&AIConfig::default())
    }
}

impl From<&AIConfig> for SearchConfig {
    fn from(config: &AIConfig) -> Self {
        SearchConfig {
            iterations: config.iterations,
            exploration: config.exploration,
            max_rollout_depth: config.max_rollout_depth,
            smart_rollouts: config.smart_rollouts,
            time_limit: config.time_limit,
        }
    }
}

/// 搜索树节点
#[derive(Debug, Clone)]
pub struct MctsNode {
    state: GameState,
    /// 从父节点走到这里的走法，根节点为 None
    action: Option<Action>,
    parent: Option<usize>,
    children: Vec<usize>,
    /// 尚未展开的后继
    untried: Vec<(Action, GameState)>,
    depth: u32,
    visits: u32,
    wins: f64,
}

impl MctsNode {
    fn new(state: GameState, action: Option<Action>, parent: Option<usize>, depth: u32) -> Self {
        let untried = if state.is_terminal() {
            Vec::new()
        } else {
            state.successors_with_actions()
        };
        MctsNode {
            state,
            action,
            parent,
            children: Vec::new(),
            untried,
            depth,
            visits: 0,
            wins: 0.0,
        }
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[inline]
    pub fn action(&self) -> Option<Action> {
        self.action
    }

    #[inline]
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    /// 根节点深度为 0
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn visits(&self) -> u32 {
        self.visits
    }

    #[inline]
    pub fn wins(&self) -> f64 {
        self.wins
    }

    pub fn untried_count(&self) -> usize {
        self.untried.len()
    }

    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }

    #[inline]
    pub fn is_excluded(&self) -> bool {
        self.wins == EXCLUDED_REWARD
    }

    /// 平均奖励，未访问为 0
    pub fn mean_reward(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.wins / self.visits as f64
        }
    }

    /// UCT 值；未访问的节点为 +∞
    pub fn uct(&self, parent_visits: u32, exploration: f64) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }
        let n = self.visits as f64;
        self.wins / n + exploration * ((parent_visits as f64).ln() / n).sqrt()
    }
}

/// 搜索树（节点数组，下标 0 为根）
#[derive(Debug, Clone)]
pub struct MctsTree {
    nodes: Vec<MctsNode>,
    root_side: AttackDirection,
}

impl MctsTree {
    pub const ROOT: usize = 0;

    pub fn new(root: GameState) -> Self {
        let root_side = root.attacker();
        MctsTree {
            nodes: vec![MctsNode::new(root, None, None, 0)],
            root_side,
        }
    }

    #[inline]
    pub fn root(&self) -> &MctsNode {
        &self.nodes[Self::ROOT]
    }

    #[inline]
    pub fn node(&self, index: usize) -> &MctsNode {
        &self.nodes[index]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 根节点行棋方，所有奖励都以它为视角
    #[inline]
    pub fn root_side(&self) -> AttackDirection {
        self.root_side
    }

    /// 选择：从根往下，遇到还有未展开后继或没有子节点的节点就停
    ///
    /// UCT 相同时取第一个子节点。
    pub fn select(&self, exploration: f64) -> usize {
        let mut current = Self::ROOT;
        loop {
            let node = &self.nodes[current];
            if !node.is_fully_expanded() || node.children.is_empty() {
                return current;
            }

            let parent_visits = node.visits;
            let mut best = node.children[0];
            let mut best_uct = self.nodes[best].uct(parent_visits, exploration);
            for &child in &node.children[1..] {
                let uct = self.nodes[child].uct(parent_visits, exploration);
                if uct > best_uct {
                    best = child;
                    best_uct = uct;
                }
            }
            current = best;
        }
    }

    /// 扩展：弹出一个未展开后继（栈序），返回新节点下标
    pub fn expand(&mut self, index: usize) -> Option<usize> {
        let (action, state) = self.nodes[index].untried.pop()?;
        let depth = self.nodes[index].depth + 1;
        let child = MctsNode::new(state, Some(action), Some(index), depth);

        let child_index = self.nodes.len();
        self.nodes.push(child);
        self.nodes[index].children.push(child_index);
        NODE_COUNT.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        Some(child_index)
    }

    /// 回传：从节点一直到根（含根），访问数 +1，累加奖励
    pub fn backpropagate(&mut self, index: usize, reward: f64) {
        let mut current = Some(index);
        while let Some(i) = current {
            let node = &mut self.nodes[i];
            node.visits += 1;
            node.wins += reward;
            current = node.parent;
        }
    }

    /// 模拟终点对根方的奖励：根方赢为 1，未分胜负或对方赢为 0
    pub fn reward_for(&self, end: &GameState) -> f64 {
        match decisive_winner(tactical_score(end)) {
            Some(winner) if winner == self.root_side => 1.0,
            _ => 0.0,
        }
    }

    /// 根方走一步后，对方能立即取胜
    ///
    /// 只看深度 2 的节点：它的父节点（根的子节点）因此被排除。
    pub fn is_refutation(&self, index: usize) -> bool {
        let node = &self.nodes[index];
        node.depth == 2 && node.state.result() == GameResult::Won(self.root_side.opposite())
    }

    /// 快速通道：根的后继中有直接取胜的局面，就只保留它，不再搜索
    pub fn fast_path(&mut self) -> Option<usize> {
        let root_side = self.root_side;
        let winning = self.nodes[Self::ROOT]
            .untried
            .iter()
            .position(|(_, s)| s.result() == GameResult::Won(root_side))?;

        let (action, state) = self.nodes[Self::ROOT].untried.swap_remove(winning);
        self.nodes[Self::ROOT].untried.clear();

        let child_index = self.nodes.len();
        self.nodes
            .push(MctsNode::new(state, Some(action), Some(Self::ROOT), 1));
        self.nodes[Self::ROOT].children.push(child_index);
        Some(child_index)
    }

    /// 根的子节点排序：未排除的在前，按访问数、平均奖励降序，其余保持原顺序
    pub fn ranked_children(&self) -> Vec<usize> {
        let mut children = self.root().children.clone();
        children.sort_by(|&a, &b| {
            let (na, nb) = (&self.nodes[a], &self.nodes[b]);
            na.is_excluded()
                .cmp(&nb.is_excluded())
                .then(nb.visits.cmp(&na.visits))
                .then(
                    nb.mean_reward()
                        .partial_cmp(&na.mean_reward())
                        .unwrap_or(Ordering::Equal),
                )
        });
        children
    }

    /// 最佳子节点；全部被排除（每步都输）时返回 None
    pub fn best_child(&self) -> Option<usize> {
        self.ranked_children()
            .into_iter()
            .next()
            .filter(|&i| !self.nodes[i].is_excluded())
    }

    /// 根的子节点是否已全部展开并且都被排除
    fn all_children_excluded(&self) -> bool {
        let root = self.root();
        root.is_fully_expanded()
            && !root.children.is_empty()
            && root.children.iter().all(|&c| self.nodes[c].is_excluded())
    }
}

/// MCTS AI - Monte Carlo Tree Search
pub struct MCTSAI {
    config: SearchConfig,
    rng: StdRng,
}

impl MCTSAI {
    pub fn new(config: &AIConfig) -> Self {
        let rng = match config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        MCTSAI {
            config: SearchConfig::from(config),
            rng,
        }
    }

    /// 运行一次完整搜索，返回搜索树
    pub fn search(&self, state: &GameState) -> MctsTree {
        let mut tree = MctsTree::new(state.clone());
        let config = &self.config;

        if tree.root().is_fully_expanded() {
            log::debug!("mcts: root is terminal ({}), nothing to search", state.result());
            return tree;
        }

        if let Some(child) = tree.fast_path() {
            log::debug!(
                "mcts: fast path, {} wins immediately with {:?}",
                tree.root_side(),
                tree.node(child).action()
            );
            return tree;
        }

        log::debug!(
            "mcts: searching {} successors, budget {}, exploration {}",
            tree.root().untried_count(),
            config.iterations,
            config.exploration
        );

        let mut rng = self.rng.clone();
        let start = Instant::now();
        let mut iterations = 0;

        while iterations < config.iterations {
            if let Some(limit) = config.time_limit {
                if start.elapsed().as_secs_f64() >= limit {
                    log::info!(
                        "mcts: time limit {:.2}s reached after {} iterations",
                        limit,
                        iterations
                    );
                    break;
                }
            }
            if tree.all_children_excluded() {
                log::debug!("mcts: every move loses, stopping after {} iterations", iterations);
                break;
            }

            let selected = tree.select(config.exploration);
            let leaf = tree.expand(selected).unwrap_or(selected);

            let reward = if tree.is_refutation(leaf) {
                EXCLUDED_REWARD
            } else {
                let end = rollout(
                    tree.node(leaf).state(),
                    config.max_rollout_depth,
                    config.smart_rollouts,
                    &mut rng,
                );
                tree.reward_for(&end)
            };
            tree.backpropagate(leaf, reward);
            iterations += 1;
        }

        log::debug!(
            "mcts: {} iterations, {} nodes, root visits {}, {:.3}s",
            iterations,
            tree.len(),
            tree.root().visits(),
            start.elapsed().as_secs_f64()
        );

        tree
    }

    /// 搜索后选出的下一个局面；没有安全走法时返回原局面
    pub fn best_state(&self, state: &GameState) -> GameState {
        let tree = self.search(state);
        match tree.best_child() {
            Some(child) => tree.node(child).state().clone(),
            None => {
                log::info!("mcts: no safe move for {}, keeping position", state.attacker());
                state.clone()
            }
        }
    }
}

/// 运行搜索并返回选中的下一个局面
pub fn run_search(position: &GameState, iterations: u32, exploration: f64) -> GameState {
    let config = AIConfig {
        iterations,
        exploration,
        ..Default::default()
    };
    MCTSAI::new(&config).best_state(position)
}

impl AIStrategy for MCTSAI {
    fn select_actions(&self, state: &GameState, n: usize) -> Vec<ScoredAction> {
        let tree = self.search(state);
        tree.ranked_children()
            .into_iter()
            .take(n)
            .filter_map(|i| {
                let node = tree.node(i);
                let score = if node.is_excluded() {
                    EXCLUDED_REWARD
                } else {
                    node.visits() as f64
                };
                node.action().map(|action| ScoredAction { action, score })
            })
            .collect()
    }

    fn select_best_action(&self, state: &GameState) -> Option<Action> {
        let tree = self.search(state);
        tree.best_child().and_then(|i| tree.node(i).action())
    }

    fn next_state(&self, state: &GameState) -> GameState {
        self.best_state(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::parse_state;
    use crate::test_positions;
    use std::collections::HashSet;

    /// 每步都会让王被吃
    const DOOMED: &str = "..G.../....../....../p...../..ss../J.gs.. north";

    fn state(s: &str) -> GameState {
        parse_state(s).unwrap()
    }

    fn ai(iterations: u32, seed: u64) -> MCTSAI {
        MCTSAI::new(&AIConfig {
            iterations,
            max_rollout_depth: 40,
            seed: Some(seed),
            ..Default::default()
        })
    }

    #[test]
    fn test_search_config_from_ai_config() {
        let config = AIConfig {
            iterations: 77,
            exploration: 2.0,
            time_limit: Some(0.5),
            ..Default::default()
        };
        let search = SearchConfig::from(&config);
        assert_eq!(search.iterations, 77);
        assert_eq!(search.exploration, 2.0);
        assert_eq!(search.time_limit, Some(0.5));
        assert_eq!(SearchConfig::default().iterations, 10_000);
    }

    #[test]
    fn test_uct_unvisited_is_infinite() {
        let mut tree = MctsTree::new(GameState::default_state());
        let a = tree.expand(MctsTree::ROOT).unwrap();
        let b = tree.expand(MctsTree::ROOT).unwrap();
        tree.backpropagate(a, 1.0);

        let visited = tree.node(a).uct(tree.root().visits(), 1.4);
        let unvisited = tree.node(b).uct(tree.root().visits(), 1.4);
        assert!(visited.is_finite());
        assert_eq!(unvisited, f64::INFINITY);
        assert!(unvisited > f64::MAX);
    }

    #[test]
    fn test_uct_formula() {
        let mut tree = MctsTree::new(GameState::default_state());
        let a = tree.expand(MctsTree::ROOT).unwrap();
        tree.backpropagate(a, 1.0);
        tree.backpropagate(a, 0.0);
        tree.backpropagate(a, 1.0);
        tree.backpropagate(a, 1.0);
        let node = tree.node(a);
        let expected = 0.75 + 1.4 * ((10.0f64).ln() / 4.0).sqrt();
        assert!((node.uct(10, 1.4) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_expand_pops_in_stack_order() {
        let start = GameState::default_state();
        let expected_last = start.successors_with_actions().pop().map(|(a, _)| a);
        let mut tree = MctsTree::new(start);
        assert_eq!(tree.root().untried_count(), 12);
        let child = tree.expand(MctsTree::ROOT).unwrap();
        assert_eq!(tree.node(child).action(), expected_last);
        assert_eq!(tree.node(child).parent(), Some(MctsTree::ROOT));
        assert_eq!(tree.node(child).depth(), 1);
        assert_eq!(tree.root().untried_count(), 11);
    }

    #[test]
    fn test_backpropagate_reaches_root() {
        let mut tree = MctsTree::new(GameState::default_state());
        let a = tree.expand(MctsTree::ROOT).unwrap();
        let b = tree.expand(a).unwrap();
        tree.backpropagate(b, 1.0);
        for i in [b, a, MctsTree::ROOT] {
            assert_eq!(tree.node(i).visits(), 1);
            assert_eq!(tree.node(i).wins(), 1.0);
        }
    }

    #[test]
    fn test_select_prefers_unvisited_then_descends() {
        let mut tree = MctsTree::new(state(test_positions::SINGLE_REPLY));
        // 根还有未展开后继时停在根
        assert_eq!(tree.select(1.4), MctsTree::ROOT);
        let child = tree.expand(MctsTree::ROOT).unwrap();
        tree.backpropagate(child, 0.0);
        assert_eq!(tree.select(1.4), child);
    }

    #[test]
    fn test_select_picks_unvisited_sibling() {
        let mut tree = MctsTree::new(state(DOOMED));
        let first = tree.expand(MctsTree::ROOT).unwrap();
        let second = tree.expand(MctsTree::ROOT).unwrap();
        assert!(tree.root().is_fully_expanded());
        assert_eq!(tree.root().children(), &[first, second]);

        // 第一个子节点拿了满分，第二个没访问过，仍然选第二个
        tree.backpropagate(first, 1.0);
        assert_eq!(tree.select(1.4), second);
    }

    #[test]
    fn test_reward_is_from_root_perspective() {
        let north_root = MctsTree::new(GameState::default_state());
        assert_eq!(north_root.root_side(), AttackDirection::North);
        assert_eq!(north_root.reward_for(&state(test_positions::LONE_GENERAL)), 1.0);
        assert_eq!(north_root.reward_for(&state(test_positions::GRIDLOCK)), 0.0);
        assert_eq!(north_root.reward_for(&state(test_positions::START)), 0.0);

        let south_root = MctsTree::new(GameState::default_state().flipped());
        assert_eq!(south_root.root_side(), AttackDirection::South);
        assert_eq!(south_root.reward_for(&state(test_positions::LONE_GENERAL)), 0.0);
        assert_eq!(south_root.reward_for(&state(test_positions::GRIDLOCK)), 1.0);
        assert_eq!(south_root.reward_for(&state(test_positions::START)), 0.0);
    }

    #[test]
    fn test_one_iteration_backs_up_rollout_reward() {
        let s = state(test_positions::SINGLE_REPLY);
        for seed in [3, 42, 2024] {
            let tree = ai(1, seed).search(&s);
            let child = tree.node(tree.root().children()[0]);

            // 同一种子重放这次模拟
            let mut rng = StdRng::seed_from_u64(seed);
            let end = rollout(child.state(), 40, true, &mut rng);
            let expected = tree.reward_for(&end);

            assert_eq!(child.wins(), expected);
            assert_eq!(tree.root().wins(), expected);
        }
    }

    #[test]
    fn test_single_reply_one_iteration() {
        let s = state(test_positions::SINGLE_REPLY);
        let tree = ai(1, 42).search(&s);
        assert_eq!(tree.root().children().len(), 1);
        let child = tree.node(tree.root().children()[0]);
        assert_eq!(child.visits(), 1);
        assert_eq!(tree.root().visits(), 1);

        let only = s.successors().remove(0);
        assert_eq!(run_search(&s, 1, 1.4), only);
    }

    #[test]
    fn test_fast_path_takes_winning_capture() {
        let s = state(test_positions::FORCED_CAPTURE);
        let tree = ai(500, 1).search(&s);
        assert_eq!(tree.root().children().len(), 1);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.root().visits(), 0);

        let child = tree.node(tree.root().children()[0]);
        assert_eq!(child.visits(), 0);
        assert_eq!(child.state().result(), GameResult::Won(AttackDirection::North));
        assert_eq!(tree.best_child(), Some(tree.root().children()[0]));
    }

    #[test]
    fn test_terminal_root_returns_itself() {
        let s = state(test_positions::GRIDLOCK);
        let tree = ai(50, 3).search(&s);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.best_child(), None);
        assert_eq!(ai(50, 3).best_state(&s), s);
    }

    #[test]
    fn test_refuted_moves_are_excluded() {
        let s = state(test_positions::EXPOSED_KING);
        let safe: HashSet<u64> = s.threat_aware_successors().iter().map(|n| n.key()).collect();
        let tree = ai(300, 7).search(&s);

        assert_eq!(tree.root().children().len(), 14);
        for &c in tree.root().children() {
            let node = tree.node(c);
            assert_eq!(
                node.is_excluded(),
                !safe.contains(&node.state().key()),
                "child {:?}",
                node.action()
            );
        }
        assert!(tree.root().is_excluded());

        let best = tree.best_child().unwrap();
        assert!(safe.contains(&tree.node(best).state().key()));
    }

    #[test]
    fn test_no_safe_move_keeps_position() {
        let s = state(DOOMED);
        let engine = ai(100, 5);
        let tree = engine.search(&s);
        assert_eq!(tree.root().children().len(), 2);
        assert!(tree
            .root()
            .children()
            .iter()
            .all(|&c| tree.node(c).is_excluded()));
        assert_eq!(tree.best_child(), None);
        assert_eq!(engine.best_state(&s), s);
        assert_eq!(engine.select_best_action(&s), None);
    }

    #[test]
    fn test_time_limit_stops_search() {
        let engine = MCTSAI::new(&AIConfig {
            iterations: u32::MAX,
            time_limit: Some(0.05),
            max_rollout_depth: 20,
            seed: Some(1),
            ..Default::default()
        });
        let tree = engine.search(&GameState::default_state());
        assert!(tree.root().visits() > 0);
        assert!(tree.root().visits() < u32::MAX);
    }

    #[test]
    fn test_select_actions_scores_are_visits() {
        let s = GameState::default_state();
        let engine = ai(200, 9);
        let actions = engine.select_actions(&s, 3);
        assert_eq!(actions.len(), 3);
        assert!(actions[0].score >= actions[1].score);
        assert!(actions[1].score >= actions[2].score);
        assert!(s.legal_actions().contains(&actions[0].action));
    }

    #[test]
    fn test_search_is_deterministic_with_seed() {
        let s = GameState::default_state();
        let a = ai(150, 21).best_state(&s);
        let b = ai(150, 21).best_state(&s);
        assert_eq!(a, b);
    }
}
