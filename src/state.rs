//! 局面状态机
//!
//! `GameState` 是不可变快照：每次走子都产生新局面，
//! 原局面作为新局面的父节点保留（只用于回溯打印，不会被修改）。

use std::fmt;
use std::sync::Arc;

use crate::board::Board;
use crate::eval::tactical_score;
use crate::movegen::{filter_threat_aware, legal_actions};
use crate::types::{Action, AttackDirection, GameResult};
use crate::zobrist::hash_position;

/// 局面字符串允许的最大回合数，留出足够的走子余量
pub const MAX_TURN_NUMBER: u32 = u32::MAX / 2;

/// 局面快照
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    turn_number: u32,
    attacker: AttackDirection,
    parent: Option<Arc<GameState>>,
}

impl GameState {
    /// 新对局的初始局面，南方玩家（向北进攻）先走
    pub fn default_state() -> GameState {
        GameState::new(Board::default_board(), AttackDirection::North)
    }

    pub fn new(board: Board, attacker: AttackDirection) -> GameState {
        GameState::with_turn(board, attacker, 0)
    }

    pub fn with_turn(board: Board, attacker: AttackDirection, turn_number: u32) -> GameState {
        GameState {
            board,
            turn_number,
            attacker,
            parent: None,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// 当前行棋方的攻击方向
    #[inline]
    pub fn attacker(&self) -> AttackDirection {
        self.attacker
    }

    #[inline]
    pub fn parent(&self) -> Option<&GameState> {
        self.parent.as_deref()
    }

    /// 局面哈希（棋子分布 + 行棋方，不含回合数和父节点）
    #[inline]
    pub fn key(&self) -> u64 {
        hash_position(&self.board, self.attacker)
    }

    /// 同一局面换对方走
    pub fn flipped(&self) -> GameState {
        GameState {
            board: self.board.clone(),
            turn_number: self.turn_number,
            attacker: self.attacker.opposite(),
            parent: self.parent.clone(),
        }
    }

    /// 以指定方为行棋方的同一局面
    fn as_side(&self, side: AttackDirection) -> GameState {
        if side == self.attacker {
            self.clone()
        } else {
            self.flipped()
        }
    }

    /// 起点棋子不属于行棋方（含空格、越界）
    pub fn is_action_outside_turn(&self, action: &Action) -> bool {
        self.board
            .get(action.from)
            .map_or(true, |p| p.owner != self.attacker)
    }

    /// 执行走法，返回新局面
    ///
    /// 起点不是行棋方的棋子或终点越界时返回原局面。
    pub fn apply_action(&self, action: &Action) -> GameState {
        if self.is_action_outside_turn(action) || !self.board.contains(action.to) {
            log::warn!(
                "apply_action: {} rejected, not a {} piece on turn {}",
                action,
                self.attacker,
                self.turn_number
            );
            return self.clone();
        }
        self.apply_with_parent(action, Arc::new(self.clone()))
    }

    fn apply_with_parent(&self, action: &Action, parent: Arc<GameState>) -> GameState {
        let turn_number = match self.turn_number.checked_add(1) {
            Some(t) => t,
            None => panic!("turn number overflow after turn {}", self.turn_number),
        };
        GameState {
            board: self.board.apply_action(action),
            turn_number,
            attacker: self.attacker.opposite(),
            parent: Some(parent),
        }
    }

    /// 所有合法走法
    pub fn legal_actions(&self) -> Vec<Action> {
        legal_actions(self)
    }

    /// 所有后继局面（与走法一一对应）
    pub fn successors_with_actions(&self) -> Vec<(Action, GameState)> {
        let actions = legal_actions(self);
        if actions.is_empty() {
            return Vec::new();
        }
        let parent = Arc::new(self.clone());
        actions
            .into_iter()
            .map(|a| {
                let next = self.apply_with_parent(&a, Arc::clone(&parent));
                (a, next)
            })
            .collect()
    }

    pub fn successors(&self) -> Vec<GameState> {
        self.successors_with_actions()
            .into_iter()
            .map(|(_, s)| s)
            .collect()
    }

    /// 排除会让己方王/将被立即吃掉的后继局面
    pub fn threat_aware_successors(&self) -> Vec<GameState> {
        filter_threat_aware(self.successors())
    }

    /// 某一方是否已经输了
    ///
    /// 没有棋子、没有王/将、只剩王/将一个子、或没有合法走法。
    pub fn is_terminal_for_side(&self, side: AttackDirection) -> bool {
        let pieces = self.board.positions_of(side);
        if pieces.is_empty() || pieces.len() == 1 {
            return true;
        }
        if self.board.leader_in(&pieces).is_none() {
            return true;
        }
        legal_actions(&self.as_side(side)).is_empty()
    }

    /// 任意一方已分胜负
    pub fn is_terminal(&self) -> bool {
        self.is_terminal_for_side(self.attacker) || self.is_terminal_for_side(self.attacker.opposite())
    }

    /// 对局结果，行棋方先判
    pub fn result(&self) -> GameResult {
        if self.is_terminal_for_side(self.attacker) {
            GameResult::Won(self.attacker.opposite())
        } else if self.is_terminal_for_side(self.attacker.opposite()) {
            GameResult::Won(self.attacker)
        } else {
            GameResult::Ongoing
        }
    }

    /// 从当前局面回溯到最早的祖先
    pub fn history(&self) -> History<'_> {
        History { next: Some(self) }
    }

    /// 打印走子过程（从当前局面往回）
    pub fn progress_report(&self) -> String {
        let mut out = String::new();
        for state in self.history() {
            out.push_str("###\n");
            out.push_str(&format!(
                "turn: {}, attacker: {}\n",
                state.turn_number, state.attacker
            ));
            out.push_str(&format!("evaluation: {}\n", tactical_score(state)));
            out.push_str(&format!("{}\n", state.board));
            out.push_str("---\n");
        }
        out
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::default_state()
    }
}

/// 两个局面相同：棋子分布、行棋方、回合数都相同（忽略父节点）
impl PartialEq for GameState {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board
            && self.attacker == other.attacker
            && self.turn_number == other.turn_number
    }
}

impl Eq for GameState {}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "turn {} ({} to attack)", self.turn_number, self.attacker)?;
        write!(f, "{}", self.board)
    }
}

/// 父节点链迭代器
pub struct History<'a> {
    next: Option<&'a GameState>,
}

impl<'a> Iterator for History<'a> {
    type Item = &'a GameState;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent.as_deref();
        Some(current)
    }
}
