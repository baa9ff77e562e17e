//! Chaos Chess AI Engine
//!
//! 国际象棋 × 中国象棋混合棋 AI 引擎 - 6×6 棋盘，MCTS 对手

pub mod ai;
pub mod board;
pub mod eval;
pub mod movegen;
pub mod notation;
pub mod rules;
pub mod state;
pub mod test_positions;
pub mod types;
pub mod zobrist;

pub use ai::{
    get_node_count, reset_node_count, run_search, AIConfig, AIEngine, AIStrategy, MctsTree,
    ScoredAction, SearchConfig, AVAILABLE_STRATEGIES, DEFAULT_STRATEGY, MCTSAI,
};
pub use board::Board;
pub use eval::{sigmoid, strategic_score, tactical_score};
pub use movegen::{legal_actions, level_census};
pub use notation::{layout_string, parse_action, parse_layout, parse_state, state_string};
pub use state::GameState;
pub use types::{Action, AttackDirection, Dimension, GameResult, Piece, PieceType, Position};
