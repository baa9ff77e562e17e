//! 搜索接口的端到端约定

use chaos_chess_ai::test_positions;
use chaos_chess_ai::{
    parse_state, run_search, AIConfig, AIEngine, AttackDirection, GameResult, GameState, MCTSAI,
};

fn engine(iterations: u32, seed: u64) -> MCTSAI {
    MCTSAI::new(&AIConfig {
        iterations,
        max_rollout_depth: 40,
        seed: Some(seed),
        ..Default::default()
    })
}

#[test]
fn single_successor_with_budget_one() {
    let state = parse_state(test_positions::SINGLE_REPLY).unwrap();
    let successors = state.successors();
    assert_eq!(successors.len(), 1);

    let tree = engine(1, 42).search(&state);
    assert_eq!(tree.root().visits(), 1);
    assert_eq!(tree.root().children().len(), 1);
    let child = tree.node(tree.root().children()[0]);
    assert_eq!(child.visits(), 1);
    assert_eq!(child.state(), &successors[0]);

    assert_eq!(run_search(&state, 1, 1.4), successors[0]);
}

#[test]
fn immediate_leader_capture_skips_search() {
    let state = parse_state(test_positions::FORCED_CAPTURE).unwrap();
    let tree = engine(10_000, 1).search(&state);

    assert_eq!(tree.len(), 2);
    assert_eq!(tree.root().children().len(), 1);
    let child = tree.node(tree.root().children()[0]);
    assert_eq!(child.visits(), 0);

    let next = run_search(&state, 10_000, 1.4);
    assert_eq!(next.result(), GameResult::Won(AttackDirection::North));
    assert!(next.board().leader_of(AttackDirection::South).is_none());
}

#[test]
fn search_returns_a_successor_from_the_opening() {
    let state = GameState::default_state();
    let next = engine(200, 7).best_state(&state);
    assert!(state.successors().contains(&next));
    assert_eq!(next.parent(), Some(&state));
}

#[test]
fn search_avoids_moves_that_lose_the_king() {
    let state = parse_state(test_positions::EXPOSED_KING).unwrap();
    let safe = state.threat_aware_successors();
    for seed in [1, 2, 3] {
        let next = engine(300, seed).best_state(&state);
        assert!(safe.contains(&next), "seed {} picked\n{}", seed, next);
    }
}

#[test]
fn finished_game_is_returned_unchanged() {
    for s in [test_positions::GRIDLOCK, test_positions::LONE_GENERAL] {
        let state = parse_state(s).unwrap();
        assert_eq!(run_search(&state, 100, 1.4), state);
    }
}

#[test]
fn engine_plays_a_short_game() {
    let white = AIEngine::mcts(&AIConfig {
        iterations: 60,
        max_rollout_depth: 30,
        seed: Some(11),
        ..Default::default()
    });
    let black = AIEngine::greedy(&AIConfig {
        seed: Some(12),
        randomness: 0.3,
        ..Default::default()
    });

    let mut state = GameState::default_state();
    for ply in 0..10 {
        if state.is_terminal() {
            break;
        }
        let next = if ply % 2 == 0 {
            white.next_state(&state)
        } else {
            black.next_state(&state)
        };
        // 没有安全走法时原样返回
        if next == state {
            break;
        }
        assert_eq!(next.turn_number(), state.turn_number() + 1);
        state = next;
    }
    assert!(state.history().count() > 1);
}
