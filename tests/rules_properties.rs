//! 规则性质测试：在随机对局中经过的所有局面上检查

use chaos_chess_ai::ai::playout::rollout;
use chaos_chess_ai::movegen::can_capture_enemy_leader;
use chaos_chess_ai::test_positions;
use chaos_chess_ai::{legal_actions, parse_state, GameResult, GameState};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// 从若干起点随机走到底，收集经过的所有局面
fn sampled_positions() -> Vec<GameState> {
    let starts = [
        test_positions::START,
        test_positions::START_NORTH_TO_MOVE,
        test_positions::MID_1,
        test_positions::MID_2,
        test_positions::EXPOSED_KING,
    ];
    let mut out = Vec::new();
    for (i, s) in starts.iter().enumerate() {
        let start = parse_state(s).unwrap();
        for seed in 0..4u64 {
            let mut rng = StdRng::seed_from_u64(seed * 31 + i as u64);
            let end = rollout(&start, 80, seed % 2 == 0, &mut rng);
            out.extend(end.history().cloned());
        }
    }
    out
}

#[test]
fn apply_flips_direction_and_increments_turn() {
    for state in sampled_positions() {
        for action in legal_actions(&state) {
            let next = state.apply_action(&action);
            assert_eq!(next.attacker(), state.attacker().opposite());
            assert_eq!(next.turn_number(), state.turn_number() + 1);
        }
    }
}

#[test]
fn legal_actions_empty_iff_mover_is_terminal() {
    for state in sampled_positions() {
        assert_eq!(
            legal_actions(&state).is_empty(),
            state.is_terminal_for_side(state.attacker()),
            "{}",
            state
        );
    }
}

#[test]
fn leader_capture_is_forced() {
    for state in sampled_positions() {
        let board = state.board();
        let enemy_leader = match board.leader_of(state.attacker().opposite()) {
            Some(pos) => pos,
            None => continue,
        };
        let actions = legal_actions(&state);
        if actions.iter().any(|a| a.to == enemy_leader) {
            assert!(actions.iter().all(|a| a.to == enemy_leader), "{}", state);
        }
    }
}

#[test]
fn threat_aware_successors_are_safe_subset() {
    for state in sampled_positions() {
        let all = state.successors();
        let safe = state.threat_aware_successors();
        assert!(safe.len() <= all.len());
        for next in &safe {
            assert!(all.contains(next));
            assert!(!can_capture_enemy_leader(next));
        }
    }
}

#[test]
fn off_turn_actions_leave_position_unchanged() {
    for state in sampled_positions().into_iter().take(40) {
        for action in legal_actions(&state.flipped()) {
            let same = state.apply_action(&action);
            assert_eq!(same, state);
        }
    }
}

#[test]
fn result_matches_terminal_status() {
    for state in sampled_positions() {
        match state.result() {
            GameResult::Ongoing => assert!(!state.is_terminal()),
            GameResult::Won(winner) => {
                assert!(state.is_terminal());
                assert!(state.is_terminal_for_side(winner.opposite()));
            }
        }
    }
}
