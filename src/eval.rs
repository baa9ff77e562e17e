//! 局面评估
//!
//! 分数是绝对符号：向北进攻一方（先手）为最大化方，分数越大越好；
//! 向南进攻一方为最小化方。已分胜负的局面用 ±∞ 表示。

use rand::Rng;

use crate::ai::playout::rollout;
use crate::state::GameState;
use crate::types::AttackDirection;

/// sigmoid 压缩时的物质分尺度（约一个车的价值）
pub const SIGMOID_SCALE: f64 = 400.0;

/// 某方的最好结果
#[inline]
pub fn best_value(side: AttackDirection) -> f64 {
    if side.is_maximizer() {
        f64::INFINITY
    } else {
        f64::NEG_INFINITY
    }
}

/// 战术评分
///
/// 先判行棋方是否已输，再判对方；都没输时返回全盘物质分。
pub fn tactical_score(state: &GameState) -> f64 {
    let mover = state.attacker();
    let enemy = mover.opposite();

    if state.is_terminal_for_side(mover) {
        return best_value(enemy);
    }
    if state.is_terminal_for_side(enemy) {
        return best_value(mover);
    }

    state.board().material_score() as f64
}

/// 分数是否表示已分胜负
#[inline]
pub fn score_is_terminal(score: f64) -> bool {
    score.is_infinite()
}

/// 已分胜负的分数对应的胜方
pub fn decisive_winner(score: f64) -> Option<AttackDirection> {
    if score == f64::INFINITY {
        Some(AttackDirection::North)
    } else if score == f64::NEG_INFINITY {
        Some(AttackDirection::South)
    } else {
        None
    }
}

/// 把物质分压到 (0, 1)，±∞ 分别映射为 1 和 0
#[inline]
pub fn sigmoid(score: f64) -> f64 {
    1.0 / (1.0 + (-score / SIGMOID_SCALE).exp())
}

/// 战略评分
///
/// 从当前局面随机走到底 `playouts` 次，综合三个因素：
/// - 行棋方在分出胜负的对局里的胜率
/// - 行棋方平均多少步取胜（越快越好）
/// - 与对方平均取胜步数的差距
///
/// 没分出胜负的模拟不计入。行棋方一局都没赢时返回 0。
/// 当前局面不能是终局。
pub fn strategic_score<R: Rng>(
    root: &GameState,
    playouts: u32,
    max_depth: u32,
    rng: &mut R,
) -> f64 {
    assert!(
        !root.is_terminal(),
        "strategic score requested for a finished position"
    );

    let mover = root.attacker();
    let start_turn = root.turn_number();

    let mut our_wins = 0u32;
    let mut our_depth_sum = 0.0;
    let mut their_wins = 0u32;
    let mut their_depth_sum = 0.0;

    for _ in 0..playouts {
        let end = rollout(root, max_depth, false, rng);
        let winner = match decisive_winner(tactical_score(&end)) {
            Some(w) => w,
            None => continue,
        };
        let depth = (end.turn_number() - start_turn) as f64;
        if winner == mover {
            our_wins += 1;
            our_depth_sum += depth;
        } else {
            their_wins += 1;
            their_depth_sum += depth;
        }
    }

    log::debug!(
        "strategic score: {} playouts, {} won {} (depth {:.1}), lost {} (depth {:.1})",
        playouts,
        mover,
        our_wins,
        our_depth_sum,
        their_wins,
        their_depth_sum
    );

    if our_wins == 0 {
        return 0.0;
    }

    let our_avg = our_depth_sum / our_wins as f64;
    let win_share = our_wins as f64 / (our_wins + their_wins) as f64;
    let fast_win = 1.0 / our_avg;

    let lead = if their_wins == 0 {
        1.0
    } else {
        let their_avg = their_depth_sum / their_wins as f64;
        let catch_up_ease = 1.0 / (1.0 + (our_avg - their_avg).abs());
        if our_avg < their_avg {
            1.0 - catch_up_ease
        } else {
            catch_up_ease
        }
    };

    win_share * fast_win * lead
}
