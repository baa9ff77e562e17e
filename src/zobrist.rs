//! Zobrist 哈希
//!
//! 用于走子模拟中的重复局面检测和局面去重。

use rand::prelude::*;

use crate::board::Board;
use crate::types::{AttackDirection, Dimension, PieceType};

const MAX_CELLS: usize = (Dimension::MAX_SIDE * Dimension::MAX_SIDE) as usize;
const PIECE_KINDS: usize = PieceType::ALL.len();

/// Zobrist 随机数表
struct ZobristTable {
    /// [格子][阵营 * 12 + 棋子类型]
    pieces: Vec<[u64; PIECE_KINDS * 2]>,
    /// 轮到向南进攻一方时异或
    turn: u64,
}

impl ZobristTable {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(0x6368_616f_735f_6368);
        let mut pieces = Vec::with_capacity(MAX_CELLS);
        for _ in 0..MAX_CELLS {
            let mut keys = [0u64; PIECE_KINDS * 2];
            for key in keys.iter_mut() {
                *key = rng.gen();
            }
            pieces.push(keys);
        }
        ZobristTable {
            pieces,
            turn: rng.gen(),
        }
    }
}

lazy_static::lazy_static! {
    static ref ZOBRIST: ZobristTable = ZobristTable::new();
}

/// 计算局面哈希（棋子分布 + 行棋方）
pub fn hash_position(board: &Board, attacker: AttackDirection) -> u64 {
    let mut hash = 0u64;

    for (index, cell) in board.cells().iter().enumerate() {
        if let Some(piece) = cell {
            let side = match piece.owner {
                AttackDirection::North => 0,
                AttackDirection::South => PIECE_KINDS,
            };
            hash ^= ZOBRIST.pieces[index][side + piece.kind.index()];
        }
    }

    if attacker == AttackDirection::South {
        hash ^= ZOBRIST.turn;
    }

    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Action, Position};

    #[test]
    fn test_hash_depends_on_turn() {
        let board = Board::default_board();
        assert_ne!(
            hash_position(&board, AttackDirection::North),
            hash_position(&board, AttackDirection::South)
        );
    }

    #[test]
    fn test_hash_is_stable_and_transposition_safe() {
        let board = Board::default_board();
        let a = Action::new(Position::new(0, 1), Position::new(0, 2));
        let b = Action::new(Position::new(5, 1), Position::new(5, 2));

        let ab = board.apply_action(&a).apply_action(&b);
        let ba = board.apply_action(&b).apply_action(&a);
        assert_eq!(
            hash_position(&ab, AttackDirection::North),
            hash_position(&ba, AttackDirection::North)
        );
        assert_ne!(
            hash_position(&ab, AttackDirection::North),
            hash_position(&board, AttackDirection::North)
        );
    }
}
