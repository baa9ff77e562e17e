//! 棋子走法规则
//!
//! 每种棋子对应一个纯函数 `(board, from, piece) -> 目标格列表`，
//! 通过 [`generator_for`] 分派。这里只生成“可达格”，
//! 强制吃将等全局规则在 `movegen` 中处理。

use crate::board::Board;
use crate::types::{Piece, PieceType, Position};

/// 走法生成函数
pub type MoveGenerator = fn(&Board, Position, &Piece) -> Vec<Position>;

/// 按棋子类型分派走法生成函数
pub fn generator_for(kind: PieceType) -> MoveGenerator {
    match kind {
        PieceType::Pawn => pawn_moves,
        PieceType::Rook | PieceType::Chariot => rook_moves,
        PieceType::Bishop => bishop_moves,
        PieceType::Queen => queen_moves,
        PieceType::King => king_moves,
        PieceType::FootSoldier => foot_soldier_moves,
        PieceType::Scholar | PieceType::General => confined_moves,
        PieceType::Advisor => advisor_moves,
        PieceType::Horse => horse_moves,
        PieceType::Cannon => cannon_moves,
    }
}

/// 某格棋子的所有可达格，空格返回空列表
///
/// 起点必须在棋盘内，否则说明局面已损坏。
pub fn destinations(board: &Board, from: Position) -> Vec<Position> {
    assert!(
        board.contains(from),
        "move generation from {} outside board {}",
        from,
        board.dimension()
    );
    match board.get(from) {
        Some(piece) => generator_for(piece.kind)(board, from, piece),
        None => Vec::new(),
    }
}

/// 目标格在棋盘内且不是己方棋子
#[inline]
fn can_land(board: &Board, piece: &Piece, pos: Position) -> bool {
    board.contains(pos) && !piece.is_ally(board.get(pos))
}

/// 兵：前进 1-2 格（遇子即停），斜前方只能吃子
fn pawn_moves(board: &Board, from: Position, piece: &Piece) -> Vec<Position> {
    let mut moves = Vec::with_capacity(4);
    let forward = piece.owner.vector();

    for dist in 1..=2 {
        let pos = from + forward * dist;
        if !board.contains(pos) || !board.is_empty_at(pos) {
            break;
        }
        moves.push(pos);
    }

    for diagonal in [Position::NE, Position::NW] {
        let pos = from + diagonal * forward.row;
        if board.contains(pos) && piece.is_enemy(board.get(pos)) {
            moves.push(pos);
        }
    }

    moves
}

/// 直线/斜线滑行：遇己方停在前一格，遇敌方吃子并停下
fn slider_moves(board: &Board, from: Position, piece: &Piece, directions: &[Position]) -> Vec<Position> {
    let mut moves = Vec::with_capacity(16);

    for &dir in directions {
        let mut pos = from + dir;
        while board.contains(pos) {
            let target = board.get(pos);
            if piece.is_ally(target) {
                break;
            }
            moves.push(pos);
            if piece.is_enemy(target) {
                break;
            }
            pos += dir;
        }
    }

    moves
}

fn rook_moves(board: &Board, from: Position, piece: &Piece) -> Vec<Position> {
    slider_moves(board, from, piece, &Position::STRAIGHTS)
}

fn bishop_moves(board: &Board, from: Position, piece: &Piece) -> Vec<Position> {
    slider_moves(board, from, piece, &Position::DIAGONALS)
}

fn queen_moves(board: &Board, from: Position, piece: &Piece) -> Vec<Position> {
    slider_moves(board, from, piece, &Position::OMNI_DIRS)
}

/// 王：八方向一步，可以走进被攻击的格子
fn king_moves(board: &Board, from: Position, piece: &Piece) -> Vec<Position> {
    Position::OMNI_DIRS
        .iter()
        .map(|&dir| from + dir)
        .filter(|&pos| can_land(board, piece, pos))
        .collect()
}

/// 马：先看直线一步（马腿），不被堵才能跳到两侧斜角
fn horse_moves(board: &Board, from: Position, piece: &Piece) -> Vec<Position> {
    let mut moves = Vec::with_capacity(8);

    for dir in Position::STRAIGHTS {
        let leg = from + dir;
        if !board.contains(leg) || !board.is_empty_at(leg) {
            continue;
        }
        for jump in Position::direction_diagonals(dir) {
            let pos = leg + jump;
            if can_land(board, piece, pos) {
                moves.push(pos);
            }
        }
    }

    moves
}

/// 卒：过河前只能向前一步，过河后可左右
fn foot_soldier_moves(board: &Board, from: Position, piece: &Piece) -> Vec<Position> {
    let mut moves = Vec::with_capacity(3);
    let crossed = board.dimension().is_across_midline(from, piece.owner);

    let forward = from + piece.owner.vector();
    if can_land(board, piece, forward) {
        moves.push(forward);
    }

    if crossed {
        for side in [Position::EAST, Position::WEST] {
            let pos = from + side;
            if can_land(board, piece, pos) {
                moves.push(pos);
            }
        }
    }

    moves
}

/// 士/将：八方向一步，不能离开本方九宫
fn confined_moves(board: &Board, from: Position, piece: &Piece) -> Vec<Position> {
    let region = board.dimension().confinement_region(piece.owner);
    Position::OMNI_DIRS
        .iter()
        .map(|&dir| from + dir)
        .filter(|pos| region.contains(pos))
        .filter(|&pos| can_land(board, piece, pos))
        .collect()
}

/// 象：斜走两格，象眼被堵不能走，不能过河
fn advisor_moves(board: &Board, from: Position, piece: &Piece) -> Vec<Position> {
    let mut moves = Vec::with_capacity(4);
    let dimension = board.dimension();

    for dir in Position::DIAGONALS {
        let eye = from + dir;
        let pos = from + dir * 2;
        if !board.contains(pos) || !board.is_empty_at(eye) {
            continue;
        }
        if dimension.is_across_midline(pos, piece.owner) {
            continue;
        }
        if can_land(board, piece, pos) {
            moves.push(pos);
        }
    }

    moves
}

/// 炮：空格可走；隔一个子（任意方）可吃敌子，每方向至多一次
fn cannon_moves(board: &Board, from: Position, piece: &Piece) -> Vec<Position> {
    let mut moves = Vec::with_capacity(16);

    for dir in Position::STRAIGHTS {
        let mut pos = from + dir;

        // 炮架之前的空格
        while board.contains(pos) && board.is_empty_at(pos) {
            moves.push(pos);
            pos += dir;
        }

        // 跳过炮架，找下一个棋子
        pos += dir;
        while board.contains(pos) {
            let target = board.get(pos);
            if piece.is_ally(target) {
                break;
            }
            if piece.is_enemy(target) {
                moves.push(pos);
                break;
            }
            pos += dir;
        }
    }

    moves
}
