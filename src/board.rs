//! 棋盘格子
//!
//! 使用一维数组存储棋子，索引 = col + row * cols。

use std::fmt;

use crate::types::{Action, AttackDirection, Dimension, Piece, Position};

/// 默认开局（从第 0 行往上）
///
/// 南方玩家（国际象棋，向北进攻）在下，北方玩家（象棋，向南进攻）在上。
const DEFAULT_ROWS: [(i32, &str); 4] = [
    (0, "rbqkbr"),
    (1, "pppppp"),
    (4, "ZCZZCZ"),
    (5, "JMGSMJ"),
];

/// 棋盘
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    dimension: Dimension,
    cells: Vec<Option<Piece>>,
}

impl Board {
    /// 创建空棋盘
    pub fn empty(dimension: Dimension) -> Board {
        assert!(
            dimension.is_supported(),
            "unsupported board dimension {}",
            dimension
        );
        Board {
            dimension,
            cells: vec![None; dimension.size()],
        }
    }

    /// 默认 6x6 开局
    pub fn default_board() -> Board {
        let mut board = Board::empty(Dimension::DEFAULT);
        for (row, pieces) in DEFAULT_ROWS {
            for (col, c) in pieces.chars().enumerate() {
                if let Some(piece) = Piece::from_char(c) {
                    board.place(Position::new(col as i32, row), Some(piece));
                }
            }
        }
        board
    }

    #[inline]
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// 所有格子（按索引顺序）
    #[inline]
    pub fn cells(&self) -> &[Option<Piece>] {
        &self.cells
    }

    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        pos.within_bounds(self.dimension)
    }

    /// 获取某位置的棋子，越界返回 None
    #[inline]
    pub fn get(&self, pos: Position) -> Option<&Piece> {
        if !self.contains(pos) {
            return None;
        }
        self.cells[pos.to_index(self.dimension)].as_ref()
    }

    /// 按索引获取棋子，越界即为局面损坏
    #[inline]
    pub fn get_index(&self, index: usize) -> Option<&Piece> {
        assert!(
            index < self.cells.len(),
            "grid index {} outside board {}",
            index,
            self.dimension
        );
        self.cells[index].as_ref()
    }

    #[inline]
    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.get(pos).is_none()
    }

    /// 放置（或清除）棋子
    pub fn place(&mut self, pos: Position, piece: Option<Piece>) {
        let index = pos.to_index(self.dimension);
        self.cells[index] = piece;
    }

    /// 执行走法，返回新棋盘
    ///
    /// 不检查合法性：终点被起点棋子覆盖，起点清空。
    pub fn apply_action(&self, action: &Action) -> Board {
        let mut next = self.clone();
        let from = action.from.to_index(self.dimension);
        let to = action.to.to_index(self.dimension);
        let piece = next.cells[from].take();
        next.cells[to] = piece;
        next
    }

    /// 某一方所有棋子的位置（按索引顺序）
    pub fn positions_of(&self, owner: AttackDirection) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.map_or(false, |p| p.owner == owner))
            .map(|(i, _)| Position::from_index(i, self.dimension))
            .collect()
    }

    pub fn piece_count(&self, owner: AttackDirection) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.map_or(false, |p| p.owner == owner))
            .count()
    }

    /// 在给定位置中找到王/将
    pub fn leader_in(&self, positions: &[Position]) -> Option<Position> {
        positions
            .iter()
            .copied()
            .find(|pos| self.get(*pos).map_or(false, |p| p.is_leader()))
    }

    /// 找到某一方的王/将
    pub fn leader_of(&self, owner: AttackDirection) -> Option<Position> {
        self.cells
            .iter()
            .position(|cell| cell.map_or(false, |p| p.owner == owner && p.is_leader()))
            .map(|i| Position::from_index(i, self.dimension))
    }

    /// 全盘子力之和（向北进攻一方为正）
    pub fn material_score(&self) -> i32 {
        self.cells
            .iter()
            .flatten()
            .map(|p| {
                let value = p.kind.value();
                if p.owner.is_maximizer() {
                    value
                } else {
                    -value
                }
            })
            .sum()
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::default_board()
    }
}

/// 打印棋盘，最高行在上
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..self.dimension.rows).rev() {
            write!(f, "{:>2} |", row)?;
            for col in 0..self.dimension.cols {
                let c = self
                    .get(Position::new(col, row))
                    .map_or('.', |p| p.to_char());
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "   +")?;
        for _ in 0..self.dimension.cols {
            write!(f, "--")?;
        }
        writeln!(f)?;
        write!(f, "    ")?;
        for col in 0..self.dimension.cols {
            write!(f, " {}", col)?;
        }
        Ok(())
    }
}
