//! 混沌棋核心类型定义
//!
//! 坐标代数、攻击方向、棋子类型、走法和对局结果

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub};

/// 棋盘尺寸（列数 x 行数）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimension {
    pub cols: i32,
    pub rows: i32,
}

impl Dimension {
    /// 默认 6x6 棋盘
    pub const DEFAULT: Dimension = Dimension { cols: 6, rows: 6 };

    /// 支持的最小边长
    pub const MIN_SIDE: i32 = 2;
    /// 支持的最大边长（受 Zobrist 表大小限制）
    pub const MAX_SIDE: i32 = 16;

    pub fn new(cols: i32, rows: i32) -> Self {
        Dimension { cols, rows }
    }

    pub fn is_supported(&self) -> bool {
        (Self::MIN_SIDE..=Self::MAX_SIDE).contains(&self.cols)
            && (Self::MIN_SIDE..=Self::MAX_SIDE).contains(&self.rows)
    }

    /// 格子总数
    #[inline]
    pub fn size(&self) -> usize {
        (self.cols * self.rows) as usize
    }

    /// 检查位置是否已越过中线（相对于攻击方向）
    ///
    /// 行数为奇数时，正中一行属于“无人区”，两方都不算越过。
    pub fn is_across_midline(&self, pos: Position, attacker: AttackDirection) -> bool {
        let half = self.rows / 2;
        match attacker {
            AttackDirection::North => pos.row >= self.rows - half,
            AttackDirection::South => pos.row < half,
        }
    }

    /// 受限区域（士/将的九宫）
    ///
    /// 以中间列为中心，从该方底线起算；偶数尺寸为 2x2，奇数尺寸为 3x3。
    pub fn confinement_region(&self, owner: AttackDirection) -> Vec<Position> {
        let start_col = self.cols / 2 - 1;
        let width = if self.cols % 2 == 0 { 2 } else { 3 };
        let depth = if self.rows % 2 == 0 { 2 } else { 3 };

        let rows: Vec<i32> = match owner {
            // 向北进攻的一方，底线在南
            AttackDirection::North => (0..depth).collect(),
            AttackDirection::South => (0..depth).map(|d| self.rows - 1 - d).collect(),
        };

        let mut region = Vec::with_capacity((width * depth) as usize);
        for row in rows {
            for col in start_col..start_col + width {
                let pos = Position::new(col, row);
                if pos.within_bounds(*self) {
                    region.push(pos);
                }
            }
        }
        region
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Dimension::DEFAULT
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.cols, self.rows)
    }
}

/// 棋盘位置 / 方向向量 (col, row)
///
/// (0, 0) 位于左下角，row 向北增长。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub col: i32,
    pub row: i32,
}

impl Position {
    pub const NORTH: Position = Position { col: 0, row: 1 };
    pub const SOUTH: Position = Position { col: 0, row: -1 };
    pub const EAST: Position = Position { col: 1, row: 0 };
    pub const WEST: Position = Position { col: -1, row: 0 };

    pub const NE: Position = Position { col: 1, row: 1 };
    pub const NW: Position = Position { col: -1, row: 1 };
    pub const SE: Position = Position { col: 1, row: -1 };
    pub const SW: Position = Position { col: -1, row: -1 };

    /// 直线方向
    pub const STRAIGHTS: [Position; 4] = [
        Position::NORTH,
        Position::SOUTH,
        Position::EAST,
        Position::WEST,
    ];

    /// 斜线方向
    pub const DIAGONALS: [Position; 4] = [Position::NE, Position::NW, Position::SE, Position::SW];

    /// 全部八个方向
    pub const OMNI_DIRS: [Position; 8] = [
        Position::NORTH,
        Position::SOUTH,
        Position::EAST,
        Position::WEST,
        Position::NE,
        Position::NW,
        Position::SE,
        Position::SW,
    ];

    pub const fn new(col: i32, row: i32) -> Self {
        Position { col, row }
    }

    /// 行分量取反（求对方的攻击方向）
    #[inline]
    pub fn reflect_row(&self) -> Position {
        Position::new(self.col, -self.row)
    }

    /// 绕原点逆时针旋转 90 度
    #[inline]
    fn rotate(&self) -> Position {
        Position::new(-self.row, self.col)
    }

    /// 绕锚点逆时针旋转 90 度
    pub fn rotate_around(&self, anchor: Position) -> Position {
        (*self - anchor).rotate() + anchor
    }

    /// 曼哈顿距离
    pub fn distance_to(&self, other: Position) -> i32 {
        (other.col - self.col).abs() + (other.row - self.row).abs()
    }

    /// 检查位置是否在棋盘范围内
    #[inline]
    pub fn within_bounds(&self, dimension: Dimension) -> bool {
        (0..dimension.cols).contains(&self.col) && (0..dimension.rows).contains(&self.row)
    }

    /// 转换为线性索引 col + row * cols
    #[inline]
    pub fn to_index(&self, dimension: Dimension) -> usize {
        assert!(
            self.within_bounds(dimension),
            "position {} outside board {}",
            self,
            dimension
        );
        (self.col + self.row * dimension.cols) as usize
    }

    /// 从线性索引恢复位置
    #[inline]
    pub fn from_index(index: usize, dimension: Dimension) -> Position {
        assert!(
            index < dimension.size(),
            "index {} outside board {}",
            index,
            dimension
        );
        let index = index as i32;
        Position::new(index % dimension.cols, index / dimension.cols)
    }

    /// 某个直线方向两侧的斜向（如 NORTH -> NE, NW）
    pub fn direction_diagonals(direction: Position) -> [Position; 2] {
        match direction {
            Position::NORTH => [Position::NE, Position::NW],
            Position::SOUTH => [Position::SE, Position::SW],
            Position::EAST => [Position::NE, Position::SE],
            Position::WEST => [Position::NW, Position::SW],
            _ => panic!("{} is not a straight unit direction", direction),
        }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, other: Position) -> Position {
        Position::new(self.col + other.col, self.row + other.row)
    }
}

impl AddAssign for Position {
    fn add_assign(&mut self, other: Position) {
        self.col += other.col;
        self.row += other.row;
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, other: Position) -> Position {
        Position::new(self.col - other.col, self.row - other.row)
    }
}

impl Mul<i32> for Position {
    type Output = Position;

    fn mul(self, scalar: i32) -> Position {
        Position::new(self.col * scalar, self.row * scalar)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.col, self.row)
    }
}

/// 攻击方向，同时标识阵营和行棋方
///
/// 向北进攻的一方（南方玩家，小写字母）是最大化方。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttackDirection {
    North,
    South,
}

impl AttackDirection {
    /// 对方的攻击方向
    #[inline]
    pub fn opposite(&self) -> AttackDirection {
        match self {
            AttackDirection::North => AttackDirection::South,
            AttackDirection::South => AttackDirection::North,
        }
    }

    /// 单位向量
    #[inline]
    pub fn vector(&self) -> Position {
        match self {
            AttackDirection::North => Position::NORTH,
            AttackDirection::South => Position::SOUTH,
        }
    }

    /// 从单位向量解析
    pub fn from_vector(v: Position) -> Option<AttackDirection> {
        match v {
            Position::NORTH => Some(AttackDirection::North),
            Position::SOUTH => Some(AttackDirection::South),
            _ => None,
        }
    }

    #[inline]
    pub fn is_maximizer(&self) -> bool {
        *self == AttackDirection::North
    }

    /// 从文本解析（"north"/"n"/"south"/"s"）
    pub fn from_name(s: &str) -> Option<AttackDirection> {
        match s.to_ascii_lowercase().as_str() {
            "north" | "n" => Some(AttackDirection::North),
            "south" | "s" => Some(AttackDirection::South),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AttackDirection::North => "north",
            AttackDirection::South => "south",
        }
    }
}

impl fmt::Display for AttackDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceType {
    // 国际象棋
    Pawn,
    Bishop,
    Rook,
    Queen,
    King,
    // 象棋
    /// 卒
    FootSoldier,
    /// 士
    Scholar,
    /// 象
    Advisor,
    /// 马
    Horse,
    /// 车
    Chariot,
    /// 炮
    Cannon,
    /// 将
    General,
}

impl PieceType {
    pub const ALL: [PieceType; 12] = [
        PieceType::Pawn,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
        PieceType::FootSoldier,
        PieceType::Scholar,
        PieceType::Advisor,
        PieceType::Horse,
        PieceType::Chariot,
        PieceType::Cannon,
        PieceType::General,
    ];

    /// 从字符解析（大小写均可）
    pub fn from_char(c: char) -> Option<PieceType> {
        match c.to_ascii_uppercase() {
            'P' => Some(PieceType::Pawn),
            'B' => Some(PieceType::Bishop),
            'R' => Some(PieceType::Rook),
            'Q' => Some(PieceType::Queen),
            'K' => Some(PieceType::King),
            'Z' => Some(PieceType::FootSoldier),
            'S' => Some(PieceType::Scholar),
            'X' => Some(PieceType::Advisor),
            'M' => Some(PieceType::Horse),
            'J' => Some(PieceType::Chariot),
            'C' => Some(PieceType::Cannon),
            'G' => Some(PieceType::General),
            _ => None,
        }
    }

    /// 转换为字符（大写）
    pub fn to_char(&self) -> char {
        match self {
            PieceType::Pawn => 'P',
            PieceType::Bishop => 'B',
            PieceType::Rook => 'R',
            PieceType::Queen => 'Q',
            PieceType::King => 'K',
            PieceType::FootSoldier => 'Z',
            PieceType::Scholar => 'S',
            PieceType::Advisor => 'X',
            PieceType::Horse => 'M',
            PieceType::Chariot => 'J',
            PieceType::Cannon => 'C',
            PieceType::General => 'G',
        }
    }

    /// 王/将
    #[inline]
    pub fn is_leader(&self) -> bool {
        matches!(self, PieceType::King | PieceType::General)
    }

    /// 子力价值
    ///
    /// 双方各有且只有一个王/将，其价值相互抵消，记为 0。
    pub fn value(&self) -> i32 {
        match self {
            PieceType::Pawn | PieceType::FootSoldier => 100,
            PieceType::Scholar | PieceType::Advisor => 200,
            PieceType::Bishop => 300,
            PieceType::Horse => 300,
            PieceType::Cannon => 450,
            PieceType::Rook | PieceType::Chariot => 500,
            PieceType::Queen => 900,
            PieceType::King | PieceType::General => 0,
        }
    }

    /// Zobrist 表中的下标
    #[inline]
    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceType::Pawn => "Pawn",
            PieceType::Bishop => "Bishop",
            PieceType::Rook => "Rook",
            PieceType::Queen => "Queen",
            PieceType::King => "King",
            PieceType::FootSoldier => "FootSoldier",
            PieceType::Scholar => "Scholar",
            PieceType::Advisor => "Advisor",
            PieceType::Horse => "Horse",
            PieceType::Chariot => "Chariot",
            PieceType::Cannon => "Cannon",
            PieceType::General => "General",
        };
        write!(f, "{}", name)
    }
}

/// 棋子：类型 + 所属方（以攻击方向表示）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceType,
    pub owner: AttackDirection,
}

impl Piece {
    pub fn new(kind: PieceType, owner: AttackDirection) -> Self {
        Piece { kind, owner }
    }

    /// 从字符解析：大写为北方玩家（向南进攻），小写为南方玩家（向北进攻）
    pub fn from_char(c: char) -> Option<Piece> {
        let kind = PieceType::from_char(c)?;
        let owner = if c.is_ascii_uppercase() {
            AttackDirection::South
        } else {
            AttackDirection::North
        };
        Some(Piece { kind, owner })
    }

    pub fn to_char(&self) -> char {
        let c = self.kind.to_char();
        match self.owner {
            AttackDirection::South => c,
            AttackDirection::North => c.to_ascii_lowercase(),
        }
    }

    #[inline]
    pub fn is_leader(&self) -> bool {
        self.kind.is_leader()
    }

    /// 目标格是否为己方棋子（空格既非己方也非敌方）
    #[inline]
    pub fn is_ally(&self, other: Option<&Piece>) -> bool {
        other.map_or(false, |p| p.owner == self.owner)
    }

    /// 目标格是否为敌方棋子
    #[inline]
    pub fn is_enemy(&self, other: Option<&Piece>) -> bool {
        other.map_or(false, |p| p.owner != self.owner)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// 走法：起点 -> 终点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Action {
    pub from: Position,
    pub to: Position,
}

impl Action {
    pub fn new(from: Position, to: Position) -> Self {
        Action { from, to }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.from, self.to)
    }
}

/// 对局结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Ongoing,
    /// 胜方的攻击方向
    Won(AttackDirection),
}

impl GameResult {
    pub fn winner(&self) -> Option<AttackDirection> {
        match self {
            GameResult::Ongoing => None,
            GameResult::Won(side) => Some(*side),
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::Ongoing => write!(f, "ongoing"),
            GameResult::Won(side) => write!(f, "{} wins", side),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_arithmetic() {
        let a = Position::new(2, 3);
        let b = Position::new(1, -1);
        assert_eq!(a + b, Position::new(3, 2));
        assert_eq!(a - b, Position::new(1, 4));
        assert_eq!(b * 3, Position::new(3, -3));
        assert_eq!(Position::NORTH.reflect_row(), Position::SOUTH);
        assert_eq!(a.distance_to(b), 5);
    }

    #[test]
    fn test_rotate_around_anchor() {
        let anchor = Position::new(1, 1);
        assert_eq!(Position::new(2, 1).rotate_around(anchor), Position::new(1, 2));
        assert_eq!(Position::new(1, 2).rotate_around(anchor), Position::new(0, 1));
    }

    #[test]
    fn test_position_index() {
        let dim = Dimension::new(6, 5);
        for row in 0..dim.rows {
            for col in 0..dim.cols {
                let pos = Position::new(col, row);
                assert_eq!(Position::from_index(pos.to_index(dim), dim), pos);
            }
        }
        assert_eq!(Position::new(1, 2).to_index(dim), 13);
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_bounds_panics() {
        Position::new(6, 0).to_index(Dimension::DEFAULT);
    }

    #[test]
    fn test_bounds() {
        let dim = Dimension::DEFAULT;
        assert!(Position::new(0, 0).within_bounds(dim));
        assert!(Position::new(5, 5).within_bounds(dim));
        assert!(!Position::new(6, 0).within_bounds(dim));
        assert!(!Position::new(0, -1).within_bounds(dim));
    }

    #[test]
    fn test_attack_direction_reflect() {
        let north = AttackDirection::North;
        assert_eq!(north.opposite(), AttackDirection::South);
        assert_eq!(
            AttackDirection::from_vector(north.vector().reflect_row()),
            Some(AttackDirection::South)
        );
        assert!(north.is_maximizer());
        assert!(!north.opposite().is_maximizer());
    }

    #[test]
    fn test_midline() {
        let even = Dimension::DEFAULT;
        assert!(!even.is_across_midline(Position::new(0, 2), AttackDirection::North));
        assert!(even.is_across_midline(Position::new(0, 3), AttackDirection::North));
        assert!(!even.is_across_midline(Position::new(0, 3), AttackDirection::South));
        assert!(even.is_across_midline(Position::new(0, 2), AttackDirection::South));

        // 奇数行时中间一行两方都不算过河
        let odd = Dimension::new(6, 7);
        assert!(!odd.is_across_midline(Position::new(0, 3), AttackDirection::North));
        assert!(!odd.is_across_midline(Position::new(0, 3), AttackDirection::South));
        assert!(odd.is_across_midline(Position::new(0, 4), AttackDirection::North));
    }

    #[test]
    fn test_confinement_region() {
        let dim = Dimension::DEFAULT;
        let south_home = dim.confinement_region(AttackDirection::North);
        assert_eq!(south_home.len(), 4);
        for pos in [(2, 0), (3, 0), (2, 1), (3, 1)] {
            assert!(south_home.contains(&Position::new(pos.0, pos.1)));
        }
        let north_home = dim.confinement_region(AttackDirection::South);
        for pos in [(2, 5), (3, 5), (2, 4), (3, 4)] {
            assert!(north_home.contains(&Position::new(pos.0, pos.1)));
        }

        let odd = Dimension::new(7, 7);
        let region = odd.confinement_region(AttackDirection::North);
        assert_eq!(region.len(), 9);
        assert!(region.contains(&Position::new(3, 1)));
        assert!(region.contains(&Position::new(4, 2)));
    }

    #[test]
    fn test_piece_char_roundtrip() {
        let piece = Piece::from_char('C').unwrap();
        assert_eq!(piece.kind, PieceType::Cannon);
        assert_eq!(piece.owner, AttackDirection::South);
        let piece = Piece::from_char('k').unwrap();
        assert_eq!(piece.kind, PieceType::King);
        assert_eq!(piece.owner, AttackDirection::North);
        assert_eq!(piece.to_char(), 'k');
        assert!(Piece::from_char('.').is_none());
    }

    #[test]
    fn test_ally_enemy_classification() {
        let me = Piece::new(PieceType::Rook, AttackDirection::North);
        let friend = Piece::new(PieceType::Pawn, AttackDirection::North);
        let foe = Piece::new(PieceType::Horse, AttackDirection::South);
        assert!(me.is_ally(Some(&friend)));
        assert!(!me.is_enemy(Some(&friend)));
        assert!(me.is_enemy(Some(&foe)));
        assert!(!me.is_ally(None));
        assert!(!me.is_enemy(None));
    }
}
