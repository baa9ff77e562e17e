//! 局面与走法的文本格式
//!
//! 局面格式: `<棋盘> <攻击方向> [回合数]`
//!
//! 棋盘从最高行到第 0 行，以 `/` 分隔，每格一个字符：
//! - 北方玩家（向南进攻）：大写 P B R Q K Z S X M J C G
//! - 南方玩家（向北进攻）：小写
//! - 空格：`.`
//!
//! 攻击方向：`north` / `south`（也接受 `n` / `s`），表示轮到哪一方。
//!
//! 走法格式：`col,row col,row`，例如 `0,1 0,3`。

use crate::board::Board;
use crate::state::{GameState, MAX_TURN_NUMBER};
use crate::types::{Action, AttackDirection, Dimension, Piece, Position};

/// 解析棋盘字符串，行列数由字符串决定
pub fn parse_layout(layout: &str) -> Result<Board, String> {
    let rows: Vec<&str> = layout.trim().split('/').collect();
    let height = rows.len() as i32;
    let width = rows.first().map_or(0, |r| r.chars().count()) as i32;

    let dimension = Dimension::new(width, height);
    if !dimension.is_supported() {
        return Err(format!(
            "Invalid layout: unsupported dimension {} (each side must be {}..={})",
            dimension,
            Dimension::MIN_SIDE,
            Dimension::MAX_SIDE
        ));
    }

    let mut board = Board::empty(dimension);
    for (row_idx, row_str) in rows.iter().enumerate() {
        // 第一段是最高行
        let row = height - 1 - row_idx as i32;
        if row_str.chars().count() as i32 != width {
            return Err(format!(
                "Invalid layout: row {} has {} cells, expected {}",
                row,
                row_str.chars().count(),
                width
            ));
        }
        for (col, ch) in row_str.chars().enumerate() {
            if ch == '.' {
                continue;
            }
            let piece =
                Piece::from_char(ch).ok_or_else(|| format!("Invalid piece char: {:?}", ch))?;
            board.place(Position::new(col as i32, row), Some(piece));
        }
    }

    for side in [AttackDirection::North, AttackDirection::South] {
        let leaders = board
            .cells()
            .iter()
            .flatten()
            .filter(|p| p.owner == side && p.is_leader())
            .count();
        if leaders > 1 {
            return Err(format!("Invalid layout: {} side has {} leaders", side, leaders));
        }
    }

    Ok(board)
}

/// 生成棋盘字符串
pub fn layout_string(board: &Board) -> String {
    let dimension = board.dimension();
    let mut rows = Vec::with_capacity(dimension.rows as usize);
    for row in (0..dimension.rows).rev() {
        let line: String = (0..dimension.cols)
            .map(|col| {
                board
                    .get(Position::new(col, row))
                    .map_or('.', |p| p.to_char())
            })
            .collect();
        rows.push(line);
    }
    rows.join("/")
}

/// 解析坐标 "col,row"
pub fn parse_position(s: &str) -> Result<Position, String> {
    let parts: Vec<&str> = s.trim().split(',').collect();
    if parts.len() != 2 {
        return Err(format!("Invalid position: {:?}, expected 'col,row'", s));
    }
    let col = parts[0]
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("Invalid column in {:?}: {}", s, e))?;
    let row = parts[1]
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("Invalid row in {:?}: {}", s, e))?;
    Ok(Position::new(col, row))
}

/// 解析走法 "col,row col,row"
pub fn parse_action(s: &str) -> Result<Action, String> {
    let parts: Vec<&str> = s.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(format!(
            "Invalid action: {:?}, expected 'col,row col,row'",
            s
        ));
    }
    Ok(Action::new(parse_position(parts[0])?, parse_position(parts[1])?))
}

/// 解析局面字符串
pub fn parse_state(s: &str) -> Result<GameState, String> {
    let parts: Vec<&str> = s.split_whitespace().collect();
    if parts.len() < 2 || parts.len() > 3 {
        return Err(format!(
            "Invalid position format: expected '<layout> <north|south> [turn]', got: {}",
            s
        ));
    }

    let board = parse_layout(parts[0])?;
    let attacker = AttackDirection::from_name(parts[1])
        .ok_or_else(|| format!("Invalid attack direction: {}", parts[1]))?;
    let turn_number = match parts.get(2) {
        Some(t) => t
            .parse::<u32>()
            .map_err(|e| format!("Invalid turn number {:?}: {}", t, e))?,
        None => 0,
    };
    if turn_number > MAX_TURN_NUMBER {
        return Err(format!(
            "Invalid turn number {}: must be at most {}",
            turn_number, MAX_TURN_NUMBER
        ));
    }

    Ok(GameState::with_turn(board, attacker, turn_number))
}

/// 生成局面字符串
pub fn state_string(state: &GameState) -> String {
    format!(
        "{} {} {}",
        layout_string(state.board()),
        state.attacker(),
        state.turn_number()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceType;

    const START_LAYOUT: &str = "JMGSMJ/ZCZZCZ/....../....../pppppp/rbqkbr";

    #[test]
    fn test_default_layout_string() {
        assert_eq!(layout_string(&Board::default_board()), START_LAYOUT);
        assert_eq!(parse_layout(START_LAYOUT).unwrap(), Board::default_board());
    }

    #[test]
    fn test_parse_layout_orientation() {
        let board = parse_layout("..G.../....../....../....../....../...k..").unwrap();
        let general = board.get(Position::new(2, 5)).unwrap();
        assert_eq!(general.kind, PieceType::General);
        assert_eq!(general.owner, AttackDirection::South);
        let king = board.get(Position::new(3, 0)).unwrap();
        assert_eq!(king.owner, AttackDirection::North);
    }

    #[test]
    fn test_parse_layout_non_square() {
        let board = parse_layout("...G.../......./......./......./...k...").unwrap();
        assert_eq!(board.dimension(), Dimension::new(7, 5));
    }

    #[test]
    fn test_parse_layout_errors() {
        assert!(parse_layout("..G.../.....").is_err());
        assert!(parse_layout("..G.../..?.../....../....../....../...k..").is_err());
        assert!(parse_layout("G").is_err());
        assert!(parse_layout("..GG../....../....../....../....../...k..").is_err());
    }

    #[test]
    fn test_parse_action() {
        let action = parse_action("0,1 0,3").unwrap();
        assert_eq!(action.from, Position::new(0, 1));
        assert_eq!(action.to, Position::new(0, 3));
        assert_eq!(action.to_string(), "0,1 0,3");

        assert!(parse_action("0,1").is_err());
        assert!(parse_action("a,1 0,3").is_err());
        assert!(parse_action("0,1,2 0,3").is_err());
    }

    #[test]
    fn test_parse_state() {
        let state = parse_state(&format!("{} north", START_LAYOUT)).unwrap();
        assert_eq!(state.attacker(), AttackDirection::North);
        assert_eq!(state.turn_number(), 0);

        let state = parse_state(&format!("{} s 7", START_LAYOUT)).unwrap();
        assert_eq!(state.attacker(), AttackDirection::South);
        assert_eq!(state.turn_number(), 7);
        assert_eq!(state_string(&state), format!("{} south 7", START_LAYOUT));

        assert!(parse_state(START_LAYOUT).is_err());
        assert!(parse_state(&format!("{} east", START_LAYOUT)).is_err());
    }

    #[test]
    fn test_parse_state_turn_limit() {
        let s = parse_state(&format!("{} north {}", START_LAYOUT, MAX_TURN_NUMBER)).unwrap();
        assert_eq!(s.turn_number(), MAX_TURN_NUMBER);

        assert!(parse_state(&format!("{} north {}", START_LAYOUT, MAX_TURN_NUMBER + 1)).is_err());
        assert!(parse_state(&format!("{} north 4294967295", START_LAYOUT)).is_err());
    }
}
