//! 测试局面库
//!
//! 提供命名的局面字符串（`<棋盘> <攻击方向> [回合数]`），方便测试、基准和调试
//!
//! 命名规范:
//! - START: 初始局面
//! - MID_n: 中局
//! - 其余按局面特点命名（强制吃将、唯一应着、无子可动等）
//!
//! 攻击方向 `north` 表示轮到南方玩家（小写，国际象棋一方）走。

// =============================================================================
// 开局 (START)
// =============================================================================

/// 初始局面 - 南方玩家先走，12 个合法走法（6 个兵各走 1 或 2 格）
pub const START: &str = "JMGSMJ/ZCZZCZ/....../....../pppppp/rbqkbr north";

/// 初始局面，假设北方玩家先走（炮可隔兵打象）
pub const START_NORTH_TO_MOVE: &str = "JMGSMJ/ZCZZCZ/....../....../pppppp/rbqkbr south";

// =============================================================================
// 中局 (MID_n)
// =============================================================================

/// 双方都出动了几个子
pub const MID_1: &str = "J.GS.J/Z.Z..Z/.C..M./..p.p./pp...p/rbqkbr north 6";

/// 中心被兵卒顶住，双方炮马对峙
pub const MID_2: &str = "J.GSMJ/.CZZ.Z/Z...C./.p..p./p.p..p/r.qkbr south 7";

// =============================================================================
// 终局 / 特殊情况
// =============================================================================

/// 强制吃将：车 (0,5) 和象 (4,3) 都能吃将 (2,5)，只有这两个合法走法
pub const FORCED_CAPTURE: &str = "r.G.../....Z./....b./....../pp..../...k.. north";

/// 唯一应着：只有兵 (0,2) 前进一格，且这一步不分胜负
pub const SINGLE_REPLY: &str = "..G.../Z...../....../p...../..ss../..gs.. north";

/// 南方玩家无子可动（士和王挤满九宫）
pub const GRIDLOCK: &str = "..G.../Z...../....../....../..ss../..gs.. north";

/// 北方玩家只剩将：已判负
pub const LONE_GENERAL: &str = "..G.../....../....../....../pp..../...k.. north";

/// 王在 3 线被车护住，车离开就会被对方车吃王（14 个走法，10 个安全；车吃车后北方仍有卒）
pub const EXPOSED_KING: &str = "..GJ../Z...../....../....../p..r../...k.. north";

/// 炮隔己方卒打兵（北方玩家走）
pub const CANNON_SCREEN: &str = "..G.../....../....../C.Z.p./....../...k.. south";

/// 马腿被堵（北方玩家走）
pub const HORSE_HOBBLED: &str = "..G.../....../..p.Z./..M.../....../...k.. south";

// =============================================================================
// 辅助
// =============================================================================

/// 全部命名局面
pub const ALL: [(&str, &str); 11] = [
    ("START", START),
    ("START_NORTH_TO_MOVE", START_NORTH_TO_MOVE),
    ("MID_1", MID_1),
    ("MID_2", MID_2),
    ("FORCED_CAPTURE", FORCED_CAPTURE),
    ("SINGLE_REPLY", SINGLE_REPLY),
    ("GRIDLOCK", GRIDLOCK),
    ("LONE_GENERAL", LONE_GENERAL),
    ("EXPOSED_KING", EXPOSED_KING),
    ("CANNON_SCREEN", CANNON_SCREEN),
    ("HORSE_HOBBLED", HORSE_HOBBLED),
];

/// 按名称查找局面（不区分大小写）
pub fn by_name(name: &str) -> Option<&'static str> {
    ALL.iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, s)| *s)
}
