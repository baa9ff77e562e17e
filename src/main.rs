//! Chaos Chess AI CLI
//!
//! 命令行界面，用于测试 AI
//!
//! 支持两种模式：
//! 1. 单次命令模式：每次执行一个命令
//! 2. Server 模式：长驻进程，通过 stdin/stdout 通信（每行一个 JSON）

use chaos_chess_ai::test_positions;
use chaos_chess_ai::{
    get_node_count, level_census, parse_action, parse_layout, parse_state, reset_node_count,
    sigmoid, state_string, strategic_score, tactical_score, AIConfig, AIEngine, AttackDirection,
    GameState, DEFAULT_STRATEGY,
};
use clap::{Args, Parser, Subcommand};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "chaos-chess-ai")]
#[command(about = "Chess x Xiangqi hybrid AI engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// 局面参数：`--position` 或 `--layout` + `--turn`
#[derive(Args)]
struct PositionArgs {
    /// 局面字符串 "<棋盘> <north|south> [回合数]"，也可以是测试局面名（如 START）
    #[arg(long)]
    position: Option<String>,

    /// 棋盘字符串（与 --turn 配合）
    #[arg(long, conflicts_with = "position")]
    layout: Option<String>,

    /// 行棋方攻击方向
    #[arg(long, default_value = "north")]
    turn: String,
}

impl PositionArgs {
    fn resolve(&self) -> Result<GameState, String> {
        resolve_state(self.position.as_deref(), self.layout.as_deref(), &self.turn)
    }
}

/// 搜索参数
#[derive(Args)]
struct SearchArgs {
    /// AI 策略 (random, greedy, mcts)
    #[arg(long, default_value = DEFAULT_STRATEGY)]
    strategy: String,

    /// MCTS 迭代次数
    #[arg(long, default_value = "10000")]
    iterations: u32,

    /// UCT 探索常数
    #[arg(long, default_value = "1.4")]
    exploration: f64,

    /// 随机种子
    #[arg(long)]
    seed: Option<u64>,

    /// 时间限制（秒）
    #[arg(long)]
    time_limit: Option<f64>,
}

impl SearchArgs {
    fn config(&self) -> AIConfig {
        AIConfig {
            iterations: self.iterations,
            exploration: self.exploration,
            seed: self.seed,
            time_limit: self.time_limit,
            ..Default::default()
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// 获取合法走法
    Moves {
        #[command(flatten)]
        position: PositionArgs,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 选择最佳走法
    Best {
        #[command(flatten)]
        position: PositionArgs,

        #[command(flatten)]
        search: SearchArgs,

        /// 返回的走法数量
        #[arg(long, default_value = "1")]
        n: usize,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 评估局面分数
    Score {
        #[command(flatten)]
        position: PositionArgs,

        /// 战略评分的模拟次数（0 表示不计算）
        #[arg(long, default_value = "0")]
        playouts: u32,

        /// 随机种子
        #[arg(long)]
        seed: Option<u64>,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 按层统计不同局面数量
    Census {
        #[command(flatten)]
        position: PositionArgs,

        /// 最大深度
        #[arg(long, default_value = "3")]
        depth: usize,
    },

    /// 启动 server 模式（stdin/stdout 通信）
    Server,
}

#[derive(Serialize, Deserialize)]
struct ActionResult {
    action: String,
    score: f64,
}

#[derive(Serialize, Deserialize)]
struct BestResponse {
    actions: Vec<ActionResult>,
    /// 走出最佳走法后的局面
    next: String,
    nodes: u64,
    elapsed_ms: f64,
}

#[derive(Serialize, Deserialize)]
struct ScoreResponse {
    position: String,
    attacker: String,
    score: f64,
    sigmoid: f64,
    terminal: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    winner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    strategic: Option<f64>,
}

// Server 模式的请求和响应结构
#[derive(Serialize, Deserialize)]
struct ServerRequest {
    cmd: String,
    #[serde(default)]
    position: String,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    strategy: Option<String>,
    #[serde(default)]
    iterations: Option<u32>,
    #[serde(default)]
    exploration: Option<f64>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    time_limit: Option<f64>,
    #[serde(default)]
    n: Option<usize>,
}

#[derive(Serialize, Deserialize, Default)]
struct ServerResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    actions: Option<Vec<ActionResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    legal_actions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nodes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    elapsed_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<ScoreResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServerResponse {
    fn success_best(best: BestResponse) -> Self {
        Self {
            ok: true,
            actions: Some(best.actions),
            position: Some(best.next),
            nodes: Some(best.nodes),
            elapsed_ms: Some(best.elapsed_ms),
            ..Default::default()
        }
    }

    fn success_legal_actions(legal_actions: Vec<String>) -> Self {
        Self {
            ok: true,
            legal_actions: Some(legal_actions),
            ..Default::default()
        }
    }

    fn success_position(position: String) -> Self {
        Self {
            ok: true,
            position: Some(position),
            ..Default::default()
        }
    }

    fn success_score(score: ScoreResponse) -> Self {
        Self {
            ok: true,
            score: Some(score),
            ..Default::default()
        }
    }

    fn error(msg: &str) -> Self {
        Self {
            ok: false,
            error: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

/// 解析局面：测试局面名、局面字符串，或棋盘 + 行棋方
fn resolve_state(position: Option<&str>, layout: Option<&str>, turn: &str) -> Result<GameState, String> {
    if let Some(layout) = layout {
        let board = parse_layout(layout)?;
        let attacker =
            AttackDirection::from_name(turn).ok_or_else(|| format!("Invalid turn: {}", turn))?;
        return Ok(GameState::new(board, attacker));
    }
    match position {
        None => parse_state(test_positions::START),
        Some(p) if p.trim().is_empty() => parse_state(test_positions::START),
        Some(p) => match test_positions::by_name(p.trim()) {
            Some(named) => parse_state(named),
            None => parse_state(p),
        },
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) {
    let out = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match out {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Error: failed to serialize response: {}", e),
    }
}

fn fail(e: String) -> ! {
    eprintln!("Error: {}", e);
    std::process::exit(1);
}

/// 运行策略，返回前 n 个走法和走出最佳走法后的局面
fn run_best(state: &GameState, strategy: &str, config: &AIConfig, n: usize) -> Result<BestResponse, String> {
    let ai = AIEngine::from_strategy(strategy, config)?;

    reset_node_count();
    let start = Instant::now();
    let actions = ai.select_actions(state, n.max(1));
    let next = match actions.first() {
        Some(best) if best.score != f64::NEG_INFINITY => state.apply_action(&best.action),
        _ => state.clone(),
    };
    let elapsed = start.elapsed().as_secs_f64();

    Ok(BestResponse {
        actions: actions
            .into_iter()
            .take(n)
            .map(|sa| ActionResult {
                action: sa.action.to_string(),
                score: sa.score,
            })
            .collect(),
        next: state_string(&next),
        nodes: get_node_count(),
        elapsed_ms: elapsed * 1000.0,
    })
}

fn score_state(state: &GameState, playouts: u32, seed: Option<u64>) -> ScoreResponse {
    let score = tactical_score(state);
    let terminal = state.is_terminal();
    let strategic = if playouts > 0 && !terminal {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let max_depth = AIConfig::default().max_rollout_depth;
        Some(strategic_score(state, playouts, max_depth, &mut rng))
    } else {
        None
    };

    ScoreResponse {
        position: state_string(state),
        attacker: state.attacker().to_string(),
        score,
        sigmoid: sigmoid(score),
        terminal,
        winner: state.result().winner().map(|w| w.to_string()),
        strategic,
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Moves { position, json } => {
            let state = position.resolve().unwrap_or_else(|e| fail(e));
            let actions: Vec<String> = state.legal_actions().iter().map(|a| a.to_string()).collect();
            if json {
                print_json(&actions, true);
            } else {
                println!("{}", state);
                println!("Legal actions ({}):", actions.len());
                for action in &actions {
                    println!("  {}", action);
                }
            }
        }

        Commands::Best {
            position,
            search,
            n,
            json,
        } => {
            let state = position.resolve().unwrap_or_else(|e| fail(e));
            let config = search.config();
            let best = run_best(&state, &search.strategy, &config, n).unwrap_or_else(|e| fail(e));

            if json {
                print_json(&best, true);
            } else {
                println!("Best actions (strategy={}):", search.strategy);
                if best.actions.is_empty() {
                    println!("  (no legal action)");
                }
                for result in &best.actions {
                    println!("  {} (score: {:.2})", result.action, result.score);
                }
                println!("Next position: {}", best.next);
                println!(
                    "\nStats: nodes={}, time={:.3}s",
                    best.nodes,
                    best.elapsed_ms / 1000.0
                );
            }
        }

        Commands::Score {
            position,
            playouts,
            seed,
            json,
        } => {
            let state = position.resolve().unwrap_or_else(|e| fail(e));
            let response = score_state(&state, playouts, seed);
            if json {
                print_json(&response, true);
            } else {
                println!("{}", state);
                println!("tactical score: {}", response.score);
                println!("sigmoid: {:.4}", response.sigmoid);
                match &response.winner {
                    Some(w) => println!("decided: {} wins", w),
                    None => println!("decided: no"),
                }
                if let Some(s) = response.strategic {
                    println!("strategic score ({} playouts): {:.4}", playouts, s);
                }
            }
        }

        Commands::Census { position, depth } => {
            let state = position.resolve().unwrap_or_else(|e| fail(e));
            let start = Instant::now();
            for (level, count) in level_census(&state, depth).iter().enumerate() {
                println!("depth {}: {}", level, count);
            }
            println!("time={:.3}s", start.elapsed().as_secs_f64());
        }

        Commands::Server => {
            run_server();
        }
    }
}

/// Server 模式主循环
/// 从 stdin 读取 JSON 请求，返回 JSON 响应到 stdout
fn run_server() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        // 空行跳过
        if line.trim().is_empty() {
            continue;
        }

        let request: ServerRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                print_json(&ServerResponse::error(&format!("Invalid JSON: {}", e)), false);
                let _ = stdout.flush();
                continue;
            }
        };

        let response = match request.cmd.as_str() {
            "best" => handle_best_request(&request),
            "moves" => handle_moves_request(&request),
            "score" => handle_score_request(&request),
            "apply" => handle_apply_request(&request),
            "quit" => break,
            _ => ServerResponse::error(&format!("Unknown command: {}", request.cmd)),
        };

        print_json(&response, false);
        let _ = stdout.flush();
    }
}

fn request_state(request: &ServerRequest) -> Result<GameState, String> {
    resolve_state(Some(&request.position), None, "north")
}

/// 处理 best 命令
fn handle_best_request(request: &ServerRequest) -> ServerResponse {
    let state = match request_state(request) {
        Ok(s) => s,
        Err(e) => return ServerResponse::error(&format!("Invalid position: {}", e)),
    };
    let defaults = AIConfig::default();
    let config = AIConfig {
        iterations: request.iterations.unwrap_or(defaults.iterations),
        exploration: request.exploration.unwrap_or(defaults.exploration),
        seed: request.seed,
        time_limit: request.time_limit,
        ..defaults
    };
    let strategy = request.strategy.as_deref().unwrap_or(DEFAULT_STRATEGY);

    match run_best(&state, strategy, &config, request.n.unwrap_or(5)) {
        Ok(best) => ServerResponse::success_best(best),
        Err(e) => ServerResponse::error(&format!("Invalid strategy: {}", e)),
    }
}

/// 处理 moves 命令
fn handle_moves_request(request: &ServerRequest) -> ServerResponse {
    match request_state(request) {
        Ok(state) => ServerResponse::success_legal_actions(
            state.legal_actions().iter().map(|a| a.to_string()).collect(),
        ),
        Err(e) => ServerResponse::error(&format!("Invalid position: {}", e)),
    }
}

/// 处理 score 命令（静态评估）
fn handle_score_request(request: &ServerRequest) -> ServerResponse {
    match request_state(request) {
        Ok(state) => ServerResponse::success_score(score_state(&state, 0, None)),
        Err(e) => ServerResponse::error(&format!("Invalid position: {}", e)),
    }
}

/// 处理 apply 命令：走一步，返回新局面（不属于行棋方的走法原样返回）
fn handle_apply_request(request: &ServerRequest) -> ServerResponse {
    let state = match request_state(request) {
        Ok(s) => s,
        Err(e) => return ServerResponse::error(&format!("Invalid position: {}", e)),
    };
    let action = match request.action.as_deref().map(parse_action) {
        Some(Ok(a)) => a,
        Some(Err(e)) => return ServerResponse::error(&e),
        None => return ServerResponse::error("Missing action"),
    };
    ServerResponse::success_position(state_string(&state.apply_action(&action)))
}
