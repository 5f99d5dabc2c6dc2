//! Xiangqi AI CLI
//!
//! 命令行界面，用于校验走法和测试 AI
//!
//! 支持两种模式：
//! 1. 单次命令模式：每次执行一个命令
//! 2. Server 模式：长驻进程，通过 stdin/stdout 逐行收发 JSON

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use std::time::Instant;
use xiangqi_engine::{
    check_move, game_status, is_king_in_check, legal_moves, parse_fen, static_score, AIConfig,
    AIEngine, Game, Move, Side, StandardRules, DEFAULT_STRATEGY,
};

#[derive(Parser)]
#[command(name = "xiangqi-engine")]
#[command(about = "Xiangqi rules validator and alpha-beta AI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 获取合法走法
    Moves {
        /// FEN 字符串
        #[arg(long)]
        fen: String,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 校验一步走法（ICCS 格式，如 h2e2）
    Check {
        /// FEN 字符串
        #[arg(long)]
        fen: String,

        /// 走法
        #[arg(long = "move")]
        mv: String,
    },

    /// 选择最佳走法
    Best {
        /// FEN 字符串
        #[arg(long)]
        fen: String,

        /// AI 策略
        #[arg(long, default_value = DEFAULT_STRATEGY)]
        strategy: String,

        /// 搜索深度
        #[arg(long, default_value = "3")]
        depth: u32,

        /// 随机种子
        #[arg(long)]
        seed: Option<u64>,

        /// 未被将军时，将帅非吃子走法进入搜索的概率
        #[arg(long, default_value = "0.2")]
        king_move_allowance: f64,

        /// 关闭评估随机扰动
        #[arg(long)]
        no_jitter: bool,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 评估局面分数（走子方视角，不含随机扰动）
    Eval {
        /// FEN 字符串
        #[arg(long)]
        fen: String,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// AI 自我对弈
    Play {
        /// 起始 FEN，默认标准开局
        #[arg(long)]
        fen: Option<String>,

        /// 搜索深度
        #[arg(long, default_value = "2")]
        depth: u32,

        /// 随机种子
        #[arg(long)]
        seed: Option<u64>,

        /// 未被将军时，将帅非吃子走法进入搜索的概率
        #[arg(long, default_value = "0.2")]
        king_move_allowance: f64,

        /// 关闭评估随机扰动
        #[arg(long)]
        no_jitter: bool,

        /// 最多走多少步
        #[arg(long, default_value = "200")]
        max_moves: usize,
    },

    /// Server 模式
    Server,
}

#[derive(Serialize, Deserialize)]
struct MoveResult {
    #[serde(rename = "move")]
    mv: String,
    score: i32,
}

// Server 模式的请求和响应结构
#[derive(Serialize, Deserialize)]
struct ServerRequest {
    cmd: String,
    #[serde(default)]
    fen: String,
    #[serde(default, rename = "move")]
    mv: Option<String>,
    #[serde(default)]
    strategy: Option<String>,
    #[serde(default)]
    depth: Option<u32>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    king_move_allowance: Option<f64>,
    #[serde(default)]
    jitter: Option<bool>,
}

#[derive(Serialize, Deserialize, Default)]
struct ServerResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    best: Option<MoveResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    legal_moves: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    depth: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nodes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    elapsed_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    // eval 命令的字段
    #[serde(skip_serializing_if = "Option::is_none")]
    eval: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    in_check: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<String>,
}

impl ServerResponse {
    fn success_best(best: Option<MoveResult>, depth: u32, nodes: u64, elapsed_ms: f64) -> Self {
        Self {
            ok: true,
            best,
            depth: Some(depth),
            nodes: Some(nodes),
            elapsed_ms: Some(elapsed_ms),
            ..Default::default()
        }
    }

    fn success_legal_moves(legal_moves: Vec<String>) -> Self {
        Self {
            ok: true,
            legal_moves: Some(legal_moves),
            ..Default::default()
        }
    }

    fn success_check(result: &str) -> Self {
        Self {
            ok: true,
            result: Some(result.to_string()),
            ..Default::default()
        }
    }

    fn success_eval(report: EvalReport) -> Self {
        Self {
            ok: true,
            eval: Some(report.score),
            color: Some(color_to_str(report.side).to_string()),
            in_check: Some(report.in_check),
            status: Some(report.status),
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

struct EvalReport {
    side: Side,
    score: i32,
    in_check: bool,
    status: String,
}

struct BestReport {
    best: Option<MoveResult>,
    nodes: u64,
    elapsed_ms: f64,
}

fn color_to_str(side: Side) -> &'static str {
    if side == Side::Red {
        "red"
    } else {
        "black"
    }
}

fn move_strings(moves: &[Move]) -> Vec<String> {
    moves.iter().map(|m| m.to_iccs()).collect()
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Error: failed to encode JSON: {}", e),
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Moves { fen, json } => match parse_fen(&fen) {
            Ok((board, turn)) => {
                let moves = move_strings(&legal_moves(&board, turn));
                if json {
                    print_json(&ServerResponse::success_legal_moves(moves));
                } else {
                    println!("Legal moves ({}):", moves.len());
                    for mv in &moves {
                        println!("  {}", mv);
                    }
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },

        Commands::Check { fen, mv } => match do_check(&fen, &mv) {
            Ok(result) => println!("{}", result),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },

        Commands::Best {
            fen,
            strategy,
            depth,
            seed,
            king_move_allowance,
            no_jitter,
            json,
        } => match do_best(
            &fen,
            &strategy,
            &search_config(depth, seed, king_move_allowance, no_jitter),
        ) {
            Ok(report) => {
                if json {
                    print_json(&ServerResponse::success_best(
                        report.best,
                        depth,
                        report.nodes,
                        report.elapsed_ms,
                    ));
                } else {
                    match report.best {
                        Some(best) => println!("{} (score {})", best.mv, best.score),
                        None => println!("No legal move"),
                    }
                    println!("nodes: {}, time: {:.1}ms", report.nodes, report.elapsed_ms);
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },

        Commands::Eval { fen, json } => match do_eval(&fen) {
            Ok(report) => {
                if json {
                    print_json(&ServerResponse::success_eval(report));
                } else {
                    println!("Side: {}", color_to_str(report.side));
                    println!("Eval: {}", report.score);
                    println!("In check: {}", report.in_check);
                    println!("Status: {}", report.status);
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },

        Commands::Play {
            fen,
            depth,
            seed,
            king_move_allowance,
            no_jitter,
            max_moves,
        } => {
            let config = search_config(depth, seed, king_move_allowance, no_jitter);
            if let Err(e) = run_self_play(fen.as_deref(), &config, max_moves) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }

        Commands::Server => {
            run_server();
        }
    }
}

fn do_check(fen: &str, mv: &str) -> Result<&'static str, String> {
    let (board, _) = parse_fen(fen).map_err(|e| e.to_string())?;
    let (from, to) = Move::parse_iccs(mv).ok_or_else(|| format!("Invalid move: {}", mv))?;
    Ok(check_move(&board, from, to).as_str())
}

fn search_config(depth: u32, seed: Option<u64>, king_move_allowance: f64, no_jitter: bool) -> AIConfig {
    AIConfig {
        depth,
        seed,
        king_move_allowance,
        jitter: !no_jitter,
    }
}

fn do_best(fen: &str, strategy: &str, config: &AIConfig) -> Result<BestReport, String> {
    let (board, turn) = parse_fen(fen).map_err(|e| e.to_string())?;
    let mut ai = AIEngine::from_strategy(strategy, config)?;

    let start = Instant::now();
    let best = ai.search(&board, turn).map(|sm| MoveResult {
        mv: sm.mv.to_iccs(),
        score: sm.score,
    });
    let elapsed = start.elapsed().as_secs_f64();

    Ok(BestReport {
        best,
        nodes: ai.last_nodes(),
        elapsed_ms: elapsed * 1000.0,
    })
}

fn do_eval(fen: &str) -> Result<EvalReport, String> {
    let (board, turn) = parse_fen(fen).map_err(|e| e.to_string())?;
    Ok(EvalReport {
        side: turn,
        score: static_score(&board, turn, &StandardRules),
        in_check: is_king_in_check(turn, &board),
        status: game_status(&board, turn).to_string(),
    })
}

/// 双方都由同一个 AI 走子
fn run_self_play(fen: Option<&str>, config: &AIConfig, max_moves: usize) -> Result<(), String> {
    let mut game = match fen {
        Some(f) => Game::from_fen(f).map_err(|e| e.to_string())?,
        None => Game::new(),
    };
    let mut ai = AIEngine::minimax(config);

    println!("{}", game.board().to_ascii());
    while !game.is_over() && game.history().len() < max_moves {
        let record = game
            .play_ai(ai.strategy_mut())
            .map_err(|e| e.to_string())?;
        println!("{}", record);
    }
    println!("{}", game.board().to_ascii());
    println!("Result: {}", game.status());
    Ok(())
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

        // 解析请求
        let request: ServerRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                print_json(&ServerResponse::error(&format!("Invalid JSON: {}", e)));
                let _ = stdout.flush();
                continue;
            }
        };

        // 处理命令
        let response = match request.cmd.as_str() {
            "best" => handle_best_request(&request),
            "moves" => handle_moves_request(&request),
            "check" => handle_check_request(&request),
            "eval" => handle_eval_request(&request),
            "quit" => break,
            _ => ServerResponse::error(&format!("Unknown command: {}", request.cmd)),
        };

        // 返回响应
        print_json(&response);
        let _ = stdout.flush();
    }
}

/// 处理 best 命令
fn handle_best_request(request: &ServerRequest) -> ServerResponse {
    let strategy = request.strategy.as_deref().unwrap_or(DEFAULT_STRATEGY);
    let defaults = AIConfig::default();
    let config = AIConfig {
        depth: request.depth.unwrap_or(defaults.depth),
        seed: request.seed,
        king_move_allowance: request
            .king_move_allowance
            .unwrap_or(defaults.king_move_allowance),
        jitter: request.jitter.unwrap_or(defaults.jitter),
    };
    match do_best(&request.fen, strategy, &config) {
        Ok(report) => ServerResponse::success_best(
            report.best,
            config.depth,
            report.nodes,
            report.elapsed_ms,
        ),
        Err(e) => ServerResponse::error(&format!("AI error: {}", e)),
    }
}

/// 处理 moves 命令
fn handle_moves_request(request: &ServerRequest) -> ServerResponse {
    match parse_fen(&request.fen) {
        Ok((board, turn)) => {
            ServerResponse::success_legal_moves(move_strings(&legal_moves(&board, turn)))
        }
        Err(e) => ServerResponse::error(&format!("Invalid FEN: {}", e)),
    }
}

/// 处理 check 命令
fn handle_check_request(request: &ServerRequest) -> ServerResponse {
    let mv = match request.mv.as_deref() {
        Some(mv) => mv,
        None => return ServerResponse::error("Missing move"),
    };
    match do_check(&request.fen, mv) {
        Ok(result) => ServerResponse::success_check(result),
        Err(e) => ServerResponse::error(&e),
    }
}

/// 处理 eval 命令（静态评估）
fn handle_eval_request(request: &ServerRequest) -> ServerResponse {
    match do_eval(&request.fen) {
        Ok(report) => ServerResponse::success_eval(report),
        Err(e) => ServerResponse::error(&format!("Invalid FEN: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_do_check() {
        let fen = xiangqi_engine::START_FEN;
        assert_eq!(do_check(fen, "h2e2").unwrap(), "valid");
        assert_eq!(do_check(fen, "a0b1").unwrap(), "invalid_rule");
        assert!(do_check(fen, "zz").is_err());
    }

    #[test]
    fn test_server_response_skips_empty_fields() {
        let json = serde_json::to_string(&ServerResponse::success_check("valid")).unwrap();
        assert_eq!(json, r#"{"ok":true,"result":"valid"}"#);
    }

    #[test]
    fn test_do_best_reports_nodes() {
        let config = search_config(2, Some(3), 0.2, false);
        let report = do_best(xiangqi_engine::START_FEN, "minimax", &config).unwrap();
        assert!(report.best.is_some());
        assert!(report.nodes > 0);
        assert!(do_best(xiangqi_engine::START_FEN, "mcts", &config).is_err());
    }

    #[test]
    fn test_do_eval() {
        let report = do_eval(xiangqi_engine::START_FEN).unwrap();
        assert_eq!(report.side, Side::Red);
        assert_eq!(report.score, 0);
        assert!(!report.in_check);
        assert_eq!(report.status, "ongoing");
    }

    #[test]
    fn test_request_parsing() {
        let request: ServerRequest =
            serde_json::from_str(r#"{"cmd":"check","fen":"x","move":"h2e2"}"#).unwrap();
        assert_eq!(request.mv.as_deref(), Some("h2e2"));
        assert_eq!(request.depth, None);
    }
}
