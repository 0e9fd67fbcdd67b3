/// perft による合法手生成の検証ツール
///
/// 使い方:
///   # 平手初期局面を深さ4で
///   perft --depth 4
///
///   # 局面を指定し、ルートの指し手ごとの内訳を出す
///   perft --sfen "l6nl/5+P1gk/2np1S3/p1p4Pp/3P2Sp1/1PPb2P1P/P5GS1/R8/LN4bKL w RGgsn5p 1" --depth 3 --divide
///
///   # TOML の検証ケースをまとめて実行（期待値と違えば終了コード1）
///   perft --suite crates/tools/suites/perft.toml --json
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Result, bail};
use clap::Parser;
use serde::Serialize;

use shogiban_core::position::SFEN_HIRATE;
use tools::suite::{Case, CaseResult, DivideEntry, Suite, divide};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "perft")]
#[command(about = "合法手の木の末端数を数えて指し手生成を検証する")]
struct Cli {
    /// 局面の SFEN（省略時は平手初期局面）
    #[arg(long)]
    sfen: Option<String>,

    /// 深さ
    #[arg(short, long, default_value_t = 3)]
    depth: u32,

    /// ルートの指し手ごとの内訳を出す
    #[arg(long)]
    divide: bool,

    /// JSON で出力する
    #[arg(long)]
    json: bool,

    /// TOML の検証ケース（指定すると --sfen / --depth は無視）
    #[arg(long)]
    suite: Option<PathBuf>,
}

#[derive(Serialize)]
struct DivideReport {
    sfen: String,
    depth: u32,
    total: u64,
    moves: Vec<DivideEntry>,
}

fn print_result(result: &CaseResult) {
    let status = match (result.expected, result.passed) {
        (None, _) => "-",
        (Some(_), true) => "ok",
        (Some(_), false) => "MISMATCH",
    };
    println!(
        "{:<16} depth {:>2}  nodes {:>12}  {:>8} ms  {:>10} nps  {status}",
        result.name, result.depth, result.nodes, result.elapsed_ms, result.nps
    );
    if let (Some(expected), false) = (result.expected, result.passed) {
        println!("  expected {expected}");
    }
}

fn run_suite(cli: &Cli) -> Result<bool> {
    let Some(path) = cli.suite.as_deref() else {
        bail!("--suite is not specified");
    };
    let suite = Suite::load(path)?;
    if suite.cases.is_empty() {
        bail!("no [[case]] in {}", path.display());
    }
    log::info!("running {} cases from {}", suite.cases.len(), path.display());

    let mut results = Vec::with_capacity(suite.cases.len());
    for case in &suite.cases {
        let result = case.run()?;
        if !cli.json {
            print_result(&result);
        }
        results.push(result);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    }
    Ok(results.iter().all(|r| r.passed))
}

fn run_single(cli: &Cli) -> Result<bool> {
    let sfen = cli.sfen.clone().unwrap_or_else(|| SFEN_HIRATE.to_string());

    if cli.divide {
        let moves = divide(&sfen, cli.depth)?;
        let total = moves.iter().map(|e| e.nodes).sum();
        if cli.json {
            let report = DivideReport {
                sfen,
                depth: cli.depth,
                total,
                moves,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            for entry in &moves {
                println!("{}: {}", entry.mv, entry.nodes);
            }
            println!("\nMoves: {}", moves.len());
            println!("Nodes: {total}");
        }
        return Ok(true);
    }

    let case = Case {
        name: "position".to_string(),
        sfen,
        depth: cli.depth,
        expected: None,
    };
    let result = case.run()?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Perft({}) = {} nodes", result.depth, result.nodes);
        println!("Time: {} ms", result.elapsed_ms);
        println!("NPS: {}", result.nps);
    }
    Ok(true)
}

fn main() -> Result<ExitCode> {
    env_logger::init();

    let cli = Cli::parse();
    let passed = if cli.suite.is_some() {
        run_suite(&cli)?
    } else {
        run_single(&cli)?
    };

    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
