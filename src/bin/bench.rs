//! Command line driver for quick measurements.
//!
//! ```text
//! bench search [depth] [fen]   iterative deepening search (default depth 6)
//! bench perft <depth> [fen]    leaf counts split by move kind
//! bench divide <depth> [fen]   per-root-move leaf counts
//! bench eval [fen]             static evaluation
//! ```
//!
//! Set `RUST_LOG=info` to see per-iteration search reports.

use std::env;
use std::process::ExitCode;
use std::time::Instant;

use chess_core::{Engine, EngineConfig, SearchConfig, STARTPOS_FEN};

const BENCH_POSITIONS: [&str; 4] = [
    STARTPOS_FEN,
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "r2qr1k1/p2n1p2/1pb3pp/2ppN1P1/1R1PpP2/BQP1n1PB/P4N1P/1R4K1 w - - 0 21",
    "7r/8/2k3P1/1p1p2Kp/1P6/2P5/7r/Q7 w - - 0 1",
];

fn usage() -> ExitCode {
    eprintln!("usage: bench <search|perft|divide|eval> [depth] [fen]");
    ExitCode::FAILURE
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        return Ok(usage());
    };
    let (depth, fen) = if command == "eval" {
        (None, (args.len() > 1).then(|| args[1..].join(" ")))
    } else {
        let depth = args.get(1).map(|d| d.parse::<u32>()).transpose()?;
        (depth, (args.len() > 2).then(|| args[2..].join(" ")))
    };

    let mut engine = Engine::initialize(EngineConfig::default())?;

    match command.as_str() {
        "search" => {
            let depth = depth.unwrap_or(6);
            let positions: Vec<&str> = match &fen {
                Some(fen) => vec![fen.as_str()],
                None => BENCH_POSITIONS.to_vec(),
            };
            let start = Instant::now();
            let mut total_nodes = 0;
            for fen in positions {
                engine.set_position(Some(fen))?;
                engine.clear_hash();
                let result = engine.find_best_move(&SearchConfig::depth(depth));
                total_nodes += result.stats.total_nodes();
                println!(
                    "{fen}\n  best {} score {} depth {} nodes {} ebf {:.2}",
                    result.best_move.map_or_else(|| "none".to_string(), |m| m.to_string()),
                    result.score,
                    result.depth,
                    result.stats.total_nodes(),
                    result.stats.branching_factor()
                );
            }
            let elapsed = start.elapsed();
            let nps = (total_nodes as f64 / elapsed.as_secs_f64().max(1e-9)) as u64;
            println!("{total_nodes} nodes in {elapsed:?} ({nps} nps)");
        }
        "perft" | "divide" => {
            let Some(depth) = depth else {
                return Ok(usage());
            };
            engine.set_position(fen.as_deref())?;
            if command == "divide" {
                let mut board = engine.board().clone();
                let mut total = 0;
                for (mv, leafs) in board.divide(depth) {
                    println!("{mv}: {leafs}");
                    total += leafs;
                }
                println!("total: {total}");
            } else {
                let start = Instant::now();
                let result = engine.run_perft(depth);
                println!("{result:#?}");
                println!("{:?}", start.elapsed());
            }
        }
        "eval" => {
            engine.set_position(fen.as_deref())?;
            println!("{} (white {})", engine.evaluate(), engine.evaluate_white());
        }
        _ => return Ok(usage()),
    }

    Ok(ExitCode::SUCCESS)
}
