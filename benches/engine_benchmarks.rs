//! Benchmarks for chess engine performance.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chess_core::board::{evaluate_without_cache, search, SearchState};
use chess_core::{Board, SearchConfig, Tables, STARTPOS_FEN};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn board(tables: &Arc<Tables>, fen: &str) -> Board {
    Board::from_fen(fen, Arc::clone(tables)).expect("valid FEN")
}

fn bench_tables(c: &mut Criterion) {
    let mut group = c.benchmark_group("tables");
    group.sample_size(10);
    group.bench_function("build", |b| b.iter(|| Tables::shared_default().expect("tables")));
    group.finish();
}

fn bench_perft(c: &mut Criterion) {
    let tables = Tables::shared_default().expect("tables");
    let mut group = c.benchmark_group("perft");

    let mut startpos = board(&tables, STARTPOS_FEN);
    for depth in 1..=4 {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| startpos.perft_leaves(black_box(depth)))
        });
    }

    let mut kiwipete = board(&tables, KIWIPETE);
    for depth in 1..=3 {
        group.bench_with_input(BenchmarkId::new("kiwipete", depth), &depth, |b, &depth| {
            b.iter(|| kiwipete.perft_leaves(black_box(depth)))
        });
    }

    group.finish();
}

fn bench_movegen(c: &mut Criterion) {
    let tables = Tables::shared_default().expect("tables");
    let mut group = c.benchmark_group("movegen");

    let positions = [
        ("startpos", STARTPOS_FEN),
        ("middlegame", "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4"),
        ("kiwipete", KIWIPETE),
    ];
    for (name, fen) in positions {
        let mut b = board(&tables, fen);
        group.bench_function(BenchmarkId::new("legal", name), |bench| {
            bench.iter(|| black_box(b.generate_moves()))
        });
        group.bench_function(BenchmarkId::new("loud", name), |bench| {
            bench.iter(|| black_box(b.generate_legal_loud_moves()))
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let tables = Tables::shared_default().expect("tables");
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    let stop = AtomicBool::new(false);
    let positions = [
        ("startpos", STARTPOS_FEN, [3, 4, 5]),
        ("kiwipete", KIWIPETE, [3, 4, 5]),
    ];
    for (name, fen, depths) in positions {
        for depth in depths {
            group.bench_with_input(BenchmarkId::new(name, depth), &depth, |b, &depth| {
                b.iter(|| {
                    let mut board = board(&tables, fen);
                    let mut state = SearchState::new(16, 1024);
                    search(&mut board, &mut state, &SearchConfig::depth(depth), &stop)
                })
            });
        }
    }

    group.finish();
}

fn bench_eval(c: &mut Criterion) {
    let tables = Tables::shared_default().expect("tables");
    let mut group = c.benchmark_group("eval");

    let positions = [
        ("startpos", STARTPOS_FEN),
        ("middlegame", "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4"),
        ("endgame", "8/5k2/8/8/8/8/5K2/4R3 w - - 0 1"),
    ];
    for (name, fen) in positions {
        let b = board(&tables, fen);
        group.bench_with_input(BenchmarkId::new("position", name), &b, |bench, b| {
            bench.iter(|| black_box(evaluate_without_cache(b)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_tables,
    bench_perft,
    bench_movegen,
    bench_search,
    bench_eval
);
criterion_main!(benches);
