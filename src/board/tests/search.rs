//! Search tests: known tactics, budgets, and agreement with a plain minimax.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use super::{board, Snapshot};
use crate::board::search::{SearchContext, INFINITY};
use crate::board::{
    search, Board, Move, SearchConfig, SearchIterationInfo, SearchParams, SearchResult, SearchState, DRAW_SCORE,
    MATE_SCORE,
};

fn state() -> SearchState {
    SearchState::new(4, 256)
}

fn run(b: &mut Board, config: &SearchConfig) -> SearchResult {
    search(b, &mut state(), config, &AtomicBool::new(false))
}

/// Full-width minimax over the same leaves the pruning search uses.
fn minimax(ctx: &mut SearchContext<'_>, depth: u32, ply: usize) -> i32 {
    if ply > 0 && (ctx.board.is_threefold_repetition() || ctx.board.is_fifty_move_draw()) {
        return DRAW_SCORE;
    }
    if depth == 0 {
        return ctx.quiesce(-INFINITY, INFINITY, ply);
    }

    let moves = ctx.board.generate_moves();
    if moves.is_empty() {
        let us = ctx.board.side_to_move();
        return if ctx.board.is_in_check(us) { -MATE_SCORE + ply as i32 } else { DRAW_SCORE };
    }

    let mut best = -INFINITY;
    for mv in moves {
        ctx.board.make_move(mv);
        best = best.max(-minimax(ctx, depth - 1, ply + 1));
        ctx.board.undo_move(mv);
    }
    best
}

fn root_scores(b: &mut Board, depth: u32) -> Vec<(Move, i32)> {
    let mut state = state();
    let stop = AtomicBool::new(false);
    let mut ctx = SearchContext::new(b, &mut state, &stop);
    let moves = ctx.board.generate_moves();
    let mut scores = Vec::new();
    for mv in moves {
        ctx.board.make_move(mv);
        let score = -minimax(&mut ctx, depth - 1, 1);
        ctx.board.undo_move(mv);
        scores.push((mv, score));
    }
    scores
}

#[test]
fn pruning_search_matches_full_width_minimax() {
    let positions: &[(&str, u32)] = &[
        ("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1", 2),
        ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 3),
        ("r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5Q2/PPPP1PPP/RNB1K1NR w KQkq - 2 3", 3),
        ("4k3/8/8/3q4/8/2N5/8/4K2R w K - 0 1", 3),
        ("6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1", 3),
    ];

    for &(fen, depth) in positions {
        let mut b = board(fen);
        let reference = root_scores(&mut b, depth);
        let best = reference.iter().map(|&(_, s)| s).max().expect("moves");

        let mut searched = state().with_params(SearchParams::full_width());
        let result = search(&mut b, &mut searched, &SearchConfig::depth(depth), &AtomicBool::new(false));

        assert_eq!(result.score, best, "{fen}");
        let chosen = result.best_move.expect("a move");
        let chosen_score = reference.iter().find(|&&(mv, _)| mv == chosen).map(|&(_, s)| s);
        assert_eq!(chosen_score, Some(best), "{fen}: {chosen}");
    }
}

#[test]
fn finds_mate_in_one() {
    let mut b = board("6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1");
    let result = run(&mut b, &SearchConfig::depth(4));
    assert_eq!(result.best_move.map(|m| m.to_string()), Some("e1e8".to_string()));
    assert_eq!(result.score, MATE_SCORE - 1);
    assert_eq!(result.mate_in(), Some(1));
}

#[test]
fn finds_mate_in_two() {
    let mut b = board("kbK5/pp6/1P6/8/8/8/8/R7 w - - 0 1");
    let result = run(&mut b, &SearchConfig::depth(5));
    assert_eq!(result.best_move.map(|m| m.to_string()), Some("a1a6".to_string()));
    assert_eq!(result.score, MATE_SCORE - 3);
}

#[test]
fn wins_hanging_queen() {
    let mut b = board("4k3/8/8/3q4/8/2N5/8/4K3 w - - 0 1");
    let result = run(&mut b, &SearchConfig::depth(3));
    assert_eq!(result.best_move.map(|m| m.to_string()), Some("c3d5".to_string()));
    assert!(result.score > 0);
}

#[test]
fn search_restores_the_board() {
    let mut b = board("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    let before = Snapshot::of(&b);
    let result = run(&mut b, &SearchConfig::depth(4));
    assert_eq!(Snapshot::of(&b), before);
    assert_eq!(result.depth, 4);
    assert_eq!(result.stats.depth_reached, 4);
    assert!(result.stats.nodes > 0 && result.stats.q_nodes > 0);
    assert!(result.stats.branching_factor() > 1.0);
}

#[test]
fn principal_variation_is_playable() {
    let mut b = board("r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5Q2/PPPP1PPP/RNB1K1NR w KQkq - 2 3");
    let result = run(&mut b, &SearchConfig::depth(4));
    assert_eq!(result.pv.first().copied(), result.best_move);
    for &mv in &result.pv {
        assert!(b.is_move_legal(mv), "{mv}");
        b.make_move(mv);
    }
}

#[test]
fn single_reply_returns_immediately() {
    // the only legal move is the king stepping out of check
    let mut b = board("7k/8/8/8/8/8/6q1/7K w - - 0 1");
    assert_eq!(b.generate_moves().len(), 1);
    let result = run(&mut b, &SearchConfig::depth(10));
    assert_eq!(result.best_move.map(|m| m.to_string()), Some("h1g2".to_string()));
    assert_eq!(result.depth, 0);
    assert_eq!(result.stats.nodes, 0);
}

#[test]
fn terminal_positions_have_no_move() {
    let mut mated = board("4R1k1/5ppp/8/8/8/8/8/6K1 b - - 0 1");
    let result = run(&mut mated, &SearchConfig::depth(3));
    assert_eq!(result.best_move, None);
    assert_eq!(result.score, -MATE_SCORE);

    let mut stalemate = board("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    let result = run(&mut stalemate, &SearchConfig::depth(3));
    assert_eq!(result.best_move, None);
    assert_eq!(result.score, DRAW_SCORE);
}

#[test]
fn budgets_still_produce_a_legal_move() {
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

    let mut b = board(fen);
    let by_nodes = run(&mut b, &SearchConfig::depth(64).with_nodes(5_000));
    assert!(b.is_move_legal(by_nodes.best_move.expect("a move")));
    assert!(by_nodes.stats.total_nodes() < 5_000 + 1_024);

    let by_time = run(&mut b, &SearchConfig::time(50));
    assert!(b.is_move_legal(by_time.best_move.expect("a move")));
    assert!(by_time.stats.elapsed.as_millis() < 1_000);

    let stopped = search(&mut b, &mut state(), &SearchConfig::depth(64), &AtomicBool::new(true));
    assert!(b.is_move_legal(stopped.best_move.expect("a move")));
    assert!(stopped.depth <= 1);
    assert_eq!(b.to_fen(), board(fen).to_fen());
}

#[test]
fn info_callback_reports_every_iteration() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let config = SearchConfig::depth(3).with_info_callback(Arc::new(move |info: &SearchIterationInfo| {
        assert!(!info.pv.is_empty());
        seen.fetch_add(1, Ordering::SeqCst);
    }));
    let mut b = Board::startpos(super::tables());
    let result = run(&mut b, &config);
    assert_eq!(result.depth, 3);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}
