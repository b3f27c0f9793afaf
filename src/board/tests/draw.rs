//! Draw detection tests.

use super::{board, tables};
use crate::board::{Board, MAX_HISTORY, REPETITION_WINDOW};

fn play(board: &mut Board, moves: &[&str]) {
    for text in moves {
        board.make_move_text(text).expect("legal move");
    }
}

const SHUFFLE: [&str; 4] = ["g1f3", "g8f6", "f3g1", "f6g8"];

#[test]
fn test_fen_halfmove_parsing() {
    let b = board("8/8/8/8/8/8/8/K1k5 w - - 57 1");
    assert_eq!(b.halfmove_clock(), 57);
}

#[test]
fn test_fifty_move_rule_draw() {
    let b = board("8/8/8/8/8/8/8/K1k5 w - - 100 1");
    assert!(b.is_fifty_move_draw());
    assert!(!board("8/8/8/8/8/8/8/K1k5 w - - 99 1").is_fifty_move_draw());
}

#[test]
fn test_fifty_move_rule_reached_by_play() {
    let mut b = board("4k3/8/8/8/8/8/8/4K2R w - - 98 60");
    play(&mut b, &["h1h2"]);
    assert!(!b.is_fifty_move_draw());
    play(&mut b, &["e8d8"]);
    assert!(b.is_fifty_move_draw());
}

#[test]
fn test_halfmove_resets_on_pawn_move() {
    let mut b = board("8/8/8/8/8/8/4P3/K1k5 w - - 99 1");
    play(&mut b, &["e2e4"]);
    assert_eq!(b.halfmove_clock(), 0);
    assert!(!b.is_fifty_move_draw());
}

#[test]
fn test_threefold_repetition() {
    let mut b = Board::startpos(tables());
    play(&mut b, &SHUFFLE);
    assert!(!b.is_threefold_repetition());
    play(&mut b, &SHUFFLE);
    assert!(b.is_threefold_repetition());

    // one more ply breaks the pattern
    play(&mut b, &["e2e4"]);
    assert!(!b.is_threefold_repetition());
}

#[test]
fn test_game_longer_than_undo_stack() {
    let mut b = Board::startpos(tables());
    let game: Vec<&str> = SHUFFLE.iter().cycle().take(2 * MAX_HISTORY + 4).copied().collect();
    play(&mut b, &game);
    assert_eq!(b.history_len(), REPETITION_WINDOW);
    assert!(b.is_threefold_repetition());
    assert_eq!(b.hash(), b.recompute_hash());

    // the newest committed ply can still be taken back
    let last = b.parse_move("g1f3").expect("legal");
    b.make_move(last);
    b.undo_move(last);
    assert!(b.is_threefold_repetition());
}

#[test]
fn test_repetition_at_other_strides_goes_unnoticed() {
    // six-ply cycle: the start position occurs at plies 0, 6 and 12
    let fen = "4k3/8/8/8/8/8/8/R3K3 w - - 0 1";
    let cycle = ["a1a2", "e8d8", "a2a3", "d8d7", "a3a1", "d7e8"];
    let mut b = board(fen);
    play(&mut b, &cycle);
    play(&mut b, &cycle);
    assert_eq!(b.hash(), board(fen).hash());
    assert!(!b.is_threefold_repetition());
}

#[test]
fn test_no_draw_claims_during_null_move() {
    let mut b = Board::startpos(tables());
    play(&mut b, &SHUFFLE);
    play(&mut b, &SHUFFLE);
    assert!(b.is_threefold_repetition());
    b.make_null_move();
    b.make_null_move();
    assert!(!b.is_threefold_repetition());
    b.undo_null_move();
    b.undo_null_move();

    let mut fifty = board("8/8/8/8/8/8/8/K1k5 w - - 100 1");
    fifty.make_null_move();
    assert!(!fifty.is_fifty_move_draw());
    fifty.undo_null_move();
    assert!(fifty.is_fifty_move_draw());
}

#[test]
fn test_insufficient_material() {
    assert!(board("8/8/8/8/8/8/6N1/K1k5 w - - 0 1").is_insufficient_material());
    assert!(board("8/8/8/8/8/8/8/K1k5 w - - 0 1").is_insufficient_material());
    assert!(!board("8/8/8/8/8/8/6R1/K1k5 w - - 0 1").is_insufficient_material());
    assert!(!board("8/8/8/8/8/8/5NN1/K1k5 w - - 0 1").is_insufficient_material());
}
