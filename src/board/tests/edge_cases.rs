//! Edge case tests for special chess positions, moves and exchanges.

use super::board;
use crate::board::{Color, Piece, Square};

#[test]
fn test_stalemate_position() {
    let mut b = board("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    assert!(!b.is_checkmate());
    assert!(b.is_stalemate());
    assert!(b.generate_moves().is_empty());
}

#[test]
fn test_back_rank_mate() {
    let mut b = board("4R1k1/5ppp/8/8/8/8/8/6K1 b - - 0 1");
    assert!(b.is_checkmate());
    assert!(!b.is_stalemate());
}

#[test]
fn test_all_underpromotions_available() {
    let mut b = board("8/P7/8/8/8/8/8/K1k5 w - - 0 1");
    let moves = b.generate_moves();
    for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
        assert!(
            moves.iter().any(|m| m.promotion() == Some(piece)),
            "{piece:?} promotion should be available"
        );
    }
    let knight = b.parse_move("a7a8n").expect("legal");
    b.make_move(knight);
    assert_eq!(b.piece_on(Square::A8), Some(Piece::Knight));
}

#[test]
fn test_double_check_allows_only_king_moves() {
    // knight on f6 and rook on e1 both give check
    let mut b = board("4k3/8/5N2/8/8/8/8/4RK2 b - - 0 1");
    let moves = b.generate_moves();
    assert!(!moves.is_empty());
    assert!(moves.iter().all(|m| b.piece_on(m.from()) == Some(Piece::King)));
}

#[test]
fn test_en_passant_pin_along_rank() {
    // capturing en passant would expose the white king to the rook on h5
    let mut b = board("8/8/8/K2pP2r/8/8/8/7k w - d6 0 1");
    assert!(b.generate_moves().iter().all(|m| !m.is_en_passant()));
}

#[test]
fn test_see_undefended_capture_wins_the_pawn() {
    let mut b = board("1k1r4/1pp4p/p7/4p3/8/P5P1/1PP4P/2K1R3 w - - 0 1");
    let mv = b.parse_move("e1e5").expect("legal");
    assert_eq!(b.see(mv), 100);
}

#[test]
fn test_see_defended_pawn_loses_the_knight() {
    let mut b = board("1k1r3q/1ppn3p/p4b2/4p3/8/P2N2P1/1PP1R1BP/2K1Q3 w - - 0 1");
    let mv = b.parse_move("d3e5").expect("legal");
    assert!(b.see(mv) < 0);
}

#[test]
fn test_see_even_pawn_trade() {
    let mut b = board("4k3/8/2p5/3p4/4P3/8/8/4K3 w - - 0 1");
    let mv = b.parse_move("e4d5").expect("legal");
    assert_eq!(b.see(mv), 0);
    let quiet = b.parse_move("e1d2").expect("legal");
    assert_eq!(b.see(quiet), 0);
}

#[test]
fn test_see_queen_takes_pawn_defended_by_rook() {
    let mut b = board("3rk3/3p4/8/8/8/8/8/3QK3 w - - 0 1");
    let mv = b.parse_move("d1d7").expect("legal");
    // wins a pawn, loses the queen to the rook or king
    assert!(b.see(mv) < -500);
}

#[test]
fn test_attackers_mask_sees_both_colors() {
    let b = board("4k3/8/2n5/3p4/8/4N3/6B1/3RK3 w - - 0 1");
    let d5 = Square::from_index(35);
    let e5 = Square::from_index(36);
    // knight, bishop and rook
    assert_eq!(b.attacking_piece_mask(Color::White, d5).count_ones(), 3);
    assert_eq!(b.attacking_piece_mask(Color::Black, d5), 0);
    assert_ne!(b.attacking_piece_mask(Color::Black, e5), 0);
    assert!(b.is_field_attacked(Color::White, d5));
    assert!(!b.is_field_attacked(Color::Black, d5));
}
