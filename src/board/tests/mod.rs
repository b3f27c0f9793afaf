//! Board module tests.
//!
//! Tests are organized into separate files by category:
//! - `perft.rs` - Reference node counts for move generation
//! - `draw.rs` - Draw detection (50-move, repetition, insufficient material)
//! - `make_unmake.rs` - Make/unmake move correctness
//! - `edge_cases.rs` - Special positions and SEE exchanges
//! - `search.rs` - Search results and equivalence with plain minimax
//! - `proptest.rs` - Property-based tests

mod draw;
mod edge_cases;
mod search;

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::board::{Bitboard, Board, CastlingRights, Color, Piece};
use crate::tables::Tables;

static TABLES: Lazy<Arc<Tables>> =
    Lazy::new(|| Tables::shared_default().expect("default magics are found"));

/// Tables shared by every test; building magics once keeps the suite fast.
pub(crate) fn tables() -> Arc<Tables> {
    Arc::clone(&TABLES)
}

pub(crate) fn board(fen: &str) -> Board {
    Board::from_fen(fen, tables()).expect("valid FEN")
}

/// Everything observable about a position, for exact before/after comparisons.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Snapshot {
    fen: String,
    hash: u64,
    pawn_hash: u64,
    pieces: Vec<Bitboard>,
    occupancy: [Bitboard; 2],
    all_occupied: Bitboard,
    castling: CastlingRights,
    material: [i32; 2],
    position: [[i32; 2]; 2],
    history_len: usize,
}

impl Snapshot {
    pub(crate) fn of(board: &Board) -> Self {
        let mut pieces = Vec::with_capacity(12);
        for color in Color::BOTH {
            for piece in Piece::ALL {
                pieces.push(board.pieces(color, piece));
            }
        }
        Snapshot {
            fen: board.to_fen(),
            hash: board.hash(),
            pawn_hash: board.pawn_hash(),
            pieces,
            occupancy: [board.occupancy(Color::White), board.occupancy(Color::Black)],
            all_occupied: board.all_occupied(),
            castling: board.castling_rights(),
            material: [board.material(Color::White), board.material(Color::Black)],
            position: [board.position_score(Color::White), board.position_score(Color::Black)],
            history_len: board.history_len(),
        }
    }
}
