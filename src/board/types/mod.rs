//! Core chess types.
//!
//! - `Piece` and `Color` - chess piece types and colors
//! - `Square` - compact board square index (u8)
//! - `Bitboard` - 64-bit board representation
//! - `Move` and `MoveList` - move representation
//! - `CastlingRights` - castling state

mod bitboard;
mod castling;
mod moves;
mod piece;
mod square;

pub use bitboard::{Bitboard, BitboardIter};
pub use castling::CastlingRights;
pub(crate) use moves::ScoredMoveList;
pub use moves::{Move, MoveKind, MoveList, MoveListIntoIter, MAX_PLY};
pub use piece::{Color, Piece};
pub use square::Square;

pub(crate) use moves::EMPTY_MOVE;
pub(crate) use piece::PROMOTION_PIECES;
