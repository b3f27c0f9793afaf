//! Error types for chess board operations.

use thiserror::Error;

use super::{Piece, Square};

/// Error type for FEN parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    /// FEN string has too few parts (needs at least 4)
    #[error("FEN must have at least 4 parts, found {found}")]
    TooFewParts { found: usize },
    #[error("invalid piece character '{char}' in FEN")]
    InvalidPiece { char: char },
    #[error("invalid castling character '{char}' in FEN")]
    InvalidCastling { char: char },
    #[error("invalid side to move '{found}', expected 'w' or 'b'")]
    InvalidSideToMove { found: String },
    #[error("invalid en passant square '{found}'")]
    InvalidEnPassant { found: String },
    /// Piece placement does not describe exactly 8 ranks
    #[error("expected 8 ranks in piece placement, found {found}")]
    WrongRankCount { found: usize },
    #[error("rank {rank} describes {files} files")]
    WrongFileCount { rank: usize, files: usize },
    #[error("invalid {field} counter '{found}'")]
    InvalidCounter { field: &'static str, found: String },
    /// Each side needs exactly one king for move generation to be meaningful
    #[error("{color} must have exactly one king, found {found}")]
    KingCount { color: &'static str, found: u32 },
    #[error("pawn on back rank square {square}")]
    PawnOnBackRank { square: Square },
}

/// Error type for move parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveParseError {
    /// Move string has invalid length (must be 4-5 characters)
    #[error("move must be 4-5 characters, found {len}")]
    InvalidLength { len: usize },
    #[error("invalid square notation in '{notation}'")]
    InvalidSquare { notation: String },
    #[error("invalid promotion piece '{char}'")]
    InvalidPromotion { char: char },
    /// Move is not legal in the current position
    #[error("illegal move '{notation}'")]
    IllegalMove { notation: String },
}

/// Error type for square parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SquareError {
    #[error("rank {rank} out of bounds (must be 0-7)")]
    RankOutOfBounds { rank: usize },
    #[error("file {file} out of bounds (must be 0-7)")]
    FileOutOfBounds { file: usize },
    #[error("invalid square notation '{notation}'")]
    InvalidNotation { notation: String },
}

/// Error type for rejected magic constants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MagicError {
    /// A supplied constant maps two occupancies with different attacks to one slot
    #[error("magic constant for {piece:?} on square {square} produces a collision")]
    Collision { piece: Piece, square: usize },
    /// Supplied table does not hold one constant per square
    #[error("expected 64 {piece:?} magic constants, found {found}")]
    WrongLength { piece: Piece, found: usize },
    /// Random search gave up on a square
    #[error("no magic constant found for {piece:?} on square {square}")]
    SearchExhausted { piece: Piece, square: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fen_error_messages() {
        assert_eq!(
            FenError::TooFewParts { found: 2 }.to_string(),
            "FEN must have at least 4 parts, found 2"
        );
        assert_eq!(
            FenError::InvalidSideToMove {
                found: "x".to_string()
            }
            .to_string(),
            "invalid side to move 'x', expected 'w' or 'b'"
        );
    }

    #[test]
    fn move_parse_error_messages() {
        assert_eq!(
            MoveParseError::IllegalMove {
                notation: "e2e5".to_string()
            }
            .to_string(),
            "illegal move 'e2e5'"
        );
    }

    #[test]
    fn magic_error_names_square() {
        let err = MagicError::Collision {
            piece: Piece::Rook,
            square: 7,
        };
        assert!(err.to_string().contains("square 7"));
    }
}
