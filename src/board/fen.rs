use std::sync::Arc;

use crate::tables::Tables;

use super::error::{FenError, MoveParseError};
use super::{Bitboard, Board, CastlingRights, Color, Move, Piece, Square};

pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Board {
    /// Parse a position from FEN. The halfmove and fullmove fields are optional.
    ///
    /// Castling rights whose king or rook is not on its home square are dropped.
    ///
    /// # Errors
    /// Returns [`FenError`] describing the first malformed field.
    pub fn from_fen(fen: &str, tables: Arc<Tables>) -> Result<Self, FenError> {
        let mut board = Board::empty(tables);
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount { found: ranks.len() });
        }
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx;
            let mut file = 0usize;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as usize;
                    continue;
                }
                let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                let sq = Square::new(rank, file).ok_or(FenError::WrongFileCount {
                    rank: rank + 1,
                    files: file + 1,
                })?;
                if piece == Piece::Pawn && (rank == 0 || rank == 7) {
                    return Err(FenError::PawnOnBackRank { square: sq });
                }
                board.add_piece(color, piece, sq);
                file += 1;
            }
            if file != 8 {
                return Err(FenError::WrongFileCount {
                    rank: rank + 1,
                    files: file,
                });
            }
        }

        for (color, name) in [(Color::White, "white"), (Color::Black, "black")] {
            let kings = board.pieces(color, Piece::King).popcount();
            if kings != 1 {
                return Err(FenError::KingCount {
                    color: name,
                    found: kings,
                });
            }
        }

        board.side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        let mut castling = CastlingRights::none();
        if parts[2] != "-" {
            for c in parts[2].chars() {
                match c {
                    'K' => castling.set(Color::White, true),
                    'Q' => castling.set(Color::White, false),
                    'k' => castling.set(Color::Black, true),
                    'q' => castling.set(Color::Black, false),
                    _ => return Err(FenError::InvalidCastling { char: c }),
                }
            }
        }
        board.castling = board.sanitize_castling(castling);

        if parts[3] != "-" {
            let target: Square = parts[3].parse().map_err(|_| FenError::InvalidEnPassant {
                found: parts[3].to_string(),
            })?;
            let expected_rank = if board.side_to_move == Color::White { 5 } else { 2 };
            if target.rank() != expected_rank {
                return Err(FenError::InvalidEnPassant {
                    found: parts[3].to_string(),
                });
            }
            board.en_passant = Bitboard::from_square(target);
        }

        if let Some(field) = parts.get(4) {
            board.irreversible_moves = field.parse().map_err(|_| FenError::InvalidCounter {
                field: "halfmove",
                found: (*field).to_string(),
            })?;
        }
        if let Some(field) = parts.get(5) {
            board.fullmove_number = field.parse().map_err(|_| FenError::InvalidCounter {
                field: "fullmove",
                found: (*field).to_string(),
            })?;
        }

        board.hash = board.recompute_hash();
        Ok(board)
    }

    /// The standard starting position.
    #[must_use]
    pub fn startpos(tables: Arc<Tables>) -> Self {
        match Board::from_fen(STARTPOS_FEN, tables) {
            Ok(board) => board,
            Err(err) => unreachable!("start position FEN rejected: {err}"),
        }
    }

    fn sanitize_castling(&self, mut rights: CastlingRights) -> CastlingRights {
        for color in Color::BOTH {
            let home_rank = if color == Color::White { 0 } else { 7 };
            let king_home = Square::from_index(home_rank * 8 + 4);
            if self.piece_at(king_home) != Some((color, Piece::King)) {
                rights.remove_color(color);
                continue;
            }
            for (kingside, rook_file) in [(true, 7), (false, 0)] {
                let rook_home = Square::from_index(home_rank * 8 + rook_file);
                if self.piece_at(rook_home) != Some((color, Piece::Rook)) {
                    rights.remove(color, kingside);
                }
            }
        }
        rights
    }

    /// Serialize the position to FEN.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut rows: Vec<String> = Vec::with_capacity(8);
        for rank in (0..8).rev() {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..8 {
                let sq = Square::from_index(rank * 8 + file);
                if let Some((color, piece)) = self.piece_at(sq) {
                    if empty > 0 {
                        row.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row.push(piece.to_fen_char(color));
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }

        let active = if self.side_to_move == Color::White { "w" } else { "b" };
        let mut castling = String::new();
        for (color, kingside, c) in [
            (Color::White, true, 'K'),
            (Color::White, false, 'Q'),
            (Color::Black, true, 'k'),
            (Color::Black, false, 'q'),
        ] {
            if self.castling.has(color, kingside) {
                castling.push(c);
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }
        let ep = self
            .en_passant_square()
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{} {} {} {} {} {}",
            rows.join("/"),
            active,
            castling,
            ep,
            self.irreversible_moves,
            self.fullmove_number
        )
    }

    /// Parse a move in long algebraic notation ("e2e4", "e7e8q") and match it
    /// against the legal moves of the position.
    ///
    /// # Errors
    /// Returns [`MoveParseError`] for malformed text or a move that is not legal here.
    pub fn parse_move(&mut self, text: &str) -> Result<Move, MoveParseError> {
        if !(4..=5).contains(&text.len()) || !text.is_ascii() {
            return Err(MoveParseError::InvalidLength { len: text.len() });
        }

        let invalid_square = || MoveParseError::InvalidSquare {
            notation: text.to_string(),
        };
        let from: Square = text[0..2].parse().map_err(|_| invalid_square())?;
        let to: Square = text[2..4].parse().map_err(|_| invalid_square())?;

        let promotion = match text[4..].chars().next() {
            Some(c) => match Piece::from_char(c) {
                Some(piece @ (Piece::Knight | Piece::Bishop | Piece::Rook | Piece::Queen)) => {
                    Some(piece)
                }
                _ => return Err(MoveParseError::InvalidPromotion { char: c }),
            },
            None => None,
        };

        self.generate_moves()
            .iter()
            .copied()
            .find(|mv| mv.from() == from && mv.to() == to && mv.promotion() == promotion)
            .ok_or_else(|| MoveParseError::IllegalMove {
                notation: text.to_string(),
            })
    }

    /// Parse and play a game move in long algebraic notation.
    ///
    /// The move is committed with [`Board::commit_history`], so games of any
    /// length can be replayed.
    ///
    /// # Errors
    /// See [`Board::parse_move`].
    pub fn make_move_text(&mut self, text: &str) -> Result<Move, MoveParseError> {
        let mv = self.parse_move(text)?;
        self.make_move(mv);
        self.commit_history();
        Ok(mv)
    }
}
