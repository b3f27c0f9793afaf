//! Static Exchange Evaluation (SEE).
//!
//! Exchanges are resolved from a table computed once at startup. The table
//! is keyed by the capturing piece type, the captured piece type and two
//! six-bit masks recording which piece *types* each side still has bearing
//! on the target square (bit `n` = [`Piece::from_index`]`(n)`).

use super::state::Board;
use super::{Move, Piece};

const MASKS: usize = 64;

/// Flat `[attacker][captured][attacker_mask][defender_mask]` table of exchange results.
#[derive(Clone)]
pub struct SeeTable {
    results: Vec<i32>,
}

impl std::fmt::Debug for SeeTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeeTable")
            .field("entries", &self.results.len())
            .finish()
    }
}

#[inline]
const fn slot(attacker: usize, captured: usize, attackers: usize, defenders: usize) -> usize {
    ((attacker * 6 + captured) * MASKS + attackers) * MASKS + defenders
}

impl SeeTable {
    /// Simulate every exchange with the given piece values.
    #[must_use]
    pub fn new(values: &[i32; 6]) -> Self {
        let mut results = vec![0; 6 * 6 * MASKS * MASKS];
        for attacker in 0..6 {
            for captured in 0..6 {
                for attacker_mask in 0..MASKS {
                    for defender_mask in 0..MASKS {
                        results[slot(attacker, captured, attacker_mask, defender_mask)] =
                            simulate(values, attacker, captured, attacker_mask, defender_mask);
                    }
                }
            }
        }
        SeeTable { results }
    }

    /// Net material gain for the side making the first capture.
    #[inline]
    #[must_use]
    pub fn evaluate(&self, attacker: Piece, captured: Piece, attackers: u8, defenders: u8) -> i32 {
        self.results[slot(
            attacker.index(),
            captured.index(),
            (attackers & 0x3F) as usize,
            (defenders & 0x3F) as usize,
        )]
    }
}

/// Alternate least-valuable recaptures, stopping when a side runs dry or
/// the running balance drops below the best balance seen so far.
fn simulate(values: &[i32; 6], attacker: usize, captured: usize, attackers: usize, defenders: usize) -> i32 {
    let mut attackers = attackers & !(1 << attacker);
    let mut defenders = defenders;
    let mut on_square = attacker;
    let mut result = values[captured];
    let mut last_result = result;

    while defenders != 0 {
        let defender = defenders.trailing_zeros() as usize;
        defenders &= defenders - 1;

        result -= values[on_square];
        on_square = defender;

        if attackers == 0 {
            last_result = result;
            break;
        }

        let next = attackers.trailing_zeros() as usize;
        attackers &= attackers - 1;
        result += values[on_square];
        on_square = next;

        if result < last_result {
            break;
        }
        last_result = result;
    }

    last_result
}

impl Board {
    /// Static exchange score of a capture from the mover's point of view.
    /// Non-captures score 0.
    #[must_use]
    pub fn see(&self, mv: Move) -> i32 {
        if !mv.is_capture() {
            return 0;
        }
        let Some(attacker) = self.piece_on(mv.from()) else {
            return 0;
        };
        let captured = if mv.is_en_passant() {
            Piece::Pawn
        } else {
            match self.piece_on(mv.to()) {
                Some(piece) => piece,
                None => return 0,
            }
        };

        let us = self.side_to_move();
        let attackers = self.attacking_piece_mask(us, mv.to());
        let defenders = self.attacking_piece_mask(us.opponent(), mv.to());
        self.tables
            .see()
            .evaluate(attacker, captured, attackers, defenders)
    }
}
