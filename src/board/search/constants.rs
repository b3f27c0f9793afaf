//! Search constants.
//!
//! Contains the score bounds and move ordering priorities used by the
//! alpha-beta search.

use crate::board::MAX_PLY;

// ============================================================================
// SCORES
// ============================================================================

/// Score of delivering mate at the root; a mate found `n` plies deep scores `MATE_SCORE - n`
pub const MATE_SCORE: i32 = 32000;

/// Scores with absolute value >= this are considered checkmate scores
pub const MATE_THRESHOLD: i32 = MATE_SCORE - MAX_PLY as i32;

/// Bound wider than any reachable score
pub const INFINITY: i32 = MATE_SCORE + 1;

pub const DRAW_SCORE: i32 = 0;

// ============================================================================
// MOVE ORDERING PRIORITIES
// ============================================================================
// Higher scores = tried earlier. Ordered: hash move > promotions > captures > killers > quiet

/// Hash move (from transposition table) - highest priority
pub const HASH_MOVE_SCORE: i32 = 10_000;

/// Promotions, added to the capture score for promotion captures
pub const PROMOTION_SCORE: i32 = 5_000;

/// Base score of a capture; the SEE result is added on top
pub const CAPTURE_SCORE: i32 = 100;

/// Killer move (quiet that caused a beta cutoff at the same ply)
pub const KILLER_SCORE: i32 = 80;

/// Killer slots kept per ply
pub const KILLER_SLOTS: usize = 2;

// ============================================================================
// LIMITS
// ============================================================================

/// Nodes between two budget checks
pub const CHECK_INTERVAL: u64 = 1024;
