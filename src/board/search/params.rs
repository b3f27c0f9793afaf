#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tunable pruning parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchParams {
    /// Null move is only tried with at least this much remaining depth
    pub null_min_depth: u32,
    pub null_reduction: u32,
    /// Non-pawn material the mover needs before a null move is trusted
    pub null_min_material: i32,
    /// Half-width of the aspiration window around the previous score; 0 searches full width
    pub aspiration_window: i32,
}

impl SearchParams {
    /// Parameters without null-move pruning or aspiration windows.
    #[must_use]
    pub fn full_width() -> Self {
        SearchParams {
            null_min_depth: u32::MAX,
            aspiration_window: 0,
            ..Self::default()
        }
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            null_min_depth: 3,
            null_reduction: 2,
            null_min_material: 1000,
            aspiration_window: 50,
        }
    }
}
