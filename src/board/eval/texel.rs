//! Texel-style evaluation error over labeled positions.
//!
//! An external tuner changes [`EvalParams`](super::EvalParams) genes and asks
//! for the mean squared error between the logistic of the static score and
//! the actual game results.

use std::sync::Arc;

use crate::board::{Board, FenError};
use crate::tables::Tables;

use super::evaluate_without_cache;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    WhiteWon,
    Draw,
    BlackWon,
}

impl GameResult {
    /// Expected score from White's point of view
    #[must_use]
    pub fn target(self) -> f64 {
        match self {
            GameResult::WhiteWon => 1.0,
            GameResult::Draw => 0.5,
            GameResult::BlackWon => 0.0,
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "1-0" => Some(GameResult::WhiteWon),
            "1/2-1/2" => Some(GameResult::Draw),
            "0-1" => Some(GameResult::BlackWon),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabeledPosition {
    pub fen: String,
    pub result: GameResult,
}

impl LabeledPosition {
    /// Parse an EPD line such as `<placement> w KQkq - c9 "1-0";`.
    ///
    /// The first four fields form the position; the result is the first
    /// quoted `1-0`, `0-1` or `1/2-1/2` anywhere after them.
    #[must_use]
    pub fn from_epd_line(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 5 {
            return None;
        }
        let result = fields[4..].iter().find_map(|field| {
            let tag = field.trim_end_matches(';').trim_matches('"');
            GameResult::from_tag(tag)
        })?;
        Some(LabeledPosition {
            fen: fields[..4].join(" "),
            result,
        })
    }
}

/// Logistic mapping of a centipawn score to an expected result.
#[must_use]
pub fn sigmoid(score: i32, scaling: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf(-scaling * f64::from(score) / 400.0))
}

/// Mean squared error of the White-perspective evaluation against the labels.
/// An empty set has zero error.
///
/// # Errors
/// Returns the [`FenError`] of the first position that fails to parse.
pub fn texel_error(
    positions: &[LabeledPosition],
    scaling: f64,
    tables: &Arc<Tables>,
) -> Result<f64, FenError> {
    if positions.is_empty() {
        return Ok(0.0);
    }
    let mut sum = 0.0;
    for position in positions {
        let board = Board::from_fen(&position.fen, Arc::clone(tables))?;
        let white_score = board.side_to_move().sign() * evaluate_without_cache(&board);
        let diff = position.result.target() - sigmoid(white_score, scaling);
        sum += diff * diff;
    }
    Ok(sum / positions.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::tables;

    #[test]
    fn parses_epd_results() {
        let pos = LabeledPosition::from_epd_line(
            r#"rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - c9 "1/2-1/2";"#,
        )
        .expect("labeled line");
        assert_eq!(pos.result, GameResult::Draw);
        assert_eq!(pos.fen, "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -");
        assert!(LabeledPosition::from_epd_line("8/8/8/8/8/8/8/K1k5 w - -").is_none());
        assert!(LabeledPosition::from_epd_line(r#"8/8/8/8/8/8/8/K1k5 w - - c9 "*";"#).is_none());
    }

    #[test]
    fn sigmoid_is_centered() {
        assert!((sigmoid(0, 1.0) - 0.5).abs() < 1e-12);
        assert!(sigmoid(400, 1.0) > 0.9);
        assert!(sigmoid(-400, 1.0) < 0.1);
    }

    #[test]
    fn balanced_draw_has_no_error() {
        let positions = vec![LabeledPosition {
            fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -".to_string(),
            result: GameResult::Draw,
        }];
        let err = texel_error(&positions, 1.0, &tables()).expect("valid positions");
        assert!(err.abs() < 1e-12);
    }

    #[test]
    fn winning_label_lowers_error() {
        let fen = "4k3/8/8/8/8/8/8/3QK3 w - -".to_string();
        let won = [LabeledPosition { fen: fen.clone(), result: GameResult::WhiteWon }];
        let lost = [LabeledPosition { fen, result: GameResult::BlackWon }];
        let t = tables();
        assert!(texel_error(&won, 1.0, &t).expect("ok") < texel_error(&lost, 1.0, &t).expect("ok"));
    }
}
