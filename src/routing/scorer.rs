//! Input complexity scoring.
//!
//! Two independent formula families, selected by unit kind. Scores are
//! non-negative, monotonic in input irregularity, and **not** normalised to
//! `[0, 1]` — callers must not assume a bound.
//!
//! ## Text
//!
//! | Level | Formula |
//! |-------|---------|
//! | token | `0.7·(len/10) + 0.3·(unique_lower/len)`, `0.0` for empty |
//! | whole input | `len/100·0.3 + unique_ratio·0.3 + special_frac·0.2 + avg_word_len/10·0.2`, clamped to `0.1` for trivially simple inputs |
//!
//! ## Image
//!
//! | Level | Formula |
//! |-------|---------|
//! | region | `0.4·std + 0.6·edge_strength` |
//! | whole grid | `0.4·variance + 0.4·edge_strength + 0.2·mean_abs_dev` |
//!
//! `edge_strength` is the mean absolute first difference along rows.

use std::collections::BTreeSet;

use crate::grid::{Grid, Region};
use crate::routing::features::{mean_abs_deviation, row_edge_strength, RegionFeatures};
use crate::InvalidInputError;

/// Raw score below which a whole text input is considered trivially simple.
const SIMPLE_TEXT_FLOOR: f64 = 0.2;

/// Score assigned to trivially simple whole text inputs, forcing them to the
/// simple-patterns expert.
const SIMPLE_TEXT_SCORE: f64 = 0.1;

/// Text complexity scorer.
///
/// Stateless and cheap to construct. All analysis is O(n) over the input.
///
/// # Panics
///
/// This type and its methods never panic.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextComplexityScorer;

impl TextComplexityScorer {
    /// Create a new text scorer.
    pub fn new() -> Self {
        Self
    }

    /// Score a single token.
    ///
    /// Returns `0.0` for an empty token; otherwise weights token length
    /// (0.7, against a 10-character yardstick) and unique-character ratio
    /// (0.3). Deterministic and unbounded above.
    pub fn score_token(&self, token: &str) -> f64 {
        if token.is_empty() {
            return 0.0;
        }
        let length = token.chars().count() as f64;
        let unique: BTreeSet<char> = token.chars().flat_map(char::to_lowercase).collect();
        (length / 10.0) * 0.7 + (unique.len() as f64 / length) * 0.3
    }

    /// Score a whole text input (used by the switched variant).
    ///
    /// Weighted sum of length, character variety, special-character density,
    /// and mean word length. Inputs of length ≤ 1 or with a raw sum below
    /// 0.2 score a fixed 0.1 so they route to the simple-patterns expert;
    /// the empty string scores `0.0`.
    pub fn score_text(&self, text: &str) -> f64 {
        self.breakdown(text).total
    }

    /// Break a whole-input score into its signal contributions.
    ///
    /// Useful for logging and transparency into routing decisions.
    pub fn breakdown(&self, text: &str) -> TextScoreBreakdown {
        let length = text.chars().count();
        if length == 0 {
            return TextScoreBreakdown::default();
        }

        let unique: BTreeSet<char> = text.chars().flat_map(char::to_lowercase).collect();
        let unique_ratio = unique.len() as f64 / length as f64;

        let special = text
            .chars()
            .filter(|c| !c.is_alphanumeric() && !c.is_whitespace())
            .count() as f64
            / length as f64;

        let words: Vec<&str> = text.split_whitespace().collect();
        let avg_word_length = if words.is_empty() {
            0.0
        } else {
            words.iter().map(|w| w.chars().count()).sum::<usize>() as f64 / words.len() as f64
        };

        let len_signal = length as f64 / 100.0 * 0.3;
        let variety_signal = unique_ratio * 0.3;
        let special_signal = special * 0.2;
        let word_len_signal = avg_word_length / 10.0 * 0.2;

        let raw = len_signal + variety_signal + special_signal + word_len_signal;
        let total = if length <= 1 || raw < SIMPLE_TEXT_FLOOR {
            SIMPLE_TEXT_SCORE
        } else {
            raw
        };

        TextScoreBreakdown {
            length: len_signal,
            char_variety: variety_signal,
            special_chars: special_signal,
            avg_word_length: word_len_signal,
            raw,
            total,
        }
    }
}

/// Per-signal contributions to a whole-input text score.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextScoreBreakdown {
    /// Length signal (`len/100 · 0.3`).
    pub length: f64,
    /// Character variety signal (`unique_ratio · 0.3`).
    pub char_variety: f64,
    /// Special character signal (`special_frac · 0.2`).
    pub special_chars: f64,
    /// Mean word length signal (`avg_word_len/10 · 0.2`).
    pub avg_word_length: f64,
    /// Raw weighted sum before the simple-input override.
    pub raw: f64,
    /// Final score after the simple-input override.
    pub total: f64,
}

/// Image complexity scorer.
///
/// Stateless. Region-level and whole-grid scores are distinct formulas and
/// are not interchangeable.
///
/// # Panics
///
/// This type and its methods never panic.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageComplexityScorer;

impl ImageComplexityScorer {
    /// Create a new image scorer.
    pub fn new() -> Self {
        Self
    }

    /// Score one image region: `0.4·std + 0.6·edge_strength`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError::EmptyRegion`] for a zero-size region.
    pub fn score_region(&self, region: &Region<'_>) -> Result<f64, InvalidInputError> {
        let f = RegionFeatures::extract(region)?;
        Ok(self.score_region_features(&f))
    }

    /// Score already-extracted region features without re-reading the region.
    pub fn score_region_features(&self, features: &RegionFeatures) -> f64 {
        features.std * 0.4 + features.edge_strength * 0.6
    }

    /// Score a whole grid (used by the switched variant):
    /// `0.4·variance + 0.4·edge_strength + 0.2·mean_abs_dev`.
    ///
    /// A [`Grid`] is non-empty by construction, so this is total.
    pub fn score_image(&self, grid: &Grid) -> f64 {
        let region = grid.full_region();
        crate::routing::features::variance(&region) * 0.4
            + row_edge_strength(&region) * 0.4
            + mean_abs_deviation(&region) * 0.2
    }
}
