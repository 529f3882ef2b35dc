//! Per-unit feature extraction.
//!
//! Features are derived numeric attributes of a single unit — a token or an
//! image region — computed fresh on every call and never cached. They feed
//! both the complexity scorers and the bucket router.

use std::collections::BTreeSet;

use crate::grid::Region;
use crate::InvalidInputError;

/// Features of one text token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenFeatures {
    /// Token length in characters.
    pub length: usize,
    /// Unique lowercased characters divided by length, in `(0, 1]`.
    pub unique_ratio: f64,
}

impl TokenFeatures {
    /// Extract features from a token.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError::EmptyInput`] for an empty token — the
    /// tokenizer never emits one, so an empty token here is a caller bug
    /// surfaced early rather than a zero score.
    pub fn extract(token: &str) -> Result<Self, InvalidInputError> {
        if token.is_empty() {
            return Err(InvalidInputError::EmptyInput);
        }
        let length = token.chars().count();
        let unique: BTreeSet<char> = token.chars().flat_map(char::to_lowercase).collect();
        Ok(Self {
            length,
            unique_ratio: unique.len() as f64 / length as f64,
        })
    }
}

/// Features of one image region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionFeatures {
    /// Mean intensity.
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
    /// Minimum intensity.
    pub min: f64,
    /// Maximum intensity.
    pub max: f64,
    /// Mean absolute first difference along rows; `0.0` if the region has
    /// no horizontally adjacent pair.
    pub edge_strength: f64,
}

impl RegionFeatures {
    /// Extract features from an image region.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError::EmptyRegion`] for a zero-size region.
    pub fn extract(region: &Region<'_>) -> Result<Self, InvalidInputError> {
        if region.is_empty() {
            return Err(InvalidInputError::EmptyRegion);
        }

        let n = region.len() as f64;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in region.values() {
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }
        let mean = sum / n;

        let var: f64 = region.values().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Ok(Self {
            mean,
            std: var.sqrt(),
            min,
            max,
            edge_strength: row_edge_strength(region),
        })
    }
}

/// Mean absolute difference between horizontally adjacent values, taken per
/// row and averaged over all pairs. Matches discrete first-order differences
/// along the last axis of a 2-D array; `0.0` when the region is one column
/// wide and no pair exists.
pub(crate) fn row_edge_strength(region: &Region<'_>) -> f64 {
    let mut sum = 0.0;
    let mut pairs = 0usize;
    for r in 0..region.height() {
        let mut prev: Option<f64> = None;
        for v in region.row_values(r) {
            if let Some(p) = prev {
                sum += (v - p).abs();
                pairs += 1;
            }
            prev = Some(v);
        }
    }
    if pairs == 0 {
        0.0
    } else {
        sum / pairs as f64
    }
}

/// Population variance of a region. `0.0` for a single cell.
pub(crate) fn variance(region: &Region<'_>) -> f64 {
    let n = region.len() as f64;
    let mean = region.values().sum::<f64>() / n;
    region.values().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

/// Mean absolute deviation from the region mean.
pub(crate) fn mean_abs_deviation(region: &Region<'_>) -> f64 {
    let n = region.len() as f64;
    let mean = region.values().sum::<f64>() / n;
    region.values().map(|v| (v - mean).abs()).sum::<f64>() / n
}
