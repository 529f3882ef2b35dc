//! Expert dispatch policies.
//!
//! Two policies coexist and are deliberately distinct:
//!
//! - [`BucketRouter`] — classifies on raw unit features through fixed,
//!   non-overlapping buckets and returns one-hot weight vectors; used by the
//!   per-token and per-tile variants.
//! - [`ThresholdRouter`] — partitions a continuous whole-input score at
//!   fixed fractions (0.33 / 0.66) of a configured threshold; used by the
//!   switched variant.
//!
//! Both reject malformed units before any feature extraction, and both only
//! ever produce indices in `[0, num_experts)`.

use crate::grid::Region;
use crate::routing::features::{RegionFeatures, TokenFeatures};
use crate::{InvalidInputError, MoeError};

/// Number of experts the threshold partition routes across. The partition
/// is inherently ternary: below 0.33·T, between, and above 0.66·T.
pub const THRESHOLD_EXPERTS: usize = 3;

/// Minimum expert count for the token bucket rules (buckets 0..=2).
pub const TOKEN_BUCKETS: usize = 3;

/// Minimum expert count for the region bucket rules (buckets 0..=3).
pub const REGION_BUCKETS: usize = 4;

/// Index of the highest-weight entry, ties broken toward the lowest index.
pub(crate) fn argmax(weights: &[f64]) -> usize {
    let mut best = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (i, &w) in weights.iter().enumerate() {
        if w > best_value {
            best = i;
            best_value = w;
        }
    }
    best
}

/// Direct feature-bucket router.
///
/// Classifies units on raw features rather than a continuous score:
///
/// | Unit | Rule | Expert |
/// |------|------|--------|
/// | token | `len ≤ 3` | 0 |
/// | token | `len ≤ 6` | 1 |
/// | token | else | 2 |
/// | region | `std < 0.1`, `mean < 0.5` | 0 (dark uniform) |
/// | region | `std < 0.1`, `mean ≥ 0.5` | 1 (bright uniform) |
/// | region | `std < 0.3` | 2 (edges) |
/// | region | else | 3 (texture) |
///
/// Weight vectors are one-hot over `num_experts`; the winner is taken by
/// arg-max with ties broken toward the lowest index. Construct via
/// [`for_tokens`](Self::for_tokens) or [`for_regions`](Self::for_regions) so
/// the expert count is validated against the bucket range the instance will
/// be asked to cover.
///
/// # Panics
///
/// This type and its methods never panic.
#[derive(Debug, Clone)]
pub struct BucketRouter {
    num_experts: usize,
}

impl BucketRouter {
    /// Create a router for token units.
    ///
    /// # Errors
    ///
    /// Returns [`MoeError::Config`] if `num_experts` is below
    /// [`TOKEN_BUCKETS`] — the length buckets produce indices up to 2.
    pub fn for_tokens(num_experts: usize) -> Result<Self, MoeError> {
        if num_experts < TOKEN_BUCKETS {
            return Err(MoeError::Config(format!(
                "token routing needs at least {TOKEN_BUCKETS} experts, got {num_experts}"
            )));
        }
        Ok(Self { num_experts })
    }

    /// Create a router for image region units.
    ///
    /// # Errors
    ///
    /// Returns [`MoeError::Config`] if `num_experts` is below
    /// [`REGION_BUCKETS`] — the intensity buckets produce indices up to 3.
    pub fn for_regions(num_experts: usize) -> Result<Self, MoeError> {
        if num_experts < REGION_BUCKETS {
            return Err(MoeError::Config(format!(
                "region routing needs at least {REGION_BUCKETS} experts, got {num_experts}"
            )));
        }
        Ok(Self { num_experts })
    }

    /// Number of experts this router dispatches across.
    pub fn num_experts(&self) -> usize {
        self.num_experts
    }

    /// One-hot weight vector for a token, by length bucket.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError::EmptyInput`] for an empty token, before
    /// any feature extraction.
    pub fn token_weights(&self, token: &str) -> Result<Vec<f64>, InvalidInputError> {
        let features = TokenFeatures::extract(token)?;
        Ok(self.weights_for_token_features(&features))
    }

    /// One-hot weight vector from already-extracted token features.
    pub fn weights_for_token_features(&self, features: &TokenFeatures) -> Vec<f64> {
        let mut weights = vec![0.0; self.num_experts];
        let bucket = match features.length {
            0..=3 => 0,
            4..=6 => 1,
            _ => 2,
        };
        weights[bucket] = 1.0;
        weights
    }

    /// Route a token to its expert index.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError::EmptyInput`] for an empty token.
    pub fn route_token(&self, token: &str) -> Result<usize, InvalidInputError> {
        let weights = self.token_weights(token)?;
        let expert = argmax(&weights);
        tracing::trace!(token, expert, "bucket route");
        Ok(expert)
    }

    /// One-hot weight vector for an image region, by intensity buckets.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError::EmptyRegion`] for a zero-size region,
    /// before any feature extraction.
    pub fn region_weights(&self, region: &Region<'_>) -> Result<Vec<f64>, InvalidInputError> {
        let features = RegionFeatures::extract(region)?;
        Ok(self.weights_for_region_features(&features))
    }

    /// One-hot weight vector from already-extracted region features.
    pub fn weights_for_region_features(&self, features: &RegionFeatures) -> Vec<f64> {
        let mut weights = vec![0.0; self.num_experts];
        let bucket = if features.std < 0.1 {
            usize::from(features.mean >= 0.5)
        } else if features.std < 0.3 {
            2
        } else {
            3
        };
        weights[bucket] = 1.0;
        weights
    }

    /// Route an image region to its expert index.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError::EmptyRegion`] for a zero-size region.
    pub fn route_region(&self, region: &Region<'_>) -> Result<usize, InvalidInputError> {
        let weights = self.region_weights(region)?;
        let expert = argmax(&weights);
        tracing::trace!(origin = ?region.origin(), expert, "bucket route");
        Ok(expert)
    }
}

/// Threshold-on-score router for the switched variant.
///
/// Given a whole-input complexity score `s` and the configured threshold
/// `T`:
///
/// | Condition | Expert |
/// |-----------|--------|
/// | `s < 0.33·T` | 0 |
/// | `0.33·T ≤ s < 0.66·T` | 1 |
/// | `s ≥ 0.66·T` | 2 |
///
/// Confidence is `1 − min(|s − 0.33·T|, |s − 0.66·T|) / T` — distance to the
/// nearer boundary, normalised — clamped to `[0, 1]`. The raw, unclamped
/// value is available via [`raw_confidence`](Self::raw_confidence) since it
/// goes negative when `T` is small relative to the score.
///
/// # Panics
///
/// This type and its methods never panic.
#[derive(Debug, Clone)]
pub struct ThresholdRouter {
    complexity_threshold: f64,
}

impl ThresholdRouter {
    /// Create a threshold router.
    ///
    /// # Errors
    ///
    /// Returns [`MoeError::Config`] unless `complexity_threshold` is finite
    /// and strictly positive — the confidence formula divides by it.
    pub fn new(complexity_threshold: f64) -> Result<Self, MoeError> {
        if !complexity_threshold.is_finite() || complexity_threshold <= 0.0 {
            return Err(MoeError::Config(format!(
                "complexity_threshold must be > 0, got {complexity_threshold}"
            )));
        }
        Ok(Self {
            complexity_threshold,
        })
    }

    /// The configured complexity threshold.
    pub fn threshold(&self) -> f64 {
        self.complexity_threshold
    }

    /// Route a complexity score to an expert index in `[0, 3)`.
    pub fn route_score(&self, score: f64) -> usize {
        let expert = if score < self.complexity_threshold * 0.33 {
            0
        } else if score < self.complexity_threshold * 0.66 {
            1
        } else {
            2
        };
        tracing::trace!(score, expert, "threshold route");
        expert
    }

    /// Confidence in a routing decision, clamped to `[0, 1]`.
    pub fn confidence(&self, score: f64) -> f64 {
        self.raw_confidence(score).clamp(0.0, 1.0)
    }

    /// The unclamped confidence formula. Negative when the score sits far
    /// outside the threshold band relative to `T`.
    pub fn raw_confidence(&self, score: f64) -> f64 {
        let low = (score - self.complexity_threshold * 0.33).abs();
        let high = (score - self.complexity_threshold * 0.66).abs();
        1.0 - low.min(high) / self.complexity_threshold
    }
}
