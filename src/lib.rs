//! # moe-router
//!
//! A demonstration of Mixture-of-Experts (MoE) style routing: inputs are
//! scored for complexity and dispatched to one of a fixed set of labeled
//! experts by simple rules, with decisions and timings aggregated into live
//! metrics.
//!
//! ## Architecture
//!
//! Three variants share one scoring/routing engine and one metrics sink:
//! ```text
//! input ──segment──▶ units ──score──▶ route ──▶ decisions
//!                      │                │
//!                      └────────────────┴──▶ MetricsAggregator ──▶ dashboard
//! ```
//!
//! - [`TextMoe`] routes each token through length buckets.
//! - [`ImageMoe`] tiles a 2-D grid into 8×8 regions and routes on
//!   mean/std buckets.
//! - [`SwitchedMoe`] scores the whole input once and routes on fractions of
//!   a configured complexity threshold.
//!
//! Experts here are labels, not models — the point is the routing machinery
//! and the bounded, thread-safe metrics behind the live dashboard.

// ── Lint policy ───────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(missing_docs)]

use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub mod grid;
pub mod metrics;
pub mod pipeline;
pub mod routing;
pub mod samples;

#[cfg(feature = "tui")]
pub mod tui;

// Re-exports for convenience
pub use grid::{Grid, Region};
pub use metrics::{MetricsAggregator, MetricsSnapshot, ScoreCategory};
pub use pipeline::{ImageMoe, SwitchedMoe, TextMoe};
pub use routing::{BucketRouter, RouterConfig, ThresholdRouter};

/// Initialise the global tracing subscriber.
///
/// Reads the `LOG_FORMAT` environment variable to choose output format:
/// - `"json"` — structured JSON output for log aggregators
/// - anything else (including unset) — human-readable pretty output
///
/// Filter level is controlled by `RUST_LOG` (e.g. `RUST_LOG=debug`).
///
/// # Errors
///
/// Returns [`MoeError::Config`] if the global subscriber has already been
/// set (e.g. by a previous call or a test harness).
///
/// # Panics
///
/// This function never panics.
pub fn init_tracing() -> Result<(), MoeError> {
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let result = match format.as_str() {
        "json" => tracing_subscriber::fmt()
            .json()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init(),
        _ => tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init(),
    };

    result.map_err(|e| MoeError::Config(format!("tracing init failed: {e}")))
}

/// A structurally invalid input unit.
///
/// Raised synchronously, never retried, and always propagated to the
/// immediate caller with no partial decision for the offending unit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInputError {
    /// The input string or grid was empty.
    #[error("input is empty")]
    EmptyInput,

    /// Tokenization of a text input produced zero routable tokens
    /// (e.g. punctuation-only input).
    #[error("no routable tokens after punctuation stripping")]
    NoTokens,

    /// A single-token entry point received input that normalises to more
    /// than one token.
    #[error("expected a single token, found {found}")]
    MultipleTokens {
        /// Number of tokens produced by normalisation.
        found: usize,
    },

    /// An image region with zero size was presented for feature extraction.
    #[error("image region has zero size")]
    EmptyRegion,

    /// A grid row has a different length than the first row — the input is
    /// not a rectangular 2-D array.
    #[error("grid row {row} has {found} values, expected {expected}")]
    RaggedRows {
        /// Zero-based index of the offending row.
        row: usize,
        /// Number of values found in that row.
        found: usize,
        /// Expected row width (width of row 0).
        expected: usize,
    },

    /// A grid value is NaN or infinite and cannot be scored.
    #[error("grid value at ({row}, {col}) is not finite")]
    NonFinite {
        /// Row of the offending value.
        row: usize,
        /// Column of the offending value.
        col: usize,
    },
}

/// Top-level errors for the MoE routing core.
///
/// Every error surface maps to a variant here. All variants implement
/// `std::error::Error` via [`thiserror`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MoeError {
    /// A structurally invalid unit was rejected before routing.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// A construction-time parameter is out of range (e.g. a zero
    /// complexity threshold or too few experts for the bucket rules).
    ///
    /// Returned at construction so misconfiguration surfaces immediately
    /// rather than at the first `process` call.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Static description of how a variant routes inputs.
///
/// The labels are fixed at construction and never mutated; experts perform
/// no computation in this system, they are routing targets only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingInfo {
    /// Number of experts the variant routes across.
    pub num_experts: usize,
    /// Human-readable variant name (e.g. `"text"`, `"image"`, `"switched"`).
    pub variant: &'static str,
    /// Descriptive labels for the experts the bucket/threshold rules can
    /// select. When `num_experts` exceeds the rule range, the surplus
    /// experts are valid targets but never chosen and carry no label.
    pub expert_labels: &'static [&'static str],
}

/// Shared contract for the three MoE variants.
///
/// `I` is the input type a variant accepts (`str` for text, [`Grid`] for
/// image; the switched variant implements the trait for both). Scoring and
/// routing are pure apart from the metrics side channel, so `process` takes
/// `&self` and two calls on identical input yield identical decisions.
pub trait MoePipeline<I: ?Sized> {
    /// Per-unit decision record produced by [`process`](Self::process).
    type Decision;

    /// Route the input to a single expert index in `[0, num_experts)`.
    ///
    /// # Errors
    ///
    /// Returns [`MoeError::InvalidInput`] for structurally invalid input.
    fn route(&self, input: &I) -> Result<usize, MoeError>;

    /// Segment the input into units, route each one, and return the ordered
    /// decision sequence. Output order equals input traversal order.
    ///
    /// Every scored unit and routing decision is reported to the owning
    /// [`MetricsAggregator`] exactly once, plus one timing sample for the
    /// whole call. Metrics recorded before a mid-call failure are kept —
    /// processing is not transactional across units.
    ///
    /// # Errors
    ///
    /// Returns [`MoeError::InvalidInput`] for empty input, empty token
    /// streams, or malformed grids.
    fn process(&self, input: &I) -> Result<Vec<Self::Decision>, MoeError>;

    /// Static routing description for this variant.
    fn routing_info(&self) -> RoutingInfo;
}
