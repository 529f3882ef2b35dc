//! # Stage: Expert Routing
//!
//! ## Responsibility
//! Score input units for complexity and dispatch each one to exactly one
//! labeled expert. Two routing policies coexist: discrete feature buckets
//! (per-token / per-tile variants) and score thresholds (switched variant).
//!
//! ## Guarantees
//! - Deterministic: the same unit always produces the same score and the
//!   same expert index — no hidden state beyond explicit parameters.
//! - Bounded: every routed index is in `[0, num_experts)`; one-hot weight
//!   winners resolve arg-max ties toward the lowest index.
//! - Validating: malformed units are rejected with `InvalidInputError`
//!   before any feature extraction.
//!
//! ## NOT Responsible For
//! - Segmenting composite inputs (that belongs to `pipeline`)
//! - Recording metrics (the pipelines own their aggregator)
//! - Any learned gating — scores are heuristics, experts are labels

pub mod config;
pub mod features;
pub mod router;
pub mod scorer;

// Re-exports for convenience
pub use config::{load_from_file, load_from_str, RouterConfig};
pub use features::{RegionFeatures, TokenFeatures};
pub use router::{BucketRouter, ThresholdRouter};
pub use scorer::{ImageComplexityScorer, TextComplexityScorer, TextScoreBreakdown};
