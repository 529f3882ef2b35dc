//! # Stage: Processing Pipelines
//!
//! ## Responsibility
//! Segment composite inputs into units (tokens / tiles / whole input),
//! route every unit through the shared scoring and routing engine, and
//! assemble the ordered decision sequence. Each pipeline owns its
//! [`MetricsAggregator`](crate::MetricsAggregator) and reports one score and
//! one assignment per unit plus one timing sample per `process` call.
//!
//! ## Guarantees
//! - Output order equals input traversal order: left-to-right for tokens,
//!   row-major for tiles.
//! - `process` is pure apart from the metrics side channel — two calls on
//!   identical input yield identical decision sequences.
//! - Metrics recorded before a mid-call failure are kept; processing is not
//!   transactional across units.
//!
//! ## NOT Responsible For
//! - Rendering decisions (the `Display` impls are plain presentation)
//! - Dashboard refresh cadence (the `tui` module owns that)
//! - Cross-pipeline state — aggregators are never shared between variants

pub mod image;
pub mod switched;
pub mod text;

// Re-exports for convenience
pub use image::{ImageMoe, TileDecision, TILE_EDGE};
pub use switched::{SwitchedDecision, SwitchedMoe};
pub use text::{TextMoe, TokenDecision};
