//! Per-tile image variant.
//!
//! Partitions a 2-D grid into a row-major raster of 8×8 tiles (smaller at
//! the boundary) and routes each tile independently on its intensity
//! features.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::grid::Grid;
use crate::metrics::{MetricsAggregator, ScoreCategory};
use crate::routing::features::RegionFeatures;
use crate::routing::router::{argmax, BucketRouter};
use crate::routing::scorer::ImageComplexityScorer;
use crate::{MoeError, MoePipeline, RoutingInfo};

/// Tile edge length. Boundary tiles may be smaller when the grid dimensions
/// are not multiples of this.
pub const TILE_EDGE: usize = 8;

/// Expert labels for the intensity buckets.
const EXPERT_LABELS: [&str; 4] = [
    "dark uniform specialist",
    "bright uniform specialist",
    "edge detection specialist",
    "texture analysis specialist",
];

/// Routing decision for one image tile.
#[derive(Debug, Clone, PartialEq)]
pub struct TileDecision {
    /// Top-left `(row, col)` offset of the tile within the grid.
    pub origin: (usize, usize),
    /// Chosen expert index.
    pub expert: usize,
    /// Weight of the chosen expert — always 1.0 for one-hot buckets.
    pub confidence: f64,
    /// Features the decision was made on.
    pub features: RegionFeatures,
    /// Descriptive label of the chosen expert.
    pub label: &'static str,
}

impl fmt::Display for TileDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Region {:?} → Expert {} ({}) [mean: {:.2}, std: {:.2}] [conf: {:.2}]",
            self.origin, self.expert, self.label, self.features.mean, self.features.std, self.confidence
        )
    }
}

/// Per-tile image MoE variant.
///
/// Owns its metrics aggregator; share the handle with a dashboard via
/// [`metrics`](Self::metrics).
///
/// # Panics
///
/// This type and its methods never panic.
#[derive(Debug)]
pub struct ImageMoe {
    router: BucketRouter,
    scorer: ImageComplexityScorer,
    metrics: Arc<MetricsAggregator>,
}

impl ImageMoe {
    /// Create an image variant routing across `num_experts` experts.
    ///
    /// # Errors
    ///
    /// Returns [`MoeError::Config`] if `num_experts` is below 4 — the
    /// intensity buckets produce indices up to 3.
    pub fn new(num_experts: usize) -> Result<Self, MoeError> {
        Ok(Self {
            router: BucketRouter::for_regions(num_experts)?,
            scorer: ImageComplexityScorer::new(),
            metrics: Arc::new(MetricsAggregator::new()),
        })
    }

    /// Create an image variant from a [`RouterConfig`](crate::RouterConfig).
    ///
    /// # Errors
    ///
    /// Returns [`MoeError::Config`] if `image_experts` is below 4.
    pub fn from_config(config: &crate::RouterConfig) -> Result<Self, MoeError> {
        Self::new(config.image_experts)
    }

    /// Handle to this pipeline's metrics aggregator.
    pub fn metrics(&self) -> Arc<MetricsAggregator> {
        Arc::clone(&self.metrics)
    }
}

impl MoePipeline<Grid> for ImageMoe {
    type Decision = TileDecision;

    /// Route the whole grid as a single region through the intensity
    /// buckets.
    fn route(&self, input: &Grid) -> Result<usize, MoeError> {
        Ok(self.router.route_region(&input.full_region())?)
    }

    fn process(&self, input: &Grid) -> Result<Vec<TileDecision>, MoeError> {
        let start = Instant::now();
        let mut decisions = Vec::new();

        // Grid construction already guarantees a rectangular, non-empty,
        // finite array, so per-tile extraction cannot fail here.
        for tile in input.tiles(TILE_EDGE) {
            let features = RegionFeatures::extract(&tile)?;
            let complexity = self.scorer.score_region_features(&features);
            self.metrics
                .record_score(ScoreCategory::ImageComplexity, complexity);

            let weights = self.router.weights_for_region_features(&features);
            let expert = argmax(&weights);
            self.metrics.record_assignment(expert);

            decisions.push(TileDecision {
                origin: tile.origin(),
                expert,
                confidence: weights[expert],
                features,
                label: EXPERT_LABELS.get(expert).copied().unwrap_or("specialist"),
            });
        }

        let elapsed = start.elapsed();
        self.metrics.record_timing(elapsed);
        tracing::debug!(
            tiles = decisions.len(),
            rows = input.rows(),
            cols = input.cols(),
            elapsed_us = elapsed.as_micros() as u64,
            "image process complete"
        );
        Ok(decisions)
    }

    fn routing_info(&self) -> RoutingInfo {
        RoutingInfo {
            num_experts: self.router.num_experts(),
            variant: "image",
            expert_labels: &EXPERT_LABELS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline() -> ImageMoe {
        ImageMoe::new(4).unwrap_or_else(|e| std::panic::panic_any(format!("pipeline: {e}")))
    }

    fn process(p: &ImageMoe, grid: &Grid) -> Vec<TileDecision> {
        p.process(grid)
            .unwrap_or_else(|e| std::panic::panic_any(format!("process: {e}")))
    }

    #[test]
    fn test_process_uniform_16x16_yields_four_bright_tiles() {
        let p = pipeline();
        let g = Grid::filled(16, 16, 0.5)
            .unwrap_or_else(|e| std::panic::panic_any(format!("grid: {e}")));
        let decisions = process(&p, &g);
        assert_eq!(decisions.len(), 4);
        for d in &decisions {
            assert_eq!(d.expert, 1, "mean 0.5, std 0 is bright uniform");
            assert!(d.features.std.abs() < 1e-12);
            assert!((d.features.mean - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_process_tile_order_is_row_major() {
        let p = pipeline();
        let g = Grid::filled(16, 24, 0.1)
            .unwrap_or_else(|e| std::panic::panic_any(format!("grid: {e}")));
        let origins: Vec<(usize, usize)> = process(&p, &g).iter().map(|d| d.origin).collect();
        assert_eq!(
            origins,
            vec![(0, 0), (0, 8), (0, 16), (8, 0), (8, 8), (8, 16)]
        );
    }

    #[test]
    fn test_process_handles_non_multiple_dimensions() {
        let p = pipeline();
        let g = Grid::filled(10, 12, 0.9)
            .unwrap_or_else(|e| std::panic::panic_any(format!("grid: {e}")));
        let decisions = process(&p, &g);
        assert_eq!(decisions.len(), 4);
        // All bright uniform regardless of tile size
        assert!(decisions.iter().all(|d| d.expert == 1));
    }

    #[test]
    fn test_process_mixed_grid_routes_per_tile() {
        let p = pipeline();
        // Left half dark uniform, right half checkerboard texture
        let g = Grid::from_fn(8, 16, |r, c| {
            if c < 8 {
                0.1
            } else {
                ((r + c) % 2) as f64
            }
        })
        .unwrap_or_else(|e| std::panic::panic_any(format!("grid: {e}")));
        let decisions = process(&p, &g);
        assert_eq!(decisions.len(), 2);
        assert_eq!(decisions[0].expert, 0, "dark uniform tile");
        assert_eq!(decisions[1].expert, 3, "textured tile");
    }

    #[test]
    fn test_process_records_metrics_per_tile_and_one_timing() {
        let p = pipeline();
        let g = Grid::filled(16, 16, 0.5)
            .unwrap_or_else(|e| std::panic::panic_any(format!("grid: {e}")));
        let n = process(&p, &g).len();
        let snap = p.metrics().snapshot();
        assert_eq!(snap.image_complexity.len(), n);
        assert_eq!(snap.total_assignments(), n as u64);
        assert_eq!(snap.processing_times.len(), 1);
    }

    #[test]
    fn test_process_is_idempotent_apart_from_metrics() {
        let a = pipeline();
        let b = pipeline();
        let g = Grid::from_fn(20, 20, |r, c| ((r * 7 + c * 3) % 10) as f64 / 10.0)
            .unwrap_or_else(|e| std::panic::panic_any(format!("grid: {e}")));
        assert_eq!(process(&a, &g), process(&b, &g));
    }

    #[test]
    fn test_route_classifies_whole_grid() {
        let p = pipeline();
        let g = Grid::filled(16, 16, 0.05)
            .unwrap_or_else(|e| std::panic::panic_any(format!("grid: {e}")));
        let expert = p
            .route(&g)
            .unwrap_or_else(|e| std::panic::panic_any(format!("route: {e}")));
        assert_eq!(expert, 0, "dark uniform grid");
    }

    #[test]
    fn test_routing_info_reports_variant_and_labels() {
        let info = pipeline().routing_info();
        assert_eq!(info.num_experts, 4);
        assert_eq!(info.variant, "image");
        assert_eq!(info.expert_labels.len(), 4);
    }

    #[test]
    fn test_decision_display_contains_origin_and_label() {
        let p = pipeline();
        let g = Grid::filled(8, 8, 0.9)
            .unwrap_or_else(|e| std::panic::panic_any(format!("grid: {e}")));
        let line = process(&p, &g)[0].to_string();
        assert!(line.contains("(0, 0)"));
        assert!(line.contains("bright uniform specialist"));
    }
}
