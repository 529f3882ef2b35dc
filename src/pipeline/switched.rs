//! Whole-input switched variant.
//!
//! No segmentation: the entire input — a text string or a grid — is one
//! unit, scored once and routed through fractions of a configured
//! complexity threshold. Accepts both input kinds by implementing
//! [`MoePipeline`] for `str` and for [`Grid`].

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::grid::Grid;
use crate::metrics::{MetricsAggregator, ScoreCategory};
use crate::routing::router::{ThresholdRouter, THRESHOLD_EXPERTS};
use crate::routing::scorer::{ImageComplexityScorer, TextComplexityScorer};
use crate::{MoeError, MoePipeline, RoutingInfo};

/// Expert labels for the threshold partition.
const EXPERT_LABELS: [&str; 3] = [
    "simple patterns specialist (basic structures)",
    "medium complexity specialist (common patterns)",
    "high complexity specialist (advanced patterns)",
];

/// Routing decision for one whole input.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchedDecision {
    /// Chosen expert index.
    pub expert: usize,
    /// Whole-input complexity score that drove the decision.
    pub complexity: f64,
    /// Distance-to-boundary confidence, clamped to `[0, 1]`.
    pub confidence: f64,
    /// Descriptive label of the chosen expert.
    pub label: &'static str,
}

impl fmt::Display for SwitchedDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Routed to Expert {} ({}) [complexity: {:.2}, conf: {:.2}]",
            self.expert, self.label, self.complexity, self.confidence
        )
    }
}

/// Switched MoE variant — one expert per whole input.
///
/// Owns its metrics aggregator; share the handle with a dashboard via
/// [`metrics`](Self::metrics).
///
/// # Panics
///
/// This type and its methods never panic.
#[derive(Debug)]
pub struct SwitchedMoe {
    router: ThresholdRouter,
    text_scorer: TextComplexityScorer,
    image_scorer: ImageComplexityScorer,
    metrics: Arc<MetricsAggregator>,
}

impl SwitchedMoe {
    /// Create a switched variant with the given complexity threshold.
    ///
    /// # Errors
    ///
    /// Returns [`MoeError::Config`] unless the threshold is finite and
    /// strictly positive.
    pub fn new(complexity_threshold: f64) -> Result<Self, MoeError> {
        Ok(Self {
            router: ThresholdRouter::new(complexity_threshold)?,
            text_scorer: TextComplexityScorer::new(),
            image_scorer: ImageComplexityScorer::new(),
            metrics: Arc::new(MetricsAggregator::new()),
        })
    }

    /// Create a switched variant from a
    /// [`RouterConfig`](crate::RouterConfig).
    ///
    /// # Errors
    ///
    /// Returns [`MoeError::Config`] unless `complexity_threshold` is finite
    /// and strictly positive.
    pub fn from_config(config: &crate::RouterConfig) -> Result<Self, MoeError> {
        Self::new(config.complexity_threshold)
    }

    /// Handle to this pipeline's metrics aggregator.
    pub fn metrics(&self) -> Arc<MetricsAggregator> {
        Arc::clone(&self.metrics)
    }

    /// The configured complexity threshold.
    pub fn complexity_threshold(&self) -> f64 {
        self.router.threshold()
    }

    fn decide(
        &self,
        start: Instant,
        complexity: f64,
        category: ScoreCategory,
    ) -> SwitchedDecision {
        self.metrics.record_score(category, complexity);
        let expert = self.router.route_score(complexity);
        self.metrics.record_assignment(expert);
        self.metrics.record_timing(start.elapsed());

        SwitchedDecision {
            expert,
            complexity,
            confidence: self.router.confidence(complexity),
            label: EXPERT_LABELS.get(expert).copied().unwrap_or("specialist"),
        }
    }

    fn info(&self) -> RoutingInfo {
        RoutingInfo {
            num_experts: THRESHOLD_EXPERTS,
            variant: "switched",
            expert_labels: &EXPERT_LABELS,
        }
    }
}

impl MoePipeline<str> for SwitchedMoe {
    type Decision = SwitchedDecision;

    fn route(&self, input: &str) -> Result<usize, MoeError> {
        Ok(self.router.route_score(self.text_scorer.score_text(input)))
    }

    fn process(&self, input: &str) -> Result<Vec<SwitchedDecision>, MoeError> {
        let start = Instant::now();
        let complexity = self.text_scorer.score_text(input);
        let decision = self.decide(start, complexity, ScoreCategory::TextComplexity);
        tracing::debug!(
            expert = decision.expert,
            complexity,
            confidence = decision.confidence,
            "switched text route"
        );
        Ok(vec![decision])
    }

    fn routing_info(&self) -> RoutingInfo {
        self.info()
    }
}

impl MoePipeline<Grid> for SwitchedMoe {
    type Decision = SwitchedDecision;

    fn route(&self, input: &Grid) -> Result<usize, MoeError> {
        Ok(self.router.route_score(self.image_scorer.score_image(input)))
    }

    fn process(&self, input: &Grid) -> Result<Vec<SwitchedDecision>, MoeError> {
        let start = Instant::now();
        let complexity = self.image_scorer.score_image(input);
        let decision = self.decide(start, complexity, ScoreCategory::ImageComplexity);
        tracing::debug!(
            expert = decision.expert,
            complexity,
            confidence = decision.confidence,
            "switched image route"
        );
        Ok(vec![decision])
    }

    fn routing_info(&self) -> RoutingInfo {
        self.info()
    }
}
