//! Per-token text variant.
//!
//! Tokenizes free text (strip punctuation, lowercase, split on whitespace)
//! and routes every token independently through length buckets, left to
//! right.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::metrics::{MetricsAggregator, ScoreCategory};
use crate::routing::features::TokenFeatures;
use crate::routing::router::{argmax, BucketRouter};
use crate::routing::scorer::TextComplexityScorer;
use crate::{InvalidInputError, MoeError, MoePipeline, RoutingInfo};

/// Expert labels for the token length buckets.
const EXPERT_LABELS: [&str; 3] = [
    "short word specialist",
    "medium word specialist",
    "long word specialist",
];

/// Routing decision for one token.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenDecision {
    /// The normalised token that was routed.
    pub token: String,
    /// Chosen expert index.
    pub expert: usize,
    /// Weight of the chosen expert — always 1.0 for one-hot buckets.
    pub confidence: f64,
    /// Features the decision was made on.
    pub features: TokenFeatures,
    /// Descriptive label of the chosen expert.
    pub label: &'static str,
}

impl fmt::Display for TokenDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token: {} → Expert {} ({}) [conf: {:.2}]",
            self.token, self.expert, self.label, self.confidence
        )
    }
}

/// Per-token text MoE variant.
///
/// Owns its metrics aggregator; share the handle with a dashboard via
/// [`metrics`](Self::metrics).
///
/// # Panics
///
/// This type and its methods never panic.
#[derive(Debug)]
pub struct TextMoe {
    router: BucketRouter,
    scorer: TextComplexityScorer,
    metrics: Arc<MetricsAggregator>,
}

impl TextMoe {
    /// Create a text variant routing across `num_experts` experts.
    ///
    /// # Errors
    ///
    /// Returns [`MoeError::Config`] if `num_experts` is below 3 — the
    /// length buckets produce indices up to 2.
    pub fn new(num_experts: usize) -> Result<Self, MoeError> {
        Ok(Self {
            router: BucketRouter::for_tokens(num_experts)?,
            scorer: TextComplexityScorer::new(),
            metrics: Arc::new(MetricsAggregator::new()),
        })
    }

    /// Create a text variant from a [`RouterConfig`](crate::RouterConfig).
    ///
    /// # Errors
    ///
    /// Returns [`MoeError::Config`] if `text_experts` is below 3.
    pub fn from_config(config: &crate::RouterConfig) -> Result<Self, MoeError> {
        Self::new(config.text_experts)
    }

    /// Handle to this pipeline's metrics aggregator.
    pub fn metrics(&self) -> Arc<MetricsAggregator> {
        Arc::clone(&self.metrics)
    }

    /// Tokenize text: drop characters that are neither alphanumeric nor
    /// whitespace, lowercase, and split on whitespace.
    fn tokenize(text: &str) -> Vec<String> {
        let cleaned: String = text
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        cleaned.split_whitespace().map(str::to_string).collect()
    }
}

impl MoePipeline<str> for TextMoe {
    type Decision = TokenDecision;

    /// Route a single token. The input is normalised first (punctuation
    /// stripped, lowercased); anything that normalises to more than one
    /// token is rejected rather than silently truncated — use
    /// [`process`](Self::process) for multi-word text.
    fn route(&self, input: &str) -> Result<usize, MoeError> {
        let tokens = Self::tokenize(input);
        if tokens.len() > 1 {
            return Err(InvalidInputError::MultipleTokens {
                found: tokens.len(),
            }
            .into());
        }
        let first = tokens.first().ok_or(InvalidInputError::NoTokens)?;
        Ok(self.router.route_token(first)?)
    }

    fn process(&self, input: &str) -> Result<Vec<TokenDecision>, MoeError> {
        if input.is_empty() {
            return Err(InvalidInputError::EmptyInput.into());
        }
        let start = Instant::now();

        let tokens = Self::tokenize(input);
        if tokens.is_empty() {
            return Err(InvalidInputError::NoTokens.into());
        }

        let mut decisions = Vec::with_capacity(tokens.len());
        for token in tokens {
            let features = TokenFeatures::extract(&token)?;
            let complexity = self.scorer.score_token(&token);
            self.metrics
                .record_score(ScoreCategory::TextComplexity, complexity);

            let weights = self.router.weights_for_token_features(&features);
            let expert = argmax(&weights);
            self.metrics.record_assignment(expert);

            decisions.push(TokenDecision {
                token,
                expert,
                confidence: weights[expert],
                features,
                label: EXPERT_LABELS.get(expert).copied().unwrap_or("specialist"),
            });
        }

        let elapsed = start.elapsed();
        self.metrics.record_timing(elapsed);
        tracing::debug!(
            tokens = decisions.len(),
            elapsed_us = elapsed.as_micros() as u64,
            "text process complete"
        );
        Ok(decisions)
    }

    fn routing_info(&self) -> RoutingInfo {
        RoutingInfo {
            num_experts: self.router.num_experts(),
            variant: "text",
            expert_labels: &EXPERT_LABELS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline() -> TextMoe {
        TextMoe::new(3).unwrap_or_else(|e| std::panic::panic_any(format!("pipeline: {e}")))
    }

    fn process(p: &TextMoe, input: &str) -> Vec<TokenDecision> {
        p.process(input)
            .unwrap_or_else(|e| std::panic::panic_any(format!("process: {e}")))
    }

    #[test]
    fn test_tokenize_strips_punctuation_and_lowercases() {
        let tokens = TextMoe::tokenize("Hello, World! It's 42.");
        assert_eq!(tokens, vec!["hello", "world", "its", "42"]);
    }

    #[test]
    fn test_process_quick_brown_fox_scenario() {
        let p = pipeline();
        let decisions = process(&p, "The quick brown fox");
        let tokens: Vec<&str> = decisions.iter().map(|d| d.token.as_str()).collect();
        assert_eq!(tokens, vec!["the", "quick", "brown", "fox"]);
        let experts: Vec<usize> = decisions.iter().map(|d| d.expert).collect();
        assert_eq!(experts, vec![0, 1, 1, 0]);
    }

    #[test]
    fn test_process_preserves_token_order() {
        let p = pipeline();
        let decisions = process(&p, "alpha beta gamma delta epsilon");
        let tokens: Vec<&str> = decisions.iter().map(|d| d.token.as_str()).collect();
        assert_eq!(tokens, vec!["alpha", "beta", "gamma", "delta", "epsilon"]);
    }

    #[test]
    fn test_process_rejects_empty_input() {
        let p = pipeline();
        assert_eq!(
            p.process(""),
            Err(MoeError::InvalidInput(InvalidInputError::EmptyInput))
        );
    }

    #[test]
    fn test_process_rejects_punctuation_only_input() {
        let p = pipeline();
        assert_eq!(
            p.process("!!! ... ???"),
            Err(MoeError::InvalidInput(InvalidInputError::NoTokens))
        );
    }

    #[test]
    fn test_process_confidence_is_one_hot_weight() {
        let p = pipeline();
        for d in process(&p, "some words of varying sizes") {
            assert!((d.confidence - 1.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_process_records_metrics_per_token_and_one_timing() {
        let p = pipeline();
        let decisions = process(&p, "one two three");
        let snap = p.metrics().snapshot();
        assert_eq!(snap.text_complexity.len(), decisions.len());
        assert_eq!(snap.total_assignments(), decisions.len() as u64);
        assert_eq!(snap.processing_times.len(), 1);
    }

    #[test]
    fn test_process_is_idempotent_apart_from_metrics() {
        let a = pipeline();
        let b = pipeline();
        let first = process(&a, "The quick brown fox jumps");
        let second = process(&b, "The quick brown fox jumps");
        assert_eq!(first, second);
    }

    #[test]
    fn test_route_single_token() {
        let p = pipeline();
        let expert = p
            .route("extraordinary")
            .unwrap_or_else(|e| std::panic::panic_any(format!("route: {e}")));
        assert_eq!(expert, 2);
    }

    #[test]
    fn test_route_rejects_multi_token_input() {
        let p = pipeline();
        assert_eq!(
            p.route("two words"),
            Err(MoeError::InvalidInput(InvalidInputError::MultipleTokens {
                found: 2
            }))
        );
    }

    #[test]
    fn test_route_rejects_empty() {
        let p = pipeline();
        assert!(matches!(
            p.route("   "),
            Err(MoeError::InvalidInput(InvalidInputError::NoTokens))
        ));
    }

    #[test]
    fn test_routing_info_reports_variant_and_labels() {
        let p = pipeline();
        let info = p.routing_info();
        assert_eq!(info.num_experts, 3);
        assert_eq!(info.variant, "text");
        assert_eq!(info.expert_labels.len(), 3);
    }

    #[test]
    fn test_routing_info_with_surplus_experts_keeps_bucket_labels() {
        let p = TextMoe::new(5)
            .unwrap_or_else(|e| std::panic::panic_any(format!("pipeline: {e}")));
        let info = p.routing_info();
        assert_eq!(info.num_experts, 5);
        // The length buckets only select indices 0..=2; experts beyond the
        // bucket range are valid targets that are never chosen and carry no
        // label.
        assert_eq!(info.expert_labels.len(), 3);
        let decisions = process(&p, "the quick extraordinary");
        assert!(decisions.iter().all(|d| d.expert < 3));
    }

    #[test]
    fn test_decision_display_contains_token_and_label() {
        let p = pipeline();
        let decisions = process(&p, "fox");
        let line = decisions[0].to_string();
        assert!(line.contains("fox"));
        assert!(line.contains("Expert 0"));
        assert!(line.contains("short word specialist"));
    }
}
