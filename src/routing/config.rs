//! Routing configuration types.
//!
//! Provides [`RouterConfig`] for tuning expert counts and the switched
//! variant's complexity threshold, plus TOML loading with validation. All
//! fields have sensible defaults and are (de)serialisable via serde.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::routing::router::{REGION_BUCKETS, TOKEN_BUCKETS};
use crate::MoeError;

// ── Default value functions ────────────────────────────────────────────

/// Default expert count for the per-token text variant.
fn default_text_experts() -> usize {
    3
}

/// Default expert count for the per-tile image variant.
fn default_image_experts() -> usize {
    4
}

/// Default complexity threshold for the switched variant.
fn default_complexity_threshold() -> f64 {
    0.5
}

// ── RouterConfig ───────────────────────────────────────────────────────

/// Configuration for the three MoE variants.
///
/// # Panics
///
/// This type never panics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouterConfig {
    /// Expert count for the text variant.
    ///
    /// Must be at least 3 — the token length buckets produce indices up
    /// to 2.  Default: `3`.
    #[serde(default = "default_text_experts")]
    pub text_experts: usize,

    /// Expert count for the image variant.
    ///
    /// Must be at least 4 — the intensity buckets produce indices up to 3.
    /// Default: `4`.
    #[serde(default = "default_image_experts")]
    pub image_experts: usize,

    /// Complexity threshold for the switched variant.
    ///
    /// Must be finite and `> 0` — the confidence formula divides by it.
    /// Default: `0.5`.
    #[serde(default = "default_complexity_threshold")]
    pub complexity_threshold: f64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            text_experts: default_text_experts(),
            image_experts: default_image_experts(),
            complexity_threshold: default_complexity_threshold(),
        }
    }
}

/// Validate a [`RouterConfig`], returning a list of human-readable errors.
///
/// # Returns
///
/// An empty `Vec` on success, or one error string per violated constraint.
///
/// # Panics
///
/// This function never panics.
pub fn validate(config: &RouterConfig) -> Vec<String> {
    let mut errors = Vec::new();

    if config.text_experts < TOKEN_BUCKETS {
        errors.push(format!(
            "text_experts must be >= {TOKEN_BUCKETS}, got {}",
            config.text_experts
        ));
    }

    if config.image_experts < REGION_BUCKETS {
        errors.push(format!(
            "image_experts must be >= {REGION_BUCKETS}, got {}",
            config.image_experts
        ));
    }

    if !config.complexity_threshold.is_finite() || config.complexity_threshold <= 0.0 {
        errors.push(format!(
            "complexity_threshold must be > 0, got {}",
            config.complexity_threshold
        ));
    }

    errors
}

/// Load a validated [`RouterConfig`] from a TOML file.
///
/// # Errors
///
/// Returns [`MoeError::Config`] if the file cannot be read, is not valid
/// TOML, or violates a semantic constraint. The path appears in every
/// error message.
pub fn load_from_file(path: &Path) -> Result<RouterConfig, MoeError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| MoeError::Config(format!("{}: {e}", path.display())))?;
    load_from_str(&content, &path.display().to_string())
}

/// Load a validated [`RouterConfig`] from a TOML string.
///
/// Useful for tests and embedded configs without file I/O; `source_name`
/// identifies the source in error messages.
///
/// # Errors
///
/// Returns [`MoeError::Config`] on malformed TOML or a failed validation.
pub fn load_from_str(content: &str, source_name: &str) -> Result<RouterConfig, MoeError> {
    let config: RouterConfig = toml::from_str(content)
        .map_err(|e| MoeError::Config(format!("{source_name}: {e}")))?;

    let errors = validate(&config);
    if !errors.is_empty() {
        return Err(MoeError::Config(format!(
            "{source_name}: {}",
            errors.join("; ")
        )));
    }
    Ok(config)
}

// ── Tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // -- defaults --------------------------------------------------------

    #[test]
    fn test_default_text_experts_returns_3() {
        assert_eq!(default_text_experts(), 3);
    }

    #[test]
    fn test_default_image_experts_returns_4() {
        assert_eq!(default_image_experts(), 4);
    }

    #[test]
    fn test_default_complexity_threshold_returns_0_5() {
        assert!((default_complexity_threshold() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_router_config_default_matches_function_defaults() {
        let cfg = RouterConfig::default();
        assert_eq!(cfg.text_experts, 3);
        assert_eq!(cfg.image_experts, 4);
        assert!((cfg.complexity_threshold - 0.5).abs() < f64::EPSILON);
    }

    // -- serde -----------------------------------------------------------

    #[test]
    fn test_router_config_toml_roundtrip() {
        let cfg = RouterConfig::default();
        let toml_str = toml::to_string_pretty(&cfg)
            .unwrap_or_else(|e| std::panic::panic_any(format!("test: serialize: {e}")));
        let parsed: RouterConfig = toml::from_str(&toml_str)
            .unwrap_or_else(|e| std::panic::panic_any(format!("test: deserialize: {e}")));
        assert_eq!(cfg, parsed);
    }

    #[test]
    fn test_router_config_json_roundtrip() {
        let cfg = RouterConfig {
            text_experts: 5,
            image_experts: 6,
            complexity_threshold: 0.75,
        };
        let json = serde_json::to_string(&cfg)
            .unwrap_or_else(|e| std::panic::panic_any(format!("test: serialize: {e}")));
        let parsed: RouterConfig = serde_json::from_str(&json)
            .unwrap_or_else(|e| std::panic::panic_any(format!("test: deserialize: {e}")));
        assert_eq!(cfg, parsed);
    }

    #[test]
    fn test_router_config_deserializes_with_defaults() {
        // Empty table → all defaults
        let cfg: RouterConfig = toml::from_str("")
            .unwrap_or_else(|e| std::panic::panic_any(format!("test: deserialize: {e}")));
        assert_eq!(cfg, RouterConfig::default());
    }

    #[test]
    fn test_router_config_partial_toml_fills_missing_fields() {
        let cfg: RouterConfig = toml::from_str("complexity_threshold = 1.5")
            .unwrap_or_else(|e| std::panic::panic_any(format!("test: deserialize: {e}")));
        assert!((cfg.complexity_threshold - 1.5).abs() < f64::EPSILON);
        assert_eq!(cfg.text_experts, 3);
    }

    // -- validation ------------------------------------------------------

    #[test]
    fn test_validate_default_config_passes() {
        let errors = validate(&RouterConfig::default());
        assert!(errors.is_empty(), "expected no errors, got: {errors:?}");
    }

    #[test]
    fn test_validate_too_few_text_experts_fails() {
        let cfg = RouterConfig {
            text_experts: 2,
            ..RouterConfig::default()
        };
        let errors = validate(&cfg);
        assert!(errors.iter().any(|e| e.contains("text_experts")));
    }

    #[test]
    fn test_validate_too_few_image_experts_fails() {
        let cfg = RouterConfig {
            image_experts: 1,
            ..RouterConfig::default()
        };
        let errors = validate(&cfg);
        assert!(errors.iter().any(|e| e.contains("image_experts")));
    }

    #[test]
    fn test_validate_zero_threshold_fails() {
        let cfg = RouterConfig {
            complexity_threshold: 0.0,
            ..RouterConfig::default()
        };
        let errors = validate(&cfg);
        assert!(errors.iter().any(|e| e.contains("complexity_threshold")));
    }

    #[test]
    fn test_validate_nan_threshold_fails() {
        let cfg = RouterConfig {
            complexity_threshold: f64::NAN,
            ..RouterConfig::default()
        };
        let errors = validate(&cfg);
        assert!(errors.iter().any(|e| e.contains("complexity_threshold")));
    }

    #[test]
    fn test_validate_collects_multiple_errors() {
        let cfg = RouterConfig {
            text_experts: 0,
            image_experts: 0,
            complexity_threshold: -1.0,
        };
        assert_eq!(validate(&cfg).len(), 3);
    }

    // -- loading ----------------------------------------------------------

    #[test]
    fn test_load_from_str_valid_toml() {
        let cfg = load_from_str("text_experts = 4\ncomplexity_threshold = 0.8\n", "inline")
            .unwrap_or_else(|e| std::panic::panic_any(format!("test: load: {e}")));
        assert_eq!(cfg.text_experts, 4);
        assert!((cfg.complexity_threshold - 0.8).abs() < f64::EPSILON);
        assert_eq!(cfg.image_experts, 4);
    }

    #[test]
    fn test_load_from_str_malformed_toml_names_source() {
        let err = load_from_str("text_experts = [nope", "bad.toml");
        match err {
            Err(crate::MoeError::Config(msg)) => assert!(msg.contains("bad.toml")),
            other => std::panic::panic_any(format!("expected Config error, got {other:?}")),
        }
    }

    #[test]
    fn test_load_from_str_rejects_invalid_values() {
        let err = load_from_str("complexity_threshold = 0.0", "inline");
        match err {
            Err(crate::MoeError::Config(msg)) => {
                assert!(msg.contains("complexity_threshold"));
            }
            other => std::panic::panic_any(format!("expected Config error, got {other:?}")),
        }
    }

    #[test]
    fn test_load_from_file_missing_file_is_config_error() {
        let err = load_from_file(Path::new("/nonexistent/moe-router.toml"));
        assert!(matches!(err, Err(crate::MoeError::Config(_))));
    }
}
