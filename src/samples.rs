//! Deterministic demo inputs.
//!
//! Fixed text snippets in three complexity tiers and synthetic grids with
//! known texture, used by the demo binary and the dashboard traffic
//! generator. Everything here is deterministic so demo routing decisions
//! are reproducible run to run.

use crate::grid::Grid;
use crate::MoeError;

/// Short, low-variety snippets that land in the simple band.
pub const SIMPLE_TEXTS: &[&str] = &[
    "The cat sat",
    "dog ran fast",
    "it is ok",
    "a b c",
];

/// Ordinary prose with mixed word lengths.
pub const MEDIUM_TEXTS: &[&str] = &[
    "Python programming language basics",
    "The quick brown fox jumps over the lazy dog",
    "Structured logging makes debugging production systems easier",
    "Routing decisions depend on measured input complexity",
];

/// Long, punctuation-heavy inputs that score well above the threshold.
pub const COMPLEX_TEXTS: &[&str] = &[
    "Supercalifragilisticexpialidocious! The quintessential example of \
     incomprehensibilities & idiosyncratic juxtapositions (allegedly).",
    "Pneumonoultramicroscopicsilicovolcanoconiosis: a crystallographic \
     catastrophe?! @#$% — floccinaucinihilipilification, quizzically.",
    "Heterogeneous microservice architectures necessitate sophisticated \
     observability instrumentation; distributed tracing, cardinality \
     explosions, and quantile estimation (P99!) abound.",
];

/// All text samples, simple through complex, in a fixed order.
pub fn all_texts() -> Vec<&'static str> {
    SIMPLE_TEXTS
        .iter()
        .chain(MEDIUM_TEXTS)
        .chain(COMPLEX_TEXTS)
        .copied()
        .collect()
}

/// The `n`-th text sample, cycling through all tiers.
pub fn nth_text(n: usize) -> &'static str {
    let total = SIMPLE_TEXTS.len() + MEDIUM_TEXTS.len() + COMPLEX_TEXTS.len();
    let i = n % total;
    if i < SIMPLE_TEXTS.len() {
        SIMPLE_TEXTS[i]
    } else if i < SIMPLE_TEXTS.len() + MEDIUM_TEXTS.len() {
        MEDIUM_TEXTS[i - SIMPLE_TEXTS.len()]
    } else {
        COMPLEX_TEXTS[i - SIMPLE_TEXTS.len() - MEDIUM_TEXTS.len()]
    }
}

/// A 32×32 mid-gray grid. Every tile routes to the bright-uniform expert.
///
/// # Errors
///
/// Construction cannot fail for these fixed dimensions; the `Result` is
/// kept so callers handle all grid sources uniformly.
pub fn uniform_grid() -> Result<Grid, MoeError> {
    Ok(Grid::filled(32, 32, 0.5)?)
}

/// A 32×32 dark grid with a centered bright 12×12 block, producing a mix
/// of uniform and edge tiles.
///
/// # Errors
///
/// Construction cannot fail for these fixed dimensions.
pub fn block_grid() -> Result<Grid, MoeError> {
    Ok(Grid::from_fn(32, 32, |r, c| {
        if (10..22).contains(&r) && (10..22).contains(&c) {
            0.9
        } else {
            0.1
        }
    })?)
}

/// A 32×32 sine-textured grid with high per-tile variance, landing in the
/// texture bucket.
///
/// # Errors
///
/// Construction cannot fail for these fixed dimensions.
pub fn textured_grid() -> Result<Grid, MoeError> {
    Ok(Grid::from_fn(32, 32, |r, c| {
        0.5 + 0.5 * (r as f64 * 0.9).sin() * (c as f64 * 0.7).cos()
    })?)
}

/// The `n`-th demo grid, cycling uniform / block / textured.
///
/// # Errors
///
/// Construction cannot fail for the fixed demo dimensions.
pub fn nth_grid(n: usize) -> Result<Grid, MoeError> {
    match n % 3 {
        0 => uniform_grid(),
        1 => block_grid(),
        _ => textured_grid(),
    }
}
