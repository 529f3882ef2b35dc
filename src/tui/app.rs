//! # Module: Dashboard App State
//!
//! ## Responsibility
//! Owns all dashboard state and the data-tick logic. [`App`] is the single
//! source of truth for every rendered panel; it refreshes its
//! [`MetricsSnapshot`] from the shared aggregator on each data tick.
//!
//! ## Guarantees
//! - State transitions are deterministic and testable without a terminal
//! - A paused app keeps its last snapshot; the aggregator keeps collecting
//! - `on_tick()` never panics

use std::sync::Arc;
use std::time::Duration;

use crate::metrics::{MetricsAggregator, MetricsSnapshot};

/// Minimum terminal width for the dashboard to render.
pub const MIN_COLS: u16 = 60;

/// Minimum terminal height for the dashboard to render.
pub const MIN_ROWS: u16 = 20;

/// Dashboard state: a read handle on the shared aggregator plus the last
/// snapshot taken from it.
#[derive(Debug)]
pub struct App {
    /// Whether the application should exit.
    pub should_quit: bool,
    /// Whether display updates are paused (data still collected).
    pub paused: bool,
    /// Whether the help overlay is visible.
    pub show_help: bool,
    /// Monotonic data-tick counter.
    pub tick_count: u64,
    /// Snapshot rendered by the widgets, refreshed on each data tick.
    pub snapshot: MetricsSnapshot,
    /// Data refresh interval.
    pub refresh: Duration,

    metrics: Arc<MetricsAggregator>,
}

impl App {
    /// Create dashboard state over a shared aggregator handle.
    pub fn new(metrics: Arc<MetricsAggregator>, refresh: Duration) -> Self {
        Self {
            should_quit: false,
            paused: false,
            show_help: false,
            tick_count: 0,
            snapshot: MetricsSnapshot::default(),
            refresh,
            metrics,
        }
    }

    /// Refresh the rendered snapshot from the aggregator. Skipped while
    /// paused so the display freezes but collection continues.
    pub fn on_tick(&mut self) {
        if self.paused {
            return;
        }
        self.snapshot = self.metrics.snapshot();
        self.tick_count += 1;
    }
}
