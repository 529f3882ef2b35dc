//! Live routing metrics.
//!
//! Each pipeline instance owns one [`MetricsAggregator`] (no process-wide
//! singleton); the dashboard holds a second `Arc` handle and reads via
//! [`snapshot`](MetricsAggregator::snapshot).
//!
//! ## Metrics Kept
//!
//! | Metric | Storage | Bound |
//! |--------|---------|-------|
//! | text complexity samples | ring buffer | last 100 |
//! | image complexity samples | ring buffer | last 100 |
//! | processing time samples | ring buffer | last 100 |
//! | expert assignment counts | map by index | unbounded (counts only) |
//!
//! All mutation goes through one short-held mutex per aggregator, so
//! concurrent writers never lose updates and readers never observe a
//! half-applied one. A snapshot is consistent but may miss a write that
//! lands after the call — eventual consistency is fine at a 4 Hz refresh.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Rolling sample capacity per category.
pub const SAMPLE_CAPACITY: usize = 100;

/// Which rolling sample buffer a score belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreCategory {
    /// Token / whole-text complexity scores.
    TextComplexity,
    /// Region / whole-grid complexity scores.
    ImageComplexity,
}

/// Fixed-capacity FIFO sample buffer: a vec plus a write cursor, so
/// eviction is a single overwrite rather than a front shift.
#[derive(Debug, Clone)]
struct RingBuffer {
    buf: Vec<f64>,
    /// Index of the oldest entry once the buffer is full.
    head: usize,
    capacity: usize,
}

impl RingBuffer {
    fn new(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            head: 0,
            capacity,
        }
    }

    /// Append a sample, evicting the oldest when at capacity.
    fn push(&mut self, value: f64) {
        if self.buf.len() < self.capacity {
            self.buf.push(value);
        } else {
            self.buf[self.head] = value;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    fn len(&self) -> usize {
        self.buf.len()
    }

    /// Samples in arrival order, oldest first.
    fn to_vec(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.buf.len());
        out.extend_from_slice(&self.buf[self.head..]);
        out.extend_from_slice(&self.buf[..self.head]);
        out
    }
}

/// State behind the aggregator mutex.
#[derive(Debug)]
struct MetricsInner {
    text_scores: RingBuffer,
    image_scores: RingBuffer,
    timings: RingBuffer,
    assignments: BTreeMap<usize, u64>,
    updates: u64,
    last_update: Option<Instant>,
}

/// Thread-safe, bounded-capacity store of routing metrics.
///
/// Mutating calls take the internal mutex for the duration of one append or
/// increment; [`snapshot`](Self::snapshot) clones the current state out
/// under the same lock. Counters are never reset after construction.
///
/// # Panics
///
/// This type and its methods never panic. A poisoned mutex (a panicking
/// writer elsewhere) is recovered by taking the inner state as-is.
#[derive(Debug)]
pub struct MetricsAggregator {
    inner: Mutex<MetricsInner>,
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsInner {
                text_scores: RingBuffer::new(SAMPLE_CAPACITY),
                image_scores: RingBuffer::new(SAMPLE_CAPACITY),
                timings: RingBuffer::new(SAMPLE_CAPACITY),
                assignments: BTreeMap::new(),
                updates: 0,
                last_update: None,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MetricsInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a complexity sample to the rolling buffer for `category`.
    pub fn record_score(&self, category: ScoreCategory, value: f64) {
        let mut inner = self.lock();
        match category {
            ScoreCategory::TextComplexity => inner.text_scores.push(value),
            ScoreCategory::ImageComplexity => inner.image_scores.push(value),
        }
        inner.updates += 1;
        inner.last_update = Some(Instant::now());
    }

    /// Increment the assignment counter for an expert index.
    pub fn record_assignment(&self, expert: usize) {
        let mut inner = self.lock();
        *inner.assignments.entry(expert).or_insert(0) += 1;
        inner.updates += 1;
        inner.last_update = Some(Instant::now());
    }

    /// Append one wall-clock processing duration (stored as seconds).
    pub fn record_timing(&self, duration: Duration) {
        let mut inner = self.lock();
        inner.timings.push(duration.as_secs_f64());
        inner.updates += 1;
        inner.last_update = Some(Instant::now());
    }

    /// A consistent, read-only copy of the current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let inner = self.lock();
        MetricsSnapshot {
            text_complexity: inner.text_scores.to_vec(),
            image_complexity: inner.image_scores.to_vec(),
            processing_times: inner.timings.to_vec(),
            expert_assignments: inner.assignments.clone(),
            updates: inner.updates,
            since_last_update: inner.last_update.map(|t| t.elapsed()),
        }
    }
}

/// Read-only view of an aggregator, cloned out under its lock.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// Up to the 100 most recent text complexity samples, oldest first.
    pub text_complexity: Vec<f64>,
    /// Up to the 100 most recent image complexity samples, oldest first.
    pub image_complexity: Vec<f64>,
    /// Up to the 100 most recent processing times in seconds, oldest first.
    pub processing_times: Vec<f64>,
    /// Cumulative expert assignment counts by index.
    pub expert_assignments: BTreeMap<usize, u64>,
    /// Total mutating calls since construction.
    pub updates: u64,
    /// Time since the most recent mutating call, if any.
    pub since_last_update: Option<Duration>,
}

impl MetricsSnapshot {
    /// Mean of a sample list, or `None` when empty.
    fn mean(samples: &[f64]) -> Option<f64> {
        if samples.is_empty() {
            None
        } else {
            Some(samples.iter().sum::<f64>() / samples.len() as f64)
        }
    }

    /// Mean text complexity over the retained window.
    pub fn mean_text_complexity(&self) -> Option<f64> {
        Self::mean(&self.text_complexity)
    }

    /// Mean image complexity over the retained window.
    pub fn mean_image_complexity(&self) -> Option<f64> {
        Self::mean(&self.image_complexity)
    }

    /// Mean processing time in seconds over the retained window.
    pub fn mean_processing_time(&self) -> Option<f64> {
        Self::mean(&self.processing_times)
    }

    /// Total assignments across all experts.
    pub fn total_assignments(&self) -> u64 {
        self.expert_assignments.values().sum()
    }
}
