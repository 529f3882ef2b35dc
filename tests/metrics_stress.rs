//! Concurrency stress tests for the metrics aggregator.
//!
//! Many pipeline threads hammer one shared aggregator while a reader polls
//! snapshots. Checks the bounded-buffer and lost-update guarantees under
//! real contention, not just in single-threaded unit tests.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use moe_router::metrics::SAMPLE_CAPACITY;
use moe_router::{MetricsAggregator, MoePipeline, ScoreCategory, TextMoe};

fn unwrap<T, E: std::fmt::Display>(r: Result<T, E>) -> T {
    r.unwrap_or_else(|e| std::panic::panic_any(format!("{e}")))
}

#[test]
fn test_many_writer_threads_lose_no_assignments() {
    let metrics = Arc::new(MetricsAggregator::new());
    let threads: u64 = 8;
    let per_thread: u64 = 2_000;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let m = Arc::clone(&metrics);
            thread::spawn(move || {
                for i in 0..per_thread {
                    m.record_assignment((t as usize + i as usize) % 3);
                    m.record_score(ScoreCategory::TextComplexity, i as f64 / per_thread as f64);
                }
            })
        })
        .collect();
    for h in handles {
        let _ = h.join();
    }

    let snap = metrics.snapshot();
    assert_eq!(snap.total_assignments(), threads * per_thread);
    assert_eq!(snap.updates, threads * per_thread * 2);
    assert_eq!(snap.text_complexity.len(), SAMPLE_CAPACITY);
}

#[test]
fn test_reader_snapshots_stay_bounded_and_monotonic_under_load() {
    let metrics = Arc::new(MetricsAggregator::new());
    let writer = {
        let m = Arc::clone(&metrics);
        thread::spawn(move || {
            for i in 0..5_000u64 {
                m.record_score(ScoreCategory::ImageComplexity, (i % 100) as f64 / 100.0);
                m.record_timing(Duration::from_micros(i % 50));
            }
        })
    };

    let mut last_updates = 0;
    for _ in 0..200 {
        let snap = metrics.snapshot();
        assert!(snap.image_complexity.len() <= SAMPLE_CAPACITY);
        assert!(snap.processing_times.len() <= SAMPLE_CAPACITY);
        // The update counter never goes backwards across snapshots
        assert!(snap.updates >= last_updates);
        last_updates = snap.updates;
    }
    let _ = writer.join();

    let snap = metrics.snapshot();
    assert_eq!(snap.updates, 10_000);
    assert_eq!(snap.image_complexity.len(), SAMPLE_CAPACITY);
    assert_eq!(snap.processing_times.len(), SAMPLE_CAPACITY);
}

#[test]
fn test_shared_pipeline_processes_concurrently_without_losing_counts() {
    // TextMoe takes &self, so one instance can serve many threads through
    // an Arc; every token routed on any thread must land in the counters.
    let moe = Arc::new(unwrap(TextMoe::new(3)));
    let threads = 4;
    let calls_per_thread = 50;
    // 5 tokens per call
    let input = "the quick brown fox jumps";

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let m = Arc::clone(&moe);
            thread::spawn(move || {
                for _ in 0..calls_per_thread {
                    let decisions = m
                        .process(input)
                        .unwrap_or_else(|e| std::panic::panic_any(format!("{e}")));
                    assert_eq!(decisions.len(), 5);
                }
            })
        })
        .collect();
    for h in handles {
        let _ = h.join();
    }

    let snap = moe.metrics().snapshot();
    assert_eq!(
        snap.total_assignments(),
        (threads * calls_per_thread * 5) as u64
    );
    assert_eq!(snap.processing_times.len(), SAMPLE_CAPACITY);
}
