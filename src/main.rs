//! Demo binary for moe-router
//!
//! Runs the three routing variants over fixed sample inputs and prints the
//! decisions, or launches the live metrics dashboard.
//!
//! ## Usage
//!
//! ```bash
//! cargo run                      # print routing decisions for the samples
//! cargo run -- dashboard         # live TUI over generated traffic
//! ```
//!
//! ## Environment Variables
//!
//! - `MOE_CONFIG=path.toml` — router configuration file (defaults apply
//!   when unset)
//! - `LOG_FORMAT=json` — structured JSON output (production)
//! - `RUST_LOG=info` — log level filter

use moe_router::routing::config;
use moe_router::{
    init_tracing, samples, ImageMoe, MoePipeline, RouterConfig, SwitchedMoe, TextMoe,
};
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Structured tracing (JSON or pretty, based on LOG_FORMAT env)
    let _ = init_tracing();

    let cfg = load_config()?;

    let dashboard = std::env::args().nth(1).is_some_and(|a| a == "dashboard");
    if dashboard {
        return run_dashboard_demo(&cfg);
    }

    info!("Starting moe-router demo");

    run_text_demo(&cfg)?;
    run_image_demo(&cfg)?;
    run_switched_demo(&cfg)?;

    info!("Demo complete");
    Ok(())
}

/// Router configuration from `MOE_CONFIG`, or defaults when unset.
fn load_config() -> Result<RouterConfig, Box<dyn std::error::Error>> {
    match std::env::var("MOE_CONFIG") {
        Ok(path) => {
            let cfg = config::load_from_file(std::path::Path::new(&path))?;
            info!(path = %path, "loaded router config");
            Ok(cfg)
        }
        Err(_) => Ok(RouterConfig::default()),
    }
}

/// Per-token routing over the sample texts.
fn run_text_demo(cfg: &RouterConfig) -> Result<(), Box<dyn std::error::Error>> {
    let moe = TextMoe::from_config(cfg)?;
    println!("── Text MoE (per-token length buckets) ──");

    for text in samples::MEDIUM_TEXTS {
        println!("input: {text:?}");
        for decision in moe.process(text)? {
            println!("  {decision}");
        }
    }

    let snap = moe.metrics().snapshot();
    info!(
        tokens = snap.total_assignments(),
        mean_complexity = snap.mean_text_complexity(),
        "text demo finished"
    );
    Ok(())
}

/// Per-tile routing over the demo grids.
fn run_image_demo(cfg: &RouterConfig) -> Result<(), Box<dyn std::error::Error>> {
    let moe = ImageMoe::from_config(cfg)?;
    println!("── Image MoE (per-tile intensity buckets) ──");

    for (name, grid) in [
        ("uniform", samples::uniform_grid()?),
        ("block", samples::block_grid()?),
        ("textured", samples::textured_grid()?),
    ] {
        println!("grid: {name} ({}x{})", grid.rows(), grid.cols());
        for decision in moe.process(&grid)? {
            println!("  {decision}");
        }
    }

    let snap = moe.metrics().snapshot();
    info!(
        tiles = snap.total_assignments(),
        mean_complexity = snap.mean_image_complexity(),
        "image demo finished"
    );
    Ok(())
}

/// Whole-input threshold routing over texts and grids.
fn run_switched_demo(cfg: &RouterConfig) -> Result<(), Box<dyn std::error::Error>> {
    let moe = SwitchedMoe::from_config(cfg)?;
    println!(
        "── Switched MoE (whole-input threshold {}) ──",
        cfg.complexity_threshold
    );

    for text in samples::all_texts() {
        println!("input: {text:?}");
        for decision in MoePipeline::<str>::process(&moe, text)? {
            println!("  {decision}");
        }
    }

    for (name, grid) in [
        ("uniform", samples::uniform_grid()?),
        ("textured", samples::textured_grid()?),
    ] {
        println!("grid: {name}");
        for decision in MoePipeline::<moe_router::Grid>::process(&moe, &grid)? {
            println!("  {decision}");
        }
    }

    let snap = moe.metrics().snapshot();
    info!(
        assignments = snap.total_assignments(),
        "switched demo finished"
    );
    Ok(())
}

/// Live dashboard over traffic generated on a background thread.
#[cfg(feature = "tui")]
fn run_dashboard_demo(cfg: &RouterConfig) -> Result<(), Box<dyn std::error::Error>> {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    let moe = SwitchedMoe::from_config(cfg)?;
    let metrics = moe.metrics();

    let stop = Arc::new(AtomicBool::new(false));
    let traffic = {
        let stop = Arc::clone(&stop);
        std::thread::spawn(move || {
            let mut n = 0usize;
            while !stop.load(Ordering::Relaxed) {
                let _ = MoePipeline::<str>::process(&moe, samples::nth_text(n));
                if let Ok(grid) = samples::nth_grid(n) {
                    let _ = MoePipeline::<moe_router::Grid>::process(&moe, &grid);
                }
                n = n.wrapping_add(1);
                std::thread::sleep(Duration::from_millis(150));
            }
        })
    };

    info!("launching dashboard, press q to quit");
    let result = moe_router::tui::run_dashboard(metrics);

    stop.store(true, Ordering::Relaxed);
    let _ = traffic.join();
    result?;
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_dashboard_demo(_cfg: &RouterConfig) -> Result<(), Box<dyn std::error::Error>> {
    Err("dashboard requires the `tui` feature (enabled by default)".into())
}
