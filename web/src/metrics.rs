//! Prometheus metrics for the web server component.
//!
//! Game session tracking and bot search cost.

use lazy_static::lazy_static;
use prometheus::core::Collector;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, Opts, Registry, TextEncoder};
use std::sync::Once;
use tracing::warn;

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // ========== Game Session Metrics ==========

    /// Total game sessions created
    pub static ref GAMES_CREATED: IntCounter = IntCounter::with_opts(
        Opts::new("uttt_games_created_total", "Total game sessions created")
    ).unwrap();

    /// Total moves played across all games
    pub static ref MOVES_PLAYED: IntCounter = IntCounter::with_opts(
        Opts::new("uttt_moves_played_total", "Total moves played across all games")
    ).unwrap();

    /// Games that reached a win or a draw
    pub static ref GAMES_COMPLETED: IntCounter = IntCounter::with_opts(
        Opts::new("uttt_games_completed_total", "Total games completed")
    ).unwrap();

    // ========== Bot Metrics ==========

    /// Time for bot to compute move
    pub static ref BOT_MOVE_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new("uttt_bot_move_seconds", "Time for bot to compute move")
            .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 3.0, 5.0])
    ).unwrap();

    /// MCTS iterations completed per bot move
    pub static ref BOT_ITERATIONS: Histogram = Histogram::with_opts(
        HistogramOpts::new("uttt_bot_iterations", "MCTS iterations per bot move")
            .buckets(vec![10.0, 100.0, 1_000.0, 5_000.0, 10_000.0, 50_000.0, 100_000.0])
    ).unwrap();
}

static INIT: Once = Once::new();

/// Register every collector with [`REGISTRY`]. Only the first call registers.
pub fn init_metrics() {
    INIT.call_once(|| {
        let collectors: [Box<dyn Collector>; 5] = [
            Box::new(GAMES_CREATED.clone()),
            Box::new(MOVES_PLAYED.clone()),
            Box::new(GAMES_COMPLETED.clone()),
            Box::new(BOT_MOVE_SECONDS.clone()),
            Box::new(BOT_ITERATIONS.clone()),
        ];
        for collector in collectors {
            if let Err(e) = REGISTRY.register(collector) {
                warn!("Failed to register metric: {}", e);
            }
        }
    });
}

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        warn!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
