//! Frame Pacer demo driver.
//!
//! Drives the policy engine from a fixed tick cadence with a scripted
//! synthetic load, the way a render loop would, and reports decisions and
//! statistics through tracing.

use frame_pacer::config::{ConfigManager, DemoSettings};
use frame_pacer::error::DemoError;
use frame_pacer::logging;
use frame_pacer::{FrameInputs, FramePacingPolicy, OperatingMode, QualityPreset, SharedPolicy};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Tick at which the preset is switched to Performance
const PRESET_SWITCH_TICK: u32 = 10;
/// Tick at which the mode is forced On
const MODE_SWITCH_TICK: u32 = 20;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _log_guard = logging::init_logging().map_err(|e| {
        eprintln!("Failed to initialize logging: {}", e);
        DemoError::from(e)
    })?;

    info!("Frame pacer demo starting...");

    let result = run_demo().await;

    match &result {
        Ok(()) => info!("Frame pacer demo finished"),
        Err(e) => error!("Frame pacer demo error: {}", e),
    }

    result.map_err(Into::into)
}

async fn run_demo() -> Result<(), DemoError> {
    let config_path = ConfigManager::default_path();
    let config_manager = ConfigManager::load_or_default(&config_path)?;
    info!("Configuration loaded from {:?}", config_path);

    let config = config_manager.get();

    let mut engine = FramePacingPolicy::new();
    engine.set_auto_policy(config.auto_policy.clone());
    let policy = SharedPolicy::new(engine);

    match policy.initialize(&config.pacing) {
        Ok(()) if policy.available() => info!("Upscaler available"),
        Ok(()) => info!("Upscaler not available: {}", policy.reason()),
        Err(e) if e.leaves_engine_initialized() => warn!("{}, running with upscaler off", e),
        Err(e) => return Err(e.into()),
    }
    info!(
        "Recommended internal resolution: {}",
        policy.recommended_internal_resolution()
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let reporter = tokio::spawn(report_stats(
        policy.clone(),
        Duration::from_millis(config.demo.stats_interval_ms.max(1)),
        shutdown_rx.clone(),
    ));

    tokio::select! {
        _ = run_ticks(&policy, &config.demo) => {}
        result = tokio::signal::ctrl_c() => {
            match result {
                Ok(()) => info!("Received Ctrl+C, stopping early"),
                Err(e) => error!("Signal handler error: {}", e),
            }
        }
    }

    let _ = shutdown_tx.send(true);
    reporter
        .await
        .map_err(|e| DemoError::Runtime(format!("stats reporter failed: {}", e)))?;

    let stats = policy.stats();
    let summary = serde_json::to_string(&stats)
        .map_err(|e| DemoError::Runtime(format!("failed to serialize stats: {}", e)))?;
    info!("Final statistics: {}", summary);
    Ok(())
}

/// Feed one synthetic frame per tick.
async fn run_ticks(policy: &SharedPolicy, settings: &DemoSettings) {
    let mut interval =
        tokio::time::interval(Duration::from_millis(settings.tick_interval_ms.max(1)));
    let inputs = FrameInputs {
        jitter_x: 0.5,
        jitter_y: -0.5,
        ..FrameInputs::complete()
    };

    for tick in 0..settings.ticks {
        interval.tick().await;

        if tick == PRESET_SWITCH_TICK {
            policy.set_preset(QualityPreset::Performance);
        }
        if tick == MODE_SWITCH_TICK {
            policy.set_mode(OperatingMode::On);
        }

        let decision = policy.evaluate(synthetic_frame_time(tick, settings.ticks), &inputs);
        info!(
            "tick={} frame={:.2}ms smoothed={:.2}ms active={} fg={} mode={} preset={} internal={} out={} note={}",
            tick,
            decision.frame_time_ms,
            decision.smoothed_frame_time_ms,
            decision.upscaler_active,
            decision.frame_gen_active,
            decision.effective_mode,
            decision.effective_preset,
            decision.internal_resolution,
            decision.output_resolution,
            decision.note
        );
    }
}

/// Periodically log statistics until shutdown.
async fn report_stats(
    policy: SharedPolicy,
    period: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    break;
                }
            }
            _ = tokio::time::sleep(period) => {
                let stats = policy.stats();
                info!(
                    "frames={} active={} fg={} switches={} failures={} avg={:.2}ms p99={:.2}ms window={:?}",
                    stats.total_frames,
                    stats.upscaler_frames,
                    stats.frame_gen_frames,
                    stats.auto_mode_switches,
                    stats.validation_failures,
                    stats.average_frame_time_ms,
                    policy.frame_time_p99(),
                    policy.recent_frame_times()
                );
            }
        }
    }
}

/// Load that rises from 12ms to 36ms at mid-run and falls back.
fn synthetic_frame_time(tick: u32, total: u32) -> f64 {
    let total = total.max(2) as f64;
    let phase = tick as f64 / (total - 1.0);
    let triangle = 1.0 - (2.0 * phase - 1.0).abs();
    12.0 + 24.0 * triangle
}
