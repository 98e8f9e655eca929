//! Frame-pacing policy engine.
//!
//! Every tick the host reports a frame time and which render inputs it has.
//! The engine smooths the frame time over a bounded window, resolves the
//! effective mode (hysteresis in `Auto`) and preset (optional tiering),
//! validates the inputs, computes the internal render resolution, and
//! folds the outcome into running statistics.
//!
//! The engine only decides intent and geometry. It never touches pixels.

use crate::capability::{self, Capability, PlatformFamily};
use crate::config::PacingConfig;
use crate::error::InitError;
use crate::frame_window::FrameTimeWindow;
use crate::geometry;
use crate::hysteresis::{self, AutoPolicy, BandState};
use crate::metrics::{FrameRecord, RuntimeStats, StatsCollector};
use crate::types::{
    FrameDecision, FrameInputs, OperatingMode, QualityPreset, Resolution, UpscalerBackend,
};
use tracing::{debug, info, warn};

pub const NOTE_NOT_INITIALIZED: &str = "not initialized";
pub const NOTE_INVALID_RESOLUTION: &str = "invalid render/output resolution";
pub const NOTE_MODE_OFF: &str = "mode off";
pub const NOTE_AUTO_SELECTED: &str = "auto-selected";
pub const NOTE_READY: &str = "ready";

/// Adaptive upscaler and frame-generation policy. One instance per render context.
#[derive(Debug, Clone)]
pub struct FramePacingPolicy {
    platform: PlatformFamily,
    initialized: bool,
    available: bool,
    reason: String,
    backend: UpscalerBackend,

    mode: OperatingMode,
    preset: QualityPreset,
    render: Resolution,
    output: Resolution,
    frame_gen_enabled: bool,

    auto_policy: AutoPolicy,
    window: FrameTimeWindow,
    band: BandState,
    stats: StatsCollector,
    inputs_were_valid: bool,
}

impl FramePacingPolicy {
    /// Engine probing the platform this binary was built for.
    pub fn new() -> Self {
        Self::for_platform(PlatformFamily::current())
    }

    /// Engine probing an explicit platform family.
    pub fn for_platform(platform: PlatformFamily) -> Self {
        let auto_policy = AutoPolicy::default();
        Self {
            platform,
            initialized: false,
            available: false,
            reason: String::new(),
            backend: UpscalerBackend::None,
            mode: OperatingMode::Off,
            preset: QualityPreset::Quality,
            render: Resolution::default(),
            output: Resolution::default(),
            frame_gen_enabled: false,
            window: FrameTimeWindow::with_capacity(auto_policy.smoothing_window_frames),
            auto_policy,
            band: BandState::Undecided,
            stats: StatsCollector::new(),
            inputs_were_valid: true,
        }
    }

    /// Apply a configuration and probe availability.
    ///
    /// Statistics, the smoothing window and the hysteresis state are reset
    /// whatever the outcome. On `InitError::Unavailable` the engine is still
    /// initialized: setters work and `evaluate` runs, it just never
    /// activates the upscaler.
    pub fn initialize(&mut self, config: &PacingConfig) -> Result<(), InitError> {
        self.initialized = false;
        self.available = false;
        self.reason.clear();
        self.backend = UpscalerBackend::None;
        self.reset_stats();

        let render = config.render_resolution();
        let output = config.output_resolution();
        if render.is_empty() || output.is_empty() {
            self.reason.push_str(NOTE_INVALID_RESOLUTION);
            warn!("Rejected configuration: render {}, output {}", render, output);
            return Err(InitError::InvalidResolution {
                render_width: render.width,
                render_height: render.height,
                output_width: output.width,
                output_height: output.height,
            });
        }

        self.render = render;
        self.output = output;
        self.mode = config.mode;
        self.preset = config.preset;
        self.frame_gen_enabled = config.enable_frame_generation;

        let capability = capability::probe(
            self.platform,
            config.enable_upscaler,
            config.enable_frame_generation,
        );
        self.available = capability.is_available();
        self.backend = capability.backend();
        self.reason.push_str(capability.reason());
        self.initialized = true;

        match capability {
            Capability::Available(backend) => {
                info!(
                    "Upscaler available (backend: {:?}, output {}, render floor {}, mode {}, preset {})",
                    backend, output, render, self.mode, self.preset
                );
                Ok(())
            }
            Capability::DisabledByConfig => {
                info!("Upscaler and frame generation disabled by configuration");
                Ok(())
            }
            Capability::Unavailable(reason) => {
                warn!("Upscaler unavailable on {:?}: {}", self.platform, reason);
                Err(InitError::Unavailable {
                    reason: reason.to_string(),
                })
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn available(&self) -> bool {
        self.available
    }

    /// Why the feature is unavailable, empty when it is available.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn backend(&self) -> UpscalerBackend {
        self.backend
    }

    pub fn platform(&self) -> PlatformFamily {
        self.platform
    }

    pub fn output_resolution(&self) -> Resolution {
        self.output
    }

    pub fn render_resolution(&self) -> Resolution {
        self.render
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    /// Takes effect from the next `evaluate`.
    pub fn set_mode(&mut self, mode: OperatingMode) {
        debug!("Mode set to {}", mode);
        self.mode = mode;
    }

    pub fn preset(&self) -> QualityPreset {
        self.preset
    }

    /// Takes effect from the next `evaluate`.
    pub fn set_preset(&mut self, preset: QualityPreset) {
        debug!("Preset set to {}", preset);
        self.preset = preset;
    }

    pub fn auto_policy(&self) -> &AutoPolicy {
        &self.auto_policy
    }

    /// Replace the auto policy, clamped to its invariants.
    ///
    /// A shorter window drops the oldest samples right away, so the next
    /// smoothed value only sees the retained ones.
    pub fn set_auto_policy(&mut self, policy: AutoPolicy) {
        self.auto_policy = policy.normalized();
        self.window
            .truncate_to(self.auto_policy.smoothing_window_frames);
        info!(
            "Auto policy updated (off {:.2}ms, on {:.2}ms, window {}, dynamic preset {})",
            self.auto_policy.off_threshold_ms,
            self.auto_policy.on_threshold_ms,
            self.auto_policy.smoothing_window_frames,
            self.auto_policy.dynamic_preset
        );
    }

    /// Internal resolution for the configured mode and preset, before any
    /// frame has been evaluated.
    pub fn recommended_internal_resolution(&self) -> Resolution {
        if !self.initialized || !self.available || self.mode == OperatingMode::Off {
            return self.output;
        }
        geometry::internal_resolution(self.output, self.render, self.preset)
    }

    /// Input check against the configured mode.
    pub fn validate_frame_inputs(&self, inputs: &FrameInputs) -> Option<&'static str> {
        if !self.initialized {
            return Some(NOTE_NOT_INITIALIZED);
        }
        self.input_error(inputs, self.mode)
    }

    fn input_error(
        &self,
        inputs: &FrameInputs,
        effective_mode: OperatingMode,
    ) -> Option<&'static str> {
        if effective_mode == OperatingMode::Off || !self.available {
            return None;
        }
        inputs.first_missing()
    }

    /// Decide what to run for one frame.
    pub fn evaluate(&mut self, frame_time_ms: f64, inputs: &FrameInputs) -> FrameDecision {
        if !self.initialized {
            return FrameDecision {
                frame_time_ms,
                smoothed_frame_time_ms: 0.0,
                upscaler_active: false,
                frame_gen_active: false,
                effective_mode: OperatingMode::Off,
                effective_preset: QualityPreset::Quality,
                internal_resolution: self.output,
                output_resolution: self.output,
                upscale_ratio: geometry::MAX_UPSCALE_RATIO,
                note: NOTE_NOT_INITIALIZED.to_string(),
            };
        }

        let smoothed = self.window.push(frame_time_ms);

        let effective_mode =
            hysteresis::resolve_mode(self.mode, smoothed, &self.auto_policy, self.band);
        self.band = BandState::from_effective(effective_mode);

        let effective_preset = hysteresis::resolve_preset(
            effective_mode,
            self.preset,
            smoothed,
            self.auto_policy.dynamic_preset,
        );

        let input_error = self.input_error(inputs, effective_mode);
        let can_run =
            self.available && effective_mode != OperatingMode::Off && input_error.is_none();
        let frame_gen_active =
            can_run && self.frame_gen_enabled && effective_mode == OperatingMode::On;

        let internal_resolution = if can_run {
            geometry::internal_resolution(self.output, self.render, effective_preset)
        } else {
            self.output
        };
        let upscale_ratio = geometry::upscale_ratio(internal_resolution, self.output);

        let note = match input_error {
            Some(err) => err,
            None if !self.available => self.reason.as_str(),
            None if effective_mode == OperatingMode::Off => NOTE_MODE_OFF,
            None if self.mode == OperatingMode::Auto => NOTE_AUTO_SELECTED,
            None => NOTE_READY,
        }
        .to_string();

        match input_error {
            Some(err) if self.inputs_were_valid => warn!("Frame inputs rejected: {}", err),
            None if !self.inputs_were_valid => info!("Frame inputs complete again"),
            _ => {}
        }
        self.inputs_were_valid = input_error.is_none();

        let switched = self.stats.record(FrameRecord {
            frame_time_ms: FrameTimeWindow::sanitize(frame_time_ms),
            configured_mode: self.mode,
            effective_mode,
            upscaler_active: can_run,
            frame_gen_active,
            validation_failed: input_error.is_some(),
            note: &note,
        });
        if switched {
            info!(
                "Auto mode switched to {} (smoothed {:.2}ms, preset {})",
                effective_mode, smoothed, effective_preset
            );
        }

        debug!(
            "Frame {:.2}ms (smoothed {:.2}ms): mode {}, preset {}, internal {}, fg {}, {}",
            frame_time_ms,
            smoothed,
            effective_mode,
            effective_preset,
            internal_resolution,
            frame_gen_active,
            note
        );

        FrameDecision {
            frame_time_ms,
            smoothed_frame_time_ms: smoothed,
            upscaler_active: can_run,
            frame_gen_active,
            effective_mode,
            effective_preset,
            internal_resolution,
            output_resolution: self.output,
            upscale_ratio,
            note,
        }
    }

    /// Copy of the running statistics.
    pub fn stats(&self) -> RuntimeStats {
        self.stats.snapshot()
    }

    /// Clear statistics, the smoothing window and the hysteresis state.
    pub fn reset_stats(&mut self) {
        self.stats.reset();
        self.window.clear();
        self.band = BandState::Undecided;
        self.inputs_were_valid = true;
    }

    /// Copy of the smoothing window, oldest first.
    pub fn recent_frame_times(&self) -> Vec<f64> {
        self.window.snapshot()
    }

    /// 99th-percentile frame time over the smoothing window, 0.0 when empty.
    pub fn frame_time_p99(&self) -> f64 {
        self.window.p99()
    }
}

impl Default for FramePacingPolicy {
    fn default() -> Self {
        Self::new()
    }
}
