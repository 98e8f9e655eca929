//! Auto-mode hysteresis and dynamic preset tiering.
//!
//! In `Auto` mode the smoothed frame time must clear the on-threshold to
//! enable the upscaler and fall to the off-threshold to disable it. Inside
//! the band the previous effective mode is kept, so a single ambiguous
//! sample cannot flip state.

use crate::types::{OperatingMode, QualityPreset};
use serde::{Deserialize, Serialize};

/// Lowest accepted off-threshold, in milliseconds.
pub const MIN_OFF_THRESHOLD_MS: f64 = 1.0;

/// Smoothed frame time at or above which `UltraPerformance` is selected.
pub const ULTRA_PERFORMANCE_TIER_MS: f64 = 32.0;
/// Smoothed frame time at or above which `Performance` is selected.
pub const PERFORMANCE_TIER_MS: f64 = 24.0;
/// Smoothed frame time at or above which `Balanced` is selected.
pub const BALANCED_TIER_MS: f64 = 18.0;

/// Tuning for `Auto` mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoPolicy {
    /// At or below this smoothed frame time the upscaler turns off.
    pub off_threshold_ms: f64,
    /// At or above this smoothed frame time the upscaler turns on.
    pub on_threshold_ms: f64,
    /// Number of frames averaged for the smoothed frame time.
    pub smoothing_window_frames: usize,
    /// Pick the preset from the smoothed frame time instead of the configured one.
    pub dynamic_preset: bool,
    /// Mode used inside the band before any mode has been resolved.
    #[serde(default = "default_fallback_mode")]
    pub fallback_mode: OperatingMode,
}

fn default_fallback_mode() -> OperatingMode {
    OperatingMode::Off
}

impl Default for AutoPolicy {
    fn default() -> Self {
        Self {
            off_threshold_ms: 16.5,
            on_threshold_ms: 19.5,
            smoothing_window_frames: 6,
            dynamic_preset: true,
            fallback_mode: OperatingMode::Off,
        }
    }
}

impl AutoPolicy {
    /// Clamp into the accepted ranges: off >= 1 ms, on >= off, window >= 1,
    /// and a fallback mode of `Off` or `On`.
    pub fn normalized(mut self) -> Self {
        self.off_threshold_ms = self.off_threshold_ms.max(MIN_OFF_THRESHOLD_MS);
        self.on_threshold_ms = self.on_threshold_ms.max(self.off_threshold_ms);
        self.smoothing_window_frames = self.smoothing_window_frames.max(1);
        if self.fallback_mode == OperatingMode::Auto {
            self.fallback_mode = OperatingMode::Off;
        }
        self
    }
}

/// What the previous tick resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BandState {
    /// No tick resolved since initialization or the last reset.
    #[default]
    Undecided,
    ForcedOff,
    ForcedOn,
}

impl BandState {
    /// Record a resolved effective mode.
    pub fn from_effective(mode: OperatingMode) -> Self {
        match mode {
            OperatingMode::On => BandState::ForcedOn,
            OperatingMode::Off => BandState::ForcedOff,
            OperatingMode::Auto => BandState::Undecided,
        }
    }
}

/// Resolve the effective mode for one tick. Never returns `Auto`.
pub fn resolve_mode(
    configured: OperatingMode,
    smoothed_ms: f64,
    policy: &AutoPolicy,
    prior: BandState,
) -> OperatingMode {
    match configured {
        OperatingMode::Off => OperatingMode::Off,
        OperatingMode::On => OperatingMode::On,
        OperatingMode::Auto => {
            if smoothed_ms >= policy.on_threshold_ms {
                OperatingMode::On
            } else if smoothed_ms <= policy.off_threshold_ms {
                OperatingMode::Off
            } else {
                match prior {
                    BandState::ForcedOn => OperatingMode::On,
                    BandState::ForcedOff => OperatingMode::Off,
                    BandState::Undecided => match policy.fallback_mode {
                        OperatingMode::On => OperatingMode::On,
                        _ => OperatingMode::Off,
                    },
                }
            }
        }
    }
}

/// Preset tier for a smoothed frame time. Lower bounds are inclusive.
pub fn tier_for(smoothed_ms: f64) -> QualityPreset {
    if smoothed_ms >= ULTRA_PERFORMANCE_TIER_MS {
        QualityPreset::UltraPerformance
    } else if smoothed_ms >= PERFORMANCE_TIER_MS {
        QualityPreset::Performance
    } else if smoothed_ms >= BALANCED_TIER_MS {
        QualityPreset::Balanced
    } else {
        QualityPreset::Quality
    }
}

/// Resolve the effective preset. `Off` always runs at `Quality`.
pub fn resolve_preset(
    effective_mode: OperatingMode,
    configured: QualityPreset,
    smoothed_ms: f64,
    dynamic_preset: bool,
) -> QualityPreset {
    if effective_mode == OperatingMode::Off {
        QualityPreset::Quality
    } else if !dynamic_preset {
        configured
    } else {
        tier_for(smoothed_ms)
    }
}
