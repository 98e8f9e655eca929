//! Running statistics for the policy engine.
//!
//! Counts frames, activations and auto-mode switches, and keeps an
//! incrementally updated mean frame time.

use crate::types::OperatingMode;
use serde::{Deserialize, Serialize};

/// Snapshot of the engine statistics.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RuntimeStats {
    /// Frames evaluated since initialization or the last reset
    pub total_frames: u64,
    /// Frames with the upscaler active
    pub upscaler_frames: u64,
    /// Frames with frame generation active
    pub frame_gen_frames: u64,
    /// Effective-mode changes while configured for `Auto`
    pub auto_mode_switches: u64,
    /// Frames rejected by input validation
    pub validation_failures: u64,
    /// Mean of the (clamped) frame times seen
    pub average_frame_time_ms: f64,
    /// Effective mode of the most recent frame
    pub last_effective_mode: OperatingMode,
    /// Note attached to the most recent decision
    pub last_note: String,
}

impl RuntimeStats {
    /// Frames where the upscaler stayed inactive.
    pub fn inactive_frames(&self) -> u64 {
        self.total_frames - self.upscaler_frames
    }
}

/// One evaluated frame, as seen by the collector.
#[derive(Debug, Clone, Copy)]
pub struct FrameRecord<'a> {
    pub frame_time_ms: f64,
    pub configured_mode: OperatingMode,
    pub effective_mode: OperatingMode,
    pub upscaler_active: bool,
    pub frame_gen_active: bool,
    pub validation_failed: bool,
    pub note: &'a str,
}

/// Accumulates `RuntimeStats` one frame at a time.
#[derive(Debug, Clone)]
pub struct StatsCollector {
    stats: RuntimeStats,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self {
            stats: RuntimeStats {
                last_effective_mode: OperatingMode::Off,
                ..RuntimeStats::default()
            },
        }
    }

    /// Fold one frame into the statistics.
    ///
    /// Returns true when the frame counted as an auto-mode switch.
    pub fn record(&mut self, frame: FrameRecord<'_>) -> bool {
        let previous_frames = self.stats.total_frames;
        self.stats.total_frames += 1;

        if frame.upscaler_active {
            self.stats.upscaler_frames += 1;
        }
        if frame.frame_gen_active {
            self.stats.frame_gen_frames += 1;
        }
        if frame.validation_failed {
            self.stats.validation_failures += 1;
        }

        let switched = frame.configured_mode == OperatingMode::Auto
            && frame.effective_mode != self.stats.last_effective_mode;
        if switched {
            self.stats.auto_mode_switches += 1;
        }
        self.stats.last_effective_mode = frame.effective_mode;

        let n = (previous_frames + 1) as f64;
        self.stats.average_frame_time_ms +=
            (frame.frame_time_ms - self.stats.average_frame_time_ms) / n;

        self.stats.last_note.clear();
        self.stats.last_note.push_str(frame.note);

        switched
    }

    /// Copy of the current statistics.
    pub fn snapshot(&self) -> RuntimeStats {
        self.stats.clone()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for StatsCollector {
    fn default() -> Self {
        Self::new()
    }
}
