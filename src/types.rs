//! Value types shared by the policy engine and its host.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Operating mode requested for the upscaler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OperatingMode {
    /// Feature forced disabled.
    #[default]
    Off,
    /// Engine decides from smoothed frame times, with hysteresis.
    Auto,
    /// Feature forced enabled, subject to availability and input validation.
    On,
}

/// Quality preset, each mapped to a fixed internal-resolution scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QualityPreset {
    #[default]
    Quality,
    Balanced,
    Performance,
    UltraPerformance,
}

/// Backend selected at initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpscalerBackend {
    #[default]
    None,
    Upscaler,
}

/// Failure to parse a mode or preset name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}, expected one of: {expected}")]
pub struct ParseNameError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl OperatingMode {
    pub const ALL: [OperatingMode; 3] = [OperatingMode::Off, OperatingMode::Auto, OperatingMode::On];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperatingMode::Off => "off",
            OperatingMode::Auto => "auto",
            OperatingMode::On => "on",
        }
    }

    /// Parse a persisted name, treating anything unknown as `Off`.
    pub fn parse_lossy(s: &str) -> Self {
        s.parse().unwrap_or(OperatingMode::Off)
    }
}

impl FromStr for OperatingMode {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "off" => Ok(OperatingMode::Off),
            "auto" => Ok(OperatingMode::Auto),
            "on" => Ok(OperatingMode::On),
            _ => Err(ParseNameError {
                kind: "mode",
                value: s.to_string(),
                expected: "off, auto, on",
            }),
        }
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl QualityPreset {
    pub const ALL: [QualityPreset; 4] = [
        QualityPreset::Quality,
        QualityPreset::Balanced,
        QualityPreset::Performance,
        QualityPreset::UltraPerformance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Quality => "quality",
            QualityPreset::Balanced => "balanced",
            QualityPreset::Performance => "performance",
            QualityPreset::UltraPerformance => "ultra_performance",
        }
    }

    /// Parse a persisted name, treating anything unknown as `Quality`.
    pub fn parse_lossy(s: &str) -> Self {
        s.parse().unwrap_or(QualityPreset::Quality)
    }
}

impl FromStr for QualityPreset {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quality" => Ok(QualityPreset::Quality),
            "balanced" => Ok(QualityPreset::Balanced),
            "performance" => Ok(QualityPreset::Performance),
            "ultra_performance" | "ultraperformance" => Ok(QualityPreset::UltraPerformance),
            _ => Err(ParseNameError {
                kind: "preset",
                value: s.to_string(),
                expected: "quality, balanced, performance, ultra_performance",
            }),
        }
    }
}

impl fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Modes and presets are persisted by name.
impl Serialize for OperatingMode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OperatingMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for QualityPreset {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for QualityPreset {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Which rendering inputs the host can supply this frame.
///
/// Jitter offsets are carried for forward compatibility; no decision reads them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameInputs {
    pub has_color: bool,
    pub has_depth: bool,
    pub has_motion_vectors: bool,
    pub has_exposure: bool,
    pub jitter_x: f32,
    pub jitter_y: f32,
}

impl FrameInputs {
    /// All four inputs present, zero jitter.
    pub fn complete() -> Self {
        Self {
            has_color: true,
            has_depth: true,
            has_motion_vectors: true,
            has_exposure: true,
            jitter_x: 0.0,
            jitter_y: 0.0,
        }
    }

    /// First missing input, checked as color, depth, motion vectors, exposure.
    pub fn first_missing(&self) -> Option<&'static str> {
        if !self.has_color {
            Some("missing color input")
        } else if !self.has_depth {
            Some("missing depth input")
        } else if !self.has_motion_vectors {
            Some("missing motion vectors input")
        } else if !self.has_exposure {
            Some("missing exposure input")
        } else {
            None
        }
    }
}

/// Per-tick output of the policy engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameDecision {
    /// Frame time exactly as supplied by the caller.
    pub frame_time_ms: f64,
    pub smoothed_frame_time_ms: f64,
    pub upscaler_active: bool,
    pub frame_gen_active: bool,
    pub effective_mode: OperatingMode,
    pub effective_preset: QualityPreset,
    pub internal_resolution: Resolution,
    pub output_resolution: Resolution,
    /// Internal width over output width, clamped to [0.1, 1.0].
    pub upscale_ratio: f32,
    pub note: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_names() {
        assert_eq!(OperatingMode::Auto.as_str(), "auto");
        assert_eq!(OperatingMode::Off.to_string(), "off");
        assert_eq!("ON".parse::<OperatingMode>().unwrap(), OperatingMode::On);
    }

    #[test]
    fn test_preset_names() {
        assert_eq!(QualityPreset::Balanced.as_str(), "balanced");
        assert_eq!(
            "ultra_performance".parse::<QualityPreset>().unwrap(),
            QualityPreset::UltraPerformance
        );
    }

    #[test]
    fn test_lossy_parse_falls_back() {
        assert_eq!(OperatingMode::parse_lossy("sideways"), OperatingMode::Off);
        assert_eq!(QualityPreset::parse_lossy(""), QualityPreset::Quality);
        assert_eq!(QualityPreset::parse_lossy("performance"), QualityPreset::Performance);
    }

    #[test]
    fn test_strict_parse_reports_expected_names() {
        let err = "turbo".parse::<QualityPreset>().unwrap_err().to_string();
        assert!(err.contains("invalid preset: turbo"));
        assert!(err.contains("ultra_performance"));
    }

    #[test]
    fn test_mode_serialization() {
        let json = serde_json::to_string(&OperatingMode::Auto).unwrap();
        assert_eq!(json, "\"auto\"");
        let result: Result<OperatingMode, _> = serde_json::from_str("\"maybe\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_every_name_parses_back() {
        for mode in OperatingMode::ALL {
            assert_eq!(mode.as_str().parse::<OperatingMode>().unwrap(), mode);
        }
        for preset in QualityPreset::ALL {
            assert_eq!(preset.as_str().parse::<QualityPreset>().unwrap(), preset);
        }
    }

    #[test]
    fn test_first_missing_order() {
        let mut inputs = FrameInputs::default();
        assert_eq!(inputs.first_missing(), Some("missing color input"));
        inputs.has_color = true;
        inputs.has_exposure = true;
        assert_eq!(inputs.first_missing(), Some("missing depth input"));
        inputs.has_depth = true;
        assert_eq!(inputs.first_missing(), Some("missing motion vectors input"));
        assert_eq!(FrameInputs::complete().first_missing(), None);
    }
}
