//! Configuration module for persistent settings.
//!
//! This module handles loading, saving, and validating the pacer
//! configuration: the engine's initialization record, its auto policy and
//! the demo driver's tick settings.

use crate::error::ConfigError;
use crate::hysteresis::AutoPolicy;
use crate::types::{OperatingMode, QualityPreset, Resolution};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Initialization record for the policy engine.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PacingConfig {
    /// Minimum safe internal resolution
    pub render_width: u32,
    pub render_height: u32,
    /// Target resolution
    pub output_width: u32,
    pub output_height: u32,
    pub enable_upscaler: bool,
    pub enable_frame_generation: bool,
    pub preset: QualityPreset,
    pub mode: OperatingMode,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            render_width: 1280,
            render_height: 720,
            output_width: 1920,
            output_height: 1080,
            enable_upscaler: true,
            enable_frame_generation: true,
            preset: QualityPreset::Quality,
            mode: OperatingMode::Auto,
        }
    }
}

impl PacingConfig {
    pub fn render_resolution(&self) -> Resolution {
        Resolution::new(self.render_width, self.render_height)
    }

    pub fn output_resolution(&self) -> Resolution {
        Resolution::new(self.output_width, self.output_height)
    }

    /// Validate configuration values.
    /// Returns Ok(()) if valid, Err with descriptive message if invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render_resolution().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "render resolution ({}) must be non-zero on both axes",
                self.render_resolution()
            )));
        }

        if self.output_resolution().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "output resolution ({}) must be non-zero on both axes",
                self.output_resolution()
            )));
        }

        Ok(())
    }
}

/// Demo driver cadence.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DemoSettings {
    /// Ticks to run before exiting
    pub ticks: u32,
    /// Delay between ticks
    pub tick_interval_ms: u64,
    /// Delay between statistics reports
    pub stats_interval_ms: u64,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            ticks: 30,
            tick_interval_ms: 10,
            stats_interval_ms: 100,
        }
    }
}

/// Everything persisted in the config file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct PacerConfig {
    pub pacing: PacingConfig,
    #[serde(default)]
    pub auto_policy: AutoPolicy,
    #[serde(default)]
    pub demo: DemoSettings,
}

impl PacerConfig {
    /// Validate the engine section and clamp the auto policy.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        self.pacing.validate()?;
        self.auto_policy = self.auto_policy.normalized();
        if self.demo.tick_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "tick_interval_ms must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }
}

/// Configuration manager with file I/O.
pub struct ConfigManager {
    config: RwLock<PacerConfig>,
    path: PathBuf,
}

impl ConfigManager {
    /// Load configuration from file or use defaults.
    /// If the file doesn't exist, returns a manager with default config.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        let config = if path.exists() {
            let contents = fs::read_to_string(path).map_err(|e| {
                ConfigError::ParseError(format!("Failed to read config file: {}", e))
            })?;

            let config: PacerConfig = serde_json::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(format!("Invalid JSON: {}", e)))?;

            config.validated()?
        } else {
            PacerConfig::default()
        };

        Ok(Self {
            config: RwLock::new(config),
            path: path.to_path_buf(),
        })
    }

    /// Save configuration to file using atomic write.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config = self.config.read().map_err(|_| {
            ConfigError::ValidationError("Failed to acquire read lock".to_string())
        })?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write to a sibling temp file, then rename over the target
        let temp_path = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(&*config)
            .map_err(|e| ConfigError::ParseError(format!("Failed to serialize config: {}", e)))?;

        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }

        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }

    /// Get current configuration.
    pub fn get(&self) -> PacerConfig {
        self.config
            .read()
            .map(|c| c.clone())
            .unwrap_or_else(|_| PacerConfig::default())
    }

    /// Validate, store and persist a new configuration.
    pub fn update(&self, config: PacerConfig) -> Result<(), ConfigError> {
        let config = config.validated()?;

        let mut current = self.config.write().map_err(|_| {
            ConfigError::ValidationError("Failed to acquire write lock".to_string())
        })?;
        *current = config;
        drop(current);

        self.save()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Default config path (`<config dir>/frame-pacer/config.json`).
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("frame-pacer")
            .join("config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_default() {
        let config = PacerConfig::default();
        assert_eq!(config.pacing.output_resolution(), Resolution::new(1920, 1080));
        assert_eq!(config.pacing.mode, OperatingMode::Auto);
        assert_eq!(config.auto_policy, AutoPolicy::default());
        assert_eq!(config.demo.ticks, 30);
        assert!(config.pacing.validate().is_ok());
    }

    #[test]
    fn test_config_manager_load_nonexistent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nonexistent.json");

        let manager = ConfigManager::load_or_default(&path).unwrap();
        assert_eq!(manager.get(), PacerConfig::default());
        assert_eq!(manager.path(), path.as_path());
    }

    #[test]
    fn test_config_manager_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let manager = ConfigManager::load_or_default(&path).unwrap();
        let mut config = manager.get();
        config.pacing.preset = QualityPreset::UltraPerformance;
        config.pacing.mode = OperatingMode::On;
        config.auto_policy.smoothing_window_frames = 12;
        manager.update(config.clone()).unwrap();

        let loaded = ConfigManager::load_or_default(&path).unwrap().get();
        assert_eq!(loaded, config);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_zero_resolution_rejected() {
        let config = PacingConfig {
            output_width: 0,
            ..PacingConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("output resolution"));
    }

    #[test]
    fn test_update_rejects_invalid_and_keeps_previous() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let manager = ConfigManager::load_or_default(&path).unwrap();

        let mut bad = manager.get();
        bad.pacing.render_height = 0;
        assert!(manager.update(bad).is_err());
        assert_eq!(manager.get(), PacerConfig::default());
        assert!(!path.exists());
    }

    #[test]
    fn test_loaded_auto_policy_is_clamped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let json = r#"{
            "pacing": {
                "render_width": 1280, "render_height": 720,
                "output_width": 1920, "output_height": 1080,
                "enable_upscaler": true, "enable_frame_generation": false,
                "preset": "balanced", "mode": "on"
            },
            "auto_policy": {
                "off_threshold_ms": 0.5, "on_threshold_ms": 0.2,
                "smoothing_window_frames": 0, "dynamic_preset": false
            }
        }"#;
        fs::write(&path, json).unwrap();

        let config = ConfigManager::load_or_default(&path).unwrap().get();
        assert_eq!(config.pacing.preset, QualityPreset::Balanced);
        assert_eq!(config.auto_policy.off_threshold_ms, 1.0);
        assert_eq!(config.auto_policy.on_threshold_ms, 1.0);
        assert_eq!(config.auto_policy.smoothing_window_frames, 1);
        assert_eq!(config.auto_policy.fallback_mode, OperatingMode::Off);
        assert_eq!(config.demo, DemoSettings::default());
    }

    #[test]
    fn test_invalid_preset_name_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut value = serde_json::to_value(PacerConfig::default()).unwrap();
        value["pacing"]["preset"] = serde_json::Value::from("turbo");
        fs::write(&path, value.to_string()).unwrap();

        let err = ConfigManager::load_or_default(&path).err().unwrap();
        assert!(err.to_string().contains("invalid preset: turbo"));
    }

    fn preset_strategy() -> impl Strategy<Value = QualityPreset> {
        prop_oneof![
            Just(QualityPreset::Quality),
            Just(QualityPreset::Balanced),
            Just(QualityPreset::Performance),
            Just(QualityPreset::UltraPerformance),
        ]
    }

    fn mode_strategy() -> impl Strategy<Value = OperatingMode> {
        prop_oneof![
            Just(OperatingMode::Off),
            Just(OperatingMode::Auto),
            Just(OperatingMode::On),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn prop_config_file_round_trip(
            render in (1u32..4000, 1u32..4000),
            output in (1u32..8000, 1u32..8000),
            flags in (any::<bool>(), any::<bool>()),
            preset in preset_strategy(),
            mode in mode_strategy(),
            window in 1usize..64,
        ) {
            let mut config = PacerConfig::default();
            config.pacing = PacingConfig {
                render_width: render.0,
                render_height: render.1,
                output_width: output.0,
                output_height: output.1,
                enable_upscaler: flags.0,
                enable_frame_generation: flags.1,
                preset,
                mode,
            };
            config.auto_policy.smoothing_window_frames = window;

            let dir = tempdir().unwrap();
            let path = dir.path().join("config.json");
            let manager = ConfigManager::load_or_default(&path).unwrap();
            manager.update(config.clone()).unwrap();

            let loaded = ConfigManager::load_or_default(&path).unwrap().get();
            prop_assert_eq!(config, loaded);
        }
    }
}
