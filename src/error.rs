//! Error types for the frame pacer.
//!
//! Expected conditions (missing frame inputs, an unavailable backend) are
//! reported through decision fields, not errors. The enums here cover
//! initialization, configuration files, logging setup and the demo driver.

use thiserror::Error;

/// Errors returned by `FramePacingPolicy::initialize`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InitError {
    /// One of the four resolution dimensions is zero. The engine stays
    /// uninitialized.
    #[error(
        "invalid render/output resolution: render {render_width}x{render_height}, output {output_width}x{output_height}"
    )]
    InvalidResolution {
        render_width: u32,
        render_height: u32,
        output_width: u32,
        output_height: u32,
    },

    /// The engine is initialized and queryable, but the feature cannot run.
    #[error("upscaler unavailable: {reason}")]
    Unavailable { reason: String },
}

impl InitError {
    /// Whether the engine was left initialized (queryable, evaluates frames).
    pub fn leaves_engine_initialized(&self) -> bool {
        matches!(self, InitError::Unavailable { .. })
    }
}

/// Errors related to configuration management.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("Failed to write configuration: {0}")]
    WriteError(#[from] std::io::Error),
}

/// Errors related to logging initialization.
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Could not determine local data directory")]
    DataDirectoryNotFound,

    #[error("Failed to create log directory '{path}': {source}")]
    DirectoryCreationFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create log file appender: {0}")]
    AppenderCreationFailed(String),
}

/// Top-level errors of the demonstration driver.
#[derive(Error, Debug)]
pub enum DemoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    #[error("Initialization error: {0}")]
    Init(#[from] InitError),

    #[error("Runtime error: {0}")]
    Runtime(String),
}
