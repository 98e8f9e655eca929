//! Frame Pacer - adaptive upscaler and frame-generation policy.
//!
//! `FramePacingPolicy` turns a stream of observed frame times into per-frame
//! decisions: whether the upscaler runs, at which preset, at what internal
//! resolution, and whether frame generation may run. Decisions are damped
//! by a smoothing window and a hysteresis band so the mode does not thrash.

pub mod capability;
pub mod config;
pub mod error;
pub mod frame_window;
pub mod geometry;
pub mod hysteresis;
pub mod logging;
pub mod metrics;
pub mod policy;
pub mod shared;
pub mod types;

pub use capability::PlatformFamily;
pub use config::{PacerConfig, PacingConfig};
pub use error::InitError;
pub use hysteresis::AutoPolicy;
pub use metrics::RuntimeStats;
pub use policy::FramePacingPolicy;
pub use shared::SharedPolicy;
pub use types::{FrameDecision, FrameInputs, OperatingMode, QualityPreset, Resolution};
