//! Deterministic stand-in for a hardware/driver capability probe.
//!
//! The real upscaler runtime only exists on one platform family. No device
//! is queried here: the outcome depends only on the platform and the
//! configuration flags.

use crate::types::UpscalerBackend;

/// Reason reported when both features are switched off in configuration.
pub const DISABLED_BY_CONFIG: &str = "disabled by configuration";
/// Reason reported on platforms without the upscaler runtime.
pub const UNSUPPORTED_PLATFORM: &str =
    "runtime requires an unsupported platform/driver pipeline";
/// Reason reported on the supported platform when only frame generation is requested.
pub const UPSCALER_NOT_REQUESTED: &str =
    "upscaler requested but unavailable on this adapter/runtime";

/// Operating-system family the engine believes it runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformFamily {
    Windows,
    Linux,
    MacOs,
    Other,
}

impl PlatformFamily {
    /// The family this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            PlatformFamily::Windows
        } else if cfg!(target_os = "linux") {
            PlatformFamily::Linux
        } else if cfg!(target_os = "macos") {
            PlatformFamily::MacOs
        } else {
            PlatformFamily::Other
        }
    }

    /// Whether the upscaler runtime ships for this family.
    pub fn supports_upscaler(&self) -> bool {
        matches!(self, PlatformFamily::Windows)
    }
}

/// Result of probing the platform for a given configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    Available(UpscalerBackend),
    /// Not an error: the engine runs with the feature off.
    DisabledByConfig,
    Unavailable(&'static str),
}

impl Capability {
    pub fn is_available(&self) -> bool {
        matches!(self, Capability::Available(_))
    }

    pub fn backend(&self) -> UpscalerBackend {
        match self {
            Capability::Available(backend) => *backend,
            _ => UpscalerBackend::None,
        }
    }

    /// Human-readable reason, empty when available.
    pub fn reason(&self) -> &'static str {
        match self {
            Capability::Available(_) => "",
            Capability::DisabledByConfig => DISABLED_BY_CONFIG,
            Capability::Unavailable(reason) => *reason,
        }
    }
}

/// Decide availability from the platform and the feature flags.
pub fn probe(
    platform: PlatformFamily,
    enable_upscaler: bool,
    enable_frame_generation: bool,
) -> Capability {
    if !enable_upscaler && !enable_frame_generation {
        return Capability::DisabledByConfig;
    }

    if !platform.supports_upscaler() {
        return Capability::Unavailable(UNSUPPORTED_PLATFORM);
    }

    if enable_upscaler {
        Capability::Available(UpscalerBackend::Upscaler)
    } else {
        Capability::Unavailable(UPSCALER_NOT_REQUESTED)
    }
}
