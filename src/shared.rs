//! Thread-safe handle to a policy engine.
//!
//! Mutating calls are serialized behind the write lock. Snapshot queries
//! take the read lock and may run concurrently with each other.

use crate::config::PacingConfig;
use crate::error::InitError;
use crate::hysteresis::AutoPolicy;
use crate::metrics::RuntimeStats;
use crate::policy::FramePacingPolicy;
use crate::types::{FrameDecision, FrameInputs, OperatingMode, QualityPreset, Resolution};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Cloneable handle; every clone drives the same engine.
#[derive(Debug, Clone)]
pub struct SharedPolicy {
    inner: Arc<RwLock<FramePacingPolicy>>,
}

impl SharedPolicy {
    pub fn new(policy: FramePacingPolicy) -> Self {
        Self {
            inner: Arc::new(RwLock::new(policy)),
        }
    }

    // The engine never panics mid-update, so a poisoned lock still guards
    // consistent state.
    fn read(&self) -> RwLockReadGuard<'_, FramePacingPolicy> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, FramePacingPolicy> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn initialize(&self, config: &PacingConfig) -> Result<(), InitError> {
        self.write().initialize(config)
    }

    pub fn evaluate(&self, frame_time_ms: f64, inputs: &FrameInputs) -> FrameDecision {
        self.write().evaluate(frame_time_ms, inputs)
    }

    pub fn set_mode(&self, mode: OperatingMode) {
        self.write().set_mode(mode);
    }

    pub fn set_preset(&self, preset: QualityPreset) {
        self.write().set_preset(preset);
    }

    pub fn set_auto_policy(&self, policy: AutoPolicy) {
        self.write().set_auto_policy(policy);
    }

    pub fn reset_stats(&self) {
        self.write().reset_stats();
    }

    pub fn stats(&self) -> RuntimeStats {
        self.read().stats()
    }

    pub fn recent_frame_times(&self) -> Vec<f64> {
        self.read().recent_frame_times()
    }

    pub fn frame_time_p99(&self) -> f64 {
        self.read().frame_time_p99()
    }

    pub fn recommended_internal_resolution(&self) -> Resolution {
        self.read().recommended_internal_resolution()
    }

    pub fn available(&self) -> bool {
        self.read().available()
    }

    pub fn reason(&self) -> String {
        self.read().reason().to_string()
    }

    pub fn mode(&self) -> OperatingMode {
        self.read().mode()
    }

    pub fn preset(&self) -> QualityPreset {
        self.read().preset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::PlatformFamily;

    fn shared() -> SharedPolicy {
        let shared = SharedPolicy::new(FramePacingPolicy::for_platform(PlatformFamily::Windows));
        shared.initialize(&PacingConfig::default()).unwrap();
        shared
    }

    #[test]
    fn test_clones_share_state() {
        let a = shared();
        let b = a.clone();

        a.set_mode(OperatingMode::On);
        b.evaluate(16.0, &FrameInputs::complete());

        assert_eq!(b.mode(), OperatingMode::On);
        assert_eq!(a.stats().total_frames, 1);
        assert_eq!(a.recent_frame_times(), vec![16.0]);
        assert!(a.available());
        assert!(a.reason().is_empty());
    }

    #[test]
    fn test_concurrent_evaluations_are_serialized() {
        let policy = shared();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let policy = policy.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        policy.evaluate(10.0 + i as f64, &FrameInputs::complete());
                        let _ = policy.stats();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = policy.stats();
        assert_eq!(stats.total_frames, 100);
        assert!(policy.recent_frame_times().len() <= 6);
    }

    #[test]
    fn test_reset_through_handle() {
        let policy = shared();
        policy.set_preset(QualityPreset::Performance);
        policy.set_auto_policy(AutoPolicy {
            smoothing_window_frames: 2,
            ..AutoPolicy::default()
        });
        for ms in [20.0, 21.0, 22.0] {
            policy.evaluate(ms, &FrameInputs::complete());
        }
        assert_eq!(policy.recent_frame_times(), vec![21.0, 22.0]);
        assert_eq!(policy.frame_time_p99(), 22.0);

        policy.reset_stats();
        assert_eq!(policy.stats().total_frames, 0);
        assert!(policy.recent_frame_times().is_empty());
        assert_eq!(policy.preset(), QualityPreset::Performance);
    }
}
