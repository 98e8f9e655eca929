//! Bounded frame-time history used for smoothing.

use std::collections::VecDeque;

/// Smallest frame time accepted into the window, in milliseconds.
pub const MIN_FRAME_TIME_MS: f64 = 0.1;
/// Stand-in for an infinite frame time, in milliseconds.
pub const STALLED_FRAME_TIME_MS: f64 = 1000.0;

/// Ring buffer of recent frame times with a resizable capacity.
///
/// Samples are kept oldest first; pushing past capacity evicts from the front.
#[derive(Debug, Clone)]
pub struct FrameTimeWindow {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl FrameTimeWindow {
    /// Create a window holding at most `capacity` samples (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Clamp a raw frame time to the accepted minimum.
    ///
    /// NaN and negative infinity become the minimum, positive infinity
    /// becomes `STALLED_FRAME_TIME_MS`.
    pub fn sanitize(frame_time_ms: f64) -> f64 {
        if frame_time_ms == f64::INFINITY {
            return STALLED_FRAME_TIME_MS;
        }
        frame_time_ms.max(MIN_FRAME_TIME_MS)
    }

    /// Push a sample and return the new mean.
    pub fn push(&mut self, frame_time_ms: f64) -> f64 {
        self.samples.push_back(Self::sanitize(frame_time_ms));
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
        self.mean()
    }

    /// Arithmetic mean of retained samples, 0.0 when empty.
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.samples.iter().sum();
        sum / self.samples.len() as f64
    }

    /// Get the percentile value of the retained frame times.
    ///
    /// `p` is between 0.0 and 1.0 (0.99 for P99). Returns 0.0 when empty.
    pub fn percentile(&self, p: f64) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }

        let mut frame_times = self.snapshot();
        frame_times.sort_unstable_by(f64::total_cmp);

        let index = ((frame_times.len() as f64 - 1.0) * p.clamp(0.0, 1.0)).round() as usize;
        frame_times[index]
    }

    pub fn p99(&self) -> f64 {
        self.percentile(0.99)
    }

    /// Change capacity, dropping the oldest samples if the window shrinks.
    pub fn truncate_to(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Copy of the samples, oldest first.
    pub fn snapshot(&self) -> Vec<f64> {
        self.samples.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
