//! Capture session bookkeeping.
//!
//! A session owns the fragments collected during one recording. It is
//! created when recording starts and consumed on stop, concatenating
//! everything into a single payload for upload.

use std::collections::VecDeque;

/// Metrics collected during capture for observability and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureMetrics {
    pub capture_ms: u64,
    pub fragments_collected: usize,
    pub fragments_dropped: usize,
    pub stop_reason: StopReason,
}

impl Default for CaptureMetrics {
    fn default() -> Self {
        Self {
            capture_ms: 0,
            fragments_collected: 0,
            fragments_dropped: 0,
            stop_reason: StopReason::ManualStop,
        }
    }
}

/// Explains why capture ended so logs can classify sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The user toggled the trigger while recording.
    ManualStop,
    /// The device stream went away mid-recording.
    StreamClosed,
}

impl StopReason {
    pub fn label(&self) -> &'static str {
        match self {
            StopReason::ManualStop => "manual_stop",
            StopReason::StreamClosed => "stream_closed",
        }
    }
}

/// Caller-facing result: mono PCM at the device rate plus metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureResult {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub metrics: CaptureMetrics,
}

/// Bounded fragment buffer owned by the active recording.
///
/// Memory stays bounded no matter how long the microphone is left open:
/// once the budget is exceeded the oldest fragments are dropped, keeping the
/// most recent audio.
pub struct CaptureSession {
    fragments: VecDeque<Vec<f32>>,
    total_samples: usize,
    max_samples: usize,
}

impl CaptureSession {
    pub fn new(sample_rate: u32, buffer_ms: u64) -> Self {
        let max_samples = ((buffer_ms * u64::from(sample_rate)) / 1000).max(1) as usize;
        Self {
            fragments: VecDeque::new(),
            total_samples: 0,
            max_samples,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_sample_budget(max_samples: usize) -> Self {
        Self {
            fragments: VecDeque::new(),
            total_samples: 0,
            max_samples,
        }
    }

    pub fn push_fragment(&mut self, samples: Vec<f32>) {
        self.total_samples = self.total_samples.saturating_add(samples.len());
        self.fragments.push_back(samples);
        while self.total_samples > self.max_samples {
            match self.fragments.pop_front() {
                Some(dropped) => {
                    self.total_samples = self.total_samples.saturating_sub(dropped.len());
                }
                None => break,
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_samples == 0
    }

    pub fn sample_count(&self) -> usize {
        self.total_samples
    }

    /// Concatenate all fragments in arrival order into one payload.
    pub fn into_samples(self) -> Vec<f32> {
        let mut samples = Vec::with_capacity(self.total_samples);
        for fragment in self.fragments {
            samples.extend(fragment);
        }
        samples
    }
}
