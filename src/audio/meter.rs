use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Level reported when nothing is being captured.
pub(crate) const METER_FLOOR_DB: f32 = -60.0;

/// Lock-free microphone level shared between the capture worker and the UI.
#[derive(Clone, Debug)]
pub struct LiveMeter {
    level_bits: Arc<AtomicU32>,
}

impl LiveMeter {
    pub fn new() -> Self {
        Self {
            level_bits: Arc::new(AtomicU32::new(METER_FLOOR_DB.to_bits())),
        }
    }

    pub fn set_db(&self, db: f32) {
        self.level_bits.store(db.to_bits(), Ordering::Relaxed);
    }

    pub fn level_db(&self) -> f32 {
        f32::from_bits(self.level_bits.load(Ordering::Relaxed))
    }
}

impl Default for LiveMeter {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn rms_db(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return METER_FLOOR_DB;
    }
    let energy: f32 = samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32;
    let rms = energy.sqrt().max(1e-6);
    20.0 * rms.log10()
}
