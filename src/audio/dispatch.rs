use crossbeam_channel::{Sender, TrySendError};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

/// Downmix interleaved multi-channel input to mono while applying the
/// provided converter, so the rest of the pipeline only ever sees one
/// channel of f32 samples.
pub(super) fn append_downmixed_samples<T, F>(
    buf: &mut Vec<f32>,
    data: &[T],
    channels: usize,
    mut convert: F,
) where
    T: Copy,
    F: FnMut(T) -> f32,
{
    if channels <= 1 {
        buf.extend(data.iter().copied().map(&mut convert));
        return;
    }

    // Average each interleaved frame into one mono sample.
    let mut acc = 0.0f32;
    let mut count = 0usize;
    for sample in data.iter().copied() {
        acc += convert(sample);
        count += 1;
        if count == channels {
            buf.push(acc / channels as f32);
            acc = 0.0;
            count = 0;
        }
    }
    if count > 0 {
        buf.push(acc / count as f32);
    }
}

/// Runs inside the CPAL callback: collects downmixed samples and emits
/// fixed-size fragments over a bounded channel. The callback must never
/// block, so a full channel counts a drop instead of waiting.
pub(super) struct FragmentDispatcher {
    fragment_samples: usize,
    pending: Vec<f32>,
    scratch: Vec<f32>,
    sender: Sender<Vec<f32>>,
    dropped: Arc<AtomicUsize>,
}

impl FragmentDispatcher {
    pub(super) fn new(
        fragment_samples: usize,
        sender: Sender<Vec<f32>>,
        dropped: Arc<AtomicUsize>,
    ) -> Self {
        Self {
            fragment_samples: fragment_samples.max(1),
            pending: Vec::with_capacity(fragment_samples),
            scratch: Vec::new(),
            sender,
            dropped,
        }
    }

    pub(super) fn push<T, F>(&mut self, data: &[T], channels: usize, convert: F)
    where
        T: Copy,
        F: FnMut(T) -> f32,
    {
        self.scratch.clear();
        append_downmixed_samples(&mut self.scratch, data, channels, convert);
        self.pending.extend_from_slice(&self.scratch);

        while self.pending.len() >= self.fragment_samples {
            let fragment: Vec<f32> = self.pending.drain(..self.fragment_samples).collect();
            if let Err(err) = self.sender.try_send(fragment) {
                match err {
                    TrySendError::Full(_) => {
                        self.dropped.fetch_add(1, Ordering::Relaxed);
                    }
                    TrySendError::Disconnected(_) => break,
                }
            }
        }
    }

    /// Hand back the partial fragment left after the stream stops, so the
    /// tail of the recording is not lost.
    pub(super) fn take_pending(&mut self) -> Vec<f32> {
        std::mem::take(&mut self.pending)
    }
}
