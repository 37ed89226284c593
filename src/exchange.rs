//! Background worker that records one question, uploads it, and reports the
//! backend's reply. Capture and the blocking network round trip both run off
//! the UI thread so the event loop stays responsive.

use crate::audio::{self, CaptureMetrics, CaptureResult, LiveMeter, Recorder};
use crate::client::{BotReply, ExchangeClient};
use crate::config::CaptureConfig;
use crate::log_debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Instant;

/// Handle the UI uses to poll the worker thread for its single result.
pub struct ExchangeJob {
    pub receiver: mpsc::Receiver<ExchangeMessage>,
    pub handle: Option<thread::JoinHandle<()>>,
    /// Signals the capture loop to stop and the upload to begin.
    stop_flag: Arc<AtomicBool>,
}

impl ExchangeJob {
    /// Ask the worker to finalize the recording and submit it.
    pub fn request_stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }
}

/// Messages sent from the worker back to the UI, one per job.
#[derive(Debug, PartialEq)]
pub enum ExchangeMessage {
    /// The backend answered with parseable JSON (which may itself carry an
    /// `error` field).
    Reply {
        reply: BotReply,
        metrics: Option<CaptureMetrics>,
    },
    /// The microphone could not be opened or the stream died.
    CaptureUnavailable(String),
    /// The request failed or the response body was unusable.
    TransportFailure(String),
}

/// Spawn a worker thread that records until stopped, then runs the exchange.
pub fn start_exchange_job(
    recorder: Arc<Mutex<Recorder>>,
    client: Arc<ExchangeClient>,
    capture_cfg: CaptureConfig,
    log_timings: bool,
    meter: Option<LiveMeter>,
) -> ExchangeJob {
    let (tx, rx) = mpsc::sync_channel(1);
    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_clone = stop_flag.clone();

    let handle = thread::spawn(move || {
        // Do the heavy work off the UI thread and send back one message.
        let message = perform_exchange(recorder, client, &capture_cfg, log_timings, stop_flag_clone, meter);
        let _ = tx.send(message);
    });

    ExchangeJob {
        receiver: rx,
        handle: Some(handle),
        stop_flag,
    }
}

fn perform_exchange(
    recorder: Arc<Mutex<Recorder>>,
    client: Arc<ExchangeClient>,
    capture_cfg: &CaptureConfig,
    log_timings: bool,
    stop_flag: Arc<AtomicBool>,
    meter: Option<LiveMeter>,
) -> ExchangeMessage {
    let record_start = Instant::now();
    let capture = {
        let recorder_guard = match recorder.lock() {
            Ok(guard) => guard,
            Err(_) => {
                return ExchangeMessage::CaptureUnavailable("audio recorder lock poisoned".into())
            }
        };
        recorder_guard.record_fragments(capture_cfg, stop_flag, meter)
    };
    let capture = match capture {
        Ok(capture) => capture,
        Err(err) => return ExchangeMessage::CaptureUnavailable(format!("{err:#}")),
    };
    let record_elapsed = record_start.elapsed().as_secs_f64();
    log_capture_metrics(&capture.metrics);

    submit_capture(&client, capture, record_elapsed, log_timings)
}

/// Encode the finalized samples and run the single round trip. Empty
/// captures are submitted as-is; the backend decides what an empty question
/// means.
fn submit_capture(
    client: &ExchangeClient,
    capture: CaptureResult,
    record_elapsed: f64,
    log_timings: bool,
) -> ExchangeMessage {
    let metrics = capture.metrics.clone();
    let payload = match audio::wav_payload(&capture.samples, capture.sample_rate) {
        Ok(payload) => payload,
        Err(err) => {
            return ExchangeMessage::TransportFailure(format!(
                "failed to encode recording: {err:#}"
            ))
        }
    };

    let upload_start = Instant::now();
    let message = match client.submit_audio(payload) {
        Ok(reply) => ExchangeMessage::Reply {
            reply,
            metrics: Some(metrics),
        },
        Err(err) => {
            log_debug(&format!("exchange upload failed: {err:#}"));
            ExchangeMessage::TransportFailure(format!("{err:#}"))
        }
    };
    if log_timings {
        log_debug(&format!(
            "timing|phase=exchange|record_s={record_elapsed:.3}|upload_s={:.3}",
            upload_start.elapsed().as_secs_f64()
        ));
    }
    message
}

/// Emit structured capture metrics for log grepping.
/// Format: `capture_metrics|capture_ms=...|fragments_collected=...|fragments_dropped=...|stop=...`
pub(crate) fn log_capture_metrics(metrics: &CaptureMetrics) {
    log_debug(&format!(
        "capture_metrics|capture_ms={}|fragments_collected={}|fragments_dropped={}|stop={}",
        metrics.capture_ms,
        metrics.fragments_collected,
        metrics.fragments_dropped,
        metrics.stop_reason.label()
    ));
}
