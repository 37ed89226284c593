//! Recording widget state machine.
//!
//! One `App` owns the whole voice chat flow: the Idle/Recording/Processing
//! lifecycle, the transcript, the active exchange job, and the single
//! playback handle. Event handlers borrow it mutably; nothing lives in
//! module-level state.

use std::sync::{mpsc::TryRecvError, Arc, Mutex};

use crate::audio::{LiveMeter, Recorder};
use crate::chat::{ChatMessage, Sender, Transcript};
use crate::client::{BotReply, ExchangeClient};
use crate::config::AppConfig;
use crate::exchange::{self, ExchangeJob, ExchangeMessage};
use crate::log_debug;
use crate::playback::{decode_reply_audio, PlaybackHandle};
use anyhow::Result;

/// Trigger label shown while waiting for a question.
pub(crate) const IDLE_LABEL: &str = "Ask your question";
/// Trigger label shown while the microphone is live.
pub(crate) const RECORDING_LABEL: &str = "Listening...";
/// Trigger label shown while the exchange is in flight.
pub(crate) const PROCESSING_LABEL: &str = "Processing...";
/// Transcript placeholder appended when a recording is submitted.
pub(crate) const PROCESSING_PLACEHOLDER: &str = "Processing your question...";
/// Bot line shown when the network exchange fails outright.
pub(crate) const TRANSPORT_FAILURE_TEXT: &str = "Something went wrong.";
/// Alert shown when the microphone cannot be opened.
pub(crate) const CAPTURE_UNAVAILABLE_TEXT: &str = "Microphone access denied or not available.";
/// Prefix for the user's transcribed question.
const USER_ECHO_PREFIX: &str = "You said: ";

/// Lifecycle of the recording widget. Exactly one state is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidgetState {
    /// Waiting for the user to ask a question.
    #[default]
    Idle,
    /// Microphone is live and fragments are accumulating.
    Recording,
    /// The recording was finalized and the upload is in flight.
    Processing,
}

impl WidgetState {
    /// Label for the trigger control in this state.
    pub fn trigger_label(self) -> &'static str {
        match self {
            WidgetState::Idle => IDLE_LABEL,
            WidgetState::Recording => RECORDING_LABEL,
            WidgetState::Processing => PROCESSING_LABEL,
        }
    }
}

/// Central application state shared between the event loop and the renderer.
pub struct App {
    config: AppConfig,
    state: WidgetState,
    status: String,
    alert: Option<String>,
    transcript: Transcript,
    scroll_offset: u16,
    needs_redraw: bool,
    spinner_tick: usize,
    recorder: Option<Arc<Mutex<Recorder>>>,
    client: Arc<ExchangeClient>,
    exchange_job: Option<ExchangeJob>,
    playback: Option<PlaybackHandle>,
    live_meter: LiveMeter,
}

impl App {
    /// Create the widget in its idle state, bound to the configured backend.
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Arc::new(ExchangeClient::new(&config.server_url)?);
        Ok(Self {
            config,
            state: WidgetState::Idle,
            status: IDLE_LABEL.into(),
            alert: None,
            transcript: Transcript::new(),
            scroll_offset: 0,
            needs_redraw: true,
            spinner_tick: 0,
            recorder: None,
            client,
            exchange_job: None,
            playback: None,
            live_meter: LiveMeter::new(),
        })
    }

    /// Create the audio recorder on first use so we only query the OS once.
    fn get_recorder(&mut self) -> Result<Arc<Mutex<Recorder>>> {
        if self.recorder.is_none() {
            let recorder = Recorder::new(self.config.input_device.as_deref())?;
            log_debug(&format!(
                "using input device '{}'",
                recorder.device_name()
            ));
            self.recorder = Some(Arc::new(Mutex::new(recorder)));
        }
        Ok(self
            .recorder
            .as_ref()
            .expect("recorder initialized")
            .clone())
    }

    /// Toggle the capture trigger. Semantics depend on the current state;
    /// any active reply playback is stopped first regardless of state.
    pub fn toggle_capture(&mut self) {
        self.stop_playback();
        self.alert = None;
        match self.state {
            WidgetState::Idle => self.start_recording(),
            WidgetState::Recording => self.finish_recording(),
            WidgetState::Processing => {
                // The in-flight upload cannot be canceled; ignore the toggle
                // instead of racing it.
                log_debug("capture toggle ignored while processing");
                self.request_redraw();
            }
        }
    }

    fn start_recording(&mut self) {
        let recorder = match self.get_recorder() {
            Ok(recorder) => recorder,
            Err(err) => {
                log_debug(&format!("capture unavailable: {err:#}"));
                self.alert = Some(CAPTURE_UNAVAILABLE_TEXT.into());
                self.request_redraw();
                return;
            }
        };
        let job = exchange::start_exchange_job(
            recorder,
            self.client.clone(),
            self.config.capture_config(),
            self.config.log_timings,
            Some(self.live_meter.clone()),
        );
        self.exchange_job = Some(job);
        self.state = WidgetState::Recording;
        self.status = RECORDING_LABEL.into();
        self.request_redraw();
        log_debug("recording started");
    }

    fn finish_recording(&mut self) {
        if let Some(job) = self.exchange_job.as_ref() {
            job.request_stop();
        }
        self.state = WidgetState::Processing;
        self.status = PROCESSING_LABEL.into();
        self.append_message(Sender::Bot, PROCESSING_PLACEHOLDER);
        log_debug("recording stopped; uploading");
    }

    /// Check the worker channel without blocking the UI thread.
    pub fn poll_exchange_job(&mut self) {
        let mut finished = false;
        let mut message_to_handle: Option<ExchangeMessage> = None;
        if let Some(job) = self.exchange_job.as_mut() {
            match job.receiver.try_recv() {
                Ok(message) => {
                    message_to_handle = Some(message);
                    finished = true;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    message_to_handle = Some(ExchangeMessage::TransportFailure(
                        "exchange worker disconnected unexpectedly".into(),
                    ));
                    finished = true;
                }
            }
            if finished {
                // Join the worker once it signals completion to avoid
                // lingering handles.
                if let Some(handle) = job.handle.take() {
                    let _ = handle.join();
                }
            }
        }
        if let Some(message) = message_to_handle {
            self.handle_exchange_message(message);
        }
        if finished {
            self.exchange_job = None;
        }
    }

    /// Apply whatever the exchange worker reported, then converge on the
    /// idle cleanup path shared by all outcomes.
    pub(crate) fn handle_exchange_message(&mut self, message: ExchangeMessage) {
        match message {
            ExchangeMessage::Reply { reply, metrics: _ } => self.apply_reply(reply),
            ExchangeMessage::CaptureUnavailable(detail) => {
                log_debug(&format!("capture unavailable: {detail}"));
                self.alert = Some(CAPTURE_UNAVAILABLE_TEXT.into());
            }
            ExchangeMessage::TransportFailure(detail) => {
                log_debug(&format!("exchange failed: {detail}"));
                self.append_message(Sender::Bot, TRANSPORT_FAILURE_TEXT);
            }
        }
        self.finish_cycle();
    }

    fn apply_reply(&mut self, reply: BotReply) {
        if let Some(error) = reply.error {
            self.append_message(Sender::Bot, error);
            return;
        }
        let transcript_text = reply.transcript.unwrap_or_default();
        crate::log_debug_content(&format!("transcript: {transcript_text}"));
        self.append_message(Sender::User, format!("{USER_ECHO_PREFIX}{transcript_text}"));
        self.append_message(Sender::Bot, reply.response.unwrap_or_default());
        if let Some(encoded) = reply.audio_base64 {
            self.start_playback(&encoded);
        }
    }

    /// Replace any active reply playback with a new one. Playback failures
    /// are logged and skipped; the transcript already shows the text reply.
    fn start_playback(&mut self, encoded: &str) {
        self.stop_playback();
        if self.config.no_playback {
            return;
        }
        match decode_reply_audio(encoded).and_then(PlaybackHandle::start) {
            Ok(handle) => self.playback = Some(handle),
            Err(err) => log_debug(&format!("reply playback failed: {err:#}")),
        }
    }

    /// Stop and discard the active playback handle, if any.
    pub fn stop_playback(&mut self) {
        if let Some(playback) = self.playback.take() {
            playback.stop();
        }
    }

    /// Shared cleanup: back to idle, label reset, indicator off.
    fn finish_cycle(&mut self) {
        self.state = WidgetState::Idle;
        self.status = IDLE_LABEL.into();
        self.spinner_tick = 0;
        self.request_redraw();
    }

    /// Append a transcript line and keep the view pinned near the bottom.
    pub(crate) fn append_message(&mut self, sender: Sender, text: impl Into<String>) {
        self.transcript.push(sender, text);
        self.scroll_to_bottom();
        self.request_redraw();
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
        self.request_redraw();
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(1);
        self.request_redraw();
    }

    pub fn page_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(10);
        self.request_redraw();
    }

    pub fn page_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(10);
        self.request_redraw();
    }

    pub fn scroll_to_bottom(&mut self) {
        let offset = self.transcript.len().saturating_sub(10).min(u16::MAX as usize);
        self.scroll_offset = offset as u16;
    }

    /// Advance the processing spinner / meter animation by one tick.
    pub fn advance_animation(&mut self) {
        if self.state != WidgetState::Idle {
            self.spinner_tick = self.spinner_tick.wrapping_add(1);
            self.request_redraw();
        }
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn status_text(&self) -> &str {
        &self.status
    }

    pub fn alert_text(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.transcript.messages()
    }

    pub fn scroll_offset(&self) -> u16 {
        self.scroll_offset
    }

    pub fn spinner_tick(&self) -> usize {
        self.spinner_tick
    }

    pub fn meter_db(&self) -> f32 {
        self.live_meter.level_db()
    }

    pub fn playback_active(&self) -> bool {
        self.playback.as_ref().is_some_and(PlaybackHandle::is_active)
    }

    pub fn has_active_job(&self) -> bool {
        self.exchange_job.is_some()
    }

    pub fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    pub fn take_redraw_request(&mut self) -> bool {
        let requested = self.needs_redraw;
        self.needs_redraw = false;
        requested
    }

    #[cfg(test)]
    pub(crate) fn set_state_for_tests(&mut self, state: WidgetState) {
        self.state = state;
        self.status = state.trigger_label().into();
    }
}
