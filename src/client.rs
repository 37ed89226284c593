//! HTTP exchange with the voice chat backend.
//!
//! One POST per finalized recording; no retries and no client-side timeout.
//! The widget waits for the request to finish or fail outright.

use crate::log_debug;
use anyhow::{Context, Result};
use reqwest::blocking::{multipart, Client};
use serde::Deserialize;
use std::time::Duration;

/// Fixed upload path on the backend.
pub const PROCESS_AUDIO_PATH: &str = "/process_audio";
/// Multipart field name the backend expects for the audio payload.
pub const AUDIO_FIELD: &str = "audio_data";
/// Filename advertised for the uploaded recording.
pub const AUDIO_FILE_NAME: &str = "recording.webm";
/// Declared content type of the uploaded recording.
pub const AUDIO_CONTENT_TYPE: &str = "audio/webm";

/// JSON reply from the backend. All fields are optional; `error` wins when
/// present and the rest are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BotReply {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub audio_base64: Option<String>,
}

/// Blocking HTTP client bound to one backend endpoint.
pub struct ExchangeClient {
    http: Client,
    endpoint: String,
}

impl ExchangeClient {
    pub fn new(server_url: &str) -> Result<Self> {
        let endpoint = format!(
            "{}{PROCESS_AUDIO_PATH}",
            server_url.trim_end_matches('/')
        );
        // The reply is not ready until STT, the LLM, and TTS all finish, so
        // the default client timeout would cut slow backends off mid-answer.
        let http = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST one finalized payload and parse the JSON reply.
    ///
    /// Non-2xx statuses still carry a JSON body (the backend reports
    /// failures in the `error` field), so the status code alone is not
    /// treated as a transport failure; an unparsable body is.
    pub fn submit_audio(&self, payload: Vec<u8>) -> Result<BotReply> {
        let part = multipart::Part::bytes(payload)
            .file_name(AUDIO_FILE_NAME)
            .mime_str(AUDIO_CONTENT_TYPE)
            .context("failed to build multipart audio part")?;
        let form = multipart::Form::new().part(AUDIO_FIELD, part);

        tracing::debug!(endpoint = %self.endpoint, "uploading recording");
        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .with_context(|| format!("request to {} failed", self.endpoint))?;

        let status = response.status();
        let body = response
            .text()
            .context("failed to read backend response body")?;
        let reply: BotReply = serde_json::from_str(&body)
            .with_context(|| format!("backend response was not valid JSON (status {status})"))?;

        log_debug(&format!(
            "exchange reply: status={status} error={} transcript={} audio={}",
            reply.error.is_some(),
            reply.transcript.is_some(),
            reply.audio_base64.is_some()
        ));
        Ok(reply)
    }
}
