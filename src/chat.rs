//! Chat transcript model.
//!
//! Messages are append-only and never mutated after creation. The transcript
//! trims its oldest entries so long sessions stay bounded.

/// Maximum number of messages retained in the transcript.
pub const TRANSCRIPT_MAX_MESSAGES: usize = 500;

/// Who produced a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn label(self) -> &'static str {
        match self {
            Sender::User => "you",
            Sender::Bot => "bot",
        }
    }
}

/// One rendered line of the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub text: String,
    pub sender: Sender,
}

/// Append-only message sequence backing the transcript pane.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sender: Sender, text: impl Into<String>) {
        self.messages.push(ChatMessage {
            text: text.into(),
            sender,
        });
        if self.messages.len() > TRANSCRIPT_MAX_MESSAGES {
            let excess = self.messages.len() - TRANSCRIPT_MAX_MESSAGES;
            self.messages.drain(0..excess);
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
