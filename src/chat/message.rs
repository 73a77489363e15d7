use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Avatar,
    /// Bookkeeping entries such as file-upload notices
    System,
}

/// Message payload variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    /// Recorded voice note; base64-encoded 16-bit mono WAV
    Voice { wav_base64: String },
}

/// One chat message. Held in memory only, lost on restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    pub kind: MessageKind,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>, kind: MessageKind) -> Self {
        Self::new(content, Sender::User, kind)
    }

    pub fn avatar(content: impl Into<String>) -> Self {
        Self::new(content, Sender::Avatar, MessageKind::Text)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(content, Sender::System, MessageKind::Text)
    }

    fn new(content: impl Into<String>, sender: Sender, kind: MessageKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            sender,
            timestamp: Utc::now(),
            kind,
        }
    }
}
