//! RawMessage — the engine's external input, supplied per call by the
//! transport collaborator. The engine never mutates it.

use super::ids::MessageId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat message as delivered by the ingestion layer.
///
/// `timestamp` is optional because transports occasionally deliver messages
/// with a missing or unparseable instant. That case is representable here and
/// fatal at resolution time (the engine refuses to fabricate a trading day).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMessage {
    pub message_id: MessageId,
    pub channel_id: String,
    pub author_id: String,
    /// Full message body. May contain emoji.
    pub content: String,
    /// UTC instant the message was posted, if known.
    pub timestamp: Option<DateTime<Utc>>,
}

impl RawMessage {
    pub fn new(
        message_id: impl Into<String>,
        channel_id: impl Into<String>,
        author_id: impl Into<String>,
        content: impl Into<String>,
        timestamp: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            message_id: MessageId::new(message_id),
            channel_id: channel_id.into(),
            author_id: author_id.into(),
            content: content.into(),
            timestamp,
        }
    }
}
