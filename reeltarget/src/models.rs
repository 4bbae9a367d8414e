//! Message model shared between the resolver and target adapters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Value-typed coordinates of a backend message.
///
/// A key survives the message it points to: the adapter's message store is
/// the arena, this is the index. The string form `msg_{chat_id}_{message_id}`
/// is what the search API exposes as item id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageKey {
    pub chat_id: i64,
    pub message_id: i64,
}

impl MessageKey {
    pub fn new(chat_id: i64, message_id: i64) -> Self {
        Self {
            chat_id,
            message_id,
        }
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg_{}_{}", self.chat_id, self.message_id)
    }
}

impl FromStr for MessageKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix("msg_")
            .ok_or_else(|| Error::InvalidKey(s.to_string()))?;

        // chat ids can be negative, so split on the last underscore
        let (chat, msg) = rest
            .rsplit_once('_')
            .ok_or_else(|| Error::InvalidKey(s.to_string()))?;

        let chat_id = chat
            .parse::<i64>()
            .map_err(|_| Error::InvalidKey(s.to_string()))?;
        let message_id = msg
            .parse::<i64>()
            .map_err(|_| Error::InvalidKey(s.to_string()))?;

        Ok(Self {
            chat_id,
            message_id,
        })
    }
}

/// One inline button attached to a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawButton {
    /// Visible label
    pub label: String,
    /// URL carried by the button, if it is a link button
    pub url: Option<String>,
    /// Whether the button triggers a callback when clicked
    pub callback: bool,
}

impl RawButton {
    /// Link button
    pub fn link(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: Some(url.into()),
            callback: false,
        }
    }

    /// Callback button
    pub fn action(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: None,
            callback: true,
        }
    }
}

/// Snapshot of a backend message as seen by the resolver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMessage {
    pub key: MessageKey,
    /// Free text of the message (may be empty)
    pub text: String,
    /// Whether the message carries an attached media file
    pub has_file: bool,
    /// Button grid, row-major; empty when the message has no buttons
    pub buttons: Vec<Vec<RawButton>>,
}

impl RawMessage {
    /// True when the message offers at least one button
    pub fn has_buttons(&self) -> bool {
        self.buttons.iter().any(|row| !row.is_empty())
    }
}
