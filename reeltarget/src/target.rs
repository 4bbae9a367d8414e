//! The capability trait implemented by concrete backend adapters.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{MessageKey, RawMessage};

/// What a button click produced
#[derive(Debug, Clone)]
pub enum SelectOutcome {
    /// The backend answered with a fresh message
    NewMessage(RawMessage),
    /// The backend answered with a bare URL
    Url(String),
    /// The backend acknowledged the click but nothing arrived
    NoResponse,
}

/// Interactive resolution target.
///
/// Implementations own the transport to the message-based backend and the
/// session state that goes with it. All methods are conversation steps; the
/// resolver serializes calls behind its own negotiation lock, so adapters may
/// assume at most one in-flight conversation.
#[async_trait]
pub trait ResolutionTarget: Send + Sync {
    /// Send a free-text query and collect the responses.
    ///
    /// The adapter waits for the first response without a deadline of its
    /// own choosing, then keeps collecting with a short per-message timeout
    /// (about a second). Collection stops early at 5 messages carrying
    /// buttons, at 10 messages total, or when the short timeout lapses.
    async fn query(&self, text: &str) -> Result<Vec<RawMessage>>;

    /// Click the button at `(row, col)` on the message behind `key`.
    async fn select_option(&self, key: MessageKey, row: usize, col: usize)
    -> Result<SelectOutcome>;

    /// Send free text into the ongoing conversation and collect the responses.
    async fn send_text(&self, text: &str) -> Result<Vec<RawMessage>>;

    /// Fetch the most recent messages of the conversation, newest first.
    async fn recent_messages(&self, limit: usize) -> Result<Vec<RawMessage>>;

    /// Relay the message behind `key` to another conversation partner.
    ///
    /// `target` is the partner's handle as the backend understands it.
    async fn forward(&self, target: &str, key: MessageKey) -> Result<()>;

    /// Join the external resource behind a gating link so a blocked
    /// negotiation can proceed.
    async fn join_resource(&self, locator: &str) -> Result<()>;
}
