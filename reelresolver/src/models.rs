//! API-facing data model of the resolver.

use serde::{Deserialize, Serialize};

/// How a stream option has to be driven to yield a locator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    /// The option already carries a URI
    DirectLocator,
    /// The option is a callback button that must be clicked
    Callback,
    /// The message itself carries the file; it must be forwarded for delivery
    ForwardRequired,
}

/// One selectable way of obtaining the media behind a candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamOption {
    /// Visible label of the option
    pub label: String,
    pub kind: OptionKind,
    /// URI for [`OptionKind::DirectLocator`], `"{row},{col}"` coordinates for
    /// [`OptionKind::Callback`], message key for [`OptionKind::ForwardRequired`]
    pub value: String,
}

/// One search result, derived from a single backend message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateResult {
    /// Opaque id, the `msg_{chat_id}_{message_id}` form of the message key
    pub id: String,
    pub title: String,
    /// Leading part of the message text, at most 200 characters
    pub snippet: String,
    pub year: Option<u16>,
    pub imdb_rating: Option<f64>,
    pub genres: Vec<String>,
    /// Usable options, never empty
    pub options: Vec<StreamOption>,
}

/// Response payload of `GET /api/search`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<CandidateResult>,
    pub total: usize,
    pub success: bool,
}
