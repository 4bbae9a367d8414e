//! Search and resolution pipeline for ReelTheatre.
//!
//! This crate turns a free-text search query into playable media locators by
//! negotiating with an interactive, message-based backend (abstracted behind
//! [`reeltarget::ResolutionTarget`]):
//!
//! - [`Resolver::search`] sends the query, filters the returned option
//!   buttons, extracts display metadata from the message text and caches the
//!   candidate list.
//! - [`Resolver::resolve`] drives a selected option through an ordered chain
//!   of strategies (file fast path, deep-link replay, direct locator,
//!   callback click with gating workarounds) until a locator is obtained.
//!
//! All conversation with the backend is serialized behind a single
//! negotiation lock; concurrent searches and resolutions queue up rather
//! than interleaving messages.

pub mod api_rest;
pub mod cache;
pub mod config_ext;
pub mod error;
pub mod metadata;
pub mod models;
pub mod reelserver_ext;
mod reelserver_impl;
pub mod resolver;

pub use cache::ResultCache;
pub use config_ext::ResolverConfigExt;
pub use error::{Error, Result};
pub use models::{CandidateResult, OptionKind, SearchResponse, StreamOption};
pub use reelserver_ext::{ResolverExt, ResolverState};
pub use resolver::{Resolver, ResolverTuning};
