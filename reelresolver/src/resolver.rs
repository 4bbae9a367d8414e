//! The resolver: search and option negotiation against the backend.
//!
//! A resolution is a short conversation. The backend answers a query with
//! messages carrying buttons; clicking a button may yield a file, a URL, or
//! a gate ("join channel ...") that has to be satisfied before the click
//! works. The strategy chain in [`Resolver::resolve`] tries each avenue in a
//! fixed order and stops at the first locator.
//!
//! Every target-facing call runs behind one negotiation lock. The backend is
//! a single stateful conversation; interleaving two resolutions would make
//! the replies unattributable.

use std::sync::Arc;
use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use reeltarget::{MessageKey, RawMessage, ResolutionTarget, SelectOutcome};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use crate::cache::ResultCache;
use crate::config_ext::ResolverConfigExt;
use crate::error::{Error, Result};
use crate::metadata;
use crate::models::{CandidateResult, OptionKind, StreamOption};

lazy_static! {
    static ref URL_RE: Regex = Regex::new(r"https?://[^\s]+").unwrap();
}

/// Button labels that are navigation or channel noise, not stream options
const NOISE_LABELS: &[&str] = &["update", "group", "backup", "channel", "next", "previous"];

/// How many history messages to scan when looking for a reply
const HISTORY_WINDOW: usize = 50;

/// How many fresh messages to scan when polling for a file
const POLL_WINDOW: usize = 10;

/// Settle delays between negotiation sub-attempts.
///
/// The backend needs a moment to react to each stimulus. These are tunable
/// pauses, not contracts; tests zero them out.
#[derive(Debug, Clone)]
pub struct ResolverTuning {
    /// After replaying a `/start` deep link, before polling for the file
    pub replay_settle: Duration,
    /// After sending a button label as free text
    pub text_settle: Duration,
    /// After a callback click, before polling for the file
    pub click_settle: Duration,
    /// After joining one gating resource
    pub join_settle: Duration,
    /// After all joins, before retrying the original selection
    pub retry_settle: Duration,
    /// After forwarding to the delivery peer, before reading its reply
    pub delivery_settle: Duration,
}

impl Default for ResolverTuning {
    fn default() -> Self {
        Self {
            replay_settle: Duration::from_secs(3),
            text_settle: Duration::from_secs(3),
            click_settle: Duration::from_secs(2),
            join_settle: Duration::from_secs(2),
            retry_settle: Duration::from_secs(5),
            delivery_settle: Duration::from_secs(6),
        }
    }
}

impl ResolverTuning {
    /// All delays zero, for tests
    pub fn zero() -> Self {
        Self {
            replay_settle: Duration::ZERO,
            text_settle: Duration::ZERO,
            click_settle: Duration::ZERO,
            join_settle: Duration::ZERO,
            retry_settle: Duration::ZERO,
            delivery_settle: Duration::ZERO,
        }
    }
}

/// Outcome of one strategy step
enum StepOutcome {
    /// A locator was obtained
    Resolved(String),
    /// The step ran but no file surfaced; try the next strategy
    NoFile,
    /// The step failed in a way that ends the resolution
    Fatal(Error),
}

/// Serialized resolver over an interactive backend
pub struct Resolver {
    target: Arc<dyn ResolutionTarget>,
    cache: ResultCache,
    tuning: ResolverTuning,
    delivery_peer: String,
    negotiation: Mutex<()>,
}

impl Resolver {
    /// Create a resolver with explicit settings
    pub fn new(
        target: Arc<dyn ResolutionTarget>,
        cache: ResultCache,
        delivery_peer: impl Into<String>,
        tuning: ResolverTuning,
    ) -> Self {
        Self {
            target,
            cache,
            tuning,
            delivery_peer: delivery_peer.into(),
            negotiation: Mutex::new(()),
        }
    }

    /// Create a resolver from the global configuration
    pub fn new_configured(target: Arc<dyn ResolutionTarget>) -> Result<Self> {
        let config = reelconfig::get_config();
        let ttl = Duration::from_secs(config.get_resolver_cache_ttl_secs()?);
        let capacity = config.get_resolver_cache_capacity()?;
        let peer = config.get_resolver_delivery_peer()?;
        Ok(Self::new(
            target,
            ResultCache::new(ttl, capacity),
            peer,
            ResolverTuning::default(),
        ))
    }

    /// Resolve a free-text query into a list of candidates.
    ///
    /// Cached answers are returned without touching the backend. On a miss
    /// the query runs under the negotiation lock, option buttons are
    /// filtered for noise, metadata is extracted from the message text and
    /// the (non-empty) result is cached.
    pub async fn search(&self, query: &str) -> Result<Vec<CandidateResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::invalid_input("empty query"));
        }

        if let Some(hit) = self.cache.lookup(query) {
            debug!("search cache hit for '{}'", query);
            return Ok(hit);
        }

        let _guard = self.negotiation.lock().await;
        // A concurrent search may have filled the cache while we waited
        if let Some(hit) = self.cache.lookup(query) {
            return Ok(hit);
        }

        info!("searching backend for '{}'", query);
        let messages = self.target.query(query).await?;

        let mut results = Vec::new();
        for msg in &messages {
            if let Some(candidate) = Self::candidate_from_message(msg) {
                self.cache.store_handle(&candidate.id, msg.key);
                results.push(candidate);
            }
        }

        info!("'{}' produced {} candidate(s)", query, results.len());
        if !results.is_empty() {
            self.cache.store(query, results.clone());
        }
        Ok(results)
    }

    /// Resolve one option of a previously returned candidate into a locator.
    ///
    /// The backing message is found through the handle cache, or by parsing
    /// the item id back into message coordinates and re-fetching from the
    /// conversation history when the handle has been lost (restart, cache
    /// clear).
    pub async fn resolve(&self, item_id: &str, option_index: usize) -> Result<String> {
        let _guard = self.negotiation.lock().await;

        let key = match self.cache.lookup_handle(item_id) {
            Some(k) => k,
            None => item_id
                .parse::<MessageKey>()
                .map_err(|_| Error::invalid_input(format!("bad item id: {}", item_id)))?,
        };

        let msg = self.fetch_message(key).await?;

        // A message that already carries the file skips the whole option
        // negotiation, whatever option was asked for. Like the other
        // tolerated shortcuts, a failed delivery here falls through to the
        // option strategies instead of ending the resolution.
        if msg.has_file {
            debug!("{} carries a file, fast path", key);
            match self.deliver(msg.key).await {
                Ok(locator) => return Ok(locator),
                Err(e) => warn!("fast path delivery failed: {}", e),
            }
        }

        let options = Self::usable_options(&msg);
        let option = options
            .get(option_index)
            .ok_or_else(|| {
                Error::invalid_input(format!("option index {} out of range", option_index))
            })?
            .clone();

        info!("resolving {} option {} ({:?})", item_id, option_index, option.kind);
        match option.kind {
            OptionKind::ForwardRequired => self.deliver(msg.key).await,
            OptionKind::DirectLocator => self.resolve_direct(&option.value).await,
            OptionKind::Callback => {
                let (row, col) = parse_coords(&option.value)?;
                self.resolve_callback(&msg, row, col).await
            }
        }
    }

    /// Drop all cached search results and message handles. Idempotent.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    // ------------------------------------------------------------------
    // Candidate construction
    // ------------------------------------------------------------------

    fn candidate_from_message(msg: &RawMessage) -> Option<CandidateResult> {
        let options = Self::usable_options(msg);
        if options.is_empty() {
            return None;
        }

        Some(CandidateResult {
            id: msg.key.to_string(),
            title: metadata::extract_title(&msg.text),
            snippet: metadata::snippet(&msg.text),
            year: metadata::extract_year(&msg.text),
            imdb_rating: metadata::extract_rating(&msg.text),
            genres: metadata::extract_genres(&msg.text),
            options,
        })
    }

    /// Options of a message after noise filtering.
    ///
    /// Deterministic for a given message, so the indexes handed out by
    /// `search` stay valid when `resolve` rebuilds the list from the
    /// re-fetched message.
    fn usable_options(msg: &RawMessage) -> Vec<StreamOption> {
        let mut options = Vec::new();
        for (row, buttons) in msg.buttons.iter().enumerate() {
            for (col, button) in buttons.iter().enumerate() {
                if is_noise_label(&button.label) {
                    continue;
                }
                if let Some(url) = &button.url {
                    options.push(StreamOption {
                        label: button.label.clone(),
                        kind: OptionKind::DirectLocator,
                        value: url.clone(),
                    });
                } else if button.callback {
                    options.push(StreamOption {
                        label: button.label.clone(),
                        kind: OptionKind::Callback,
                        value: format!("{},{}", row, col),
                    });
                }
            }
        }

        // A file-bearing message without buttons is still playable
        if options.is_empty() && msg.has_file {
            options.push(StreamOption {
                label: "Play".to_string(),
                kind: OptionKind::ForwardRequired,
                value: msg.key.to_string(),
            });
        }

        options
    }

    // ------------------------------------------------------------------
    // Strategy chain
    // ------------------------------------------------------------------

    async fn fetch_message(&self, key: MessageKey) -> Result<RawMessage> {
        let recent = self.target.recent_messages(HISTORY_WINDOW).await?;
        recent
            .into_iter()
            .find(|m| m.key == key)
            .ok_or_else(|| Error::NotFound(key.to_string()))
    }

    /// A locator that is already a URI. A `start=` deep link is replayed as
    /// a `/start` command first, because it usually hides a file behind the
    /// conversation rather than pointing at playable bytes.
    async fn resolve_direct(&self, locator: &str) -> Result<String> {
        if let Some(payload) = deep_link_payload(locator) {
            match self.replay_deep_link(&payload).await {
                StepOutcome::Resolved(u) => return Ok(u),
                StepOutcome::Fatal(e) => return Err(e),
                StepOutcome::NoFile => {
                    debug!("deep link replay produced no file, returning the locator as-is");
                }
            }
        }
        Ok(locator.to_string())
    }

    async fn replay_deep_link(&self, payload: &str) -> StepOutcome {
        let command = format!("/start {}", payload);
        let replies = match self.target.send_text(&command).await {
            Ok(r) => r,
            Err(e) => return StepOutcome::Fatal(e.into()),
        };
        sleep(self.tuning.replay_settle).await;

        for m in &replies {
            if m.has_file {
                return self.deliver_step(m.key).await;
            }
        }
        self.poll_for_file().await
    }

    async fn resolve_callback(&self, msg: &RawMessage, row: usize, col: usize) -> Result<String> {
        let button = msg
            .buttons
            .get(row)
            .and_then(|r| r.get(col))
            .ok_or_else(|| Error::invalid_input("callback coordinates out of range"))?
            .clone();

        // Workaround 1: some backends react to the label sent as plain text
        // where the callback itself goes unanswered.
        match self.try_label_text(&button.label).await {
            StepOutcome::Resolved(u) => return Ok(u),
            StepOutcome::Fatal(e) => warn!("label-as-text workaround failed: {}", e),
            StepOutcome::NoFile => {}
        }

        // Workaround 2: a callback button sometimes doubles as a deep link.
        if let Some(url) = &button.url {
            if let Some(payload) = deep_link_payload(url) {
                match self.replay_deep_link(&payload).await {
                    StepOutcome::Resolved(u) => return Ok(u),
                    StepOutcome::Fatal(e) => warn!("deep link replay failed: {}", e),
                    StepOutcome::NoFile => {}
                }
            }
        }

        // The actual click.
        match self.target.select_option(msg.key, row, col).await? {
            SelectOutcome::Url(u) => Ok(u),
            SelectOutcome::NoResponse => {
                sleep(self.tuning.click_settle).await;
                self.finish_poll().await
            }
            SelectOutcome::NewMessage(reply) => {
                if reply.has_file {
                    return self.deliver(reply.key).await;
                }
                if is_gating(&reply.text) {
                    return self.resolve_gated(msg.key, row, col, &reply).await;
                }
                if let Some(u) = first_url(&reply.text) {
                    return Ok(u);
                }
                sleep(self.tuning.click_settle).await;
                self.finish_poll().await
            }
        }
    }

    /// The click hit a join gate. Join every offered resource, retry the
    /// original selection once, then use the gate's "try again" affordance
    /// once before giving up.
    async fn resolve_gated(
        &self,
        original: MessageKey,
        row: usize,
        col: usize,
        gate: &RawMessage,
    ) -> Result<String> {
        let links: Vec<String> = gate
            .buttons
            .iter()
            .flatten()
            .filter_map(|b| b.url.clone())
            .filter(|u| u.contains("t.me/"))
            .collect();

        if links.is_empty() {
            return Err(Error::GatingUnresolved(
                "gate offers no joinable link".to_string(),
            ));
        }

        for link in &links {
            info!("joining gating resource {}", link);
            self.target.join_resource(link).await?;
            sleep(self.tuning.join_settle).await;
        }
        sleep(self.tuning.retry_settle).await;

        match self.target.select_option(original, row, col).await? {
            SelectOutcome::Url(u) => return Ok(u),
            SelectOutcome::NewMessage(reply) => {
                if reply.has_file {
                    return self.deliver(reply.key).await;
                }
                if let Some(u) = first_url(&reply.text) {
                    return Ok(u);
                }
            }
            SelectOutcome::NoResponse => {}
        }

        if let Some((r, c)) = find_try_again(gate) {
            debug!("retry via the gate's try-again button");
            match self.target.select_option(gate.key, r, c).await? {
                SelectOutcome::Url(u) => return Ok(u),
                SelectOutcome::NewMessage(reply) => {
                    if reply.has_file {
                        return self.deliver(reply.key).await;
                    }
                    if let Some(u) = first_url(&reply.text) {
                        return Ok(u);
                    }
                }
                SelectOutcome::NoResponse => {}
            }
        }

        match self.poll_for_file().await {
            StepOutcome::Resolved(u) => Ok(u),
            StepOutcome::Fatal(e) => Err(e),
            StepOutcome::NoFile => Err(Error::GatingUnresolved(
                "joined the offered resources but the option stayed gated".to_string(),
            )),
        }
    }

    async fn try_label_text(&self, label: &str) -> StepOutcome {
        let replies = match self.target.send_text(label).await {
            Ok(r) => r,
            Err(e) => return StepOutcome::Fatal(e.into()),
        };
        sleep(self.tuning.text_settle).await;

        for m in &replies {
            if m.has_file {
                return self.deliver_step(m.key).await;
            }
            if let Some(u) = first_url(&m.text) {
                return StepOutcome::Resolved(u);
            }
        }
        StepOutcome::NoFile
    }

    /// Scan fresh history for a file-bearing message and deliver it
    async fn poll_for_file(&self) -> StepOutcome {
        let messages = match self.target.recent_messages(POLL_WINDOW).await {
            Ok(m) => m,
            Err(e) => return StepOutcome::Fatal(e.into()),
        };
        for m in &messages {
            if m.has_file {
                return self.deliver_step(m.key).await;
            }
        }
        StepOutcome::NoFile
    }

    /// `poll_for_file` as the last resort of a chain
    async fn finish_poll(&self) -> Result<String> {
        match self.poll_for_file().await {
            StepOutcome::Resolved(u) => Ok(u),
            StepOutcome::Fatal(e) => Err(e),
            StepOutcome::NoFile => Err(Error::NoResolvableFile),
        }
    }

    /// Forward the file-bearing message to the delivery peer and extract
    /// the locator from its reply text.
    async fn deliver(&self, key: MessageKey) -> Result<String> {
        info!("forwarding {} to {} for delivery", key, self.delivery_peer);
        self.target.forward(&self.delivery_peer, key).await?;
        sleep(self.tuning.delivery_settle).await;

        let replies = self.target.recent_messages(POLL_WINDOW).await?;
        for m in &replies {
            if let Some(u) = first_url(&m.text) {
                info!("delivery peer answered with a locator");
                return Ok(u);
            }
        }
        Err(Error::upstream("delivery peer produced no locator"))
    }

    async fn deliver_step(&self, key: MessageKey) -> StepOutcome {
        match self.deliver(key).await {
            Ok(u) => StepOutcome::Resolved(u),
            Err(e) => StepOutcome::Fatal(e),
        }
    }
}

// ----------------------------------------------------------------------
// Text helpers
// ----------------------------------------------------------------------

fn is_noise_label(label: &str) -> bool {
    let lower = label.to_lowercase();
    NOISE_LABELS.iter().any(|n| lower.contains(n))
}

fn is_gating(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("join channel") || lower.contains("backup channel")
}

fn first_url(text: &str) -> Option<String> {
    URL_RE.find(text).map(|m| m.as_str().to_string())
}

fn find_try_again(msg: &RawMessage) -> Option<(usize, usize)> {
    for (row, buttons) in msg.buttons.iter().enumerate() {
        for (col, button) in buttons.iter().enumerate() {
            if button.label.to_lowercase().contains("try again") {
                return Some((row, col));
            }
        }
    }
    None
}

fn deep_link_payload(locator: &str) -> Option<String> {
    let parsed = Url::parse(locator).ok()?;
    parsed
        .query_pairs()
        .find(|(k, _)| k == "start")
        .map(|(_, v)| v.into_owned())
}

fn parse_coords(value: &str) -> Result<(usize, usize)> {
    let (row, col) = value
        .split_once(',')
        .ok_or_else(|| Error::invalid_input(format!("bad callback coordinates: {}", value)))?;
    let row = row
        .parse::<usize>()
        .map_err(|_| Error::invalid_input(format!("bad callback coordinates: {}", value)))?;
    let col = col
        .parse::<usize>()
        .map_err(|_| Error::invalid_input(format!("bad callback coordinates: {}", value)))?;
    Ok((row, col))
}
