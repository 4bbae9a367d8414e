//! Conversation-level tests of the resolver against a scripted target.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reelresolver::{OptionKind, Resolver, ResolverTuning, ResultCache};
use reeltarget::{
    Error as TargetError, MessageKey, RawButton, RawMessage, ResolutionTarget, SelectOutcome,
};

// ----------------------------------------------------------------------
// Scripted target
// ----------------------------------------------------------------------

#[derive(Default)]
struct MockTarget {
    /// What `query` answers
    query_responses: Mutex<Vec<RawMessage>>,
    /// Conversation history, newest first
    recent: Mutex<Vec<RawMessage>>,
    /// Successive outcomes of `select_option`
    select_script: Mutex<VecDeque<SelectOutcome>>,
    /// What the delivery peer answers after a `forward`
    peer_reply: Mutex<Option<RawMessage>>,
    /// Message surfacing in the history after a `send_text`
    text_reply: Mutex<Option<RawMessage>>,
    /// Recorded calls, in order
    calls: Mutex<Vec<String>>,
}

impl MockTarget {
    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn calls_matching(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

#[async_trait]
impl ResolutionTarget for MockTarget {
    async fn query(&self, text: &str) -> reeltarget::Result<Vec<RawMessage>> {
        self.record(format!("query:{}", text));
        Ok(self.query_responses.lock().unwrap().clone())
    }

    async fn select_option(
        &self,
        key: MessageKey,
        row: usize,
        col: usize,
    ) -> reeltarget::Result<SelectOutcome> {
        self.record(format!("select:{}:{}:{}", key, row, col));
        match self.select_script.lock().unwrap().pop_front() {
            Some(outcome) => {
                if let SelectOutcome::NewMessage(m) = &outcome {
                    self.recent.lock().unwrap().insert(0, m.clone());
                }
                Ok(outcome)
            }
            None => Err(TargetError::other("select script exhausted")),
        }
    }

    async fn send_text(&self, text: &str) -> reeltarget::Result<Vec<RawMessage>> {
        self.record(format!("send_text:{}", text));
        if let Some(reply) = self.text_reply.lock().unwrap().take() {
            self.recent.lock().unwrap().insert(0, reply);
        }
        Ok(vec![])
    }

    async fn recent_messages(&self, limit: usize) -> reeltarget::Result<Vec<RawMessage>> {
        self.record("recent");
        let recent = self.recent.lock().unwrap();
        Ok(recent.iter().take(limit).cloned().collect())
    }

    async fn forward(&self, target: &str, key: MessageKey) -> reeltarget::Result<()> {
        self.record(format!("forward:{}:{}", target, key));
        if let Some(reply) = self.peer_reply.lock().unwrap().take() {
            self.recent.lock().unwrap().insert(0, reply);
        }
        Ok(())
    }

    async fn join_resource(&self, locator: &str) -> reeltarget::Result<()> {
        self.record(format!("join:{}", locator));
        Ok(())
    }
}

// ----------------------------------------------------------------------
// Fixtures
// ----------------------------------------------------------------------

fn message(id: i64, text: &str, has_file: bool, buttons: Vec<Vec<RawButton>>) -> RawMessage {
    RawMessage {
        key: MessageKey::new(-100, id),
        text: text.to_string(),
        has_file,
        buttons,
    }
}

fn peer_reply(url: &str) -> RawMessage {
    message(999, &format!("Here is your link: {}", url), false, vec![])
}

fn resolver(target: Arc<MockTarget>) -> Resolver {
    Resolver::new(
        target,
        ResultCache::new(Duration::from_secs(300), 10),
        "link_peer",
        ResolverTuning::zero(),
    )
}

// ----------------------------------------------------------------------
// Search
// ----------------------------------------------------------------------

#[tokio::test]
async fn search_filters_noise_and_buttonless_messages() {
    let target = Arc::new(MockTarget::default());
    *target.query_responses.lock().unwrap() = vec![
        message(
            10,
            "Inception (2010)\nIMDb: 8.8\nAction Sci-Fi Thriller",
            false,
            vec![
                vec![RawButton::action("Update Channel")],
                vec![RawButton::action("720p")],
                vec![RawButton::action("1080p")],
            ],
        ),
        message(11, "Subscribe for more!", false, vec![]),
    ];

    let resolver = resolver(target.clone());
    let results = resolver.search("inception").await.unwrap();

    assert_eq!(results.len(), 1);
    let candidate = &results[0];
    assert_eq!(candidate.id, "msg_-100_10");
    assert_eq!(candidate.title, "Inception (2010)");
    assert_eq!(candidate.year, Some(2010));
    assert_eq!(candidate.imdb_rating, Some(8.8));
    assert_eq!(candidate.genres, vec!["action", "thriller", "sci-fi"]);
    assert_eq!(candidate.options.len(), 2);
    assert!(candidate.options.iter().all(|o| o.kind == OptionKind::Callback));
}

#[tokio::test]
async fn search_hits_cache_on_repeat() {
    let target = Arc::new(MockTarget::default());
    *target.query_responses.lock().unwrap() = vec![message(
        10,
        "A Movie",
        false,
        vec![vec![RawButton::action("720p")]],
    )];

    let resolver = resolver(target.clone());
    resolver.search("a movie").await.unwrap();
    resolver.search("  A   MOVIE ").await.unwrap();

    assert_eq!(target.calls_matching("query:"), 1);
}

#[tokio::test]
async fn search_rejects_empty_query() {
    let target = Arc::new(MockTarget::default());
    let resolver = resolver(target);
    assert!(resolver.search("   ").await.is_err());
}

// ----------------------------------------------------------------------
// Resolve
// ----------------------------------------------------------------------

#[tokio::test]
async fn file_marker_takes_fast_path_without_clicking() {
    let target = Arc::new(MockTarget::default());
    *target.recent.lock().unwrap() = vec![message(
        20,
        "The file itself",
        true,
        vec![vec![RawButton::action("720p")]],
    )];
    *target.peer_reply.lock().unwrap() = Some(peer_reply("https://cdn.example.com/video.mp4"));

    let resolver = resolver(target.clone());
    let locator = resolver.resolve("msg_-100_20", 0).await.unwrap();

    assert_eq!(locator, "https://cdn.example.com/video.mp4");
    assert_eq!(target.calls_matching("select:"), 0);
    assert_eq!(target.calls_matching("forward:link_peer:"), 1);
}

#[tokio::test]
async fn failed_fast_path_delivery_falls_back_to_options() {
    let target = Arc::new(MockTarget::default());
    // File marker present, but the delivery peer never answers: the fast
    // path fails and the link button must still win.
    *target.recent.lock().unwrap() = vec![message(
        60,
        "A Movie",
        true,
        vec![vec![RawButton::link(
            "Watch online",
            "https://example.com/watch/60",
        )]],
    )];

    let resolver = resolver(target.clone());
    let locator = resolver.resolve("msg_-100_60", 0).await.unwrap();

    assert_eq!(locator, "https://example.com/watch/60");
    assert_eq!(target.calls_matching("forward:link_peer:msg_-100_60"), 1);
    assert_eq!(target.calls_matching("select:"), 0);
}

#[tokio::test]
async fn plain_direct_locator_returned_unchanged() {
    let target = Arc::new(MockTarget::default());
    *target.recent.lock().unwrap() = vec![message(
        21,
        "A Movie",
        false,
        vec![vec![RawButton::link(
            "Watch online",
            "https://example.com/watch/21",
        )]],
    )];

    let resolver = resolver(target.clone());
    let locator = resolver.resolve("msg_-100_21", 0).await.unwrap();

    assert_eq!(locator, "https://example.com/watch/21");
    assert_eq!(target.calls_matching("select:"), 0);
    assert_eq!(target.calls_matching("forward:"), 0);
}

#[tokio::test]
async fn deep_link_button_replayed_as_start_command() {
    let target = Arc::new(MockTarget::default());
    *target.recent.lock().unwrap() = vec![message(
        70,
        "A Movie",
        false,
        vec![vec![RawButton::link(
            "Get File",
            "https://t.me/somebot?start=abc123",
        )]],
    )];
    // The bot answers the replayed /start with a file in the history
    *target.text_reply.lock().unwrap() = Some(message(71, "here you go", true, vec![]));
    *target.peer_reply.lock().unwrap() = Some(peer_reply("https://cdn.example.com/deep.mp4"));

    let resolver = resolver(target.clone());
    let locator = resolver.resolve("msg_-100_70", 0).await.unwrap();

    assert_eq!(locator, "https://cdn.example.com/deep.mp4");
    assert_eq!(target.calls_matching("send_text:/start abc123"), 1);
    assert_eq!(target.calls_matching("forward:link_peer:msg_-100_71"), 1);
    assert_eq!(target.calls_matching("select:"), 0);
}

#[tokio::test]
async fn gated_callback_joins_retries_and_delivers() {
    let target = Arc::new(MockTarget::default());
    *target.recent.lock().unwrap() = vec![message(
        30,
        "A Movie",
        false,
        vec![vec![RawButton::action("Fast Download")]],
    )];

    let gate = message(
        31,
        "To download you must JOIN CHANNEL first",
        false,
        vec![
            vec![RawButton::link("Join Channel", "https://t.me/somechannel")],
            vec![RawButton::action("TRY AGAIN ♻")],
        ],
    );
    let file_msg = message(32, "here you go", true, vec![]);
    *target.select_script.lock().unwrap() = VecDeque::from(vec![
        SelectOutcome::NewMessage(gate),
        SelectOutcome::NewMessage(file_msg),
    ]);
    *target.peer_reply.lock().unwrap() = Some(peer_reply("https://cdn.example.com/gated.mp4"));

    let resolver = resolver(target.clone());
    let locator = resolver.resolve("msg_-100_30", 0).await.unwrap();

    assert_eq!(locator, "https://cdn.example.com/gated.mp4");
    assert_eq!(target.calls_matching("join:https://t.me/somechannel"), 1);
    // Original click plus one retry after joining
    assert_eq!(target.calls_matching("select:msg_-100_30:0:0"), 2);
    assert_eq!(target.calls_matching("forward:link_peer:msg_-100_32"), 1);
}

#[tokio::test]
async fn unknown_item_id_is_rejected() {
    let target = Arc::new(MockTarget::default());
    let resolver = resolver(target);
    assert!(resolver.resolve("not-an-item", 0).await.is_err());
}

#[tokio::test]
async fn out_of_range_option_index_is_rejected() {
    let target = Arc::new(MockTarget::default());
    *target.recent.lock().unwrap() = vec![message(
        40,
        "A Movie",
        false,
        vec![vec![RawButton::action("720p")]],
    )];

    let resolver = resolver(target);
    assert!(resolver.resolve("msg_-100_40", 5).await.is_err());
}

#[tokio::test]
async fn clear_cache_forces_backend_roundtrip() {
    let target = Arc::new(MockTarget::default());
    *target.query_responses.lock().unwrap() = vec![message(
        50,
        "A Movie",
        false,
        vec![vec![RawButton::action("720p")]],
    )];

    let resolver = resolver(target.clone());
    resolver.search("a movie").await.unwrap();
    resolver.clear_cache();
    resolver.search("a movie").await.unwrap();

    assert_eq!(target.calls_matching("query:"), 2);
}
