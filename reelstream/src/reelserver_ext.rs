//! Extension reelserver pour le streaming

use std::sync::Arc;

use anyhow::Result;

use crate::source::ChunkSource;

/// État partagé pour le handler de streaming
#[derive(Clone)]
pub struct StreamState {
    pub source: Arc<dyn ChunkSource>,
}

impl StreamState {
    pub fn new(source: Arc<dyn ChunkSource>) -> Self {
        Self { source }
    }
}

/// Trait pour étendre reelserver avec le proxy de streaming
///
/// # Exemple
///
/// ```rust,no_run
/// use reelserver::ServerBuilder;
/// use reelstream::MediaStreamExt;
///
/// # async fn example() -> anyhow::Result<()> {
/// let mut server = ServerBuilder::new_configured().build();
/// server.init_media_stream().await?;
/// server.start().await;
/// # Ok(())
/// # }
/// ```
pub trait MediaStreamExt {
    /// Initialise le proxy de streaming avec la source HTTP configurée
    ///
    /// # Routes enregistrées
    ///
    /// - `GET /media/{source_ref}?size=<bytes>` - Streaming avec ranges
    async fn init_media_stream(&mut self) -> Result<StreamState>;

    /// Variante avec une source de chunks fournie par l'appelant
    async fn init_media_stream_with_source(
        &mut self,
        source: Arc<dyn ChunkSource>,
    ) -> Result<StreamState>;
}

// L'implémentation du trait est dans reelserver_impl.rs
