//! Implémentation du trait MediaStreamExt pour reelserver::Server

use std::sync::Arc;

use anyhow::Result;
use reelserver::Server;
use tracing::info;

use crate::api_rest::create_router;
use crate::config_ext::StreamConfigExt;
use crate::reelserver_ext::{MediaStreamExt, StreamState};
use crate::source::{ChunkSource, HttpChunkSource};

impl MediaStreamExt for Server {
    async fn init_media_stream(&mut self) -> Result<StreamState> {
        let base_url = reelconfig::get_config().get_stream_upstream_base_url()?;
        let source: Arc<dyn ChunkSource> = Arc::new(HttpChunkSource::new(base_url));
        self.init_media_stream_with_source(source).await
    }

    async fn init_media_stream_with_source(
        &mut self,
        source: Arc<dyn ChunkSource>,
    ) -> Result<StreamState> {
        info!("Initializing media streaming proxy...");

        let state = StreamState::new(source);
        let router = create_router(state.clone());
        self.add_router("/media", router).await;

        info!("Media streaming proxy initialized");
        info!("Endpoint available at /media/{{source_ref}}");

        Ok(state)
    }
}
