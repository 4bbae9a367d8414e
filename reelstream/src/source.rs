//! Chunk-addressable media sources.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use tracing::debug;

use crate::error::{Error, Result};

/// Fixed chunk size of the backing store (1 MiB)
pub const CHUNK_SIZE: u64 = 1024 * 1024;

/// A media store addressed in fixed-size chunks.
///
/// `open` yields `chunk_count` consecutive chunks starting at `start_chunk`.
/// Every chunk is `CHUNK_SIZE` bytes except possibly the last one of the
/// object.
#[async_trait]
pub trait ChunkSource: Send + Sync {
    async fn open(
        &self,
        source_ref: &str,
        start_chunk: u64,
        chunk_count: u64,
    ) -> Result<BoxStream<'static, Result<Bytes>>>;
}

/// Chunk source backed by an HTTP store that honors Range requests.
///
/// Each chunk becomes one `Range: bytes=...` request. A `source_ref` that is
/// already an absolute URL is fetched directly; otherwise it is resolved
/// against the configured base URL.
pub struct HttpChunkSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpChunkSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn resolve_url(&self, source_ref: &str) -> String {
        if source_ref.starts_with("http://") || source_ref.starts_with("https://") {
            source_ref.to_string()
        } else {
            format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                source_ref.trim_start_matches('/')
            )
        }
    }
}

#[async_trait]
impl ChunkSource for HttpChunkSource {
    async fn open(
        &self,
        source_ref: &str,
        start_chunk: u64,
        chunk_count: u64,
    ) -> Result<BoxStream<'static, Result<Bytes>>> {
        let url = self.resolve_url(source_ref);
        let client = self.client.clone();

        let stream = async_stream::try_stream! {
            for chunk in start_chunk..start_chunk + chunk_count {
                let first = chunk * CHUNK_SIZE;
                let last = first + CHUNK_SIZE - 1;
                debug!("fetching chunk {} ({}-{}) of {}", chunk, first, last, url);

                let response = client
                    .get(&url)
                    .header("Range", format!("bytes={}-{}", first, last))
                    .send()
                    .await?
                    .error_for_status()?;

                let body = response.bytes().await?;
                if body.is_empty() {
                    // Past the end of the object
                    break;
                }
                yield body;
            }
        };

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let source = HttpChunkSource::new("https://store.example.com/chunks/");
        assert_eq!(
            source.resolve_url("abc123"),
            "https://store.example.com/chunks/abc123"
        );
        assert_eq!(
            source.resolve_url("https://direct.example.com/file.mp4"),
            "https://direct.example.com/file.mp4"
        );
    }
}
