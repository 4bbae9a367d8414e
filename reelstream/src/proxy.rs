//! Mapping byte ranges onto chunk windows.

use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use tracing::error;

use crate::error::{Error, Result};
use crate::source::{CHUNK_SIZE, ChunkSource};

/// Stream exactly the bytes `start..=end` of a chunk-addressable object.
///
/// Computes the covering chunk window, trims the leading
/// `start % CHUNK_SIZE` bytes off the first chunk and stops after
/// `end - start + 1` bytes, truncating inside the last chunk if needed.
///
/// A mid-stream source failure surfaces as an `Err` item; the HTTP layer
/// aborts the body at that point, bytes already flushed stand.
pub async fn stream_range(
    source: Arc<dyn ChunkSource>,
    source_ref: &str,
    start: u64,
    end: u64,
) -> Result<BoxStream<'static, Result<Bytes>>> {
    debug_assert!(end >= start);
    let length = end - start + 1;
    let start_chunk = start / CHUNK_SIZE;
    let offset_in_chunk = start % CHUNK_SIZE;
    let chunk_count = (length + offset_in_chunk).div_ceil(CHUNK_SIZE);

    let mut chunks = source.open(source_ref, start_chunk, chunk_count).await?;

    let stream = async_stream::stream! {
        let mut to_skip = offset_in_chunk as usize;
        let mut remaining = length as usize;

        while remaining > 0 {
            let chunk = match chunks.next().await {
                Some(Ok(c)) => c,
                Some(Err(e)) => {
                    error!("chunk source failed mid-stream: {}", e);
                    yield Err(e);
                    return;
                }
                None => {
                    error!("chunk source ended {} byte(s) early", remaining);
                    yield Err(Error::Source(format!(
                        "source exhausted with {} byte(s) missing",
                        remaining
                    )));
                    return;
                }
            };

            let mut chunk = chunk;
            if to_skip > 0 {
                if to_skip >= chunk.len() {
                    to_skip -= chunk.len();
                    continue;
                }
                chunk = chunk.slice(to_skip..);
                to_skip = 0;
            }

            if chunk.len() > remaining {
                chunk = chunk.slice(..remaining);
            }
            remaining -= chunk.len();
            yield Ok(chunk);
        }
    };

    Ok(Box::pin(stream))
}
