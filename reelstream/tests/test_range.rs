//! End-to-end properties of the chunk-windowed range streaming.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use reelstream::{CHUNK_SIZE, ChunkSource, Error, parse_range, stream_range};

/// In-memory chunk store over a deterministic byte pattern
struct MemorySource {
    data: Vec<u8>,
    /// Recorded (start_chunk, chunk_count) of each open
    opens: Mutex<Vec<(u64, u64)>>,
}

impl MemorySource {
    fn new(size: usize) -> Self {
        Self {
            data: (0..size).map(|i| (i % 251) as u8).collect(),
            opens: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ChunkSource for MemorySource {
    async fn open(
        &self,
        _source_ref: &str,
        start_chunk: u64,
        chunk_count: u64,
    ) -> reelstream::Result<BoxStream<'static, reelstream::Result<Bytes>>> {
        self.opens.lock().unwrap().push((start_chunk, chunk_count));

        let mut chunks = Vec::new();
        for chunk in start_chunk..start_chunk + chunk_count {
            let from = (chunk * CHUNK_SIZE) as usize;
            if from >= self.data.len() {
                break;
            }
            let to = (from + CHUNK_SIZE as usize).min(self.data.len());
            chunks.push(Ok(Bytes::copy_from_slice(&self.data[from..to])));
        }
        Ok(Box::pin(futures::stream::iter(chunks)))
    }
}

/// A source that dies while serving its second chunk
struct FailingSource;

#[async_trait]
impl ChunkSource for FailingSource {
    async fn open(
        &self,
        _source_ref: &str,
        _start_chunk: u64,
        _chunk_count: u64,
    ) -> reelstream::Result<BoxStream<'static, reelstream::Result<Bytes>>> {
        let chunks = vec![
            Ok(Bytes::from(vec![0u8; CHUNK_SIZE as usize])),
            Err(Error::Source("connection reset".to_string())),
        ];
        Ok(Box::pin(futures::stream::iter(chunks)))
    }
}

async fn collect(source: Arc<dyn ChunkSource>, start: u64, end: u64) -> Vec<u8> {
    let mut stream = stream_range(source, "obj", start, end).await.unwrap();
    let mut out = Vec::new();
    while let Some(item) = stream.next().await {
        out.extend_from_slice(&item.unwrap());
    }
    out
}

#[tokio::test]
async fn range_yields_exactly_the_requested_bytes() {
    let size = 2_500_000u64;
    let source = Arc::new(MemorySource::new(size as usize));
    let (start, end) = parse_range("bytes=100000-1800000", size).unwrap();

    let body = collect(source.clone(), start, end).await;
    assert_eq!(body.len() as u64, end - start + 1);
    assert_eq!(body, source.data[start as usize..=end as usize].to_vec());
}

#[tokio::test]
async fn split_ranges_concatenate_to_the_full_object() {
    let size = 2_500_000u64;
    let k = 1_234_567u64;
    let source = Arc::new(MemorySource::new(size as usize));

    let mut joined = collect(source.clone(), 0, k).await;
    joined.extend(collect(source.clone(), k + 1, size - 1).await);

    let full = collect(source.clone(), 0, size - 1).await;
    assert_eq!(joined, full);
    assert_eq!(full, source.data);
}

#[tokio::test]
async fn chunk_window_is_computed_from_the_range() {
    // 1 MiB chunks over a 5 MB object: bytes 1000000-1999999 live in
    // chunks 0 and 1, with 1000000 bytes trimmed off the front
    let size = 5_000_000u64;
    let source = Arc::new(MemorySource::new(size as usize));

    let body = collect(source.clone(), 1_000_000, 1_999_999).await;
    assert_eq!(body.len(), 1_000_000);
    assert_eq!(
        body,
        source.data[1_000_000..2_000_000].to_vec()
    );

    let opens = source.opens.lock().unwrap();
    assert_eq!(*opens, vec![(0, 2)]);
}

#[tokio::test]
async fn open_ended_range_covers_the_tail() {
    let size = 3_000_000u64;
    let source = Arc::new(MemorySource::new(size as usize));
    let (start, end) = parse_range("bytes=2999000-", size).unwrap();

    let body = collect(source.clone(), start, end).await;
    assert_eq!(body.len(), 1000);
    assert_eq!(body, source.data[2_999_000..].to_vec());
}

#[tokio::test]
async fn unsatisfiable_range_reports_total() {
    let err = parse_range("bytes=5000000-", 5_000_000).unwrap_err();
    assert_eq!(err, reelstream::RangeError::Unsatisfiable { total: 5_000_000 });
}

#[tokio::test]
async fn mid_stream_failure_surfaces_as_error_item() {
    let source: Arc<dyn ChunkSource> = Arc::new(FailingSource);
    let mut stream = stream_range(source, "obj", 0, 2 * CHUNK_SIZE - 1)
        .await
        .unwrap();

    let first = stream.next().await.unwrap();
    assert_eq!(first.unwrap().len() as u64, CHUNK_SIZE);

    let second = stream.next().await.unwrap();
    assert!(second.is_err());

    // The stream ends after the failure
    assert!(stream.next().await.is_none());
}
