//! Byte-range streaming proxy over a chunk-addressable media source.
//!
//! The backing store serves media in fixed 1 MiB chunks. This crate maps
//! arbitrary HTTP byte ranges onto chunk windows: it computes which chunks
//! cover the requested range, trims the front of the first chunk, truncates
//! the tail of the last one and relays exactly the requested bytes to the
//! client, without ever buffering the whole object.
//!
//! `GET /media/{source_ref}?size=<bytes>` exposes this with full
//! partial-content semantics (200/206/416, `Content-Range`,
//! `Accept-Ranges: bytes`).

pub mod api_rest;
pub mod config_ext;
pub mod error;
pub mod proxy;
pub mod range;
pub mod reelserver_ext;
mod reelserver_impl;
pub mod source;

pub use config_ext::StreamConfigExt;
pub use error::{Error, RangeError, Result};
pub use proxy::stream_range;
pub use range::parse_range;
pub use reelserver_ext::{MediaStreamExt, StreamState};
pub use source::{CHUNK_SIZE, ChunkSource, HttpChunkSource};
