//! Asynchronous resolution jobs.
//!
//! Resolving an option can take tens of seconds of backend conversation, so
//! the HTTP API never blocks on it. `POST /api/stream` registers a job and
//! returns immediately; a background worker drives the job through
//! `Pending → Processing → {Done | Failed}` and clients poll
//! `GET /api/job/{job_id}` until a terminal state carries the locator or the
//! error.
//!
//! Jobs live in memory only. `DELETE /api/cache` clears the search cache and
//! sweeps out jobs older than the configured age.

pub mod api_rest;
pub mod config_ext;
pub mod error;
pub mod models;
pub mod reelserver_ext;
mod reelserver_impl;
pub mod registry;
pub mod worker;

pub use config_ext::JobsConfigExt;
pub use error::{Error, Result};
pub use models::{Job, JobStatus};
pub use reelserver_ext::{JobsExt, JobsState};
pub use registry::JobRegistry;
pub use worker::spawn_worker;
