//! Job data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Done,
    Failed,
}

impl JobStatus {
    /// Done and Failed are never left again
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// One background resolution job
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub job_id: String,
    pub item_id: String,
    pub option_index: usize,
    pub status: JobStatus,
    /// Set when the job is Done
    pub locator: Option<String>,
    /// Set when the job is Failed
    pub error: Option<String>,
    /// Human-readable description of the current step
    pub progress: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
