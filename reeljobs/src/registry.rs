//! In-memory job registry with guarded state transitions.

use std::collections::HashMap;

use chrono::{Duration as ChronoDuration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{Job, JobStatus};

/// Registry of resolution jobs.
///
/// Transitions are monotonic: `Pending → Processing → {Done | Failed}`.
/// Once a job reaches a terminal state no mutation touches it again; a late
/// worker writing against a finished job gets an error instead.
#[derive(Default)]
pub struct JobRegistry {
    jobs: RwLock<HashMap<String, Job>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new Pending job and return its id
    pub async fn create(&self, item_id: &str, option_index: usize) -> String {
        let job_id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let job = Job {
            job_id: job_id.clone(),
            item_id: item_id.to_string(),
            option_index,
            status: JobStatus::Pending,
            locator: None,
            error: None,
            progress: "Job created".to_string(),
            created_at: now,
            updated_at: now,
        };
        self.jobs.write().await.insert(job_id.clone(), job);
        job_id
    }

    /// Snapshot of a job
    pub async fn get(&self, job_id: &str) -> Option<Job> {
        self.jobs.read().await.get(job_id).cloned()
    }

    /// Move a job to Processing
    pub async fn mark_processing(&self, job_id: &str, progress: &str) -> Result<()> {
        self.mutate(job_id, |job| {
            job.status = JobStatus::Processing;
            job.progress = progress.to_string();
        })
        .await
    }

    /// Finish a job with a locator
    pub async fn mark_done(&self, job_id: &str, locator: String) -> Result<()> {
        self.mutate(job_id, |job| {
            job.status = JobStatus::Done;
            job.locator = Some(locator);
            job.progress = "Stream ready".to_string();
        })
        .await
    }

    /// Finish a job with an error message
    pub async fn mark_failed(&self, job_id: &str, error: String) -> Result<()> {
        self.mutate(job_id, |job| {
            job.status = JobStatus::Failed;
            job.error = Some(error);
            job.progress = "Resolution failed".to_string();
        })
        .await
    }

    async fn mutate(&self, job_id: &str, f: impl FnOnce(&mut Job)) -> Result<()> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(job_id)
            .ok_or_else(|| Error::NotFound(job_id.to_string()))?;
        if job.status.is_terminal() {
            return Err(Error::TerminalState(job_id.to_string()));
        }
        f(job);
        job.updated_at = Utc::now();
        Ok(())
    }

    /// Remove every job older than `max_age_secs`, whatever its status.
    ///
    /// # Returns
    /// The number of removed jobs.
    pub async fn cleanup(&self, max_age_secs: u64) -> usize {
        let cutoff = Utc::now() - ChronoDuration::seconds(max_age_secs as i64);
        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        jobs.retain(|_, job| job.created_at > cutoff);
        before - jobs.len()
    }

    /// Number of registered jobs
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
