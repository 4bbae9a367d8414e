//! Background worker driving one job through the resolver.

use std::sync::Arc;

use reelresolver::Resolver;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::registry::JobRegistry;

/// Spawn the background task for a freshly created job.
///
/// The task makes exactly one resolution attempt. Every resolver error is
/// absorbed into the job's Failed state; nothing escapes to the HTTP layer.
pub fn spawn_worker(registry: Arc<JobRegistry>, resolver: Arc<Resolver>, job_id: String) {
    tokio::spawn(async move {
        if let Err(e) = run_job(&registry, &resolver, &job_id).await {
            warn!("job {} bookkeeping failed: {}", job_id, e);
        }
    });
}

async fn run_job(registry: &JobRegistry, resolver: &Resolver, job_id: &str) -> Result<()> {
    let job = registry
        .get(job_id)
        .await
        .ok_or_else(|| Error::NotFound(job_id.to_string()))?;

    registry
        .mark_processing(job_id, "Resolving stream option")
        .await?;

    match resolver.resolve(&job.item_id, job.option_index).await {
        Ok(locator) => {
            info!("job {} resolved", job_id);
            registry.mark_done(job_id, locator).await
        }
        Err(e) => {
            warn!("job {} failed: {}", job_id, e);
            registry.mark_failed(job_id, e.to_string()).await
        }
    }
}
