//! Implémentation du trait JobsExt pour reelserver::Server

use std::sync::Arc;

use anyhow::Result;
use reelresolver::Resolver;
use reelserver::Server;
use tracing::info;

use crate::api_rest::create_router;
use crate::reelserver_ext::{JobsExt, JobsState};
use crate::registry::JobRegistry;

impl JobsExt for Server {
    async fn init_jobs(&mut self, resolver: Arc<Resolver>) -> Result<JobsState> {
        info!("Initializing jobs API...");

        let state = JobsState::new(Arc::new(JobRegistry::new()), resolver);

        let router = create_router(state.clone());
        self.add_router("/api", router).await;

        info!("Jobs API initialized");
        info!("API endpoints available at /api/stream, /api/job/{{job_id}}, /api/cache");

        Ok(state)
    }
}
