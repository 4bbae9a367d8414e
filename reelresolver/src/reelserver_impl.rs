//! Implémentation du trait ResolverExt pour reelserver::Server
//!
//! `reelresolver` étend `reelserver::Server` sans que `reelserver` connaisse
//! `reelresolver`. C'est le pattern d'extension : on ajoute des
//! fonctionnalités à un type externe via un trait.

use std::sync::Arc;

use anyhow::Result;
use reelserver::Server;
use reeltarget::ResolutionTarget;
use tracing::info;

use crate::api_rest::create_router;
use crate::reelserver_ext::{ResolverExt, ResolverState};
use crate::resolver::Resolver;

impl ResolverExt for Server {
    async fn init_resolver(&mut self, target: Arc<dyn ResolutionTarget>) -> Result<ResolverState> {
        info!("Initializing resolver API...");

        let resolver = Resolver::new_configured(target)
            .map_err(|e| anyhow::anyhow!("Failed to create resolver: {}", e))?;
        let state = ResolverState::new(Arc::new(resolver));

        let router = create_router(state.clone());
        self.add_router("/api", router).await;

        info!("Resolver API initialized");
        info!("API endpoint available at /api/search");

        Ok(state)
    }
}
