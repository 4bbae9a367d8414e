//! Extension reelserver pour les jobs
//!
//! Ce module fournit un trait d'extension pour ajouter l'API des jobs à un
//! serveur reelserver.

use std::sync::Arc;

use anyhow::Result;
use reelresolver::Resolver;

use crate::registry::JobRegistry;

/// État partagé pour les handlers de jobs
#[derive(Clone)]
pub struct JobsState {
    pub registry: Arc<JobRegistry>,
    pub resolver: Arc<Resolver>,
}

impl JobsState {
    pub fn new(registry: Arc<JobRegistry>, resolver: Arc<Resolver>) -> Self {
        Self { registry, resolver }
    }
}

/// Trait pour étendre reelserver avec l'API des jobs
///
/// # Exemple
///
/// ```rust,no_run
/// use reeljobs::JobsExt;
/// use reelresolver::Resolver;
/// use reelserver::ServerBuilder;
/// use std::sync::Arc;
///
/// # async fn example(resolver: Arc<Resolver>) -> anyhow::Result<()> {
/// let mut server = ServerBuilder::new_configured().build();
/// let state = server.init_jobs(resolver).await?;
/// server.start().await;
/// # Ok(())
/// # }
/// ```
pub trait JobsExt {
    /// Initialise le registre de jobs et enregistre les routes HTTP
    ///
    /// # Routes enregistrées
    ///
    /// - `POST /api/stream` - Démarrage d'un job de résolution
    /// - `GET /api/job/{job_id}` - État d'un job
    /// - `DELETE /api/cache` - Vidage du cache et nettoyage des vieux jobs
    async fn init_jobs(&mut self, resolver: Arc<Resolver>) -> Result<JobsState>;
}

// L'implémentation du trait est dans reelserver_impl.rs
