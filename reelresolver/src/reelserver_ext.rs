//! Extension reelserver pour le resolver
//!
//! Ce module fournit un trait d'extension pour ajouter l'API de recherche
//! à un serveur reelserver, sans que reelserver dépende de reelresolver.

use std::sync::Arc;

use anyhow::Result;
use reeltarget::ResolutionTarget;

use crate::resolver::Resolver;

/// État partagé pour les handlers de recherche
#[derive(Clone)]
pub struct ResolverState {
    pub resolver: Arc<Resolver>,
}

impl ResolverState {
    pub fn new(resolver: Arc<Resolver>) -> Self {
        Self { resolver }
    }
}

/// Trait pour étendre reelserver avec l'API de recherche
///
/// # Exemple
///
/// ```rust,no_run
/// use reelresolver::ResolverExt;
/// use reelserver::ServerBuilder;
/// use reeltarget::ResolutionTarget;
/// use std::sync::Arc;
///
/// # async fn example(target: Arc<dyn ResolutionTarget>) -> anyhow::Result<()> {
/// let mut server = ServerBuilder::new_configured().build();
/// let state = server.init_resolver(target).await?;
/// server.start().await;
/// # Ok(())
/// # }
/// ```
pub trait ResolverExt {
    /// Initialise le resolver et enregistre les routes HTTP
    ///
    /// # Routes enregistrées
    ///
    /// - `GET /api/search?q=<text>` - Recherche de candidats
    ///
    /// # Returns
    /// État partagé du resolver, réutilisable par d'autres extensions
    async fn init_resolver(&mut self, target: Arc<dyn ResolutionTarget>) -> Result<ResolverState>;
}

// L'implémentation du trait est dans reelserver_impl.rs
