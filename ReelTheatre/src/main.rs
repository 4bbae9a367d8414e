use std::sync::Arc;

use reeljobs::JobsExt;
use reelresolver::ResolverExt;
use reelserver::ServerBuilder;
use reelserver::logs::LoggingOptions;
use reelstream::MediaStreamExt;
use reeltarget::ResolutionTarget;
use tracing::info;

mod offline;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ========== PHASE 1 : Infrastructure ==========

    let mut server = ServerBuilder::new_configured().build();
    server.init_logging(LoggingOptions::from_config()).await;

    // Route de liveness
    server
        .add_route("/health", || async {
            serde_json::json!({
                "status": "healthy",
                "service": "ReelTheatre"
            })
        })
        .await;

    // ========== PHASE 2 : Pipeline de résolution ==========

    // L'adaptateur concret vers le backend interactif est branché ici.
    // Sans adaptateur, la cible hors-ligne répond proprement en erreur.
    let target: Arc<dyn ResolutionTarget> = Arc::new(offline::OfflineTarget);

    info!("🎬 Initializing resolution pipeline...");
    let resolver_state = server
        .init_resolver(target)
        .await
        .expect("Failed to initialize resolver API");

    server
        .init_jobs(resolver_state.resolver.clone())
        .await
        .expect("Failed to initialize jobs API");

    server
        .init_media_stream()
        .await
        .expect("Failed to initialize media streaming proxy");

    // ========== PHASE 3 : Démarrage du serveur ==========

    info!("🌐 Starting HTTP server...");
    server.start().await;

    info!("✅ ReelTheatre is ready!");
    info!("Press Ctrl+C to stop...");
    server.wait().await;

    Ok(())
}
