//! Cible de résolution hors-ligne.
//!
//! Tient lieu d'adaptateur tant qu'aucun transport vers le backend
//! interactif n'est branché : chaque opération échoue avec une erreur de
//! transport explicite, le serveur et le proxy de streaming restent
//! utilisables.

use async_trait::async_trait;
use reeltarget::{Error, MessageKey, RawMessage, ResolutionTarget, SelectOutcome};

const NO_ADAPTER: &str = "no resolution target adapter configured";

pub struct OfflineTarget;

#[async_trait]
impl ResolutionTarget for OfflineTarget {
    async fn query(&self, _text: &str) -> reeltarget::Result<Vec<RawMessage>> {
        Err(Error::transport(NO_ADAPTER))
    }

    async fn select_option(
        &self,
        _key: MessageKey,
        _row: usize,
        _col: usize,
    ) -> reeltarget::Result<SelectOutcome> {
        Err(Error::transport(NO_ADAPTER))
    }

    async fn send_text(&self, _text: &str) -> reeltarget::Result<Vec<RawMessage>> {
        Err(Error::transport(NO_ADAPTER))
    }

    async fn recent_messages(&self, _limit: usize) -> reeltarget::Result<Vec<RawMessage>> {
        Err(Error::transport(NO_ADAPTER))
    }

    async fn forward(&self, _target: &str, _key: MessageKey) -> reeltarget::Result<()> {
        Err(Error::transport(NO_ADAPTER))
    }

    async fn join_resource(&self, _locator: &str) -> reeltarget::Result<()> {
        Err(Error::transport(NO_ADAPTER))
    }
}
