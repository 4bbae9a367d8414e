//! Extension pour intégrer le streaming dans reelconfig

use anyhow::Result;
use reelconfig::Config;
use serde_yaml::Value;

/// Trait d'extension pour la configuration du streaming
pub trait StreamConfigExt {
    /// URL de base du magasin de chunks; vide quand les `source_ref` sont
    /// déjà des URLs absolues
    fn get_stream_upstream_base_url(&self) -> Result<String>;
}

impl StreamConfigExt for Config {
    fn get_stream_upstream_base_url(&self) -> Result<String> {
        match self.get_value(&["stream", "upstream_base_url"]) {
            Ok(Value::String(s)) => Ok(s),
            _ => Ok(String::new()),
        }
    }
}
