//! Extension pour intégrer les jobs dans reelconfig

use anyhow::Result;
use reelconfig::Config;
use serde_yaml::Value;

/// Default maximum job age before cleanup (seconds)
pub const DEFAULT_CLEANUP_MAX_AGE_SECS: u64 = 3600;

/// Trait d'extension pour la configuration des jobs
pub trait JobsConfigExt {
    /// Âge maximum d'un job avant qu'un nettoyage le supprime, en secondes
    fn get_jobs_cleanup_max_age_secs(&self) -> Result<u64>;
}

impl JobsConfigExt for Config {
    fn get_jobs_cleanup_max_age_secs(&self) -> Result<u64> {
        match self.get_value(&["jobs", "cleanup_max_age_secs"]) {
            Ok(Value::Number(n)) if n.is_u64() => Ok(n.as_u64().unwrap()),
            _ => Ok(DEFAULT_CLEANUP_MAX_AGE_SECS),
        }
    }
}
