//! Extension pour intégrer le resolver dans reelconfig
//!
//! Ce module fournit le trait `ResolverConfigExt` qui ajoute les getters
//! typés de la configuration du resolver à `reelconfig::Config`.

use anyhow::Result;
use reelconfig::Config;
use serde_yaml::Value;

/// Default TTL of cached search results (seconds)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Default number of cached queries before eviction
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Default handle of the link-delivery conversation partner
pub const DEFAULT_DELIVERY_PEER: &str = "link_generator_bot";

/// Trait d'extension pour la configuration du resolver
pub trait ResolverConfigExt {
    /// TTL des résultats de recherche en cache, en secondes
    fn get_resolver_cache_ttl_secs(&self) -> Result<u64>;

    /// Nombre maximum de requêtes en cache avant éviction
    fn get_resolver_cache_capacity(&self) -> Result<usize>;

    /// Identifiant du partenaire de conversation qui génère les liens
    fn get_resolver_delivery_peer(&self) -> Result<String>;
}

impl ResolverConfigExt for Config {
    fn get_resolver_cache_ttl_secs(&self) -> Result<u64> {
        match self.get_value(&["resolver", "cache_ttl_secs"]) {
            Ok(Value::Number(n)) if n.is_u64() => Ok(n.as_u64().unwrap()),
            _ => Ok(DEFAULT_CACHE_TTL_SECS),
        }
    }

    fn get_resolver_cache_capacity(&self) -> Result<usize> {
        match self.get_value(&["resolver", "cache_capacity"]) {
            Ok(Value::Number(n)) if n.is_u64() => Ok(n.as_u64().unwrap() as usize),
            _ => Ok(DEFAULT_CACHE_CAPACITY),
        }
    }

    fn get_resolver_delivery_peer(&self) -> Result<String> {
        match self.get_value(&["resolver", "delivery_peer"]) {
            Ok(Value::String(s)) if !s.is_empty() => Ok(s),
            _ => Ok(DEFAULT_DELIVERY_PEER.to_string()),
        }
    }
}
