// logs.rs
mod bufferlayer;

use reelconfig::get_config;
pub use bufferlayer::BufferLayer;

use std::{
    collections::VecDeque,
    sync::{Arc, RwLock},
    time::SystemTime,
};

use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;
use tracing_subscriber::{
    Registry, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Représente une entrée de log
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: SystemTime,
    pub level: String,
    pub target: String,
    pub message: String,
}

/// Buffer circulaire partagé
#[derive(Clone)]
pub struct LogState {
    buffer: Arc<RwLock<VecDeque<LogEntry>>>,
    capacity: usize,
}

impl LogState {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub(crate) fn push(&self, entry: LogEntry) {
        let mut buf = self.buffer.write().unwrap();
        if buf.len() == self.capacity {
            buf.pop_front();
        }
        buf.push_back(entry);
    }

    pub fn dump(&self) -> Vec<LogEntry> {
        self.buffer.read().unwrap().iter().cloned().collect()
    }
}

/// Handler REST (dump JSON du buffer)
pub async fn log_dump(State(state): State<LogState>) -> impl IntoResponse {
    Json(state.dump())
}

/// Options d'initialisation du système de logging
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// Capacité du buffer circulaire (nombre d'entrées conservées)
    pub buffer_capacity: usize,
    /// Activer la sortie vers stderr/stdout
    pub enable_console: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            buffer_capacity: 1000,
            enable_console: true,
        }
    }
}

impl LoggingOptions {
    /// Construit les options depuis la configuration (`host.logger.*`),
    /// en retombant sur les valeurs par défaut si une clé manque.
    pub fn from_config() -> Self {
        let config = get_config();
        let defaults = Self::default();
        Self {
            buffer_capacity: config
                .get_log_cache_size()
                .unwrap_or(defaults.buffer_capacity),
            enable_console: config
                .get_log_enable_console()
                .unwrap_or(defaults.enable_console),
        }
    }
}

/// Initialise le système de logging avec le buffer circulaire et
/// optionnellement la console.
///
/// # Retourne
///
/// Le `LogState` qui peut être utilisé pour ajouter la route `/log-dump`
/// au serveur.
pub fn init_logging(options: LoggingOptions) -> LogState {
    let config = get_config();

    let log_level = match config.get_log_min_level() {
        Ok(l) => string_to_levelfilter(&l).unwrap_or(LevelFilter::INFO),
        Err(_) => LevelFilter::INFO,
    };

    let log_state = LogState::new(options.buffer_capacity);

    // Le filtre doit être appliqué avant le BufferLayer
    let subscriber = Registry::default()
        .with(log_level)
        .with(BufferLayer::new(log_state.clone()));

    if options.enable_console {
        subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(true),
            )
            .init();
    } else {
        subscriber.init();
    }

    log_state
}

fn string_to_levelfilter(s: &str) -> Option<LevelFilter> {
    match s.to_uppercase().as_str() {
        "ERROR" => Some(LevelFilter::ERROR),
        "WARN" => Some(LevelFilter::WARN),
        "INFO" => Some(LevelFilter::INFO),
        "DEBUG" => Some(LevelFilter::DEBUG),
        "TRACE" => Some(LevelFilter::TRACE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_state_eviction() {
        let state = LogState::new(3);
        for i in 0..5 {
            state.push(LogEntry {
                timestamp: SystemTime::now(),
                level: "INFO".to_string(),
                target: "test".to_string(),
                message: format!("message {}", i),
            });
        }

        let entries = state.dump();
        assert_eq!(entries.len(), 3);
        // Les plus anciennes entrées sont évincées en premier
        assert_eq!(entries[0].message, "message 2");
        assert_eq!(entries[2].message, "message 4");
    }

    #[test]
    fn test_string_to_levelfilter() {
        assert_eq!(string_to_levelfilter("info"), Some(LevelFilter::INFO));
        assert_eq!(string_to_levelfilter("ERROR"), Some(LevelFilter::ERROR));
        assert_eq!(string_to_levelfilter("verbose"), None);
    }
}
