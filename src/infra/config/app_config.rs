use std::{collections::BTreeMap, path::PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub logging: LogConfig,
    pub storage: StorageConfig,
    pub orders: OrdersConfig,
    pub transport: TransportConfig,
    /// Chat id -> human readable title used as the export label.
    pub chats: BTreeMap<String, String>,
}

impl AppConfig {
    pub fn conversation_label(&self, conversation_id: &str) -> String {
        self.chats
            .get(conversation_id)
            .cloned()
            .unwrap_or_else(|| format!("Chat {conversation_id}"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    /// Write logs to this file instead of stderr.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            file: None,
        }
    }
}

/// Explicit storage paths; `None` falls back to the resolved data directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StorageConfig {
    pub data_file: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct OrdersConfig {
    pub require_reply: bool,
    /// Replaces the built-in catalog when set.
    pub products: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransportConfig {
    pub max_in_flight: usize,
}

impl TransportConfig {
    /// Matches the default size of tokio's blocking pool.
    pub const MAX_IN_FLIGHT: usize = 512;

    pub fn in_flight_limit(&self) -> usize {
        self.max_in_flight.clamp(1, Self::MAX_IN_FLIGHT)
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self { max_in_flight: 8 }
    }
}
