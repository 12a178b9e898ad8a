use std::{collections::BTreeMap, path::PathBuf};

use serde::Deserialize;

use crate::infra::config::{AppConfig, LogConfig, OrdersConfig, StorageConfig, TransportConfig};

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub logging: Option<FileLogConfig>,
    pub storage: Option<FileStorageConfig>,
    pub orders: Option<FileOrdersConfig>,
    pub transport: Option<FileTransportConfig>,
    pub chats: Option<BTreeMap<String, String>>,
}

impl FileConfig {
    pub fn merge_into(self, config: &mut AppConfig) {
        if let Some(logging) = self.logging {
            logging.merge_into(&mut config.logging);
        }

        if let Some(storage) = self.storage {
            storage.merge_into(&mut config.storage);
        }

        if let Some(orders) = self.orders {
            orders.merge_into(&mut config.orders);
        }

        if let Some(transport) = self.transport {
            transport.merge_into(&mut config.transport);
        }

        if let Some(chats) = self.chats {
            config.chats.extend(chats);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLogConfig {
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

impl FileLogConfig {
    fn merge_into(self, config: &mut LogConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }

        if let Some(file) = self.file {
            config.file = Some(file);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileStorageConfig {
    pub data_file: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
}

impl FileStorageConfig {
    fn merge_into(self, config: &mut StorageConfig) {
        if let Some(data_file) = self.data_file {
            config.data_file = Some(data_file);
        }

        if let Some(export_dir) = self.export_dir {
            config.export_dir = Some(export_dir);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileOrdersConfig {
    pub require_reply: Option<bool>,
    pub products: Option<Vec<String>>,
}

impl FileOrdersConfig {
    fn merge_into(self, config: &mut OrdersConfig) {
        if let Some(require_reply) = self.require_reply {
            config.require_reply = require_reply;
        }

        if let Some(products) = self.products {
            config.products = Some(products);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileTransportConfig {
    pub max_in_flight: Option<usize>,
}

impl FileTransportConfig {
    fn merge_into(self, config: &mut TransportConfig) {
        if let Some(max_in_flight) = self.max_in_flight {
            config.max_in_flight = max_in_flight.clamp(1, TransportConfig::MAX_IN_FLIGHT);
        }
    }
}
