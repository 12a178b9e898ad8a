use std::path::PathBuf;

use thiserror::Error;

use crate::domain::catalog::CatalogError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid product catalog in config: {0}")]
    CatalogConfig(#[from] CatalogError),
    #[error("failed to initialize logging: {0}")]
    LoggingInit(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("failed to resolve storage path: {details}")]
    StoragePathResolution { details: String },
    #[error("failed to create storage directory at {path}: {source}")]
    StorageDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to lock order store at {path}: {source}")]
    StoreLock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize order counts: {0}")]
    StoreSerialize(#[source] serde_json::Error),
    #[error("failed to write order store at {path}: {source}")]
    StoreWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to deliver export document to {path}: {source}")]
    ExportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write reply: {0}")]
    ReplyWrite(#[source] std::io::Error),
}
