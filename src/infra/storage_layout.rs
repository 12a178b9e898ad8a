use std::{env, fs, path::PathBuf};

use crate::infra::{config::StorageConfig, error::AppError};

const APP_DIR_NAME: &str = "order-counter";
const DATA_FILE_NAME: &str = "order_counts.json";
const EXPORT_DIR_NAME: &str = "exports";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    pub data_file: PathBuf,
    pub export_dir: PathBuf,
}

impl StorageLayout {
    /// Uses configured paths where given, otherwise `$XDG_DATA_HOME/order-counter`
    /// (or `$HOME/.local/share/order-counter`).
    pub fn resolve(config: &StorageConfig) -> Result<Self, AppError> {
        if let (Some(data_file), Some(export_dir)) = (&config.data_file, &config.export_dir) {
            return Ok(Self {
                data_file: data_file.clone(),
                export_dir: export_dir.clone(),
            });
        }

        let data_dir = data_base_dir()?.join(APP_DIR_NAME);

        Ok(Self {
            data_file: config
                .data_file
                .clone()
                .unwrap_or_else(|| data_dir.join(DATA_FILE_NAME)),
            export_dir: config
                .export_dir
                .clone()
                .unwrap_or_else(|| data_dir.join(EXPORT_DIR_NAME)),
        })
    }

    pub fn ensure_dirs(&self) -> Result<(), AppError> {
        let data_dir = self
            .data_file
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty());

        for dir in data_dir.into_iter().chain([self.export_dir.as_path()]) {
            fs::create_dir_all(dir).map_err(|source| AppError::StorageDirCreate {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        Ok(())
    }
}

fn data_base_dir() -> Result<PathBuf, AppError> {
    env::var_os("XDG_DATA_HOME")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir().map(|home| home.join(".local").join("share")))
        .ok_or_else(|| AppError::StoragePathResolution {
            details: "unable to resolve data base directory (XDG_DATA_HOME/HOME)".into(),
        })
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME").map(PathBuf::from)
}
