use std::path::Path;

use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::EnvFilter;

use crate::infra::{config::LogConfig, error::AppError};

/// Keeps the background log writer alive; flushes on drop.
#[derive(Debug)]
pub struct LoggingGuard {
    _file_writer: Option<WorkerGuard>,
}

/// Installs the global subscriber. Logs go to stderr because stdout carries replies.
pub fn init(config: &LogConfig) -> Result<LoggingGuard, AppError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let Some(path) = config.file.as_deref() else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(AppError::LoggingInit)?;

        return Ok(LoggingGuard { _file_writer: None });
    };

    let appender = file_appender(path)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(writer)
        .try_init()
        .map_err(AppError::LoggingInit)?;

    Ok(LoggingGuard {
        _file_writer: Some(guard),
    })
}

fn file_appender(path: &Path) -> Result<RollingFileAppender, AppError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            AppError::LoggingInit(format!("log file path {} has no file name", path.display()).into())
        })?;
    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(directory)
        .map_err(|source| AppError::LoggingInit(Box::new(source)))
}
