use std::path::PathBuf;

use thiserror::Error;

use crate::channel::address::AddressError;

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
    #[error("invalid config: {details}")]
    InvalidConfig { details: String },
    #[error("invalid chat origin: {0}")]
    InvalidOrigin(#[from] AddressError),
    #[error("failed to initialize logging: {0}")]
    LoggingInit(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("failed to resolve storage path: {details}")]
    StoragePathResolution { details: String },
    #[error("failed to create directory {path}: {source}")]
    StorageDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to start network runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error(transparent)]
    Other(anyhow::Error),
}
