use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("missing required config keys: {}", .0.join(", "))]
    MissingKeys(Vec<String>),

    #[error("unknown text encoding '{0}'")]
    UnknownEncoding(String),
}

/// Failure of one synchronisation run. Nothing is retried or rolled back:
/// files handled before the failure stay where they are.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("cannot open FTP session with {address}")]
    Connection {
        address: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("FTP {operation} failed for {target}")]
    Transfer {
        operation: &'static str,
        target: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("cannot transcode {name}")]
    Text {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write local file {path}")]
    LocalIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    pub(crate) fn transfer(operation: &'static str, target: impl Into<String>) -> impl FnOnce(anyhow::Error) -> Self {
        let target = target.into();
        move |source| SyncError::Transfer {
            operation,
            target,
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
