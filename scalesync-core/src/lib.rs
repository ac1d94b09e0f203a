//! Core library for scalesync – pulls scale images and price files from an
//! FTP server and archives what was processed.

pub mod command_file;
mod config;
mod error;
pub mod filter;
mod remote;
mod sync;
mod text;
mod utils;

pub use command_file::{ClearCommands, DEFAULT_MAX_ID, LINE_TERMINATOR};
pub use config::{ConfigFile, FtpCfg, LocalCfg, LogCfg, SyncConfig, CONFIG_FILENAME, DEFAULT_ENCODING, LOG_FILENAME};
pub use error::{ConfigError, SyncError};
pub use remote::{Connector, TransferClient, TransferMode};
pub use sync::{shutdown, SyncOptions, SyncReport, SyncRunner};
pub use text::TextCodec;
pub use utils::remote_join;
