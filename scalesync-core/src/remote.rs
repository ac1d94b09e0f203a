use anyhow::Result;
use std::io::Write;

/// FTP representation type used for a retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    /// ASCII transfer; the caller re-encodes the lines.
    Text,
    /// Image transfer, bytes copied as they are.
    Binary,
}

/// One authenticated session on the file server.
///
/// Every call blocks until the server answered. After [`close`] all other
/// calls fail.
///
/// [`close`]: TransferClient::close
pub trait TransferClient {
    fn change_dir(&mut self, path: &str) -> Result<()>;
    /// Names in the current remote directory.
    fn list_names(&mut self) -> Result<Vec<String>>;
    /// Copy remote `name` into `sink`, returning the byte count.
    fn retrieve(&mut self, name: &str, mode: TransferMode, sink: &mut dyn Write) -> Result<u64>;
    fn rename(&mut self, from: &str, to: &str) -> Result<()>;
    /// Polite logout.
    fn quit(&mut self) -> Result<()>;
    /// Drop the connection without talking to the server. Never fails.
    fn close(&mut self);
}

/// Opens sessions on a file server.
pub trait Connector {
    type Session: TransferClient;

    fn connect(&self, address: &str, user: &str, password: &str) -> Result<Self::Session>;
}
