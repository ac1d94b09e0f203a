mod utils;

pub use crate::utils::{check_listed_names, endpoint, DEFAULT_PORT};

use anyhow::{anyhow, Context, Result};
use scalesync_core::{Connector, TransferClient, TransferMode};
use std::io::{self, Write};
use suppaftp::types::{FileType, FormatControl};
use suppaftp::FtpStream;
use tracing::{debug, info};

/// Opens plain FTP sessions.
#[derive(Debug, Default, Clone, Copy)]
pub struct FtpConnector;

impl Connector for FtpConnector {
    type Session = FtpRemote;

    fn connect(&self, address: &str, user: &str, password: &str) -> Result<FtpRemote> {
        let endpoint = endpoint(address)?;
        let mut stream =
            FtpStream::connect(endpoint.as_str()).with_context(|| format!("cannot reach FTP server {endpoint}"))?;
        if let Some(welcome) = stream.get_welcome_msg() {
            debug!("server greeting: {}", welcome.trim_end());
        }
        // dropping the stream on failure closes the control connection
        stream
            .login(user, password)
            .with_context(|| format!("login rejected for user {user}"))?;
        info!("Logged in on {endpoint} as {user}");
        Ok(FtpRemote { stream: Some(stream) })
    }
}

/// Authenticated FTP session. `None` once closed.
pub struct FtpRemote {
    stream: Option<FtpStream>,
}

impl FtpRemote {
    fn stream(&mut self) -> Result<&mut FtpStream> {
        self.stream.as_mut().ok_or_else(|| anyhow!("FTP session is closed"))
    }
}

impl TransferClient for FtpRemote {
    fn change_dir(&mut self, path: &str) -> Result<()> {
        self.stream()?.cwd(path)?;
        Ok(())
    }

    fn list_names(&mut self) -> Result<Vec<String>> {
        let names = self.stream()?.nlst(None)?;
        check_listed_names(names)
    }

    fn retrieve(&mut self, name: &str, mode: TransferMode, sink: &mut dyn Write) -> Result<u64> {
        let stream = self.stream()?;
        let file_type = match mode {
            TransferMode::Text => FileType::Ascii(FormatControl::Default),
            TransferMode::Binary => FileType::Binary,
        };
        stream.transfer_type(file_type)?;
        let mut buffer = stream.retr_as_buffer(name)?;
        let written = io::copy(&mut buffer, sink).with_context(|| format!("cannot store {name}"))?;
        debug!("retrieved {name}: {written} bytes");
        Ok(written)
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        self.stream()?.rename(from, to)?;
        Ok(())
    }

    fn quit(&mut self) -> Result<()> {
        self.stream()?.quit()?;
        Ok(())
    }

    fn close(&mut self) {
        // dropping FtpStream shuts the control socket
        self.stream.take();
    }
}
