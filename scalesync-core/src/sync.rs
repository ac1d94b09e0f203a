//! One synchronisation pass against the scale server.

use crate::{
    config::SyncConfig,
    error::{Result, SyncError},
    filter::{exclude_hidden, select_csv},
    remote::{Connector, TransferClient, TransferMode},
    utils::remote_join,
};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

/// Per-run switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Move every fetched CSV into the remote backup directory.
    pub archive: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self { archive: true }
    }
}

/// Files handled by a successful run, in transfer order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub images: Vec<String>,
    pub csv_files: Vec<String>,
    pub archived: Vec<String>,
}

pub struct SyncRunner<'a> {
    cfg: &'a SyncConfig,
    options: SyncOptions,
}

impl<'a> SyncRunner<'a> {
    pub fn new(cfg: &'a SyncConfig, options: SyncOptions) -> Self {
        Self { cfg, options }
    }

    /// Connect, fetch images, fetch and archive CSV files, disconnect.
    ///
    /// The first failing step ends the run. The session is closed on every
    /// path once it was opened.
    pub fn run<C: Connector>(&self, connector: &C) -> Result<SyncReport> {
        let ftp = &self.cfg.ftp;
        info!("Open connection with FTP server {}", ftp.address);
        let mut session = connector
            .connect(&ftp.address, &ftp.user, &ftp.password)
            .map_err(|source| SyncError::Connection {
                address: ftp.address.clone(),
                source,
            })?;

        let mut report = SyncReport::default();
        // images first: the scales resolve them while importing prices
        let mut outcome = self.fetch_images(&mut session, &mut report);
        if outcome.is_ok() {
            outcome = self.fetch_csv_files(&mut session, &mut report);
        }
        shutdown(&mut session);

        outcome.map(|()| report)
    }

    fn fetch_images<T: TransferClient>(&self, session: &mut T, report: &mut SyncReport) -> Result<()> {
        let local_dir = &self.cfg.local.image_dir;
        info!("Working in {} directory", local_dir.display());

        let names = list_dir(session, &self.cfg.ftp.image_dir)?;
        for name in exclude_hidden(names) {
            let path = local_dir.join(&name);
            info!("Writing {name}");
            let file = File::create(&path).map_err(local_io(&path))?;
            let mut writer = BufWriter::new(file);
            session
                .retrieve(&name, TransferMode::Binary, &mut writer)
                .map_err(SyncError::transfer("retrieve", name.as_str()))?;
            writer.flush().map_err(local_io(&path))?;
            report.images.push(name);
        }
        Ok(())
    }

    fn fetch_csv_files<T: TransferClient>(&self, session: &mut T, report: &mut SyncReport) -> Result<()> {
        let ftp = &self.cfg.ftp;
        let local_dir = &self.cfg.local.csv_dir;
        info!("Working in {} directory", local_dir.display());

        let names = list_dir(session, &ftp.csv_dir)?;
        for name in select_csv(exclude_hidden(names)) {
            let path = local_dir.join(&name);
            info!("Writing {name}");
            let mut raw = Vec::new();
            session
                .retrieve(&name, TransferMode::Text, &mut raw)
                .map_err(SyncError::transfer("retrieve", name.as_str()))?;
            let text = ftp.codec.normalize_lines(&raw).map_err(|source| SyncError::Text {
                name: name.clone(),
                source,
            })?;
            fs::write(&path, text).map_err(local_io(&path))?;
            report.csv_files.push(name.clone());

            if self.options.archive {
                let target = remote_join(&ftp.backup_csv_dir, &name);
                info!("Move {name} to {target}");
                session
                    .rename(&name, &target)
                    .map_err(SyncError::transfer("rename", name.as_str()))?;
                report.archived.push(name);
            }
        }
        Ok(())
    }
}

/// Quit politely, then close whatever happened.
pub fn shutdown<T: TransferClient>(session: &mut T) {
    match session.quit() {
        Ok(()) => info!("Quit connection"),
        Err(err) => warn!("Quit failed ({err:#}), forcing close"),
    }
    session.close();
    info!("Close connection");
}

fn list_dir<T: TransferClient>(session: &mut T, dir: &str) -> Result<Vec<String>> {
    session.change_dir(dir).map_err(SyncError::transfer("cwd", dir))?;
    let names = session.list_names().map_err(SyncError::transfer("list", dir))?;
    info!("Found {} entries in remote {dir}", names.len());
    Ok(names)
}

fn local_io(path: &Path) -> impl FnOnce(io::Error) -> SyncError {
    let path = path.to_path_buf();
    move |source| SyncError::LocalIo { path, source }
}
