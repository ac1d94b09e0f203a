mod logging;

use crate::logging::LogTarget;
use clap::Parser;
use scalesync_core::{
    ConfigError, ConfigFile, Connector, SyncOptions, SyncRunner, CONFIG_FILENAME, LOG_FILENAME,
};
use scalesync_remote_ftp::FtpConnector;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

const EXIT_OK: u8 = 0;
/// Exit status for a config file that is missing, malformed or incomplete.
const EXIT_BAD_CONFIG: u8 = 1;
/// Exit status for every other failure.
const EXIT_FAILURE: u8 = 2;

#[derive(Parser)]
#[command(
    name = "scalesync",
    version,
    about = "Download the files needed by the scales from the FTP server"
)]
struct Cli {
    /// Path to the INI config file
    #[arg(short, long, default_value = CONFIG_FILENAME)]
    config: PathBuf,

    /// Leave fetched CSV files in place on the server
    #[arg(long)]
    no_archive: bool,

    /// Log file, overriding `[log] filename`
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log to stderr instead of a file
    #[arg(long, conflicts_with = "log_file")]
    stderr: bool,
}

impl Cli {
    /// `--stderr`, then `--log-file`, then `[log] filename` of a readable
    /// config, then the default log file.
    fn log_target(&self, file: Option<&ConfigFile>) -> LogTarget {
        if self.stderr {
            return LogTarget::Stderr;
        }
        let path = self
            .log_file
            .clone()
            .or_else(|| file.and_then(ConfigFile::log_filename))
            .unwrap_or_else(|| PathBuf::from(LOG_FILENAME));
        LogTarget::File(path)
    }

    fn options(&self) -> SyncOptions {
        SyncOptions {
            archive: !self.no_archive,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let file = ConfigFile::read(&cli.config);

    if let Err(err) = logging::init(&cli.log_target(file.as_ref().ok())) {
        eprintln!("scalesync: {err:#}");
        return ExitCode::from(EXIT_FAILURE);
    }

    ExitCode::from(execute(&cli, file, &FtpConnector))
}

/// Validate the config, then run one synchronisation. Returns the exit
/// status. No connection is attempted unless the config is valid.
fn execute<C: Connector>(cli: &Cli, file: Result<ConfigFile, ConfigError>, connector: &C) -> u8 {
    info!("Check the config file {}", cli.config.display());
    let config = match file.and_then(|file| file.validate()) {
        Ok(config) => config,
        Err(err) => {
            error!("{err}");
            error!("The config file is not properly written");
            eprintln!("scalesync: {err}");
            return EXIT_BAD_CONFIG;
        }
    };
    info!("Config file check passed successfully");

    let options = cli.options();
    info!("Starting synchronisation (archive: {})", options.archive);
    match SyncRunner::new(&config, options).run(connector) {
        Ok(report) => {
            info!(
                "Finished: {} images, {} CSV files, {} archived",
                report.images.len(),
                report.csv_files.len(),
                report.archived.len()
            );
            EXIT_OK
        }
        Err(err) => {
            let err = anyhow::Error::from(err);
            error!("{err:#}");
            eprintln!("scalesync: {err:#}");
            EXIT_FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use clap::CommandFactory;
    use scalesync_core::{TransferClient, TransferMode};
    use std::cell::Cell;
    use std::io::Write;

    const VALID: &str = "[ftp]\naddress = scale-host\nuser = u\npassword = p\n\
                         csv_dir = /csv\nbackup_csv_dir = /csv/old\nimage_dir = /img\n\n\
                         [local]\ncsv_dir = in\nimage_dir = img\n";

    /// Server with empty directories that counts connection attempts.
    #[derive(Default)]
    struct EmptyServer {
        reject_login: bool,
        attempts: Cell<usize>,
    }

    struct EmptySession;

    impl TransferClient for EmptySession {
        fn change_dir(&mut self, _path: &str) -> anyhow::Result<()> {
            Ok(())
        }

        fn list_names(&mut self) -> anyhow::Result<Vec<String>> {
            Ok(Vec::new())
        }

        fn retrieve(&mut self, name: &str, _mode: TransferMode, _sink: &mut dyn Write) -> anyhow::Result<u64> {
            bail!("550 {name}: not found")
        }

        fn rename(&mut self, from: &str, _to: &str) -> anyhow::Result<()> {
            bail!("550 {from}: not found")
        }

        fn quit(&mut self) -> anyhow::Result<()> {
            Ok(())
        }

        fn close(&mut self) {}
    }

    impl Connector for EmptyServer {
        type Session = EmptySession;

        fn connect(&self, _address: &str, _user: &str, _password: &str) -> anyhow::Result<EmptySession> {
            self.attempts.set(self.attempts.get() + 1);
            if self.reject_login {
                bail!("530 Login incorrect");
            }
            Ok(EmptySession)
        }
    }

    fn cli() -> Cli {
        Cli::parse_from(["scalesync"])
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn valid_config_and_clean_run_exit_zero() {
        let server = EmptyServer::default();
        let code = execute(&cli(), ConfigFile::parse(VALID), &server);
        assert_eq!(code, EXIT_OK);
        assert_eq!(server.attempts.get(), 1);
    }

    #[test]
    fn missing_keys_exit_one_without_connecting() {
        let server = EmptyServer::default();
        let code = execute(&cli(), ConfigFile::parse("[ftp]\naddress = scale-host\n"), &server);
        assert_eq!(code, EXIT_BAD_CONFIG);
        assert_eq!(server.attempts.get(), 0);
    }

    #[test]
    fn missing_config_file_exits_one_without_connecting() {
        let server = EmptyServer::default();
        let file = ConfigFile::read("/definitely/not/here/bizerba.conf");
        let code = execute(&cli(), file, &server);
        assert_eq!(code, EXIT_BAD_CONFIG);
        assert_eq!(server.attempts.get(), 0);
    }

    #[test]
    fn malformed_config_exits_one() {
        let server = EmptyServer::default();
        let code = execute(&cli(), ConfigFile::parse("address = outside\n"), &server);
        assert_eq!(code, EXIT_BAD_CONFIG);
        assert_eq!(server.attempts.get(), 0);
    }

    #[test]
    fn failed_run_exits_two() {
        let server = EmptyServer {
            reject_login: true,
            ..EmptyServer::default()
        };
        let code = execute(&cli(), ConfigFile::parse(VALID), &server);
        assert_eq!(code, EXIT_FAILURE);
        assert_eq!(server.attempts.get(), 1);
    }

    #[test]
    fn unreadable_config_still_logs_to_default_file() {
        assert!(matches!(
            cli().log_target(None),
            LogTarget::File(path) if path == PathBuf::from(LOG_FILENAME)
        ));
    }

    #[test]
    fn defaults_archive_and_log_to_config_file() {
        let cli = cli();
        assert_eq!(cli.config, PathBuf::from(CONFIG_FILENAME));
        assert!(cli.options().archive);

        let file = ConfigFile::parse("[log]\nfilename = \"/var/log/scales.log\"\n").unwrap();
        match cli.log_target(Some(&file)) {
            LogTarget::File(path) => assert_eq!(path, PathBuf::from("/var/log/scales.log")),
            other => panic!("unexpected target {other:?}"),
        }
        match cli.log_target(Some(&ConfigFile::default())) {
            LogTarget::File(path) => assert_eq!(path, PathBuf::from(LOG_FILENAME)),
            other => panic!("unexpected target {other:?}"),
        }
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from(["scalesync", "-c", "other.conf", "--no-archive", "--log-file", "run.log"]);
        assert_eq!(cli.config, PathBuf::from("other.conf"));
        assert!(!cli.options().archive);
        let file = ConfigFile::parse("[log]\nfilename = ignored.log\n").unwrap();
        assert!(matches!(cli.log_target(Some(&file)), LogTarget::File(p) if p == PathBuf::from("run.log")));

        let cli = Cli::parse_from(["scalesync", "--stderr"]);
        assert!(matches!(cli.log_target(Some(&file)), LogTarget::Stderr));
    }

    #[test]
    fn stderr_conflicts_with_log_file() {
        assert!(Cli::try_parse_from(["scalesync", "--stderr", "--log-file", "x.log"]).is_err());
    }
}
