use crate::error::ConfigError;
use crate::text::TextCodec;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file looked up when none is given on the command line.
pub const CONFIG_FILENAME: &str = "bizerba.conf";
/// Log file used when the config has no `[log] filename`.
pub const LOG_FILENAME: &str = "bizerba.log";
/// Text encoding of the scale server's CSV files.
pub const DEFAULT_ENCODING: &str = "cp1252";

const REQUIRED_KEYS: [(&str, &str); 8] = [
    ("ftp", "address"),
    ("ftp", "user"),
    ("ftp", "password"),
    ("ftp", "csv_dir"),
    ("ftp", "backup_csv_dir"),
    ("ftp", "image_dir"),
    ("local", "csv_dir"),
    ("local", "image_dir"),
];

/// Remote side of the synchronisation.
#[derive(Clone)]
pub struct FtpCfg {
    pub address: String,
    pub user: String,
    pub password: String,
    pub csv_dir: String,
    /// Processed CSV files are moved here.
    pub backup_csv_dir: String,
    pub image_dir: String,
    pub codec: TextCodec,
}

impl fmt::Debug for FtpCfg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FtpCfg")
            .field("address", &self.address)
            .field("user", &self.user)
            .field("password", &"***")
            .field("csv_dir", &self.csv_dir)
            .field("backup_csv_dir", &self.backup_csv_dir)
            .field("image_dir", &self.image_dir)
            .field("codec", &self.codec)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct LocalCfg {
    pub csv_dir: PathBuf,
    pub image_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct LogCfg {
    pub filename: PathBuf,
}

/// Validated configuration of one synchronisation job.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub ftp: FtpCfg,
    pub local: LocalCfg,
    pub log: Option<LogCfg>,
}

/// Raw `[section]` / `key = value` document, before validation.
///
/// Keys are case-insensitive. Values keep their raw text; [`ConfigFile::get`]
/// trims them and strips surrounding double quotes.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl ConfigFile {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut sections: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        let mut current: Option<String> = None;
        let mut last_key: Option<String> = None;

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                last_key = None;
                continue;
            }
            if trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            // indented line: continuation of the previous value
            if raw.starts_with(char::is_whitespace) {
                if let (Some(section), Some(key)) = (&current, &last_key) {
                    if let Some(value) = sections.get_mut(section).and_then(|s| s.get_mut(key)) {
                        value.push('\n');
                        value.push_str(trimmed);
                        continue;
                    }
                }
            }

            if let Some(name) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
                let name = name.trim().to_string();
                if sections.contains_key(&name) {
                    return Err(parse_error(line, format!("duplicate section [{name}]")));
                }
                sections.insert(name.clone(), BTreeMap::new());
                current = Some(name);
                last_key = None;
                continue;
            }

            let Some(split) = trimmed.find(['=', ':']) else {
                return Err(parse_error(line, format!("expected `key = value`, found '{trimmed}'")));
            };
            let key = trimmed[..split].trim().to_lowercase();
            let value = trimmed[split + 1..].trim().to_string();
            if key.is_empty() {
                return Err(parse_error(line, "empty key".to_string()));
            }
            let Some(section) = &current else {
                return Err(parse_error(line, format!("key '{key}' outside of any section")));
            };
            let entries = sections.entry(section.clone()).or_default();
            if entries.contains_key(&key) {
                return Err(parse_error(line, format!("duplicate key '{key}' in [{section}]")));
            }
            entries.insert(key.clone(), value);
            last_key = Some(key);
        }

        Ok(Self { sections })
    }

    /// Value of `section.key`, trimmed and with surrounding `"` removed.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)?
            .get(&key.to_lowercase())
            .map(|value| value.trim().trim_matches('"'))
    }

    /// Log file named by the config, if any. Readable before validation so
    /// that validation failures can be logged.
    pub fn log_filename(&self) -> Option<PathBuf> {
        self.get("log", "filename").map(PathBuf::from)
    }

    /// Check every required key and build the typed configuration.
    ///
    /// All missing keys are reported at once.
    pub fn validate(&self) -> Result<SyncConfig, ConfigError> {
        let missing: Vec<String> = REQUIRED_KEYS
            .iter()
            .filter(|(section, key)| self.get(section, key).is_none())
            .map(|(section, key)| format!("{section}.{key}"))
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingKeys(missing));
        }

        let value = |section: &str, key: &str| self.get(section, key).unwrap_or_default().to_string();

        let label = self.get("ftp", "encoding").unwrap_or(DEFAULT_ENCODING);
        let codec = TextCodec::for_label(label).ok_or_else(|| ConfigError::UnknownEncoding(label.to_string()))?;

        Ok(SyncConfig {
            ftp: FtpCfg {
                address: value("ftp", "address"),
                user: value("ftp", "user"),
                password: value("ftp", "password"),
                csv_dir: value("ftp", "csv_dir"),
                backup_csv_dir: value("ftp", "backup_csv_dir"),
                image_dir: value("ftp", "image_dir"),
                codec,
            },
            local: LocalCfg {
                csv_dir: PathBuf::from(value("local", "csv_dir")),
                image_dir: PathBuf::from(value("local", "image_dir")),
            },
            log: self.log_filename().map(|filename| LogCfg { filename }),
        })
    }
}

fn parse_error(line: usize, message: String) -> ConfigError {
    ConfigError::Parse { line, message }
}
