//! rentcal configuration.
//!
//! Settings are layered: built-in defaults, then
//! `~/.config/rentcal/config.toml`, then an explicit `--config` file, then
//! `RENTCAL_*` environment variables (`__` separates nested keys, e.g.
//! `RENTCAL_SERVER__PORT=8080`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::classify::Classifier;
use crate::error::{Error, Result};

const DEFAULT_USER_AGENT: &str = concat!("rentcal/", env!("CARGO_PKG_VERSION"));
const DEFAULT_FETCH_TIMEOUT: &str = "30s";
const DEFAULT_SYNC_INTERVAL: &str = "1h";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 4096;

fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("rentcal").join("rentcal.db"))
        .unwrap_or_else(|| PathBuf::from("rentcal.db"))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database_path: PathBuf,
    pub fetch: FetchConfig,
    pub server: ServerConfig,
    pub sync: SyncConfig,
    pub classifier: ClassifierConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Sent as the User-Agent header on every feed request.
    pub user_agent: String,
    /// Request timeout, e.g. "30s".
    pub timeout: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// How often the server re-syncs every property, e.g. "1h". "0s" disables it.
    pub interval: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Added to the built-in placeholder phrases.
    pub extra_phrases: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_path: default_database_path(),
            fetch: FetchConfig::default(),
            server: ServerConfig::default(),
            sync: SyncConfig::default(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_FETCH_TIMEOUT.to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            interval: DEFAULT_SYNC_INTERVAL.to_string(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Result<Duration> {
        parse_duration("fetch.timeout", &self.timeout)
    }
}

impl SyncConfig {
    /// `None` when periodic sync is disabled.
    pub fn interval(&self) -> Result<Option<Duration>> {
        let interval = parse_duration("sync.interval", &self.interval)?;
        Ok((!interval.is_zero()).then_some(interval))
    }
}

impl ClassifierConfig {
    pub fn classifier(&self) -> Classifier {
        Classifier::with_extra_phrases(&self.extra_phrases)
    }
}

fn parse_duration(key: &str, value: &str) -> Result<Duration> {
    humantime::parse_duration(value.trim())
        .map_err(|e| Error::Config(format!("Invalid duration for {key} '{value}': {e}")))
}

impl Settings {
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not determine config directory".into()))?
            .join("rentcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load settings from the user config file, an optional explicit file
    /// and the environment.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut files = vec![Self::config_path()?];
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            files.push(path.to_path_buf());
        }
        Self::from_sources(&files, true)
    }

    /// Build settings from the given files (later files win) and,
    /// optionally, `RENTCAL_*` environment variables.
    pub fn from_sources(files: &[PathBuf], with_env: bool) -> Result<Self> {
        let mut builder = Config::builder();
        for path in files {
            builder = builder.add_source(File::from(path.as_path()).required(false));
        }
        if with_env {
            builder = builder.add_source(
                Environment::with_prefix("RENTCAL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("classifier.extra_phrases"),
            );
        }

        let mut settings: Settings = builder
            .build()
            .map_err(|e| Error::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| Error::Config(e.to_string()))?;

        settings.database_path = expand_tilde(&settings.database_path);
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        self.fetch.timeout()?;
        self.sync.interval()?;
        Ok(())
    }

    /// Create a config file with every option commented out.
    pub fn create_default_config(path: &Path) -> Result<()> {
        let contents = format!(
            "\
# rentcal configuration

# Where bookings and properties are stored:
# database_path = \"{database}\"

[fetch]
# user_agent = \"{user_agent}\"
# timeout = \"{timeout}\"

[server]
# host = \"{host}\"
# port = {port}

[sync]
# How often the server re-imports every property (\"0s\" disables):
# interval = \"{interval}\"

[classifier]
# Extra summary phrases that mark an event as a blocked period:
# extra_phrases = [\"owner stay\"]
",
            database = default_database_path().display(),
            user_agent = DEFAULT_USER_AGENT,
            timeout = DEFAULT_FETCH_TIMEOUT,
            host = DEFAULT_HOST,
            port = DEFAULT_PORT,
            interval = DEFAULT_SYNC_INTERVAL,
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| Error::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_without_any_file() {
        let settings = Settings::from_sources(&[], false).unwrap();

        assert_eq!(settings.server.port, 4096);
        assert_eq!(settings.fetch.timeout().unwrap(), Duration::from_secs(30));
        assert_eq!(
            settings.sync.interval().unwrap(),
            Some(Duration::from_secs(3600))
        );
        assert!(settings.fetch.user_agent.starts_with("rentcal/"));
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
database_path = "/tmp/rentcal-test.db"

[server]
port = 8080

[sync]
interval = "0s"

[classifier]
extra_phrases = ["owner stay"]
"#
        )
        .unwrap();

        let settings = Settings::from_sources(&[file.path().to_path_buf()], false).unwrap();

        assert_eq!(settings.database_path, PathBuf::from("/tmp/rentcal-test.db"));
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.sync.interval().unwrap(), None);
        assert_eq!(settings.classifier.extra_phrases, vec!["owner stay"]);
    }

    #[test]
    fn invalid_duration_is_a_config_error() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[fetch]\ntimeout = \"soon\"").unwrap();

        let err = Settings::from_sources(&[file.path().to_path_buf()], false).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn default_config_file_is_loadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        Settings::create_default_config(&path).unwrap();
        let settings = Settings::from_sources(&[path], false).unwrap();

        assert_eq!(settings.server.port, 4096);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = Settings::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
