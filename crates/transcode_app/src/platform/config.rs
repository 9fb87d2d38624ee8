use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use serde::Deserialize;
use session_logging::LogDestination;
use thiserror::Error;
use transcode_engine::{ClientSettings, EngineSettings};
use url::Url;

#[derive(Debug, Parser)]
#[command(
    name = "transcode-console",
    about = "Browse the transcoder's source tree, queue files and watch progress"
)]
pub struct Cli {
    /// RON settings file; flags given on the command line win.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Base URL of the transcoding server.
    #[arg(long)]
    pub server: Option<String>,
    /// Seconds between full queue refreshes.
    #[arg(long = "poll-secs")]
    pub poll_secs: Option<u64>,
    /// Where log output goes.
    #[arg(long, value_enum)]
    pub log: Option<LogTarget>,
    /// Log level (error, warn, info, debug, trace).
    #[arg(long = "log-level")]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub server: String,
    pub poll_interval_secs: u64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub log: LogTarget,
    pub log_level: String,
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: "http://localhost:5000".to_string(),
            poll_interval_secs: 30,
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            log: LogTarget::File,
            log_level: "info".to_string(),
            log_file: PathBuf::from("./transcode_console.log"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read settings file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse settings file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("invalid server url {url:?}: {source}")]
    Server {
        url: String,
        source: url::ParseError,
    },
    #[error("unknown log level {0:?}")]
    LogLevel(String),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

impl Settings {
    /// Reads the optional settings file, then applies command-line overrides.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut settings = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(server) = &cli.server {
            settings.server = server.clone();
        }
        if let Some(secs) = cli.poll_secs {
            settings.poll_interval_secs = secs;
        }
        if let Some(target) = cli.log {
            settings.log = target;
        }
        if let Some(level) = &cli.log_level {
            settings.log_level = level.clone();
        }
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.server_url()?;
        self.level_filter()?;
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Zero("poll_interval_secs"));
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::Zero("connect_timeout_secs"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Zero("request_timeout_secs"));
        }
        Ok(())
    }

    pub fn server_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.server).map_err(|source| ConfigError::Server {
            url: self.server.clone(),
            source,
        })
    }

    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }

    pub fn engine_settings(&self) -> Result<EngineSettings, ConfigError> {
        let mut client = ClientSettings::new(self.server_url()?);
        client.connect_timeout = Duration::from_secs(self.connect_timeout_secs);
        client.request_timeout = Duration::from_secs(self.request_timeout_secs);
        let mut engine = EngineSettings::new(client);
        engine.poll_interval = Duration::from_secs(self.poll_interval_secs);
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn cli() -> Cli {
        Cli {
            config: None,
            server: None,
            poll_secs: None,
            log: None,
            log_level: None,
        }
    }

    #[test]
    fn defaults_match_documented_values() {
        let settings = Settings::load(&cli()).unwrap();
        assert_eq!(settings, Settings::default());
        let engine = settings.engine_settings().unwrap();
        assert_eq!(engine.poll_interval, Duration::from_secs(30));
        assert_eq!(engine.client.base_url.as_str(), "http://localhost:5000/");
    }

    #[test]
    fn file_values_are_overridden_by_flags() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("console.ron");
        fs::write(
            &path,
            r#"(server: "http://nas.local:5000", poll_interval_secs: 10, log: both)"#,
        )
        .unwrap();

        let mut args = cli();
        args.config = Some(path);
        args.poll_secs = Some(5);
        let settings = Settings::load(&args).unwrap();

        assert_eq!(settings.server, "http://nas.local:5000");
        assert_eq!(settings.poll_interval_secs, 5);
        assert_eq!(settings.log, LogTarget::Both);
        assert_eq!(settings.request_timeout_secs, 30);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("console.ron");
        fs::write(&path, r#"(sever: "http://typo")"#).unwrap();

        let err = Settings::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_reported() {
        let temp = TempDir::new().unwrap();
        let err = Settings::from_file(&temp.path().join("absent.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut args = cli();
        args.server = Some("not a url".to_string());
        assert!(matches!(
            Settings::load(&args),
            Err(ConfigError::Server { .. })
        ));

        let mut args = cli();
        args.poll_secs = Some(0);
        assert!(matches!(
            Settings::load(&args),
            Err(ConfigError::Zero("poll_interval_secs"))
        ));

        let mut args = cli();
        args.log_level = Some("loud".to_string());
        assert!(matches!(
            Settings::load(&args),
            Err(ConfigError::LogLevel(_))
        ));

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("console.ron");
        fs::write(&path, "(connect_timeout_secs: 0)").unwrap();
        let mut args = cli();
        args.config = Some(path);
        assert!(matches!(
            Settings::load(&args),
            Err(ConfigError::Zero("connect_timeout_secs"))
        ));
    }
}
