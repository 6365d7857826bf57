use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use tracker_engine::FetchSettings;
use tracker_logging::LogDestination;

use crate::cli::Cli;

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILENAME: &str = "jobtrack.ron";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
    Off,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
            LogTarget::Off => LogDestination::Off,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub target: LogTarget,
    pub level: String,
    pub path: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            target: LogTarget::File,
            level: "info".to_string(),
            path: PathBuf::from("jobtrack.log"),
        }
    }
}

impl LogConfig {
    /// Unknown level names fall back to `Info`.
    pub fn level_filter(&self) -> LevelFilter {
        self.level.parse().unwrap_or(LevelFilter::Info)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub redirect_limit: usize,
    pub max_bytes: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let settings = FetchSettings::default();
        Self {
            connect_timeout_secs: settings.connect_timeout.as_secs(),
            request_timeout_secs: settings.request_timeout.as_secs(),
            redirect_limit: settings.redirect_limit,
            max_bytes: settings.max_bytes,
        }
    }
}

impl FetchConfig {
    pub fn settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            redirect_limit: self.redirect_limit,
            max_bytes: self.max_bytes,
            ..FetchSettings::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// JSON document holding `jobDetails` and `trackedJobs`.
    pub storage_path: PathBuf,
    pub export_dir: PathBuf,
    pub log: LogConfig,
    pub fetch: FetchConfig,
}

/// Slack on top of the fetch timeouts before a command is abandoned.
pub const SETTLE_MARGIN: Duration = Duration::from_secs(10);

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("jobtrack_storage.json"),
            export_dir: PathBuf::from("."),
            log: LogConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_ron(text: &str) -> anyhow::Result<Self> {
        ron::from_str(text).context("invalid configuration")
    }

    pub fn to_ron(&self) -> anyhow::Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new())
            .context("could not serialize configuration")
    }

    /// Reads `explicit` when given, otherwise the default file if present.
    /// An explicit path that does not exist is an error.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILENAME), false),
        };

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("could not read {}", path.display()));
            }
        };

        Self::from_ron(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Applies command-line overrides.
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(storage) = &cli.storage {
            self.storage_path = storage.clone();
        }
        if let Some(export_dir) = &cli.export_dir {
            self.export_dir = export_dir.clone();
        }
        self
    }

    /// How long a command waits for its replies: both fetch timeouts plus
    /// [`SETTLE_MARGIN`].
    pub fn settle_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch.connect_timeout_secs + self.fetch.request_timeout_secs)
            + SETTLE_MARGIN
    }
}
