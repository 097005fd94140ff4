use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context};
use engine_logging::{LogDestination, DEFAULT_LOG_FILE};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use vidqueue_core::{DEFAULT_ROWS_PER_PAGE, PAGE_SIZES};
use vidqueue_engine::{ProcessorSettings, SessionConfig, DEFAULT_API_BASE_URL};

use crate::cli::Cli;

const CONFIG_FILENAME: &str = "vidqueue.ron";
const API_URL_ENV: &str = "VIDQUEUE_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub poll_interval_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_artifact_bytes: u64,
    pub fallback_dir: PathBuf,
    /// When false every folder selection reports the picker as unsupported.
    pub directory_picker: bool,
    pub default_rows_per_page: usize,
    pub delivery_grace_ms: u64,
    pub max_concurrent_deliveries: usize,
    /// `terminal`, `file` or `both`.
    pub log_destination: String,
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            poll_interval_ms: 1000,
            connect_timeout_ms: 10_000,
            request_timeout_ms: 30_000,
            max_artifact_bytes: ProcessorSettings::default().max_artifact_bytes,
            fallback_dir: PathBuf::from("./downloads"),
            directory_picker: true,
            default_rows_per_page: DEFAULT_ROWS_PER_PAGE,
            delivery_grace_ms: 10_000,
            max_concurrent_deliveries: SessionConfig::default().max_concurrent_deliveries,
            log_destination: "file".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults, then the RON file, then the environment, then flags.
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None if Path::new(CONFIG_FILENAME).is_file() => {
                Self::from_file(Path::new(CONFIG_FILENAME))?
            }
            None => Self::default(),
        };
        config.apply_env(std::env::var(API_URL_ENV).ok());
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        ron::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    fn apply_env(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url {
            let url = url.trim();
            if !url.is_empty() {
                self.api_base_url = url.to_string();
            }
        }
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(api) = &cli.api {
            self.api_base_url = api.clone();
        }
        if let Some(poll_ms) = cli.poll_ms {
            self.poll_interval_ms = poll_ms;
        }
        if let Some(dir) = &cli.fallback_dir {
            self.fallback_dir = dir.clone();
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.poll_interval_ms == 0 {
            bail!("poll_interval_ms must be positive");
        }
        if self.max_concurrent_deliveries == 0 {
            bail!("max_concurrent_deliveries must be positive");
        }
        if !PAGE_SIZES.contains(&self.default_rows_per_page) {
            bail!(
                "default_rows_per_page must be one of {:?}, got {}",
                PAGE_SIZES,
                self.default_rows_per_page
            );
        }
        if LogDestination::from_name(&self.log_destination).is_none() {
            bail!(
                "log_destination must be terminal, file or both, got {:?}",
                self.log_destination
            );
        }
        LevelFilter::from_str(&self.log_level)
            .with_context(|| format!("invalid log_level {:?}", self.log_level))?;
        Ok(())
    }

    pub fn log_destination(&self) -> LogDestination {
        LogDestination::from_name(&self.log_destination)
            .unwrap_or_else(|| LogDestination::File(PathBuf::from(DEFAULT_LOG_FILE)))
    }

    pub fn log_level(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    pub fn processor_settings(&self) -> ProcessorSettings {
        ProcessorSettings {
            base_url: self.api_base_url.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            max_artifact_bytes: self.max_artifact_bytes,
            ..ProcessorSettings::default()
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            delivery_grace: Duration::from_millis(self.delivery_grace_ms),
            rows_per_page: self.default_rows_per_page,
            max_concurrent_deliveries: self.max_concurrent_deliveries,
        }
    }
}
