//! Run configuration. Every field has a default, so a JSON config file only
//! needs the keys it overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Root for generated devfiles, diagnostics, schema downloads and the log.
    pub tmp_dir: PathBuf,
    /// Log file name, created under `tmp_dir`.
    pub log_file: String,
    /// Mirror log lines to stdout.
    pub log_to_console: bool,
    /// Documents processed concurrently by the multi-thread test.
    pub workers: usize,
    pub max_commands: usize,
    pub max_components: usize,
    pub max_projects: usize,
    pub max_starter_projects: usize,
    /// Schema every generated document is checked against, if any.
    pub schema_url: Option<String>,
    pub fetch_timeout_ms: u64,
    /// Base seed for reproducible runs (None = random).
    pub seed: Option<u64>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig {
            tmp_dir: PathBuf::from("./tmp"),
            log_file: "test.log".into(),
            log_to_console: false,
            workers: 5,
            max_commands: 10,
            max_components: 10,
            max_projects: 10,
            max_starter_projects: 10,
            schema_url: None,
            fetch_timeout_ms: 30_000,
            seed: None,
        }
    }
}

impl HarnessConfig {
    pub fn load(path: &Path) -> Result<Self, HarnessError> {
        let data = std::fs::read_to_string(path).map_err(HarnessError::io(path))?;
        let config: HarnessConfig = serde_json::from_str(&data)
            .map_err(|e| HarnessError::Config(format!("invalid config {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.workers == 0 {
            return Err(HarnessError::Config("workers must be at least 1".into()));
        }
        let maxima = [
            ("max_commands", self.max_commands),
            ("max_components", self.max_components),
            ("max_projects", self.max_projects),
            ("max_starter_projects", self.max_starter_projects),
        ];
        for (name, value) in maxima {
            if value == 0 {
                return Err(HarnessError::Config(format!("{name} must be at least 1")));
            }
        }
        if self.log_file.is_empty() {
            return Err(HarnessError::Config("log_file is empty".into()));
        }
        Ok(())
    }

    pub fn with_tmp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tmp_dir = dir.into();
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_max_entities(mut self, max: usize) -> Self {
        self.max_commands = max;
        self.max_components = max;
        self.max_projects = max;
        self.max_starter_projects = max;
        self
    }

    pub fn with_schema_url(mut self, url: impl Into<String>) -> Self {
        self.schema_url = Some(url.into());
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_console(mut self, enabled: bool) -> Self {
        self.log_to_console = enabled;
        self
    }
}
