use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::HarnessError;

/// Line-oriented run log shared by all workers.
///
/// `info` and `error` hand the message back so callers can log and collect
/// it in one step. Every line is also emitted as a `tracing` event.
pub struct RunLog {
    path: PathBuf,
    file: Mutex<File>,
    console: bool,
}

impl RunLog {
    /// Create (or truncate) the log at `path`.
    pub fn open(path: &Path, console: bool) -> Result<Self, HarnessError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(HarnessError::io(parent))?;
        }
        let file = File::create(path).map_err(HarnessError::io(path))?;
        Ok(RunLog {
            path: path.to_path_buf(),
            file: Mutex::new(file),
            console,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn info(&self, message: impl Into<String>) -> String {
        let message = message.into();
        tracing::info!("{message}");
        self.write("INFO :", &message);
        message
    }

    pub fn error(&self, message: impl Into<String>) -> String {
        let message = message.into();
        tracing::error!("{message}");
        self.write("..... ERROR :", &message);
        message
    }

    fn write(&self, prefix: &str, message: &str) {
        let line = format!("{} {prefix} {message}\n", chrono::Utc::now().to_rfc3339());
        if self.console {
            print!("{line}");
        }
        let mut file = self.file.lock();
        if let Err(e) = file.write_all(line.as_bytes()) {
            tracing::warn!(path = %self.path.display(), error = %e, "cannot write run log");
        }
    }
}
