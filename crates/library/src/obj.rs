use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use devfile_schema::Devfile;
use tracing::debug;

use crate::data::DevfileData;
use crate::error::LibraryError;
use crate::validate::DevfileValidator;

/// A devfile bound to its location on disk.
#[derive(Debug, Clone)]
pub struct DevfileObj {
    pub path: PathBuf,
    pub data: DevfileData,
}

impl DevfileObj {
    pub fn new(path: impl Into<PathBuf>, data: DevfileData) -> Self {
        DevfileObj {
            path: path.into(),
            data,
        }
    }

    /// Serialize the object model to `path`, replacing the file atomically.
    pub fn write_yaml(&self) -> Result<(), LibraryError> {
        let yaml = serde_yaml::to_string(self.data.devfile()).map_err(|source| LibraryError::Yaml {
            path: self.path.clone(),
            source,
        })?;
        write_atomic(&self.path, yaml.as_bytes())?;
        debug!(path = %self.path.display(), bytes = yaml.len(), "wrote devfile");
        Ok(())
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> LibraryError + '_ {
    move |source| LibraryError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), LibraryError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(io_error(dir))?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_error(dir))?;
    tmp.write_all(bytes).map_err(io_error(path))?;
    tmp.persist(path).map_err(|e| io_error(path)(e.error))?;
    Ok(())
}

/// Decode a devfile without semantic checks.
pub fn parse(path: &Path) -> Result<DevfileObj, LibraryError> {
    let text = fs::read_to_string(path).map_err(io_error(path))?;
    let devfile: Devfile = serde_yaml::from_str(&text).map_err(|source| LibraryError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(DevfileObj::new(path, DevfileData::from_devfile(devfile)))
}

/// Decode a devfile and run every semantic check, reporting all violations.
pub fn parse_and_validate(path: &Path) -> Result<DevfileObj, LibraryError> {
    let obj = parse(path)?;
    DevfileValidator::validate(obj.data.devfile()).map_err(|errors| LibraryError::Validation {
        path: path.to_path_buf(),
        errors,
    })?;
    debug!(path = %path.display(), "parsed and validated devfile");
    Ok(obj)
}
