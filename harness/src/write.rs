use std::io::Write;
use std::path::{Path, PathBuf};

use devfile_gen::TestDevfile;
use devfile_library::{DevfileData, DevfileObj};
use tracing::debug;

use crate::error::HarnessError;
use crate::workspace::yaml_path;

/// Persist a generated document and return the path written.
///
/// With `use_parser` the attached parser object model is written through the
/// library; otherwise the expected model is serialized directly.
pub fn write_devfile(
    devfile: &TestDevfile<DevfileData>,
    use_parser: bool,
) -> Result<PathBuf, HarnessError> {
    let path = yaml_path(devfile.file_name());
    if use_parser {
        let data = devfile.writer().ok_or_else(|| {
            HarnessError::Config(format!(
                "{} has no parser object model attached",
                path.display()
            ))
        })?;
        DevfileObj::new(&path, data.clone()).write_yaml()?;
    } else {
        let yaml = to_yaml(devfile.schema(), &path.display().to_string())?;
        write_atomic(&path, yaml.as_bytes())?;
    }
    debug!(path = %path.display(), use_parser, "wrote devfile");
    Ok(path)
}

pub(crate) fn to_yaml<T: serde::Serialize>(value: &T, what: &str) -> Result<String, HarnessError> {
    serde_yaml::to_string(value).map_err(|e| HarnessError::Serialization {
        what: what.to_string(),
        message: e.to_string(),
    })
}

/// Write through a temporary file in the same directory, then rename.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), HarnessError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(HarnessError::io(dir))?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(HarnessError::io(dir))?;
    tmp.write_all(bytes).map_err(HarnessError::io(path))?;
    tmp.persist(path)
        .map_err(|e| HarnessError::io(path)(e.error))?;
    Ok(())
}
