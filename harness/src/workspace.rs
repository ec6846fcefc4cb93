use std::fs;
use std::path::{Path, PathBuf};

use crate::error::HarnessError;

/// Directory tree that holds everything a run writes.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn create(root: &Path) -> Result<Self, HarnessError> {
        fs::create_dir_all(root).map_err(HarnessError::io(root))?;
        Ok(Workspace {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// A fresh, empty subdirectory; leftovers of earlier runs are removed.
    pub fn temp_dir(&self, name: &str) -> Result<PathBuf, HarnessError> {
        let dir = self.root.join(name);
        if dir.exists() {
            fs::remove_dir_all(&dir).map_err(HarnessError::io(&dir))?;
        }
        fs::create_dir_all(&dir).map_err(HarnessError::io(&dir))?;
        Ok(dir)
    }

    pub fn devfile_path(&self, file_name: &str) -> PathBuf {
        yaml_path(&self.root.join(file_name))
    }
}

/// `path` with a `.yaml` extension appended if it has none.
pub fn yaml_path(path: &Path) -> PathBuf {
    match path.extension() {
        Some(ext) if ext == "yaml" => path.to_path_buf(),
        _ => {
            let mut s = path.as_os_str().to_os_string();
            s.push(".yaml");
            PathBuf::from(s)
        }
    }
}

/// Insert `suffix` before the extension: `test.yaml` + `3` -> `test3.yaml`.
pub fn add_suffix_to_file_name(file_name: &str, suffix: &str) -> String {
    match file_name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}{suffix}{}", &file_name[..dot], &file_name[dot..]),
        _ => format!("{file_name}{suffix}"),
    }
}

/// Sibling of a devfile for diagnostics: `dir/test.yaml` -> `dir/test_<tag>.yaml`.
pub fn diagnostic_path(devfile: &Path, tag: &str) -> PathBuf {
    let stem = devfile.with_extension("");
    let mut s = stem.into_os_string();
    s.push(format!("_{tag}.yaml"));
    PathBuf::from(s)
}
