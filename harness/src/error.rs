use std::path::PathBuf;

use devfile_gen::GenError;
use devfile_library::LibraryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    /// Identity lookups and writer mirroring in the model store.
    #[error(transparent)]
    Model(#[from] GenError),

    #[error("cannot serialize {what}: {message}")]
    Serialization { what: String, message: String },

    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}", .0.join("\n"))]
    ValidationMismatch(Vec<String>),

    #[error("{0}")]
    SchemaValidation(String),

    #[error("cannot fetch schema {url}: {message}")]
    SchemaFetch { url: String, message: String },

    #[error("cannot compile schema {url}: {message}")]
    SchemaCompile { url: String, message: String },

    #[error(transparent)]
    Library(#[from] LibraryError),

    #[error("config: {0}")]
    Config(String),

    #[error("{} of {total} workers failed:\n{}", .failures.len(), .failures.join("\n"))]
    Workers { total: usize, failures: Vec<String> },
}

impl HarnessError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> HarnessError {
        let path = path.into();
        move |source| HarnessError::Io { path, source }
    }
}
