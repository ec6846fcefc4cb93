use std::path::PathBuf;

use thiserror::Error;

use crate::validate::ValidationError;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid devfile {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("devfile {} failed validation: {}", .path.display(), join(.errors))]
    Validation {
        path: PathBuf,
        errors: Vec<ValidationError>,
    },

    #[error("writer: {0}")]
    Writer(#[from] devfile_schema::SchemaError),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
