use devfile_schema::{EntityKind, SchemaError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: String },

    #[error("writer rejected change: {}", join(.0))]
    Writer(Vec<SchemaError>),
}

fn join(errors: &[SchemaError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
