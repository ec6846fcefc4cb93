use thiserror::Error;

use crate::EntityKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("{kind} {id} already exists")]
    Duplicate { kind: EntityKind, id: String },

    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: String },
}
