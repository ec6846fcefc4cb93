//! Randomized devfile document generation.
//!
//! [`TestDevfile`] is the model store: it owns the expected document, the
//! per-kind default registry and the endpoint port registry, and optionally
//! mirrors every addition and mutation into a [`SchemaWriter`].

pub mod command;
pub mod component;
pub mod context;
pub mod error;
pub mod events;
pub mod mutate;
pub mod project;
pub mod store;

pub use context::GenContext;
pub use error::GenError;
pub use project::replace_remotes;
pub use store::TestDevfile;

pub use devfile_schema::{Detached, SchemaWriter};
