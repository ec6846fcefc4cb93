//! Devfile parsing, validation and writing.
//!
//! [`parse_and_validate`] decodes a document and runs every semantic check,
//! reporting all violations together. [`DevfileData`] is the mutable object
//! model behind a parsed document and [`DevfileObj::write_yaml`] persists it.

pub mod data;
pub mod error;
pub mod obj;
pub mod validate;

pub use data::{DevfileData, DevfileOptions};
pub use error::LibraryError;
pub use obj::{parse, parse_and_validate, DevfileObj};
pub use validate::{DevfileValidator, ValidationError, ValidationErrorKind};

#[cfg(test)]
mod tests;
