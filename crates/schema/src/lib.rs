//! Typed object model for devfile 2.x documents.
//!
//! Every union in the format (command kind, component kind, project source,
//! content location) is a Rust enum fixed at construction. On the wire the
//! devfile "exactly one variant key" shape is kept; decoding rejects entries
//! that name zero or several variants.

pub mod command;
pub mod component;
pub mod devfile;
pub mod error;
pub mod events;
pub mod project;
pub mod writer;

pub use command::{
    ApplyCommand, Command, CommandGroup, CommandKind, CommandType, CompositeCommand, EnvVar,
    ExecCommand, GroupKind, VscodeConfigurationCommand, VscodeSource,
};
pub use component::{
    Component, ComponentKind, ComponentType, ContainerComponent, ContentSource, Endpoint, Exposure,
    Protocol, VolumeComponent,
};
pub use devfile::{Devfile, Metadata, SCHEMA_VERSION};
pub use error::SchemaError;
pub use events::Events;
pub use project::{
    CheckoutFrom, GitLikeSource, Project, ProjectSource, ProjectSourceType, StarterProject,
    ZipSource,
};
pub use writer::{Detached, SchemaWriter};

use std::fmt;

/// The kinds of identified entity a devfile holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Command,
    Component,
    Project,
    StarterProject,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Command => "Command",
            EntityKind::Component => "Component",
            EntityKind::Project => "Project",
            EntityKind::StarterProject => "Starter Project",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entity addressed by a document-unique identity (command id or name).
pub trait Identified {
    const KIND: EntityKind;

    fn identity(&self) -> &str;
}

/// Pick the single populated variant of a wire entry.
pub(crate) fn exactly_one<T>(
    owner: &str,
    names: &[&str],
    candidates: impl IntoIterator<Item = Option<T>>,
) -> Result<T, String> {
    let mut found: Vec<T> = candidates.into_iter().flatten().collect();
    if found.len() == 1 {
        Ok(found.remove(0))
    } else {
        Err(format!(
            "{owner} must specify exactly one of {} (found {})",
            names.join(", "),
            found.len()
        ))
    }
}

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod tests;
