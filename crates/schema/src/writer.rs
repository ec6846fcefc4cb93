use crate::command::Command;
use crate::component::Component;
use crate::error::SchemaError;
use crate::events::Events;
use crate::project::{Project, StarterProject};

/// A mutable object model that mirrors entity additions and updates.
///
/// `add_*` fails on a duplicate identity, `update_*` on an unknown one.
pub trait SchemaWriter {
    fn add_command(&mut self, command: Command) -> Result<(), SchemaError>;
    fn update_command(&mut self, command: Command) -> Result<(), SchemaError>;
    fn add_component(&mut self, component: Component) -> Result<(), SchemaError>;
    fn update_component(&mut self, component: Component) -> Result<(), SchemaError>;
    fn add_project(&mut self, project: Project) -> Result<(), SchemaError>;
    fn update_project(&mut self, project: Project) -> Result<(), SchemaError>;
    fn add_starter_project(&mut self, project: StarterProject) -> Result<(), SchemaError>;
    fn update_starter_project(&mut self, project: StarterProject) -> Result<(), SchemaError>;
    fn set_events(&mut self, events: Events) -> Result<(), SchemaError>;
}

/// Writer that accepts everything and records nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Detached;

impl SchemaWriter for Detached {
    fn add_command(&mut self, _: Command) -> Result<(), SchemaError> {
        Ok(())
    }

    fn update_command(&mut self, _: Command) -> Result<(), SchemaError> {
        Ok(())
    }

    fn add_component(&mut self, _: Component) -> Result<(), SchemaError> {
        Ok(())
    }

    fn update_component(&mut self, _: Component) -> Result<(), SchemaError> {
        Ok(())
    }

    fn add_project(&mut self, _: Project) -> Result<(), SchemaError> {
        Ok(())
    }

    fn update_project(&mut self, _: Project) -> Result<(), SchemaError> {
        Ok(())
    }

    fn add_starter_project(&mut self, _: StarterProject) -> Result<(), SchemaError> {
        Ok(())
    }

    fn update_starter_project(&mut self, _: StarterProject) -> Result<(), SchemaError> {
        Ok(())
    }

    fn set_events(&mut self, _: Events) -> Result<(), SchemaError> {
        Ok(())
    }
}
