use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::component::Component;
use crate::error::SchemaError;
use crate::events::Events;
use crate::project::{Project, StarterProject};
use crate::writer::SchemaWriter;
use crate::Identified;

/// Schema version stamped on generated documents.
pub const SCHEMA_VERSION: &str = "2.0.0";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// A devfile document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Devfile {
    pub schema_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<Project>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub starter_projects: Vec<StarterProject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<Command>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Events>,
}

impl Devfile {
    pub fn new(schema_version: &str) -> Self {
        Devfile {
            schema_version: schema_version.to_string(),
            ..Default::default()
        }
    }

    pub fn command(&self, id: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.id == id)
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn project(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name == name)
    }

    pub fn starter_project(&self, name: &str) -> Option<&StarterProject> {
        self.starter_projects.iter().find(|p| p.name == name)
    }
}

fn insert_unique<T: Identified>(items: &mut Vec<T>, item: T) -> Result<(), SchemaError> {
    if items.iter().any(|i| i.identity() == item.identity()) {
        return Err(SchemaError::Duplicate {
            kind: T::KIND,
            id: item.identity().to_string(),
        });
    }
    items.push(item);
    Ok(())
}

fn replace_existing<T: Identified>(items: &mut [T], item: T) -> Result<(), SchemaError> {
    match items.iter_mut().find(|i| i.identity() == item.identity()) {
        Some(slot) => {
            *slot = item;
            Ok(())
        }
        None => Err(SchemaError::NotFound {
            kind: T::KIND,
            id: item.identity().to_string(),
        }),
    }
}

impl SchemaWriter for Devfile {
    fn add_command(&mut self, command: Command) -> Result<(), SchemaError> {
        insert_unique(&mut self.commands, command)
    }

    fn update_command(&mut self, command: Command) -> Result<(), SchemaError> {
        replace_existing(&mut self.commands, command)
    }

    fn add_component(&mut self, component: Component) -> Result<(), SchemaError> {
        insert_unique(&mut self.components, component)
    }

    fn update_component(&mut self, component: Component) -> Result<(), SchemaError> {
        replace_existing(&mut self.components, component)
    }

    fn add_project(&mut self, project: Project) -> Result<(), SchemaError> {
        insert_unique(&mut self.projects, project)
    }

    fn update_project(&mut self, project: Project) -> Result<(), SchemaError> {
        replace_existing(&mut self.projects, project)
    }

    fn add_starter_project(&mut self, project: StarterProject) -> Result<(), SchemaError> {
        insert_unique(&mut self.starter_projects, project)
    }

    fn update_starter_project(&mut self, project: StarterProject) -> Result<(), SchemaError> {
        replace_existing(&mut self.starter_projects, project)
    }

    fn set_events(&mut self, events: Events) -> Result<(), SchemaError> {
        self.events = Some(events);
        Ok(())
    }
}
