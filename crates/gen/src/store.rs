use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use devfile_schema::{
    Command, CommandGroup, CommandType, Component, ComponentType, Detached, Devfile, Events,
    GroupKind, Project, ProjectSourceType, SchemaError, SchemaWriter, StarterProject,
    SCHEMA_VERSION,
};
use tracing::{debug, warn};

use crate::context::GenContext;

/// Highest endpoint port handed out; ports below 1024 are never used.
const PORT_SPAN: usize = 64_000;

/// The expected state of one generated devfile.
///
/// The default registry and the port registry live and die with this value:
/// two documents never share them, and [`TestDevfile::reset`] starts both
/// over together with an empty document.
pub struct TestDevfile<W: SchemaWriter = Detached> {
    pub(crate) schema: Devfile,
    file_name: PathBuf,
    pub(crate) default_claimed: BTreeSet<GroupKind>,
    pub(crate) used_ports: BTreeSet<u16>,
    pub(crate) writer: Option<W>,
    pub(crate) writer_errors: Vec<SchemaError>,
    pub(crate) ctx: Arc<GenContext>,
}

impl<W: SchemaWriter> TestDevfile<W> {
    pub fn new(file_name: impl Into<PathBuf>, ctx: Arc<GenContext>) -> Self {
        TestDevfile {
            schema: Devfile::new(SCHEMA_VERSION),
            file_name: file_name.into(),
            default_claimed: BTreeSet::new(),
            used_ports: BTreeSet::new(),
            writer: None,
            writer_errors: Vec::new(),
            ctx,
        }
    }

    /// Start over with an empty document and fresh registries under the same name.
    pub fn reset(&mut self) {
        self.schema = Devfile::new(SCHEMA_VERSION);
        self.default_claimed.clear();
        self.used_ports.clear();
        self.writer = None;
        self.writer_errors.clear();
    }

    pub fn schema(&self) -> &Devfile {
        &self.schema
    }

    pub fn file_name(&self) -> &Path {
        &self.file_name
    }

    pub fn ctx(&self) -> &Arc<GenContext> {
        &self.ctx
    }

    /// Attach a writer. Entities added or updated from here on are mirrored to it.
    pub fn attach_writer(&mut self, writer: W) {
        self.writer = Some(writer);
    }

    pub fn writer(&self) -> Option<&W> {
        self.writer.as_ref()
    }

    pub fn writer_mut(&mut self) -> Option<&mut W> {
        self.writer.as_mut()
    }

    /// Writer failures from `add_*` calls, which never fail themselves.
    pub fn take_writer_errors(&mut self) -> Vec<SchemaError> {
        std::mem::take(&mut self.writer_errors)
    }

    pub fn is_default_claimed(&self, kind: GroupKind) -> bool {
        self.default_claimed.contains(&kind)
    }

    pub fn command(&self, id: &str) -> Option<&Command> {
        self.schema.command(id)
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.schema.component(name)
    }

    pub fn project(&self, name: &str) -> Option<&Project> {
        self.schema.project(name)
    }

    pub fn starter_project(&self, name: &str) -> Option<&StarterProject> {
        self.schema.starter_project(name)
    }

    /// A group of a random kind, default only if that kind has no default yet.
    pub fn allocate_group(&mut self) -> CommandGroup {
        let kind = self.ctx.group_kind();
        self.allocate_group_of(kind)
    }

    pub fn allocate_group_of(&mut self, kind: GroupKind) -> CommandGroup {
        let is_default = self.default_claimed.insert(kind);
        CommandGroup { kind, is_default }
    }

    pub(crate) fn allocate_port(&mut self) -> u16 {
        loop {
            let port = (1023 + self.ctx.bounded(PORT_SPAN)) as u16;
            if self.used_ports.insert(port) {
                return port;
            }
        }
    }

    /// Name of a random container component, adding one if none exists.
    pub(crate) fn container_name(&mut self) -> String {
        let picked = {
            let names: Vec<&str> = self
                .schema
                .components
                .iter()
                .filter(|c| c.container().is_some())
                .map(|c| c.name.as_str())
                .collect();
            self.ctx.pick(&names).map(|name| name.to_string())
        };
        match picked {
            Some(name) => name,
            None => self.add_component(ComponentType::Container).name,
        }
    }

    pub(crate) fn mirror(
        &mut self,
        op: impl FnOnce(&mut W) -> Result<(), SchemaError>,
    ) -> Result<(), SchemaError> {
        match self.writer.as_mut() {
            Some(writer) => op(writer),
            None => Ok(()),
        }
    }

    fn mirror_add(&mut self, op: impl FnOnce(&mut W) -> Result<(), SchemaError>) {
        if let Err(e) = self.mirror(op) {
            warn!(file = %self.file_name.display(), error = %e, "writer rejected addition");
            self.writer_errors.push(e);
        }
    }

    pub fn add_command(&mut self, command_type: CommandType) -> Command {
        self.insert_command(command_type, None)
    }

    /// Add a command whose group is forced to `kind`.
    pub fn add_grouped_command(&mut self, command_type: CommandType, kind: GroupKind) -> Command {
        self.insert_command(command_type, Some(kind))
    }

    fn insert_command(&mut self, command_type: CommandType, group: Option<GroupKind>) -> Command {
        let command = self.build_command(command_type, group);
        debug!(id = %command.id, kind = %command_type, group = ?command.group(), "added command");
        self.schema.commands.push(command.clone());
        let mirrored = command.clone();
        self.mirror_add(|w| w.add_command(mirrored));
        command
    }

    pub fn add_component(&mut self, component_type: ComponentType) -> Component {
        let component = self.build_component(component_type);
        debug!(name = %component.name, kind = %component_type, "added component");
        self.schema.components.push(component.clone());
        let mirrored = component.clone();
        self.mirror_add(|w| w.add_component(mirrored));
        component
    }

    pub fn add_project(&mut self, source_type: ProjectSourceType) -> Project {
        let project = self.build_project(source_type);
        debug!(name = %project.name, kind = %source_type, "added project");
        self.schema.projects.push(project.clone());
        let mirrored = project.clone();
        self.mirror_add(|w| w.add_project(mirrored));
        project
    }

    pub fn add_starter_project(&mut self, source_type: ProjectSourceType) -> StarterProject {
        let project = self.build_starter_project(source_type);
        debug!(name = %project.name, kind = %source_type, "added starter project");
        self.schema.starter_projects.push(project.clone());
        let mirrored = project.clone();
        self.mirror_add(|w| w.add_starter_project(mirrored));
        project
    }

    /// Bind random existing commands to the lifecycle events.
    pub fn add_events(&mut self) -> Events {
        let mut events = Events::default();
        self.roll_events(&mut events);
        debug!(?events, "added events");
        self.schema.events = Some(events.clone());
        let mirrored = events.clone();
        self.mirror_add(|w| w.set_events(mirrored));
        events
    }
}
