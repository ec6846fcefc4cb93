//! In-place re-randomization of registered entities.
//!
//! Identity and variant are preserved, existing groups are kept, and every
//! change is mirrored to an attached writer.

use devfile_schema::{
    Command, CommandKind, Component, ComponentKind, Identified, Project,
    SchemaError, SchemaWriter, StarterProject,
};
use tracing::debug;

use crate::error::GenError;
use crate::store::TestDevfile;

fn not_found<T: Identified>(id: &str) -> GenError {
    GenError::NotFound {
        kind: T::KIND,
        id: id.to_string(),
    }
}

fn store<T: Identified>(items: &mut [T], item: T) {
    if let Some(slot) = items.iter_mut().find(|i| i.identity() == item.identity()) {
        *slot = item;
    }
}

impl<W: SchemaWriter> TestDevfile<W> {
    pub fn update_command(&mut self, id: &str) -> Result<(), GenError> {
        let mut command = self
            .schema
            .command(id)
            .cloned()
            .ok_or_else(|| not_found::<Command>(id))?;
        let mark = self.writer_errors.len();

        match &mut command.kind {
            CommandKind::Exec(exec) => self.roll_exec(exec, None),
            CommandKind::Apply(apply) => self.roll_apply(apply, None),
            CommandKind::Composite(composite) => self.roll_composite(composite, None),
            CommandKind::VscodeTask(vscode) | CommandKind::VscodeLaunch(vscode) => {
                self.roll_vscode(vscode, None)
            }
        }
        debug!(id, kind = %command.command_type(), "updated command");

        store(&mut self.schema.commands, command.clone());
        let result = self.mirror(|w| w.update_command(command));
        self.finish_update(mark, result)
    }

    pub fn update_component(&mut self, name: &str) -> Result<(), GenError> {
        let mut component = self
            .schema
            .component(name)
            .cloned()
            .ok_or_else(|| not_found::<Component>(name))?;
        let mark = self.writer_errors.len();

        match &mut component.kind {
            ComponentKind::Container(container) => self.roll_container(container),
            ComponentKind::Volume(volume) => self.roll_volume(volume),
            ComponentKind::Kubernetes(source) | ComponentKind::Openshift(source) => {
                *source = self.content_source()
            }
        }
        debug!(name, kind = %component.component_type(), "updated component");

        store(&mut self.schema.components, component.clone());
        let result = self.mirror(|w| w.update_component(component));
        self.finish_update(mark, result)
    }

    pub fn update_project(&mut self, name: &str) -> Result<(), GenError> {
        let mut project = self
            .schema
            .project(name)
            .cloned()
            .ok_or_else(|| not_found::<Project>(name))?;
        let mark = self.writer_errors.len();

        self.roll_project(&mut project);
        debug!(name, kind = %project.source.source_type(), "updated project");

        store(&mut self.schema.projects, project.clone());
        let result = self.mirror(|w| w.update_project(project));
        self.finish_update(mark, result)
    }

    pub fn update_starter_project(&mut self, name: &str) -> Result<(), GenError> {
        let mut project = self
            .schema
            .starter_project(name)
            .cloned()
            .ok_or_else(|| not_found::<StarterProject>(name))?;
        let mark = self.writer_errors.len();

        self.roll_starter_project(&mut project);
        debug!(name, kind = %project.source.source_type(), "updated starter project");

        store(&mut self.schema.starter_projects, project.clone());
        let result = self.mirror(|w| w.update_starter_project(project));
        self.finish_update(mark, result)
    }

    /// Re-draw every event list from the current command ids.
    pub fn update_events(&mut self) -> Result<(), GenError> {
        let mark = self.writer_errors.len();
        let mut events = self.schema.events.clone().unwrap_or_default();
        self.roll_events(&mut events);
        debug!(?events, "updated events");

        self.schema.events = Some(events.clone());
        let result = self.mirror(|w| w.set_events(events));
        self.finish_update(mark, result)
    }

    /// Claim writer errors raised since `mark`, including the final mirror call.
    fn finish_update(&mut self, mark: usize, result: Result<(), SchemaError>) -> Result<(), GenError> {
        let mut errors = self.writer_errors.split_off(mark);
        if let Err(e) = result {
            errors.push(e);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(GenError::Writer(errors))
        }
    }
}

