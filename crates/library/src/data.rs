use devfile_schema::{
    Command, CommandType, Component, ComponentType, Devfile, Events, GroupKind, Project,
    ProjectSourceType, SchemaError, SchemaWriter, StarterProject,
};

/// Filters for the `get_*` accessors. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct DevfileOptions {
    pub command_type: Option<CommandType>,
    pub group_kind: Option<GroupKind>,
    pub component_type: Option<ComponentType>,
    pub project_source_type: Option<ProjectSourceType>,
}

impl DevfileOptions {
    fn accepts_command(&self, command: &Command) -> bool {
        self.command_type.map_or(true, |t| command.command_type() == t)
            && self
                .group_kind
                .map_or(true, |k| command.group().map(|g| g.kind) == Some(k))
    }

    fn accepts_component(&self, component: &Component) -> bool {
        self.component_type
            .map_or(true, |t| component.component_type() == t)
    }

    fn accepts_source(&self, source_type: ProjectSourceType) -> bool {
        self.project_source_type.map_or(true, |t| source_type == t)
    }
}

/// The object model behind a parsed or generated devfile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevfileData {
    devfile: Devfile,
}

impl DevfileData {
    pub fn new(schema_version: &str) -> Self {
        DevfileData {
            devfile: Devfile::new(schema_version),
        }
    }

    pub fn from_devfile(devfile: Devfile) -> Self {
        DevfileData { devfile }
    }

    pub fn devfile(&self) -> &Devfile {
        &self.devfile
    }

    pub fn get_commands(&self, options: &DevfileOptions) -> Vec<Command> {
        self.devfile
            .commands
            .iter()
            .filter(|c| options.accepts_command(c))
            .cloned()
            .collect()
    }

    pub fn get_components(&self, options: &DevfileOptions) -> Vec<Component> {
        self.devfile
            .components
            .iter()
            .filter(|c| options.accepts_component(c))
            .cloned()
            .collect()
    }

    pub fn get_projects(&self, options: &DevfileOptions) -> Vec<Project> {
        self.devfile
            .projects
            .iter()
            .filter(|p| options.accepts_source(p.source.source_type()))
            .cloned()
            .collect()
    }

    pub fn get_starter_projects(&self, options: &DevfileOptions) -> Vec<StarterProject> {
        self.devfile
            .starter_projects
            .iter()
            .filter(|p| options.accepts_source(p.source.source_type()))
            .cloned()
            .collect()
    }

    /// Lifecycle bindings; empty when the document declares none.
    pub fn get_events(&self) -> Events {
        self.devfile.events.clone().unwrap_or_default()
    }
}

impl SchemaWriter for DevfileData {
    fn add_command(&mut self, command: Command) -> Result<(), SchemaError> {
        self.devfile.add_command(command)
    }

    fn update_command(&mut self, command: Command) -> Result<(), SchemaError> {
        self.devfile.update_command(command)
    }

    fn add_component(&mut self, component: Component) -> Result<(), SchemaError> {
        self.devfile.add_component(component)
    }

    fn update_component(&mut self, component: Component) -> Result<(), SchemaError> {
        self.devfile.update_component(component)
    }

    fn add_project(&mut self, project: Project) -> Result<(), SchemaError> {
        self.devfile.add_project(project)
    }

    fn update_project(&mut self, project: Project) -> Result<(), SchemaError> {
        self.devfile.update_project(project)
    }

    fn add_starter_project(&mut self, project: StarterProject) -> Result<(), SchemaError> {
        self.devfile.add_starter_project(project)
    }

    fn update_starter_project(&mut self, project: StarterProject) -> Result<(), SchemaError> {
        self.devfile.update_starter_project(project)
    }

    fn set_events(&mut self, events: Events) -> Result<(), SchemaError> {
        self.devfile.set_events(events)
    }
}
