use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use devfile_gen::{GenContext, TestDevfile};
use devfile_library::{parse_and_validate, DevfileData};
use devfile_schema::{CommandType, ComponentType, ProjectSourceType, SCHEMA_VERSION};

use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::log::RunLog;
use crate::schema::{HttpSource, SchemaCache};
use crate::verify::verify;
use crate::workspace::{add_suffix_to_file_name, Workspace};
use crate::write::write_devfile;

/// What one round-trip case generates and how it is written.
#[derive(Debug, Clone, Default)]
pub struct TestContent {
    pub command_types: Vec<CommandType>,
    pub component_types: Vec<ComponentType>,
    pub project_types: Vec<ProjectSourceType>,
    pub starter_project_types: Vec<ProjectSourceType>,
    pub file_name: String,
    /// Mirror every change into a parser object model and write through it.
    pub create_with_parser: bool,
    /// After the first write, parse the file back and mutate every entity.
    pub edit_content: bool,
}

/// Shared state for a run: configuration, randomness, log, files and schemas.
pub struct Harness {
    config: HarnessConfig,
    ctx: Arc<GenContext>,
    log: RunLog,
    workspace: Workspace,
    schemas: SchemaCache,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Result<Self, HarnessError> {
        config.validate()?;
        let workspace = Workspace::create(&config.tmp_dir)?;
        let log = RunLog::open(&workspace.root().join(&config.log_file), config.log_to_console)?;
        let ctx = Arc::new(match config.seed {
            Some(seed) => GenContext::new(seed),
            None => GenContext::from_entropy(),
        });
        let source = HttpSource::new(Duration::from_millis(config.fetch_timeout_ms));
        let schemas = SchemaCache::new(Box::new(source)).with_download_dir(workspace.temp_dir("schemas")?);
        Ok(Harness {
            config,
            ctx,
            log,
            workspace,
            schemas,
        })
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn ctx(&self) -> &Arc<GenContext> {
        &self.ctx
    }

    pub fn log(&self) -> &RunLog {
        &self.log
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn schemas(&self) -> &SchemaCache {
        &self.schemas
    }

    /// An empty document stored under the workspace root.
    pub fn new_devfile(&self, file_name: &str) -> TestDevfile<DevfileData> {
        TestDevfile::new(self.workspace.devfile_path(file_name), Arc::clone(&self.ctx))
    }

    /// Generate a random document. Components come first so commands can
    /// reference them; events are bound once commands exist.
    pub fn build(&self, content: &TestContent, file_name: &str) -> TestDevfile<DevfileData> {
        let ctx = &self.ctx;
        let mut devfile = self.new_devfile(file_name);
        if content.create_with_parser {
            devfile.attach_writer(DevfileData::new(SCHEMA_VERSION));
        }

        if !content.component_types.is_empty() {
            for _ in 0..ctx.bounded(self.config.max_components) {
                if let Some(ty) = ctx.pick(&content.component_types) {
                    devfile.add_component(*ty);
                }
            }
        }
        if !content.command_types.is_empty() {
            for _ in 0..ctx.bounded(self.config.max_commands) {
                if let Some(ty) = ctx.pick(&content.command_types) {
                    devfile.add_command(*ty);
                }
            }
            devfile.add_events();
        }
        if !content.project_types.is_empty() {
            for _ in 0..ctx.bounded(self.config.max_projects) {
                if let Some(ty) = ctx.pick(&content.project_types) {
                    devfile.add_project(*ty);
                }
            }
        }
        if !content.starter_project_types.is_empty() {
            for _ in 0..ctx.bounded(self.config.max_starter_projects) {
                if let Some(ty) = ctx.pick(&content.starter_project_types) {
                    devfile.add_starter_project(*ty);
                }
            }
        }
        devfile
    }

    /// Generate, write, optionally edit, then verify one document.
    pub fn run_test(&self, content: &TestContent) -> Result<(), HarnessError> {
        self.run_document(content, &content.file_name)
    }

    /// Run `workers` independent documents concurrently and wait for all of them.
    pub fn run_multi_thread_test(&self, content: &TestContent) -> Result<(), HarnessError> {
        let names: Vec<String> = (1..=self.config.workers)
            .map(|i| add_suffix_to_file_name(&content.file_name, &i.to_string()))
            .collect();

        let results: Vec<Result<(), HarnessError>> = thread::scope(|scope| {
            let handles: Vec<_> = names
                .iter()
                .map(|name| scope.spawn(move || self.run_document(content, name)))
                .collect();
            handles
                .into_iter()
                .map(|handle| {
                    handle.join().unwrap_or_else(|_| {
                        Err(HarnessError::Config("worker thread panicked".into()))
                    })
                })
                .collect()
        });

        let failures: Vec<String> = names
            .iter()
            .zip(results)
            .filter_map(|(name, result)| result.err().map(|e| format!("{name}: {e}")))
            .collect();
        if failures.is_empty() {
            self.log.info(format!("{} documents verified for {}", names.len(), content.file_name));
            Ok(())
        } else {
            Err(HarnessError::Workers {
                total: names.len(),
                failures,
            })
        }
    }

    fn run_document(&self, content: &TestContent, file_name: &str) -> Result<(), HarnessError> {
        self.log.info(format!("Start test for {file_name}"));
        let mut devfile = self.build(content, file_name);

        let path = write_devfile(&devfile, content.create_with_parser).map_err(|e| {
            self.log.error(format!("ERROR creating devfile : {file_name} : {e}"));
            e
        })?;

        if content.edit_content {
            self.edit(&mut devfile, &path)?;
            write_devfile(&devfile, true)?;
        }

        let writer_errors = devfile.take_writer_errors();
        if !writer_errors.is_empty() {
            let messages = writer_errors
                .iter()
                .map(|e| self.log.error(format!("Writer : {e}")))
                .collect();
            return Err(HarnessError::ValidationMismatch(messages));
        }

        let schema = match &self.config.schema_url {
            Some(url) => Some(self.schemas.get_or_compile(url)?),
            None => None,
        };
        verify(&devfile, schema.as_deref(), &self.log).map_err(|e| {
            self.log.error(format!("ERROR verifying devfile : {} : {e}", path.display()));
            e
        })
    }

    /// Parse the written file, attach its object model as the writer, then
    /// mutate every entity the parser returned.
    fn edit(&self, devfile: &mut TestDevfile<DevfileData>, path: &Path) -> Result<(), HarnessError> {
        self.log.info(format!("Edit {}", path.display()));
        let obj = parse_and_validate(path).map_err(|e| {
            self.log.error(format!("From parser : {e}"));
            e
        })?;

        let parsed = obj.data.devfile();
        let command_ids: Vec<String> = parsed.commands.iter().map(|c| c.id.clone()).collect();
        let component_names: Vec<String> = parsed.components.iter().map(|c| c.name.clone()).collect();
        let project_names: Vec<String> = parsed.projects.iter().map(|p| p.name.clone()).collect();
        let starter_names: Vec<String> = parsed.starter_projects.iter().map(|p| p.name.clone()).collect();
        let has_events = parsed.events.is_some();
        devfile.attach_writer(obj.data);

        let mut errors = Vec::new();
        for name in &component_names {
            if let Err(e) = devfile.update_component(name) {
                errors.push(self.log.error(format!("Updating component : {e}")));
            }
        }
        for id in &command_ids {
            if let Err(e) = devfile.update_command(id) {
                errors.push(self.log.error(format!("Updating command : {e}")));
            }
        }
        for name in &project_names {
            if let Err(e) = devfile.update_project(name) {
                errors.push(self.log.error(format!("Updating project : {e}")));
            }
        }
        for name in &starter_names {
            if let Err(e) = devfile.update_starter_project(name) {
                errors.push(self.log.error(format!("Updating starter project : {e}")));
            }
        }
        if has_events {
            if let Err(e) = devfile.update_events() {
                errors.push(self.log.error(format!("Updating events : {e}")));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(HarnessError::ValidationMismatch(errors))
        }
    }
}
