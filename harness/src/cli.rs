//! Subcommand bodies for `devfile-fuzz`. Argument parsing lives in `main.rs`.

use std::path::{Path, PathBuf};

use devfile_schema::{CommandType, ComponentType, ProjectSourceType};

use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::runner::{Harness, TestContent};
use crate::scenario::ScenarioSuite;

/// Options shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub tmp_dir: Option<PathBuf>,
    pub seed: Option<u64>,
    pub schema_url: Option<String>,
    pub verbose: bool,
}

impl GlobalOptions {
    /// The config file (or defaults) with command-line overrides applied.
    pub fn resolve(&self) -> Result<HarnessConfig, HarnessError> {
        let mut config = match &self.config {
            Some(path) => HarnessConfig::load(path)?,
            None => HarnessConfig::default(),
        };
        if let Some(dir) = &self.tmp_dir {
            config = config.with_tmp_dir(dir);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(url) = &self.schema_url {
            config = config.with_schema_url(url);
        }
        if self.verbose {
            config = config.with_console(true);
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    pub commands: Vec<CommandType>,
    pub components: Vec<ComponentType>,
    pub projects: Vec<ProjectSourceType>,
    pub starter_projects: Vec<ProjectSourceType>,
    pub file: String,
    pub with_parser: bool,
    pub edit: bool,
    pub threads: Option<usize>,
}

pub fn cmd_run(global: &GlobalOptions, args: RunArgs) -> Result<(), HarnessError> {
    if args.commands.is_empty()
        && args.components.is_empty()
        && args.projects.is_empty()
        && args.starter_projects.is_empty()
    {
        return Err(HarnessError::Config(
            "nothing to generate: pass at least one of --commands, --components, --projects, --starter-projects".into(),
        ));
    }
    let mut config = global.resolve()?;
    if let Some(threads) = args.threads {
        config = config.with_workers(threads);
    }
    let harness = Harness::new(config)?;
    let content = TestContent {
        command_types: args.commands,
        component_types: args.components,
        project_types: args.projects,
        starter_project_types: args.starter_projects,
        file_name: args.file,
        create_with_parser: args.with_parser,
        edit_content: args.edit,
    };

    if args.threads.is_some() {
        harness.run_multi_thread_test(&content)?;
        println!(
            "verified {} documents, log: {}",
            harness.config().workers,
            harness.log().path().display()
        );
    } else {
        harness.run_test(&content)?;
        println!(
            "verified {}, log: {}",
            content.file_name,
            harness.log().path().display()
        );
    }
    Ok(())
}

pub fn cmd_errors(global: &GlobalOptions, dir: &Path) -> Result<(), HarnessError> {
    let harness = Harness::new(global.resolve()?)?;
    let suite = ScenarioSuite::new(harness.workspace(), harness.schemas(), harness.log());
    let report = suite.run_dir(dir)?;

    println!(
        "parser: {}/{} passed, schema: {}/{} passed",
        report.parser_passed, report.parser_total, report.schema_passed, report.schema_total
    );
    if report.passed() {
        Ok(())
    } else {
        Err(HarnessError::ValidationMismatch(report.failures))
    }
}

pub fn cmd_schema_check(
    global: &GlobalOptions,
    file: &Path,
    url: Option<String>,
    expect: &str,
) -> Result<(), HarnessError> {
    let config = global.resolve()?;
    let url = url
        .or_else(|| config.schema_url.clone())
        .ok_or_else(|| HarnessError::Config("no schema URL: pass --url or --schema-url".into()))?;
    let harness = Harness::new(config)?;
    let schema = harness.schemas().get_or_compile(&url)?;
    schema.check_file(file, expect)?;
    println!("{}: schema check passed against {}", file.display(), schema.url());
    Ok(())
}
