use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use devfile_harness::cli::{self, GlobalOptions, RunArgs};
use devfile_schema::{CommandType, ComponentType, ProjectSourceType};

#[derive(Parser)]
#[command(
    name = "devfile-fuzz",
    about = "Randomized round-trip and negative-scenario checks for the devfile library"
)]
struct Cli {
    /// JSON config file; command-line flags override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory for generated files and the run log.
    #[arg(long, global = true)]
    tmp_dir: Option<PathBuf>,
    /// Base seed for a reproducible run.
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Schema every document is checked against.
    #[arg(long, global = true)]
    schema_url: Option<String>,
    /// Mirror log lines to stdout.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate, write and verify random devfiles.
    Run {
        /// Command types, e.g. exec,composite
        #[arg(long, value_delimiter = ',')]
        commands: Vec<CommandType>,
        /// Component types, e.g. container,volume
        #[arg(long, value_delimiter = ',')]
        components: Vec<ComponentType>,
        /// Project source types, e.g. git,zip
        #[arg(long, value_delimiter = ',')]
        projects: Vec<ProjectSourceType>,
        /// Starter project source types.
        #[arg(long, value_delimiter = ',')]
        starter_projects: Vec<ProjectSourceType>,
        /// Devfile name under the temp directory.
        #[arg(long, default_value = "test.yaml")]
        file: String,
        /// Build and write through the library object model.
        #[arg(long)]
        with_parser: bool,
        /// Parse the written file, mutate every entity and write it again.
        #[arg(long)]
        edit: bool,
        /// Run this many documents in parallel.
        #[arg(long)]
        threads: Option<usize>,
    },
    /// Run the negative scenario files (*-tests.json) in a directory.
    Errors {
        dir: PathBuf,
    },
    /// Check one YAML file against a JSON schema.
    SchemaCheck {
        file: PathBuf,
        /// Schema URL or path (defaults to --schema-url).
        #[arg(long)]
        url: Option<String>,
        /// Message the check must fail with; empty means the file must pass.
        #[arg(long, default_value = "")]
        expect: String,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), devfile_harness::HarnessError> {
    let global = GlobalOptions {
        config: cli.config,
        tmp_dir: cli.tmp_dir,
        seed: cli.seed,
        schema_url: cli.schema_url,
        verbose: cli.verbose,
    };
    match cli.command {
        Command::Run {
            commands,
            components,
            projects,
            starter_projects,
            file,
            with_parser,
            edit,
            threads,
        } => cli::cmd_run(
            &global,
            RunArgs {
                commands,
                components,
                projects,
                starter_projects,
                file,
                with_parser,
                edit,
                threads,
            },
        ),
        Command::Errors { dir } => cli::cmd_errors(&global, &dir),
        Command::SchemaCheck { file, url, expect } => {
            cli::cmd_schema_check(&global, &file, url, &expect)
        }
    }
}
