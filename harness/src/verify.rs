//! Reconciles a generated document with what the parser returns for it.
//!
//! Collections are compared as sets keyed by identity. Pairs that share an
//! identity but differ are dumped side by side next to the devfile as
//! `<name>_<id>_Parser.yaml` and `<name>_<id>_Test.yaml`.

use std::collections::BTreeMap;
use std::path::Path;

use devfile_gen::TestDevfile;
use devfile_library::{parse_and_validate, DevfileData, DevfileOptions};
use devfile_schema::{
    Command, Component, Events, Identified, Project, SchemaWriter, StarterProject,
};
use serde::Serialize;

use crate::error::HarnessError;
use crate::log::RunLog;
use crate::schema::CompiledSchema;
use crate::workspace::{diagnostic_path, yaml_path};
use crate::write::{to_yaml, write_atomic};

/// Everything the parser reported for one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParserSnapshot {
    pub commands: Vec<Command>,
    pub components: Vec<Component>,
    pub projects: Vec<Project>,
    pub starter_projects: Vec<StarterProject>,
    pub events: Events,
}

impl ParserSnapshot {
    pub fn from_data(data: &DevfileData) -> Self {
        let all = DevfileOptions::default();
        ParserSnapshot {
            commands: data.get_commands(&all),
            components: data.get_components(&all),
            projects: data.get_projects(&all),
            starter_projects: data.get_starter_projects(&all),
            events: data.get_events(),
        }
    }
}

fn index<T: Identified>(items: &[T]) -> BTreeMap<&str, &T> {
    items.iter().map(|i| (i.identity(), i)).collect()
}

fn dump<T: Serialize>(path: &Path, value: &T, log: &RunLog) -> Option<String> {
    let result = to_yaml(value, &path.display().to_string())
        .and_then(|yaml| write_atomic(path, yaml.as_bytes()));
    result.err().map(|e| log.error(e.to_string()))
}

/// Compare one collection and return every discrepancy, already logged.
pub fn compare_collection<T>(devfile: &Path, expected: &[T], actual: &[T], log: &RunLog) -> Vec<String>
where
    T: Identified + PartialEq + Serialize,
{
    let kind = T::KIND;
    let expected_by_id = index(expected);
    let actual_by_id = index(actual);
    let mut errors = Vec::new();

    if actual_by_id.len() != actual.len() {
        errors.push(log.error(format!("{kind} parser returned duplicate identities")));
    }
    if expected_by_id == actual_by_id && errors.is_empty() {
        return errors;
    }
    errors.insert(0, log.error(format!("{kind} collection compare failed")));

    for (id, parsed) in &actual_by_id {
        match expected_by_id.get(id) {
            Some(test) if test == parsed => {}
            Some(test) => {
                let parser_file = diagnostic_path(devfile, &format!("{id}_Parser"));
                let test_file = diagnostic_path(devfile, &format!("{id}_Test"));
                errors.extend(dump(&parser_file, parsed, log));
                errors.extend(dump(&test_file, test, log));
                errors.push(log.error(format!(
                    "{kind} {id} did not match, see files : {} and {}",
                    parser_file.display(),
                    test_file.display()
                )));
            }
            None => errors.push(log.error(format!("{kind} {id} from parser not known to test"))),
        }
    }
    for id in expected_by_id.keys() {
        if !actual_by_id.contains_key(id) {
            errors.push(log.error(format!("{kind} {id} from test not returned by parser")));
        }
    }
    errors
}

/// Compare lifecycle bindings list by list.
pub fn compare_events(devfile: &Path, expected: &Events, actual: &Events, log: &RunLog) -> Vec<String> {
    if expected == actual {
        return Vec::new();
    }
    let mut errors = vec![log.error("Events compare failed".to_string())];
    let parser_file = diagnostic_path(devfile, "Events_Parser");
    let test_file = diagnostic_path(devfile, "Events_Test");
    errors.extend(dump(&parser_file, actual, log));
    errors.extend(dump(&test_file, expected, log));

    for ((name, test), (_, parsed)) in expected.lists().into_iter().zip(actual.lists()) {
        if test != parsed {
            errors.push(log.error(format!(
                "{name} Events did not match, see files : {} and {}",
                parser_file.display(),
                test_file.display()
            )));
        }
    }
    errors
}

/// Check every collection of `devfile` against a parser snapshot.
pub fn verify_snapshot<W: SchemaWriter>(
    devfile: &TestDevfile<W>,
    snapshot: &ParserSnapshot,
    log: &RunLog,
) -> Result<(), HarnessError> {
    let path = yaml_path(devfile.file_name());
    let schema = devfile.schema();
    let mut errors = Vec::new();

    errors.extend(compare_collection(&path, &schema.commands, &snapshot.commands, log));
    errors.extend(compare_collection(&path, &schema.components, &snapshot.components, log));
    errors.extend(compare_collection(&path, &schema.projects, &snapshot.projects, log));
    errors.extend(compare_collection(
        &path,
        &schema.starter_projects,
        &snapshot.starter_projects,
        log,
    ));
    let expected_events = schema.events.clone().unwrap_or_default();
    errors.extend(compare_events(&path, &expected_events, &snapshot.events, log));

    if errors.is_empty() {
        log.info(format!("{} verified", path.display()));
        Ok(())
    } else {
        Err(HarnessError::ValidationMismatch(errors))
    }
}

/// Parse the persisted document and reconcile it with the expected model.
///
/// With a schema, the file must also validate against it.
pub fn verify<W: SchemaWriter>(
    devfile: &TestDevfile<W>,
    schema: Option<&CompiledSchema>,
    log: &RunLog,
) -> Result<(), HarnessError> {
    let path = yaml_path(devfile.file_name());
    log.info(format!("Verify {}", path.display()));

    if let Some(schema) = schema {
        schema.check_file(&path, "").map_err(|e| {
            log.error(e.to_string());
            e
        })?;
    }

    let obj = parse_and_validate(&path).map_err(|e| {
        log.error(format!("From parser : {e}"));
        e
    })?;
    verify_snapshot(devfile, &ParserSnapshot::from_data(&obj.data), log)
}
