//! Negative scenarios: hand-written invalid documents that both the parser
//! and the JSON schema must reject with a known message.
//!
//! A scenario file is named `<anything>-tests.json`:
//!
//! ```json
//! {
//!   "SchemaVersion": "2.0.0",
//!   "SchemaURL": "../../../schemas/devfile.json",
//!   "Tests": [
//!     {
//!       "Label": "MissingImage",
//!       "Parser_Message": "missing field `image`",
//!       "JSONSchema_Message": "is a required property",
//!       "Yaml": ["{\"components\":[{\"name\":\"c\",\"container\":{}}]}"]
//!     }
//!   ]
//! }
//! ```
//!
//! Every `Yaml` entry is a JSON fragment. It is written as
//! `Error_<Label><n>.yaml` below a directory named after the scenario file,
//! preceded by the `schemaVersion` line.

use std::fs;
use std::path::{Path, PathBuf};

use devfile_library::parse_and_validate;
use serde::Deserialize;
use url::Url;

use crate::error::HarnessError;
use crate::log::RunLog;
use crate::schema::SchemaCache;
use crate::workspace::Workspace;
use crate::write::write_atomic;

const SCENARIO_SUFFIX: &str = "-tests.json";

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioFile {
    #[serde(rename = "SchemaVersion")]
    pub schema_version: String,
    #[serde(rename = "SchemaURL", default)]
    pub schema_url: String,
    #[serde(rename = "Tests", default)]
    pub tests: Vec<Scenario>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(rename = "Label")]
    pub label: String,
    #[serde(rename = "Parser_Message", default)]
    pub parser_message: String,
    #[serde(rename = "JSONSchema_Message", default)]
    pub schema_message: String,
    #[serde(rename = "Yaml", default)]
    pub yaml: Vec<String>,
}

/// Pass and failure tallies for one suite run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioReport {
    pub parser_total: usize,
    pub parser_passed: usize,
    pub schema_total: usize,
    pub schema_passed: usize,
    pub failures: Vec<String>,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
            && self.parser_passed == self.parser_total
            && self.schema_passed == self.schema_total
    }

    /// Write the overall PASS/FAIL lines to the log.
    pub fn summarize(&self, log: &RunLog) {
        let lines = [
            ("PARSER", self.parser_total, self.parser_passed),
            ("SCHEMA", self.schema_total, self.schema_passed),
        ];
        for (what, total, passed) in lines {
            if total == 0 {
                continue;
            }
            if passed == total {
                log.info(format!("{what} TESTS OVERALL PASS : {total} tests passed."));
            } else {
                log.error(format!(
                    "{what} TESTS OVERALL FAIL : {passed} tests passed. {} tests failed.",
                    total - passed
                ));
            }
        }
    }
}

/// Scenario files in `dir`, sorted by name.
pub fn scenario_files(dir: &Path) -> Result<Vec<PathBuf>, HarnessError> {
    let entries = fs::read_dir(dir).map_err(HarnessError::io(dir))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(HarnessError::io(dir))?.path();
        let is_scenario = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(SCENARIO_SUFFIX));
        if is_scenario {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

pub fn load_scenario_file(path: &Path) -> Result<ScenarioFile, HarnessError> {
    let text = fs::read_to_string(path).map_err(HarnessError::io(path))?;
    serde_json::from_str(&text)
        .map_err(|e| HarnessError::Config(format!("invalid scenario file {}: {e}", path.display())))
}

/// The document text for one fragment: the version line, then the fragment as YAML.
pub fn render_fragment(schema_version: &str, fragment: &str) -> Result<String, HarnessError> {
    let value: serde_json::Value = serde_json::from_str(fragment).map_err(|e| HarnessError::Serialization {
        what: format!("fragment {fragment}"),
        message: e.to_string(),
    })?;
    let mut text = format!("schemaVersion: \"{schema_version}\"\n");
    let empty = value.as_object().is_some_and(|o| o.is_empty());
    if !empty {
        let yaml = serde_yaml::to_string(&value).map_err(|e| HarnessError::Serialization {
            what: format!("fragment {fragment}"),
            message: e.to_string(),
        })?;
        text.push_str(&yaml);
    }
    Ok(text)
}

/// Plain relative schema paths are taken relative to the scenario file.
fn resolve_schema_url(scenario_path: &Path, url: &str) -> String {
    if Url::parse(url).is_ok() || Path::new(url).is_absolute() {
        return url.to_string();
    }
    let base = scenario_path.parent().unwrap_or(Path::new("."));
    base.join(url).display().to_string()
}

/// Runs every scenario file of a directory.
pub struct ScenarioSuite<'a> {
    workspace: &'a Workspace,
    schemas: &'a SchemaCache,
    log: &'a RunLog,
}

impl<'a> ScenarioSuite<'a> {
    pub fn new(workspace: &'a Workspace, schemas: &'a SchemaCache, log: &'a RunLog) -> Self {
        ScenarioSuite {
            workspace,
            schemas,
            log,
        }
    }

    pub fn run_dir(&self, dir: &Path) -> Result<ScenarioReport, HarnessError> {
        let mut report = ScenarioReport::default();
        for path in scenario_files(dir)? {
            self.run_file(&path, &mut report)?;
        }
        report.summarize(self.log);
        Ok(report)
    }

    /// Run one scenario file, adding its results to `report`.
    ///
    /// Only unreadable inputs are errors; scenario outcomes land in the report.
    pub fn run_file(&self, path: &Path, report: &mut ScenarioReport) -> Result<(), HarnessError> {
        let file = load_scenario_file(path)?;
        let stem = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.trim_end_matches(".json"))
            .unwrap_or("scenarios");
        let dir = self.workspace.temp_dir(stem)?;

        let schema = if file.schema_url.is_empty() {
            None
        } else {
            let url = resolve_schema_url(path, &file.schema_url);
            match self.schemas.get_or_compile(&url) {
                Ok(schema) => Some(schema),
                Err(e) => {
                    report
                        .failures
                        .push(self.log.error(format!("FAIL : schema : Failed to get devfile schema : {e}")));
                    None
                }
            }
        };

        for scenario in &file.tests {
            self.log.info("--------------------------");
            self.log.info(format!("    Label : {}", scenario.label));
            self.log.info(format!("    Parser Message : {}", scenario.parser_message));
            self.log.info(format!("    Schema Message : {}", scenario.schema_message));

            for (n, fragment) in scenario.yaml.iter().enumerate() {
                let yaml_file = dir.join(format!("Error_{}{n}.yaml", scenario.label));
                let text = render_fragment(&file.schema_version, fragment)?;
                write_atomic(&yaml_file, text.as_bytes())?;
                self.log.info(format!("    Yaml : {}", yaml_file.display()));

                report.parser_total += 1;
                match self.check_parser(&yaml_file, &scenario.parser_message) {
                    Ok(()) => report.parser_passed += 1,
                    Err(message) => report.failures.push(message),
                }

                if !file.schema_url.is_empty() {
                    report.schema_total += 1;
                    if let Some(schema) = &schema {
                        match schema.check_file(&yaml_file, &scenario.schema_message) {
                            Ok(()) => report.schema_passed += 1,
                            Err(e) => report.failures.push(
                                self.log.error(format!("FAIL : schema : Verification failed : {e}")),
                            ),
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn check_parser(&self, yaml_file: &Path, expected: &str) -> Result<(), String> {
        let file = yaml_file.display();
        match parse_and_validate(yaml_file) {
            Ok(_) => Err(self.log.error(format!(
                "FAIL : parser : {file} : devfile was valid - Expected Error not found : {expected}"
            ))),
            Err(e) => {
                let got = e.to_string();
                if got.contains(expected) {
                    self.log.info(format!("PASS : parser : Expected Error received : {got}"));
                    Ok(())
                } else {
                    Err(self.log.error(format!(
                        "FAIL : parser : {file} : Did not fail as expected : {expected} got : {got}"
                    )))
                }
            }
        }
    }
}
