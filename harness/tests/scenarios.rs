use std::fs;
use std::path::Path;

use devfile_harness::scenario::{load_scenario_file, scenario_files, ScenarioReport, ScenarioSuite};
use devfile_harness::{Harness, HarnessConfig};

const ERRORS_DIR: &str = "tests/data/errors";

fn harness(dir: &Path) -> Harness {
    Harness::new(HarnessConfig::default().with_tmp_dir(dir)).unwrap()
}

#[test]
fn test_scenario_files_are_found_in_order() {
    let files = scenario_files(Path::new(ERRORS_DIR)).unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "command-tests.json",
            "component-tests.json",
            "devfile-tests.json",
            "project-tests.json",
        ]
    );
}

#[test]
fn test_errors_suite_passes() {
    let dir = tempfile::tempdir().unwrap();
    let harness = harness(dir.path());
    let suite = ScenarioSuite::new(harness.workspace(), harness.schemas(), harness.log());
    let report = suite.run_dir(Path::new(ERRORS_DIR)).unwrap();

    assert!(report.passed(), "{:#?}", report.failures);
    assert_eq!(report.parser_total, 13);
    assert_eq!(report.schema_total, 13);
    assert_eq!(harness.schemas().compiled_count(), 1);

    assert!(dir
        .path()
        .join("command-tests")
        .join("Error_TwoDefaults0.yaml")
        .exists());
    let log = fs::read_to_string(harness.log().path()).unwrap();
    assert!(log.contains("PARSER TESTS OVERALL PASS : 13 tests passed."));
    assert!(log.contains("SCHEMA TESTS OVERALL PASS : 13 tests passed."));
}

#[test]
fn test_wrong_expectation_is_a_failure() {
    let dir = tempfile::tempdir().unwrap();
    let scenarios = dir.path().join("in");
    fs::create_dir_all(&scenarios).unwrap();
    fs::write(
        scenarios.join("wrong-tests.json"),
        r#"{
  "SchemaVersion": "2.0.0",
  "Tests": [
    {
      "Label": "ValidDocument",
      "Parser_Message": "something",
      "JSONSchema_Message": "",
      "Yaml": ["{\"components\":[{\"name\":\"tools\",\"volume\":{}}]}"]
    },
    {
      "Label": "WrongMessage",
      "Parser_Message": "no such message",
      "Yaml": ["{\"bogus\":1}"]
    }
  ]
}"#,
    )
    .unwrap();

    let out = dir.path().join("out");
    let harness = harness(&out);
    let suite = ScenarioSuite::new(harness.workspace(), harness.schemas(), harness.log());
    let report = suite.run_dir(&scenarios).unwrap();

    assert!(!report.passed());
    assert_eq!(report.parser_total, 2);
    assert_eq!(report.parser_passed, 0);
    assert_eq!(report.schema_total, 0);
    assert!(report.failures[0].contains("devfile was valid - Expected Error not found : something"));
    assert!(report.failures[1].contains("Did not fail as expected : no such message"));

    let log = fs::read_to_string(harness.log().path()).unwrap();
    assert!(log.contains("PARSER TESTS OVERALL FAIL : 0 tests passed. 2 tests failed."));
}

#[test]
fn test_unreachable_schema_is_counted_as_failure() {
    let dir = tempfile::tempdir().unwrap();
    let scenarios = dir.path().join("in");
    fs::create_dir_all(&scenarios).unwrap();
    fs::write(
        scenarios.join("noschema-tests.json"),
        r#"{
  "SchemaVersion": "2.0.0",
  "SchemaURL": "missing/devfile.json",
  "Tests": [
    { "Label": "Bogus", "Parser_Message": "unknown field", "Yaml": ["{\"bogus\":1}"] }
  ]
}"#,
    )
    .unwrap();

    let harness = harness(&dir.path().join("out"));
    let suite = ScenarioSuite::new(harness.workspace(), harness.schemas(), harness.log());
    let mut report = ScenarioReport::default();
    suite
        .run_file(&scenarios.join("noschema-tests.json"), &mut report)
        .unwrap();

    assert_eq!(report.parser_passed, 1);
    assert_eq!(report.schema_total, 1);
    assert_eq!(report.schema_passed, 0);
    assert!(report.failures[0].contains("Failed to get devfile schema"));
}

#[test]
fn test_load_scenario_file() {
    let file = load_scenario_file(&Path::new(ERRORS_DIR).join("devfile-tests.json")).unwrap();
    assert_eq!(file.schema_version, "2.0.0");
    assert_eq!(file.tests.len(), 1);
    assert_eq!(file.tests[0].label, "UnknownTopLevelField");
    assert_eq!(file.tests[0].parser_message, "unknown field `bogus`");
}
