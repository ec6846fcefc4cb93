use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use devfile_schema::{Command, CommandKind, ExecCommand};

use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::log::RunLog;
use crate::runner::Harness;
use crate::scenario::render_fragment;
use crate::schema::{CompiledSchema, SchemaCache, SchemaSource};
use crate::verify::compare_collection;
use crate::workspace::{add_suffix_to_file_name, diagnostic_path, yaml_path};

const SCHEMA: &str = r#"{
  "type": "object",
  "required": ["schemaVersion"],
  "properties": { "schemaVersion": { "type": "string" } },
  "additionalProperties": false
}"#;

fn exec(id: &str, line: &str) -> Command {
    Command {
        id: id.into(),
        kind: CommandKind::Exec(ExecCommand {
            component: "tools".into(),
            command_line: line.into(),
            ..Default::default()
        }),
    }
}

fn open_log(dir: &Path) -> RunLog {
    RunLog::open(&dir.join("test.log"), false).unwrap()
}

// --- Run log ---

#[test]
fn test_run_log_returns_and_writes_message() {
    let dir = tempfile::tempdir().unwrap();
    let log = open_log(dir.path());
    assert_eq!(log.info("hello"), "hello");
    assert_eq!(log.error(format!("bad {}", 1)), "bad 1");

    let text = fs::read_to_string(log.path()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with(" INFO : hello"));
    assert!(lines[1].ends_with(" ..... ERROR : bad 1"));
}

#[test]
fn test_run_log_truncates_on_open() {
    let dir = tempfile::tempdir().unwrap();
    open_log(dir.path()).info("first run");
    let log = open_log(dir.path());
    log.info("second run");
    let text = fs::read_to_string(log.path()).unwrap();
    assert!(!text.contains("first run"));
    assert!(text.contains("second run"));
}

// --- Config ---

#[test]
fn test_config_defaults() {
    let config = HarnessConfig::default();
    assert_eq!(config.workers, 5);
    assert_eq!(config.log_file, "test.log");
    assert_eq!(config.max_commands, 10);
    assert!(config.schema_url.is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_load_partial_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"workers": 2, "seed": 42}"#).unwrap();
    let config = HarnessConfig::load(&path).unwrap();
    assert_eq!(config.workers, 2);
    assert_eq!(config.seed, Some(42));
    assert_eq!(config.max_projects, 10);
}

#[test]
fn test_config_rejects_zero_workers() {
    let err = HarnessConfig::default().with_workers(0).validate().unwrap_err();
    assert!(matches!(err, HarnessError::Config(_)));
    assert!(err.to_string().contains("workers"));
}

// --- Workspace names ---

#[test]
fn test_add_suffix_to_file_name() {
    assert_eq!(add_suffix_to_file_name("test.yaml", "3"), "test3.yaml");
    assert_eq!(add_suffix_to_file_name("devfile", "1"), "devfile1");
}

#[test]
fn test_diagnostic_and_yaml_paths() {
    assert_eq!(
        diagnostic_path(Path::new("tmp/test.yaml"), "build_Parser"),
        Path::new("tmp/test_build_Parser.yaml")
    );
    assert_eq!(yaml_path(Path::new("tmp/test")), Path::new("tmp/test.yaml"));
    assert_eq!(yaml_path(Path::new("tmp/test.yaml")), Path::new("tmp/test.yaml"));
}

// --- Verification ---

#[test]
fn test_compare_collection_equal_sets_in_any_order() {
    let dir = tempfile::tempdir().unwrap();
    let log = open_log(dir.path());
    let expected = vec![exec("a", "x"), exec("b", "y")];
    let actual = vec![exec("b", "y"), exec("a", "x")];
    let errors = compare_collection(&dir.path().join("test.yaml"), &expected, &actual, &log);
    assert!(errors.is_empty(), "{errors:?}");
}

#[test]
fn test_compare_collection_missing_identity() {
    let dir = tempfile::tempdir().unwrap();
    let log = open_log(dir.path());
    let devfile = dir.path().join("test.yaml");
    let expected = vec![exec("a", "x"), exec("b", "y")];
    let actual = vec![exec("a", "x")];

    let errors = compare_collection(&devfile, &expected, &actual, &log);
    assert_eq!(errors[0], "Command collection compare failed");
    assert!(errors.iter().any(|e| e == "Command b from test not returned by parser"));
    assert!(!diagnostic_path(&devfile, "b_Parser").exists());
    assert!(!diagnostic_path(&devfile, "a_Parser").exists());
}

#[test]
fn test_compare_collection_mismatch_dumps_both_sides() {
    let dir = tempfile::tempdir().unwrap();
    let log = open_log(dir.path());
    let devfile = dir.path().join("test.yaml");
    let expected = vec![exec("a", "make")];
    let actual = vec![exec("a", "make all")];

    let errors = compare_collection(&devfile, &expected, &actual, &log);
    assert!(errors.iter().any(|e| e.starts_with("Command a did not match, see files")));

    let parser = fs::read_to_string(diagnostic_path(&devfile, "a_Parser")).unwrap();
    let test = fs::read_to_string(diagnostic_path(&devfile, "a_Test")).unwrap();
    assert!(parser.contains("make all"));
    assert!(!test.contains("make all"));
    assert!(fs::read_to_string(log.path()).unwrap().contains("ERROR : Command a did not match"));
}

#[test]
fn test_compare_collection_unknown_from_parser() {
    let dir = tempfile::tempdir().unwrap();
    let log = open_log(dir.path());
    let errors = compare_collection(
        &dir.path().join("test.yaml"),
        &[exec("a", "x")],
        &[exec("a", "x"), exec("z", "x")],
        &log,
    );
    assert!(errors.iter().any(|e| e == "Command z from parser not known to test"));
}

// --- Schemas ---

struct CountingSource {
    fetches: Arc<AtomicUsize>,
}

impl SchemaSource for CountingSource {
    fn fetch(&self, _url: &str) -> Result<Vec<u8>, HarnessError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        Ok(SCHEMA.as_bytes().to_vec())
    }
}

#[test]
fn test_schema_cache_compiles_once_under_contention() {
    let fetches = Arc::new(AtomicUsize::new(0));
    let cache = SchemaCache::new(Box::new(CountingSource {
        fetches: Arc::clone(&fetches),
    }));

    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                let schema = cache.get_or_compile("https://example.com/devfile.json").unwrap();
                assert_eq!(schema.url(), "https://example.com/devfile.json");
            });
        }
    });

    assert_eq!(fetches.load(Ordering::SeqCst), 1);
    assert_eq!(cache.compiled_count(), 1);

    cache.get_or_compile("https://example.com/other.json").unwrap();
    assert_eq!(cache.compiled_count(), 2);
}

#[test]
fn test_schema_cache_refetches_in_new_cache() {
    let dir = tempfile::tempdir().unwrap();
    let fetches = Arc::new(AtomicUsize::new(0));
    let source = CountingSource {
        fetches: Arc::clone(&fetches),
    };
    let first = SchemaCache::new(Box::new(source)).with_download_dir(dir.path());
    first.get_or_compile("https://example.com/devfile.json").unwrap();
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);

    let source = CountingSource {
        fetches: Arc::clone(&fetches),
    };
    let second = SchemaCache::new(Box::new(source)).with_download_dir(dir.path());
    second.get_or_compile("https://example.com/devfile.json").unwrap();
    assert_eq!(fetches.load(Ordering::SeqCst), 2);
}

#[test]
fn test_new_run_sees_changed_schema_file() {
    let dir = tempfile::tempdir().unwrap();
    let tmp = dir.path().join("tmp");
    let schema_file = dir.path().join("schema.json");
    let doc = dir.path().join("doc.yaml");
    fs::write(&doc, "schemaVersion: \"2.0.0\"\n").unwrap();
    let url = schema_file.display().to_string();

    fs::write(&schema_file, r#"{"type": "object"}"#).unwrap();
    let first = Harness::new(HarnessConfig::default().with_tmp_dir(&tmp)).unwrap();
    first.schemas().get_or_compile(&url).unwrap().check_file(&doc, "").unwrap();

    fs::write(&schema_file, r#"{"not": {}}"#).unwrap();
    let second = Harness::new(HarnessConfig::default().with_tmp_dir(&tmp)).unwrap();
    let schema = second.schemas().get_or_compile(&url).unwrap();
    assert!(schema.check_file(&doc, "").is_err());
}

#[test]
fn test_check_file_expectations() {
    let dir = tempfile::tempdir().unwrap();
    let schema = CompiledSchema::compile("inline", &serde_json::from_str(SCHEMA).unwrap()).unwrap();

    let valid = dir.path().join("valid.yaml");
    fs::write(&valid, "schemaVersion: \"2.0.0\"\n").unwrap();
    assert!(schema.check_file(&valid, "").is_ok());
    let err = schema.check_file(&valid, "is a required property").unwrap_err();
    assert!(err.to_string().contains("devfile was valid - Expected Error not found"));

    let invalid = dir.path().join("invalid.yaml");
    fs::write(&invalid, "schemaVersion: \"2.0.0\"\nbogus: 1\n").unwrap();
    assert!(schema.check_file(&invalid, "Additional properties are not allowed").is_ok());
    let err = schema.check_file(&invalid, "").unwrap_err();
    assert!(err.to_string().contains("Did not pass as expected"));
    let err = schema.check_file(&invalid, "is not of type").unwrap_err();
    assert!(err.to_string().contains("Did not fail as expected : is not of type"));
}

#[test]
fn test_render_fragment() {
    let text = render_fragment("2.0.0", r#"{"bogus": true}"#).unwrap();
    assert!(text.starts_with("schemaVersion: \"2.0.0\"\n"));
    assert!(text.contains("bogus: true"));

    assert_eq!(render_fragment("2.0.0", "{}").unwrap(), "schemaVersion: \"2.0.0\"\n");
    assert!(render_fragment("2.0.0", "{not json").is_err());
}
