use std::fs;

use devfile_schema::{CommandType, ComponentType, GroupKind, ProjectSourceType, SchemaWriter};

use crate::*;

const VALID: &str = r#"schemaVersion: 2.0.0
components:
  - name: tools
    container:
      image: busybox
      endpoints:
        - name: web
          targetPort: 8080
  - name: cache
    volume:
      size: 1Gi
commands:
  - id: build
    exec:
      component: tools
      commandLine: make
      group:
        kind: build
        isDefault: true
  - id: deploy
    apply:
      component: cache
  - id: all
    composite:
      commands: [build, deploy]
projects:
  - name: app
    git:
      remotes:
        origin: https://example.com/app.git
        fork: https://example.com/fork.git
      checkoutFrom:
        remote: fork
events:
  postStart: [build]
"#;

fn write(dir: &std::path::Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_parse_and_validate_valid() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "valid.yaml", VALID);
    let obj = parse_and_validate(&path).unwrap();
    let opts = DevfileOptions::default();
    assert_eq!(obj.data.get_commands(&opts).len(), 3);
    assert_eq!(obj.data.get_components(&opts).len(), 2);
    assert_eq!(obj.data.get_projects(&opts).len(), 1);
    assert!(obj.data.get_starter_projects(&opts).is_empty());
    assert_eq!(obj.data.get_events().post_start, vec!["build".to_string()]);
}

#[test]
fn test_options_filter() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "filter.yaml", VALID);
    let obj = parse(&path).unwrap();

    let exec_only = DevfileOptions {
        command_type: Some(CommandType::Exec),
        ..Default::default()
    };
    assert_eq!(obj.data.get_commands(&exec_only).len(), 1);

    let build_group = DevfileOptions {
        group_kind: Some(GroupKind::Build),
        ..Default::default()
    };
    assert_eq!(obj.data.get_commands(&build_group)[0].id, "build");

    let volumes = DevfileOptions {
        component_type: Some(ComponentType::Volume),
        ..Default::default()
    };
    assert_eq!(obj.data.get_components(&volumes)[0].name, "cache");

    let zips = DevfileOptions {
        project_source_type: Some(ProjectSourceType::Zip),
        ..Default::default()
    };
    assert!(obj.data.get_projects(&zips).is_empty());
}

#[test]
fn test_validation_collects_all_errors() {
    let body = r#"schemaVersion: 2.0.0
components:
  - name: cache
    volume: {}
commands:
  - id: a
    exec:
      component: cache
      commandLine: x
      group: {kind: run, isDefault: true}
  - id: b
    exec:
      component: ghost
      commandLine: y
      group: {kind: run, isDefault: true}
  - id: c
    composite:
      commands: [c, missing]
  - id: a
    apply:
      component: cache
projects:
  - name: p
    git:
      remotes: {origin: x, fork: y}
  - name: q
    github:
      remotes: {origin: x}
      checkoutFrom: {remote: upstream}
events:
  preStop: [nothing]
"#;
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "bad.yaml", body);
    let err = parse_and_validate(&path).unwrap_err();
    let LibraryError::Validation { errors, .. } = err else {
        panic!("expected validation error, got {err}");
    };
    let kinds: Vec<ValidationErrorKind> = errors.iter().map(|e| e.kind.clone()).collect();
    assert!(kinds.contains(&ValidationErrorKind::DuplicateIdentity));
    assert!(kinds.contains(&ValidationErrorKind::MultipleDefaults));
    assert!(kinds.contains(&ValidationErrorKind::InvalidCheckout));
    assert_eq!(
        kinds.iter().filter(|k| **k == ValidationErrorKind::UnknownComponent).count(),
        2
    );
    assert_eq!(
        kinds.iter().filter(|k| **k == ValidationErrorKind::UnknownCommand).count(),
        3
    );
    let text: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    assert!(text.iter().any(|t| t.contains("duplicate key: Command a")));
    assert!(text.iter().any(|t| t.contains("checkoutFrom remote upstream does not exist")));
}

#[test]
fn test_duplicate_endpoint_port() {
    let body = r#"schemaVersion: 2.0.0
components:
  - name: one
    container:
      image: a
      endpoints: [{name: http, targetPort: 3000}]
  - name: two
    container:
      image: b
      endpoints: [{name: http, targetPort: 3000}]
"#;
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "ports.yaml", body);
    let err = parse_and_validate(&path).unwrap_err();
    let LibraryError::Validation { errors, .. } = err else {
        panic!("expected validation error, got {err}");
    };
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| e.kind == ValidationErrorKind::DuplicateEndpoint));
}

#[test]
fn test_decode_errors_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "junk.yaml", "schemaVersion: 2.0.0\nbogus: true\n");
    let err = parse(&path).unwrap_err();
    assert!(matches!(err, LibraryError::Yaml { .. }));
    assert!(err.to_string().contains("unknown field `bogus`"));

    let missing = parse(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(missing, LibraryError::Io { .. }));
}

#[test]
fn test_write_yaml_then_parse() {
    let dir = tempfile::tempdir().unwrap();
    let source = write(dir.path(), "source.yaml", VALID);
    let mut obj = parse_and_validate(&source).unwrap();

    let mut command = obj.data.get_commands(&DevfileOptions::default())[0].clone();
    if let devfile_schema::CommandKind::Exec(exec) = &mut command.kind {
        exec.label = Some("Build it".into());
    }
    obj.data.update_command(command.clone()).unwrap();
    obj.path = dir.path().join("nested").join("out.yaml");
    obj.write_yaml().unwrap();

    let back = parse_and_validate(&obj.path).unwrap();
    assert_eq!(back.data, obj.data);
    assert_eq!(back.data.devfile().command("build"), Some(&command));
}

#[test]
fn test_writer_rejects_duplicates() {
    let mut data = DevfileData::new("2.0.0");
    let dir = tempfile::tempdir().unwrap();
    let obj = parse(&write(dir.path(), "v.yaml", VALID)).unwrap();
    let component = obj.data.get_components(&DevfileOptions::default())[0].clone();
    data.add_component(component.clone()).unwrap();
    assert!(data.add_component(component).is_err());
    assert_eq!(data.devfile().schema_version, "2.0.0");
}
