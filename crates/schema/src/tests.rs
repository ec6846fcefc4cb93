use std::collections::BTreeMap;

use crate::*;

fn exec(id: &str, component: &str) -> Command {
    Command {
        id: id.into(),
        kind: CommandKind::Exec(ExecCommand {
            component: component.into(),
            command_line: "make all".into(),
            working_dir: None,
            label: None,
            hot_reload_capable: false,
            env: vec![],
            group: Some(CommandGroup {
                kind: GroupKind::Run,
                is_default: true,
            }),
        }),
    }
}

#[test]
fn test_command_wire_shape() {
    let yaml = serde_yaml::to_string(&exec("run1", "tools")).unwrap();
    assert!(yaml.contains("id: run1"));
    assert!(yaml.contains("exec:"));
    assert!(yaml.contains("commandLine: make all"));
    assert!(yaml.contains("isDefault: true"));
    assert!(!yaml.contains("hotReloadCapable"));
}

#[test]
fn test_command_decodes_exec() {
    let yaml = "id: build1\nexec:\n  component: tools\n  commandLine: go build\n  group:\n    kind: build\n";
    let cmd: Command = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(cmd.command_type(), CommandType::Exec);
    let group = cmd.group().unwrap();
    assert_eq!(group.kind, GroupKind::Build);
    assert!(!group.is_default);
}

#[test]
fn test_command_rejects_two_variants() {
    let yaml = "id: x\nexec:\n  component: a\n  commandLine: b\napply:\n  component: a\n";
    let err = serde_yaml::from_str::<Command>(yaml).unwrap_err();
    assert!(err.to_string().contains("must specify exactly one of"));
}

#[test]
fn test_command_rejects_no_variant() {
    let err = serde_yaml::from_str::<Command>("id: x\n").unwrap_err();
    assert!(err.to_string().contains("found 0"));
}

#[test]
fn test_vscode_source_is_exclusive() {
    let ok: Command =
        serde_yaml::from_str("id: v\nvscodeTask:\n  uri: http://abc\n").unwrap();
    match ok.kind {
        CommandKind::VscodeTask(v) => assert_eq!(v.source, VscodeSource::Uri("http://abc".into())),
        other => panic!("unexpected kind {other:?}"),
    }
    let both = "id: v\nvscodeLaunch:\n  uri: http://abc\n  inlined: xyz\n";
    assert!(serde_yaml::from_str::<Command>(both).is_err());
}

#[test]
fn test_component_kinds_decode() {
    let yaml = "- name: c1\n  container:\n    image: busybox\n    endpoints:\n      - name: web\n        targetPort: 8080\n- name: v1\n  volume:\n    size: 2Gi\n- name: k1\n  kubernetes:\n    inlined: 'kind: Pod'\n";
    let comps: Vec<Component> = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(comps.len(), 3);
    assert_eq!(comps[0].container().unwrap().endpoints[0].target_port, 8080);
    assert_eq!(comps[1].component_type(), ComponentType::Volume);
    assert_eq!(
        comps[2].kind,
        ComponentKind::Kubernetes(ContentSource::Inlined("kind: Pod".into()))
    );
}

#[test]
fn test_unknown_field_rejected() {
    let yaml = "name: c1\ncontainer:\n  image: busybox\n  bogus: 1\n";
    assert!(serde_yaml::from_str::<Component>(yaml).is_err());
}

#[test]
fn test_project_git_source() {
    let yaml = "name: p1\ngit:\n  remotes:\n    origin: https://example.com/a.git\n  checkoutFrom:\n    remote: origin\n    revision: main\n";
    let project: Project = serde_yaml::from_str(yaml).unwrap();
    let git = project.source.git_like().unwrap();
    assert_eq!(git.remotes.len(), 1);
    assert_eq!(
        git.checkout_from.as_ref().unwrap().remote.as_deref(),
        Some("origin")
    );
}

#[test]
fn test_devfile_round_trips_through_yaml() {
    let mut devfile = Devfile::new(SCHEMA_VERSION);
    devfile.components.push(Component {
        name: "tools".into(),
        kind: ComponentKind::Container(ContainerComponent {
            image: "busybox".into(),
            memory_limit: Some("1Gi".into()),
            mount_sources: None,
            source_mapping: None,
            env: vec![],
            args: vec![],
            command: vec![],
            endpoints: vec![],
        }),
    });
    devfile.commands.push(exec("run1", "tools"));
    let mut remotes = BTreeMap::new();
    remotes.insert("origin".to_string(), "https://a".to_string());
    devfile.starter_projects.push(StarterProject {
        name: "starter".into(),
        description: Some("a starter".into()),
        sub_dir: None,
        source: ProjectSource::Github(GitLikeSource {
            remotes,
            checkout_from: None,
        }),
    });
    devfile.events = Some(Events {
        post_start: vec!["run1".into()],
        ..Default::default()
    });

    let yaml = serde_yaml::to_string(&devfile).unwrap();
    assert!(yaml.contains("schemaVersion:"));
    let back: Devfile = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(back, devfile);
}

#[test]
fn test_writer_add_and_update() {
    let mut devfile = Devfile::new(SCHEMA_VERSION);
    devfile.add_command(exec("a", "tools")).unwrap();
    let dup = devfile.add_command(exec("a", "other")).unwrap_err();
    assert_eq!(
        dup,
        SchemaError::Duplicate {
            kind: EntityKind::Command,
            id: "a".into()
        }
    );

    devfile.update_command(exec("a", "other")).unwrap();
    match &devfile.command("a").unwrap().kind {
        CommandKind::Exec(e) => assert_eq!(e.component, "other"),
        other => panic!("unexpected kind {other:?}"),
    }

    let missing = devfile.update_command(exec("b", "tools")).unwrap_err();
    assert_eq!(missing.to_string(), "Command b not found");
}

#[test]
fn test_events_is_empty() {
    let mut events = Events::default();
    assert!(events.is_empty());
    events.pre_stop.push("x".into());
    assert!(!events.is_empty());
    assert_eq!(events.lists()[2].0, "preStop");
}

#[test]
fn test_type_names_parse() {
    assert_eq!("exec".parse::<CommandType>().unwrap(), CommandType::Exec);
    assert_eq!("vscodetask".parse::<CommandType>().unwrap(), CommandType::VscodeTask);
    assert_eq!("github".parse::<ProjectSourceType>().unwrap(), ProjectSourceType::Github);
    assert!("helm".parse::<ComponentType>().is_err());
    assert_eq!("debug".parse::<GroupKind>().unwrap(), GroupKind::Debug);
}
