use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{exactly_one, is_false, EntityKind, Identified};

/// Command group kinds. At most one command per kind may be the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    Build,
    Run,
    Test,
    Debug,
}

impl GroupKind {
    pub const ALL: [GroupKind; 4] = [
        GroupKind::Build,
        GroupKind::Run,
        GroupKind::Test,
        GroupKind::Debug,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupKind::Build => "build",
            GroupKind::Run => "run",
            GroupKind::Test => "test",
            GroupKind::Debug => "debug",
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GroupKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown group kind: {s} (expected build, run, test or debug)"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CommandGroup {
    pub kind: GroupKind,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExecCommand {
    pub component: String,
    pub command_line: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hot_reload_capable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<CommandGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ApplyCommand {
    pub component: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<CommandGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompositeCommand {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub parallel: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<CommandGroup>,
}

/// Where a vscode configuration lives: referenced by uri or inlined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VscodeSource {
    Uri(String),
    Inlined(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "VscodeWire", into = "VscodeWire")]
pub struct VscodeConfigurationCommand {
    pub group: Option<CommandGroup>,
    pub source: VscodeSource,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct VscodeWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group: Option<CommandGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inlined: Option<String>,
}

impl TryFrom<VscodeWire> for VscodeConfigurationCommand {
    type Error = String;

    fn try_from(wire: VscodeWire) -> Result<Self, Self::Error> {
        let source = exactly_one(
            "vscode command",
            &["uri", "inlined"],
            [
                wire.uri.map(VscodeSource::Uri),
                wire.inlined.map(VscodeSource::Inlined),
            ],
        )?;
        Ok(VscodeConfigurationCommand {
            group: wire.group,
            source,
        })
    }
}

impl From<VscodeConfigurationCommand> for VscodeWire {
    fn from(cmd: VscodeConfigurationCommand) -> Self {
        let (uri, inlined) = match cmd.source {
            VscodeSource::Uri(u) => (Some(u), None),
            VscodeSource::Inlined(i) => (None, Some(i)),
        };
        VscodeWire {
            group: cmd.group,
            uri,
            inlined,
        }
    }
}

/// The command variants a devfile supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandType {
    Exec,
    Apply,
    Composite,
    VscodeTask,
    VscodeLaunch,
}

impl CommandType {
    pub const ALL: [CommandType; 5] = [
        CommandType::Exec,
        CommandType::Apply,
        CommandType::Composite,
        CommandType::VscodeTask,
        CommandType::VscodeLaunch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Exec => "exec",
            CommandType::Apply => "apply",
            CommandType::Composite => "composite",
            CommandType::VscodeTask => "vscodeTask",
            CommandType::VscodeLaunch => "vscodeLaunch",
        }
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown command type: {s}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    Exec(ExecCommand),
    Apply(ApplyCommand),
    Composite(CompositeCommand),
    VscodeTask(VscodeConfigurationCommand),
    VscodeLaunch(VscodeConfigurationCommand),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CommandWire", into = "CommandWire")]
pub struct Command {
    pub id: String,
    pub kind: CommandKind,
}

impl Command {
    pub fn command_type(&self) -> CommandType {
        match &self.kind {
            CommandKind::Exec(_) => CommandType::Exec,
            CommandKind::Apply(_) => CommandType::Apply,
            CommandKind::Composite(_) => CommandType::Composite,
            CommandKind::VscodeTask(_) => CommandType::VscodeTask,
            CommandKind::VscodeLaunch(_) => CommandType::VscodeLaunch,
        }
    }

    pub fn group(&self) -> Option<&CommandGroup> {
        match &self.kind {
            CommandKind::Exec(c) => c.group.as_ref(),
            CommandKind::Apply(c) => c.group.as_ref(),
            CommandKind::Composite(c) => c.group.as_ref(),
            CommandKind::VscodeTask(c) | CommandKind::VscodeLaunch(c) => c.group.as_ref(),
        }
    }
}

impl Identified for Command {
    const KIND: EntityKind = EntityKind::Command;

    fn identity(&self) -> &str {
        &self.id
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct CommandWire {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exec: Option<ExecCommand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    apply: Option<ApplyCommand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    composite: Option<CompositeCommand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    vscode_task: Option<VscodeConfigurationCommand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    vscode_launch: Option<VscodeConfigurationCommand>,
}

impl TryFrom<CommandWire> for Command {
    type Error = String;

    fn try_from(wire: CommandWire) -> Result<Self, Self::Error> {
        let kind = exactly_one(
            &format!("command {}", wire.id),
            &["exec", "apply", "composite", "vscodeTask", "vscodeLaunch"],
            [
                wire.exec.map(CommandKind::Exec),
                wire.apply.map(CommandKind::Apply),
                wire.composite.map(CommandKind::Composite),
                wire.vscode_task.map(CommandKind::VscodeTask),
                wire.vscode_launch.map(CommandKind::VscodeLaunch),
            ],
        )?;
        Ok(Command { id: wire.id, kind })
    }
}

impl From<Command> for CommandWire {
    fn from(command: Command) -> Self {
        let mut wire = CommandWire {
            id: command.id,
            exec: None,
            apply: None,
            composite: None,
            vscode_task: None,
            vscode_launch: None,
        };
        match command.kind {
            CommandKind::Exec(c) => wire.exec = Some(c),
            CommandKind::Apply(c) => wire.apply = Some(c),
            CommandKind::Composite(c) => wire.composite = Some(c),
            CommandKind::VscodeTask(c) => wire.vscode_task = Some(c),
            CommandKind::VscodeLaunch(c) => wire.vscode_launch = Some(c),
        }
        wire
    }
}
