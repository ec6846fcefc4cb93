//! Command builders. The same roll functions serve construction and mutation.

use devfile_schema::{
    ApplyCommand, Command, CommandGroup, CommandKind, CommandType, CompositeCommand, EnvVar,
    ExecCommand, GroupKind, SchemaWriter, VscodeConfigurationCommand, VscodeSource,
};

use crate::store::TestDevfile;

impl<W: SchemaWriter> TestDevfile<W> {
    pub(crate) fn build_command(&mut self, command_type: CommandType, group: Option<GroupKind>) -> Command {
        let id = self.ctx.unique_string(8, true);
        let kind = match command_type {
            CommandType::Exec => {
                let mut exec = ExecCommand::default();
                self.roll_exec(&mut exec, group);
                CommandKind::Exec(exec)
            }
            CommandType::Apply => {
                let mut apply = ApplyCommand::default();
                self.roll_apply(&mut apply, group);
                CommandKind::Apply(apply)
            }
            CommandType::Composite => {
                let mut composite = CompositeCommand::default();
                self.roll_composite(&mut composite, group);
                CommandKind::Composite(composite)
            }
            CommandType::VscodeTask => CommandKind::VscodeTask(self.build_vscode(group)),
            CommandType::VscodeLaunch => CommandKind::VscodeLaunch(self.build_vscode(group)),
        };
        Command { id, kind }
    }

    /// Keeps an existing group. Otherwise a forced kind always gets a group
    /// and a free choice gets one two times out of three.
    pub(crate) fn roll_group(&mut self, slot: &mut Option<CommandGroup>, forced: Option<GroupKind>) {
        if slot.is_some() {
            return;
        }
        *slot = match forced {
            Some(kind) => Some(self.allocate_group_of(kind)),
            None if self.ctx.weighted(2, 1) => Some(self.allocate_group()),
            None => None,
        };
    }

    pub(crate) fn roll_exec(&mut self, exec: &mut ExecCommand, group: Option<GroupKind>) {
        exec.component = self.container_name();
        exec.command_line = format!(
            "{} {}",
            self.ctx.random_string(4, false),
            self.ctx.random_string(4, false)
        );
        self.roll_group(&mut exec.group, group);
        exec.label = self.ctx.binary().then(|| self.ctx.random_string(12, false));
        exec.working_dir = self.ctx.binary().then(|| "./tmp".to_string());
        exec.hot_reload_capable = self.ctx.binary();
        exec.env = if self.ctx.binary() {
            self.random_env()
        } else {
            Vec::new()
        };
    }

    pub(crate) fn roll_apply(&mut self, apply: &mut ApplyCommand, group: Option<GroupKind>) {
        apply.component = self.container_name();
        self.roll_group(&mut apply.group, group);
        apply.label = self.ctx.binary().then(|| self.ctx.random_string(63, false));
    }

    /// Children are new exec commands added before the composite itself.
    pub(crate) fn roll_composite(&mut self, composite: &mut CompositeCommand, group: Option<GroupKind>) {
        let count = self.ctx.bounded(3);
        composite.commands = (0..count)
            .map(|_| self.add_command(CommandType::Exec).id)
            .collect();
        self.roll_group(&mut composite.group, group);
        composite.label = self.ctx.binary().then(|| self.ctx.random_string(12, false));
        composite.parallel = self.ctx.binary();
    }

    fn build_vscode(&mut self, group: Option<GroupKind>) -> VscodeConfigurationCommand {
        let mut vscode = VscodeConfigurationCommand {
            group: None,
            source: VscodeSource::Inlined(String::new()),
        };
        self.roll_vscode(&mut vscode, group);
        vscode
    }

    pub(crate) fn roll_vscode(&mut self, vscode: &mut VscodeConfigurationCommand, group: Option<GroupKind>) {
        self.roll_group(&mut vscode.group, group);
        vscode.source = if self.ctx.binary() {
            let len = self.ctx.bounded(24);
            VscodeSource::Uri(format!("http://{}", self.ctx.random_string(len, false)))
        } else {
            let len = self.ctx.bounded(12);
            VscodeSource::Inlined(self.ctx.random_string(len, false))
        };
    }

    pub(crate) fn random_env(&self) -> Vec<EnvVar> {
        (0..self.ctx.bounded(4))
            .map(|_| EnvVar {
                name: format!("Name_{}", self.ctx.random_string(5, false)),
                value: format!("Value_{}", self.ctx.random_string(5, false)),
            })
            .collect()
    }
}
