use std::collections::{BTreeMap, BTreeSet};

use devfile_schema::{CommandKind, Devfile, GitLikeSource, Identified};

/// Validates a decoded devfile for semantic correctness.
pub struct DevfileValidator;

/// A validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    MissingField,
    DuplicateIdentity,
    UnknownComponent,
    UnknownCommand,
    MultipleDefaults,
    InvalidCheckout,
    DuplicateEndpoint,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

fn error(kind: ValidationErrorKind, message: String) -> ValidationError {
    ValidationError { kind, message }
}

impl DevfileValidator {
    /// Validate a devfile. Returns a list of all errors found.
    pub fn validate(devfile: &Devfile) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if devfile.schema_version.trim().is_empty() {
            errors.push(error(
                ValidationErrorKind::MissingField,
                "schemaVersion is empty".into(),
            ));
        }

        check_unique(&devfile.commands, &mut errors);
        check_unique(&devfile.components, &mut errors);
        check_unique(&devfile.projects, &mut errors);
        check_unique(&devfile.starter_projects, &mut errors);

        Self::check_commands(devfile, &mut errors);
        Self::check_endpoints(devfile, &mut errors);

        for project in &devfile.projects {
            if let Some(git) = project.source.git_like() {
                check_git(&format!("project {}", project.name), git, &mut errors);
            }
        }
        for project in &devfile.starter_projects {
            if let Some(git) = project.source.git_like() {
                check_git(&format!("starter project {}", project.name), git, &mut errors);
            }
        }

        if let Some(events) = &devfile.events {
            for (event, ids) in events.lists() {
                for id in ids {
                    if devfile.command(id).is_none() {
                        errors.push(error(
                            ValidationErrorKind::UnknownCommand,
                            format!("{event} event references unknown command {id}"),
                        ));
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn check_commands(devfile: &Devfile, errors: &mut Vec<ValidationError>) {
        let mut defaults: BTreeMap<_, Vec<&str>> = BTreeMap::new();

        for command in &devfile.commands {
            let id = &command.id;
            match &command.kind {
                CommandKind::Exec(exec) => match devfile.component(&exec.component) {
                    Some(c) if c.container().is_some() => {}
                    Some(_) => errors.push(error(
                        ValidationErrorKind::UnknownComponent,
                        format!("exec command {id} must reference a container component, {} is not one", exec.component),
                    )),
                    None => errors.push(error(
                        ValidationErrorKind::UnknownComponent,
                        format!("exec command {id} references unknown component {}", exec.component),
                    )),
                },
                CommandKind::Apply(apply) => {
                    if devfile.component(&apply.component).is_none() {
                        errors.push(error(
                            ValidationErrorKind::UnknownComponent,
                            format!("apply command {id} references unknown component {}", apply.component),
                        ));
                    }
                }
                CommandKind::Composite(composite) => {
                    for child in &composite.commands {
                        if child == id {
                            errors.push(error(
                                ValidationErrorKind::UnknownCommand,
                                format!("composite command {id} references itself"),
                            ));
                        } else if devfile.command(child).is_none() {
                            errors.push(error(
                                ValidationErrorKind::UnknownCommand,
                                format!("composite command {id} references unknown command {child}"),
                            ));
                        }
                    }
                }
                CommandKind::VscodeTask(_) | CommandKind::VscodeLaunch(_) => {}
            }

            if let Some(group) = command.group() {
                if group.is_default {
                    defaults.entry(group.kind).or_default().push(id);
                }
            }
        }

        for (kind, ids) in defaults {
            if ids.len() > 1 {
                errors.push(error(
                    ValidationErrorKind::MultipleDefaults,
                    format!("command group {kind} has more than one default command: {}", ids.join(", ")),
                ));
            }
        }
    }

    fn check_endpoints(devfile: &Devfile, errors: &mut Vec<ValidationError>) {
        let mut names = BTreeSet::new();
        let mut ports = BTreeMap::new();
        for component in &devfile.components {
            let Some(container) = component.container() else {
                continue;
            };
            for endpoint in &container.endpoints {
                if !names.insert(endpoint.name.as_str()) {
                    errors.push(error(
                        ValidationErrorKind::DuplicateEndpoint,
                        format!("endpoint name {} is used more than once", endpoint.name),
                    ));
                }
                if let Some(owner) = ports.insert(endpoint.target_port, component.name.as_str()) {
                    errors.push(error(
                        ValidationErrorKind::DuplicateEndpoint,
                        format!(
                            "target port {} of component {} is already used by component {owner}",
                            endpoint.target_port, component.name
                        ),
                    ));
                }
            }
        }
    }
}

fn check_unique<T: Identified>(items: &[T], errors: &mut Vec<ValidationError>) {
    let mut seen = BTreeSet::new();
    for item in items {
        if !seen.insert(item.identity()) {
            errors.push(error(
                ValidationErrorKind::DuplicateIdentity,
                format!("duplicate key: {} {}", T::KIND, item.identity()),
            ));
        }
    }
}

fn check_git(owner: &str, git: &GitLikeSource, errors: &mut Vec<ValidationError>) {
    if git.remotes.is_empty() {
        errors.push(error(
            ValidationErrorKind::MissingField,
            format!("{owner} has no remotes"),
        ));
        return;
    }
    match git.checkout_from.as_ref().and_then(|c| c.remote.as_ref()) {
        Some(remote) if !git.remotes.contains_key(remote) => errors.push(error(
            ValidationErrorKind::InvalidCheckout,
            format!("{owner} checkoutFrom remote {remote} does not exist"),
        )),
        Some(_) => {}
        None if git.remotes.len() > 1 => errors.push(error(
            ValidationErrorKind::InvalidCheckout,
            format!("{owner} has multiple remotes but no checkoutFrom remote"),
        )),
        None => {}
    }
}
