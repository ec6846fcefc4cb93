use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{exactly_one, EntityKind, Identified};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckoutFrom {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

/// Git and GitHub sources share this shape.
///
/// When `checkout_from.remote` is set it must name a key of `remotes`, and
/// with more than one remote `checkout_from` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GitLikeSource {
    #[serde(default)]
    pub remotes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_from: Option<CheckoutFrom>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZipSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectSource {
    Git(GitLikeSource),
    Github(GitLikeSource),
    Zip(ZipSource),
}

impl ProjectSource {
    pub fn source_type(&self) -> ProjectSourceType {
        match self {
            ProjectSource::Git(_) => ProjectSourceType::Git,
            ProjectSource::Github(_) => ProjectSourceType::Github,
            ProjectSource::Zip(_) => ProjectSourceType::Zip,
        }
    }

    pub fn git_like(&self) -> Option<&GitLikeSource> {
        match self {
            ProjectSource::Git(g) | ProjectSource::Github(g) => Some(g),
            ProjectSource::Zip(_) => None,
        }
    }

    fn split(self) -> (Option<GitLikeSource>, Option<GitLikeSource>, Option<ZipSource>) {
        match self {
            ProjectSource::Git(g) => (Some(g), None, None),
            ProjectSource::Github(g) => (None, Some(g), None),
            ProjectSource::Zip(z) => (None, None, Some(z)),
        }
    }

    fn join(
        owner: &str,
        git: Option<GitLikeSource>,
        github: Option<GitLikeSource>,
        zip: Option<ZipSource>,
    ) -> Result<Self, String> {
        exactly_one(
            owner,
            &["git", "github", "zip"],
            [
                git.map(ProjectSource::Git),
                github.map(ProjectSource::Github),
                zip.map(ProjectSource::Zip),
            ],
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectSourceType {
    Git,
    Github,
    Zip,
}

impl ProjectSourceType {
    pub const ALL: [ProjectSourceType; 3] = [
        ProjectSourceType::Git,
        ProjectSourceType::Github,
        ProjectSourceType::Zip,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectSourceType::Git => "git",
            ProjectSourceType::Github => "github",
            ProjectSourceType::Zip => "zip",
        }
    }
}

impl fmt::Display for ProjectSourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectSourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectSourceType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown project source type: {s}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProjectWire", into = "ProjectWire")]
pub struct Project {
    pub name: String,
    pub clone_path: Option<String>,
    pub sparse_checkout_dirs: Vec<String>,
    pub source: ProjectSource,
}

impl Identified for Project {
    const KIND: EntityKind = EntityKind::Project;

    fn identity(&self) -> &str {
        &self.name
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ProjectWire {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    clone_path: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    sparse_checkout_dirs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    git: Option<GitLikeSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    github: Option<GitLikeSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    zip: Option<ZipSource>,
}

impl TryFrom<ProjectWire> for Project {
    type Error = String;

    fn try_from(wire: ProjectWire) -> Result<Self, Self::Error> {
        let source = ProjectSource::join(
            &format!("project {}", wire.name),
            wire.git,
            wire.github,
            wire.zip,
        )?;
        Ok(Project {
            name: wire.name,
            clone_path: wire.clone_path,
            sparse_checkout_dirs: wire.sparse_checkout_dirs,
            source,
        })
    }
}

impl From<Project> for ProjectWire {
    fn from(project: Project) -> Self {
        let (git, github, zip) = project.source.split();
        ProjectWire {
            name: project.name,
            clone_path: project.clone_path,
            sparse_checkout_dirs: project.sparse_checkout_dirs,
            git,
            github,
            zip,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StarterProjectWire", into = "StarterProjectWire")]
pub struct StarterProject {
    pub name: String,
    pub description: Option<String>,
    pub sub_dir: Option<String>,
    pub source: ProjectSource,
}

impl Identified for StarterProject {
    const KIND: EntityKind = EntityKind::StarterProject;

    fn identity(&self) -> &str {
        &self.name
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct StarterProjectWire {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    git: Option<GitLikeSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    github: Option<GitLikeSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    zip: Option<ZipSource>,
}

impl TryFrom<StarterProjectWire> for StarterProject {
    type Error = String;

    fn try_from(wire: StarterProjectWire) -> Result<Self, Self::Error> {
        let source = ProjectSource::join(
            &format!("starter project {}", wire.name),
            wire.git,
            wire.github,
            wire.zip,
        )?;
        Ok(StarterProject {
            name: wire.name,
            description: wire.description,
            sub_dir: wire.sub_dir,
            source,
        })
    }
}

impl From<StarterProject> for StarterProjectWire {
    fn from(project: StarterProject) -> Self {
        let (git, github, zip) = project.source.split();
        StarterProjectWire {
            name: project.name,
            description: project.description,
            sub_dir: project.sub_dir,
            git,
            github,
            zip,
        }
    }
}
