use std::collections::BTreeMap;

use devfile_schema::{
    CheckoutFrom, GitLikeSource, Project, ProjectSource, ProjectSourceType, SchemaWriter,
    StarterProject, ZipSource,
};

use crate::context::GenContext;
use crate::store::TestDevfile;

/// Swap in a new remote set and re-derive `checkout_from` from it.
///
/// A checkout is kept whenever one existed before and is required once there
/// is more than one remote. Its remote is always a key of the new set; the
/// old revision survives the swap.
pub fn replace_remotes(source: &mut GitLikeSource, remotes: BTreeMap<String, String>, ctx: &GenContext) {
    let previous = source.checkout_from.take();
    source.remotes = remotes;
    if source.remotes.is_empty() || (previous.is_none() && source.remotes.len() < 2) {
        return;
    }
    let keys: Vec<&String> = source.remotes.keys().collect();
    let remote = ctx.pick(&keys).map(|k| k.to_string());
    let revision = previous
        .and_then(|p| p.revision)
        .unwrap_or_else(|| ctx.random_string(8, false));
    source.checkout_from = Some(CheckoutFrom {
        remote,
        revision: Some(revision),
    });
}

fn random_remotes(ctx: &GenContext) -> BTreeMap<String, String> {
    (0..ctx.bounded(5))
        .map(|_| {
            let len = ctx.bounded(12);
            let key = ctx.unique_string(len, true);
            let len = ctx.bounded(24);
            let url = format!("https://{}.git", ctx.random_string(len, true));
            (key, url)
        })
        .collect()
}

impl<W: SchemaWriter> TestDevfile<W> {
    pub(crate) fn build_project(&mut self, source_type: ProjectSourceType) -> Project {
        let len = self.ctx.bounded(59);
        let mut project = Project {
            name: self.ctx.unique_string(len, true),
            clone_path: None,
            sparse_checkout_dirs: Vec::new(),
            source: self.build_source(source_type),
        };
        self.roll_project(&mut project);
        project
    }

    pub(crate) fn build_starter_project(&mut self, source_type: ProjectSourceType) -> StarterProject {
        let len = self.ctx.bounded(59);
        let mut project = StarterProject {
            name: self.ctx.unique_string(len, true),
            description: None,
            sub_dir: None,
            source: self.build_source(source_type),
        };
        self.roll_starter_project(&mut project);
        project
    }

    fn build_source(&self, source_type: ProjectSourceType) -> ProjectSource {
        match source_type {
            ProjectSourceType::Git => ProjectSource::Git(GitLikeSource::default()),
            ProjectSourceType::Github => ProjectSource::Github(GitLikeSource::default()),
            ProjectSourceType::Zip => ProjectSource::Zip(ZipSource::default()),
        }
    }

    pub(crate) fn roll_project(&mut self, project: &mut Project) {
        let ctx = &self.ctx;
        project.clone_path = ctx.binary().then(|| {
            let len = ctx.bounded(12);
            format!("./{}", ctx.random_string(len, false))
        });
        project.sparse_checkout_dirs = if ctx.binary() {
            (0..ctx.bounded(6)).map(|_| ctx.random_string(8, false)).collect()
        } else {
            Vec::new()
        };
        self.roll_source(&mut project.source);
    }

    pub(crate) fn roll_starter_project(&mut self, project: &mut StarterProject) {
        let ctx = &self.ctx;
        project.description = ctx.binary().then(|| {
            (0..ctx.bounded(6))
                .map(|_| {
                    let len = ctx.bounded(8);
                    ctx.random_string(len, false)
                })
                .collect::<Vec<_>>()
                .join(" ")
        });
        project.sub_dir = ctx.binary().then(|| ctx.random_string(12, false));
        self.roll_source(&mut project.source);
    }

    /// Re-rolls the source body; the variant never changes.
    pub(crate) fn roll_source(&self, source: &mut ProjectSource) {
        let ctx = &self.ctx;
        match source {
            ProjectSource::Git(git) | ProjectSource::Github(git) => {
                replace_remotes(git, random_remotes(ctx), ctx);
                if git.checkout_from.is_none() && ctx.binary() {
                    git.checkout_from = Some(CheckoutFrom {
                        remote: git.remotes.keys().next().cloned(),
                        revision: Some(ctx.random_string(8, false)),
                    });
                }
            }
            ProjectSource::Zip(zip) => {
                zip.location = Some(ctx.random_string(12, false));
            }
        }
    }
}
