//! Root and default project resolution
//!
//! Given an [`Invocation`], commits to the settings description, the set of
//! projects and the default project before any build script runs.

pub mod default_project;
pub mod resolved;

pub use default_project::DefaultProjectSpec;
pub use resolved::ResolvedBuild;

use crate::config::Config;
use crate::error::Result;
use crate::interfaces::{PathResolver, SettingsEvaluator};
use crate::invocation::Invocation;
use crate::settings::SettingsLocator;
use std::collections::BTreeMap;
use tracing::{debug, info};

pub struct BuildResolver<'a> {
    paths: &'a dyn PathResolver,
    evaluator: &'a dyn SettingsEvaluator,
    config: &'a Config,
}

impl<'a> BuildResolver<'a> {
    pub fn new(paths: &'a dyn PathResolver, evaluator: &'a dyn SettingsEvaluator, config: &'a Config) -> Self {
        Self {
            paths,
            evaluator,
            config,
        }
    }

    pub fn resolve(&self, invocation: &Invocation) -> Result<ResolvedBuild> {
        debug!("Resolving build for {:?}", invocation);
        DefaultProjectSpec::check_exists(invocation, self.paths)?;

        let spec = DefaultProjectSpec::for_invocation(invocation);
        let located = SettingsLocator::new(self.paths, self.evaluator, self.config).locate(invocation, &spec)?;

        let default_project = spec.select(&located.projects)?;

        let projects: BTreeMap<_, _> = located
            .projects
            .into_iter()
            .map(|project| (project.path.clone(), project))
            .collect();

        let build = ResolvedBuild {
            settings_file: located.settings_file,
            settings_dir: located.settings_dir,
            projects,
            default_project,
        };

        info!(
            "Resolved {} project(s), root {:?}, default project {}",
            build.projects.len(),
            build.root_project().project_dir,
            build.default_project
        );
        Ok(build)
    }
}
