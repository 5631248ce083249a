//! Main runner that coordinates resolution, configuration and planning

use crate::{
    config::Config,
    error::Result,
    interfaces::{BuildEvaluator, PathResolver, SettingsEvaluator},
    invocation::{Invocation, InvocationBuilder},
    resolver::{BuildResolver, ResolvedBuild},
    services::{DefaultPathResolver, StarlarkBuildEvaluator, StarlarkSettingsEvaluator},
    tasks::{ExecutionPlan, TaskGraph, TaskSelectorRouter},
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Everything one run produced, in the order it was produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildOutcome {
    pub build: ResolvedBuild,
    pub graph: TaskGraph,
    pub plan: ExecutionPlan,
}

pub struct BuildRunner {
    paths: Arc<dyn PathResolver>,
    settings_evaluator: Box<dyn SettingsEvaluator>,
    build_evaluator: Box<dyn BuildEvaluator>,
    config: Config,
}

impl BuildRunner {
    /// Runner configured from the nearest config file above the current
    /// directory
    pub fn new() -> Result<Self> {
        let current_dir = std::env::current_dir()?;
        Ok(Self::with_config(Config::load(&current_dir)?))
    }

    pub fn with_config(config: Config) -> Self {
        let paths: Arc<dyn PathResolver> = Arc::new(DefaultPathResolver::new());
        Self {
            settings_evaluator: Box::new(StarlarkSettingsEvaluator::new(paths.clone())),
            build_evaluator: Box::new(StarlarkBuildEvaluator::new()),
            paths,
            config,
        }
    }

    /// Swap in other collaborators, e.g. in-memory fakes
    pub fn with_components(
        config: Config,
        paths: Arc<dyn PathResolver>,
        settings_evaluator: Box<dyn SettingsEvaluator>,
        build_evaluator: Box<dyn BuildEvaluator>,
    ) -> Self {
        Self {
            paths,
            settings_evaluator,
            build_evaluator,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn path_resolver(&self) -> &dyn PathResolver {
        self.paths.as_ref()
    }

    /// Invocation builder carrying this runner's defaults
    pub fn invocation(&self, current_dir: impl Into<PathBuf>) -> InvocationBuilder {
        Invocation::builder(current_dir).search_upwards(self.config.search_upwards)
    }

    pub fn resolve(&self, invocation: &Invocation) -> Result<ResolvedBuild> {
        BuildResolver::new(self.paths.as_ref(), self.settings_evaluator.as_ref(), &self.config).resolve(invocation)
    }

    /// Evaluates the build files of a resolved build
    pub fn configure(&self, build: &ResolvedBuild, invocation: &Invocation) -> Result<TaskGraph> {
        TaskGraph::configure(
            build,
            self.build_evaluator.as_ref(),
            self.paths.as_ref(),
            &self.config.properties_file_name,
            &invocation.extra_arguments,
        )
    }

    /// Resolves, configures and plans the invocation's task selectors.
    /// Nothing is executed; the plan lists what would run, in order.
    pub fn run(&self, invocation: &Invocation) -> Result<BuildOutcome> {
        let build = self.resolve(invocation)?;
        let graph = self.configure(&build, invocation)?;

        let selected = TaskSelectorRouter::new(&build, &graph).route_all(&invocation.task_selectors)?;
        debug!("Selected tasks: {:?}", selected);

        let plan = ExecutionPlan::build(&build, &graph, &selected)?;
        info!("Planned {} task(s)", plan.len());

        Ok(BuildOutcome { build, graph, plan })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_invocation_uses_config_search_default() {
        let runner = BuildRunner::with_config(Config::default());
        let invocation = runner
            .invocation("/work")
            .build(runner.path_resolver())
            .unwrap();
        assert!(invocation.search_upwards);

        let config = Config {
            search_upwards: false,
            ..Config::default()
        };
        let runner = BuildRunner::with_config(config);
        let invocation = runner
            .invocation("/work")
            .build(runner.path_resolver())
            .unwrap();
        assert!(!invocation.search_upwards);
    }

    #[test]
    fn test_run_single_project() {
        let temp_dir = TempDir::new().unwrap();
        let root = fs::canonicalize(temp_dir.path()).unwrap();
        fs::write(root.join("build.star"), "task('hello')\n").unwrap();

        let runner = BuildRunner::with_config(Config::default());
        let invocation = runner
            .invocation(&root)
            .search_upwards(false)
            .task("hello")
            .build(runner.path_resolver())
            .unwrap();
        let outcome = runner.run(&invocation).unwrap();

        assert!(outcome.build.settings_file.is_none());
        assert_eq!(outcome.build.projects.len(), 1);
        assert_eq!(outcome.plan.tasks(), [":hello"]);
    }
}
