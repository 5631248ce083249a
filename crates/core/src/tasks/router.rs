//! Maps command-line task selectors onto tasks of the configured build

use crate::error::ResolutionError;
use crate::invocation::is_qualified;
use crate::resolver::ResolvedBuild;
use crate::types::project_path::SEPARATOR;
use crate::types::ProjectPath;
use tracing::debug;

use super::graph::TaskGraph;

pub struct TaskSelectorRouter<'a> {
    build: &'a ResolvedBuild,
    graph: &'a TaskGraph,
}

impl<'a> TaskSelectorRouter<'a> {
    pub fn new(build: &'a ResolvedBuild, graph: &'a TaskGraph) -> Self {
        Self { build, graph }
    }

    /// Routes every selector, keeping the order of first appearance.
    pub fn route_all<S: AsRef<str>>(&self, selectors: &[S]) -> Result<Vec<String>, ResolutionError> {
        let mut selected: Vec<String> = Vec::new();
        for selector in selectors {
            for task in self.route(selector.as_ref())? {
                if !selected.contains(&task) {
                    selected.push(task);
                }
            }
        }
        Ok(selected)
    }

    /// A qualified selector (`:a:task`) names exactly one task. A bare name
    /// selects that task in the default project and every descendant that
    /// has it. A relative selector (`a:task`) is resolved against the
    /// default project.
    pub fn route(&self, selector: &str) -> Result<Vec<String>, ResolutionError> {
        let default = self.build.default_project();

        let Some((project_part, name)) = selector.rsplit_once(SEPARATOR) else {
            let matched: Vec<String> = self
                .build
                .project_and_descendants(&default.path)
                .filter_map(|project| self.graph.find(&project.path, selector))
                .map(|task| task.path())
                .collect();
            debug!("Selector '{}' matched {:?}", selector, matched);
            if matched.is_empty() {
                return Err(ResolutionError::TaskNotFound {
                    task: selector.to_string(),
                    owner: default.display_name(),
                });
            }
            return Ok(matched);
        };

        let (base, owner) = if is_qualified(selector) {
            (ProjectPath::root(), self.build.root_project())
        } else {
            (default.path.clone(), default)
        };
        let target = project_part
            .split(SEPARATOR)
            .filter(|s| !s.is_empty())
            .fold(base, |path, segment| path.child(segment));

        let Some(project) = self.build.project(&target) else {
            return Err(ResolutionError::ProjectNotFound {
                project: target.to_string(),
                owner: owner.display_name(),
            });
        };

        match self.graph.find(&project.path, name) {
            Some(task) => Ok(vec![task.path()]),
            None => Err(ResolutionError::TaskNotFound {
                task: name.to_string(),
                owner: project.display_name(),
            }),
        }
    }
}
