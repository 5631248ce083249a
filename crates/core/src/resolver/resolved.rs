use crate::types::{DeclaredProject, ProjectPath};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// The outcome of project location: immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedBuild {
    /// `None` when the build runs without a settings description
    pub settings_file: Option<PathBuf>,
    pub settings_dir: PathBuf,
    pub projects: BTreeMap<ProjectPath, DeclaredProject>,
    pub default_project: ProjectPath,
}

impl ResolvedBuild {
    pub fn root_project(&self) -> &DeclaredProject {
        // The locator always supplies a root
        &self.projects[&ProjectPath::root()]
    }

    pub fn default_project(&self) -> &DeclaredProject {
        &self.projects[&self.default_project]
    }

    pub fn project(&self, path: &ProjectPath) -> Option<&DeclaredProject> {
        self.projects.get(path)
    }

    /// `path` itself followed by all its transitive descendants, in path order
    pub fn project_and_descendants<'a>(&'a self, path: &'a ProjectPath) -> impl Iterator<Item = &'a DeclaredProject> + 'a {
        self.projects
            .values()
            .filter(move |p| &p.path == path || p.path.is_descendant_of(path))
    }
}
