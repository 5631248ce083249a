//! Which project unqualified task names run against

use crate::error::ResolutionError;
use crate::interfaces::PathResolver;
use crate::invocation::Invocation;
use crate::types::{DeclaredProject, ProjectPath};
use std::path::{Path, PathBuf};

/// How the invocation identifies its default project. An explicit build file
/// takes precedence over an explicit project directory, which takes
/// precedence over the current directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultProjectSpec {
    BuildFile(PathBuf),
    ProjectDir(PathBuf),
    CurrentDir(PathBuf),
}

impl DefaultProjectSpec {
    pub fn for_invocation(invocation: &Invocation) -> Self {
        if let Some(file) = &invocation.explicit_build_file {
            DefaultProjectSpec::BuildFile(file.clone())
        } else if let Some(dir) = &invocation.explicit_project_dir {
            DefaultProjectSpec::ProjectDir(dir.clone())
        } else {
            DefaultProjectSpec::CurrentDir(invocation.current_dir.clone())
        }
    }

    /// An explicit build file must be a file; an explicit project directory
    /// must be a directory.
    pub fn check_exists(invocation: &Invocation, paths: &dyn PathResolver) -> Result<(), ResolutionError> {
        if let Some(file) = &invocation.explicit_build_file {
            if !paths.exists(file) {
                return Err(ResolutionError::BuildFileMissing(file.clone()));
            }
            if !paths.is_file(file) {
                return Err(ResolutionError::BuildFileNotAFile(file.clone()));
            }
        }
        if let Some(dir) = &invocation.explicit_project_dir {
            if !paths.exists(dir) {
                return Err(ResolutionError::ProjectDirMissing(dir.clone()));
            }
            if !paths.is_dir(dir) {
                return Err(ResolutionError::ProjectDirNotADirectory(dir.clone()));
            }
        }
        Ok(())
    }

    fn matches(&self, project: &DeclaredProject) -> bool {
        match self {
            DefaultProjectSpec::BuildFile(file) => project.has_build_file(file),
            DefaultProjectSpec::ProjectDir(dir) | DefaultProjectSpec::CurrentDir(dir) => {
                project.has_project_dir(dir)
            }
        }
    }

    pub fn matching<'p>(&self, projects: impl IntoIterator<Item = &'p DeclaredProject>) -> Vec<&'p DeclaredProject> {
        projects.into_iter().filter(|p| self.matches(p)).collect()
    }

    /// Whether a settings file found during discovery applies to this
    /// invocation: some project matches, or the invocation runs from the
    /// settings directory itself.
    pub fn meets_criteria<'p>(
        &self,
        projects: impl IntoIterator<Item = &'p DeclaredProject>,
        settings_dir: &Path,
    ) -> bool {
        if !self.matching(projects).is_empty() {
            return true;
        }
        matches!(self, DefaultProjectSpec::CurrentDir(dir) if dir == settings_dir)
    }

    /// The unique matching project. Sharing a directory or build file is
    /// legal for declared projects but never for the default project.
    pub fn select<'p>(
        &self,
        projects: impl IntoIterator<Item = &'p DeclaredProject>,
    ) -> Result<ProjectPath, ResolutionError> {
        let found = self.matching(projects);
        let names = || found.iter().map(|p| p.display_name()).collect::<Vec<_>>();

        match (found.as_slice(), self) {
            ([single], _) => Ok(single.path.clone()),
            ([], DefaultProjectSpec::BuildFile(file)) => Err(ResolutionError::NoProjectForBuildFile(file.clone())),
            ([], DefaultProjectSpec::ProjectDir(dir)) => Err(ResolutionError::NoProjectForProjectDir(dir.clone())),
            ([], DefaultProjectSpec::CurrentDir(_)) => Ok(ProjectPath::root()),
            (_, DefaultProjectSpec::BuildFile(file)) => Err(ResolutionError::MultipleProjectsForBuildFile {
                file: file.clone(),
                projects: names(),
            }),
            (_, DefaultProjectSpec::ProjectDir(dir) | DefaultProjectSpec::CurrentDir(dir)) => {
                Err(ResolutionError::MultipleProjectsForProjectDir {
                    dir: dir.clone(),
                    projects: names(),
                })
            }
        }
    }
}
