use super::ProjectPath;
use crate::interfaces::PathResolver;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A project of the build, as declared by settings evaluation (or synthesised
/// for a single-project build).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredProject {
    pub path: ProjectPath,
    pub name: String,
    pub project_dir: PathBuf,
    pub build_file_name: String,
    /// `project_dir / build_file_name`, canonicalised like `project_dir`.
    pub build_file: PathBuf,
}

impl DeclaredProject {
    /// Both directories are canonicalised so they compare equal to the
    /// paths of an invocation. Missing trailing components are kept.
    pub fn new(
        paths: &dyn PathResolver,
        path: ProjectPath,
        name: impl Into<String>,
        project_dir: PathBuf,
        build_file_name: impl Into<String>,
    ) -> Self {
        let build_file_name = build_file_name.into();
        let project_dir = paths.canonicalize(&project_dir);
        let build_file = paths.canonicalize(&project_dir.join(&build_file_name));
        Self {
            path,
            name: name.into(),
            project_dir,
            build_file_name,
            build_file,
        }
    }

    pub fn is_root(&self) -> bool {
        self.path.is_root()
    }

    /// How the project is named in diagnostics: `root project 'x'` or `project ':a'`.
    pub fn display_name(&self) -> String {
        if self.is_root() {
            format!("root project '{}'", self.name)
        } else {
            format!("project '{}'", self.path)
        }
    }

    pub fn has_project_dir(&self, dir: &Path) -> bool {
        self.project_dir == dir
    }

    pub fn has_build_file(&self, file: &Path) -> bool {
        self.build_file == file
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::DefaultPathResolver;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_build_file_is_normalised() {
        let paths = DefaultPathResolver::new();
        let project = DeclaredProject::new(
            &paths,
            ProjectPath::parse(":child1"),
            "child1",
            PathBuf::from("/work/child1"),
            "../child.star",
        );

        assert_eq!(project.build_file, PathBuf::from("/work/child.star"));
        assert_eq!(project.display_name(), "project ':child1'");
    }

    #[test]
    fn test_root_display_name() {
        let paths = DefaultPathResolver::new();
        let root = DeclaredProject::new(
            &paths,
            ProjectPath::root(),
            "gradle",
            PathBuf::from("/work/gradle"),
            "build.star",
        );
        assert_eq!(root.display_name(), "root project 'gradle'");
        assert!(root.has_build_file(Path::new("/work/gradle/build.star")));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_project_dir_is_resolved() {
        let temp_dir = TempDir::new().unwrap();
        let base = fs::canonicalize(temp_dir.path()).unwrap();
        fs::create_dir(base.join("real")).unwrap();
        std::os::unix::fs::symlink(base.join("real"), base.join("child")).unwrap();

        let paths = DefaultPathResolver::new();
        let project = DeclaredProject::new(
            &paths,
            ProjectPath::parse(":child"),
            "child",
            temp_dir.path().join("child"),
            "build.star",
        );

        assert!(project.has_project_dir(&base.join("real")));
        assert_eq!(project.build_file, base.join("real").join("build.star"));
    }
}
