//! Default path resolver implementation
//!
//! Provides standard file system based path resolution.

use crate::interfaces::PathResolver;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Default implementation of PathResolver using std::fs
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultPathResolver;

impl DefaultPathResolver {
    pub fn new() -> Self {
        Self
    }
}

impl PathResolver for DefaultPathResolver {
    fn normalize(&self, path: &Path) -> PathBuf {
        let mut components: Vec<Component> = Vec::new();
        for component in path.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => match components.last() {
                    Some(Component::Normal(_)) => {
                        components.pop();
                    }
                    // `/..` is `/`
                    Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                    _ => components.push(component),
                },
                c => components.push(c),
            }
        }

        components.iter().collect()
    }

    fn canonicalize(&self, path: &Path) -> PathBuf {
        let normalized = self.normalize(path);
        if let Ok(real) = std::fs::canonicalize(&normalized) {
            return real;
        }

        let mut missing: Vec<OsString> = Vec::new();
        let mut existing = normalized.as_path();
        while let Some(parent) = existing.parent() {
            if let Some(name) = existing.file_name() {
                missing.push(name.to_os_string());
            }
            existing = parent;
            if let Ok(mut real) = std::fs::canonicalize(existing) {
                real.extend(missing.iter().rev());
                return real;
            }
        }

        normalized
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_normalize() {
        let paths = DefaultPathResolver::new();
        assert_eq!(
            paths.normalize(Path::new("/work/gradle/../root/./sub")),
            PathBuf::from("/work/root/sub")
        );
        assert_eq!(paths.normalize(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(paths.normalize(Path::new("../a/b/..")), PathBuf::from("../a"));
    }

    #[test]
    fn test_canonicalize_missing_tail() {
        let temp_dir = TempDir::new().unwrap();
        let base = fs::canonicalize(temp_dir.path()).unwrap();
        fs::create_dir(base.join("gradle")).unwrap();

        let paths = DefaultPathResolver::new();
        let resolved = paths.canonicalize(&temp_dir.path().join("gradle/../root/sub"));
        assert_eq!(resolved, base.join("root").join("sub"));
    }

    #[test]
    fn test_ascendants_and_descendants() {
        let paths = DefaultPathResolver::new();
        let all: Vec<&Path> = paths.ascendants(Path::new("/a/b/c")).collect();
        assert_eq!(
            all,
            vec![Path::new("/a/b/c"), Path::new("/a/b"), Path::new("/a"), Path::new("/")]
        );

        assert!(paths.descendant_of(Path::new("/a/b/c"), Path::new("/a")));
        assert!(!paths.descendant_of(Path::new("/a"), Path::new("/a")));
        assert!(!paths.descendant_of(Path::new("/ab"), Path::new("/a")));
    }

    #[test]
    fn test_resolve_relative() {
        let paths = DefaultPathResolver::new();
        assert_eq!(
            paths.resolve_relative(Path::new("/work"), Path::new("child")),
            PathBuf::from("/work/child")
        );
        assert_eq!(
            paths.resolve_relative(Path::new("/work"), Path::new("/other")),
            PathBuf::from("/other")
        );
    }
}
