//! Path resolution interface
//!
//! The resolver only reaches the file system through this trait, apart from
//! reading script and property files.

use std::path::{Ancestors, Path, PathBuf};

/// Trait for path resolution operations
pub trait PathResolver: Send + Sync {
    /// Resolve a possibly relative path against a base directory
    fn resolve_relative(&self, base: &Path, relative: &Path) -> PathBuf {
        if relative.is_absolute() {
            relative.to_path_buf()
        } else {
            base.join(relative)
        }
    }

    /// Remove `.` and `..` components without touching the file system
    fn normalize(&self, path: &Path) -> PathBuf;

    /// Symlink-free absolute form. Paths that do not exist keep their
    /// missing tail, appended to the canonical form of the deepest existing
    /// ancestor.
    fn canonicalize(&self, path: &Path) -> PathBuf;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if a path is a regular file
    fn is_file(&self, path: &Path) -> bool;

    /// Check if a path is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// `path` itself, then each parent up to the file system root
    fn ascendants<'a>(&self, path: &'a Path) -> Ancestors<'a> {
        path.ancestors()
    }

    /// True when `path` lies strictly below `ancestor`
    fn descendant_of(&self, path: &Path, ancestor: &Path) -> bool {
        path != ancestor && path.starts_with(ancestor)
    }
}
