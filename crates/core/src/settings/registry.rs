//! Project descriptors while settings are being evaluated

use crate::interfaces::PathResolver;
use crate::types::project_path::SEPARATOR;
use crate::types::{DeclaredProject, ProjectPath};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Mutable view of one project during settings evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    pub path: ProjectPath,
    pub name: String,
    pub project_dir: PathBuf,
    pub build_file_name: String,
}

/// Projects declared so far. Always contains the root project.
#[derive(Debug, Clone)]
pub struct ProjectRegistry {
    settings_dir: PathBuf,
    default_build_file_name: String,
    descriptors: BTreeMap<ProjectPath, ProjectDescriptor>,
}

impl ProjectRegistry {
    /// The root project starts out in the settings directory, named after it
    pub fn new(settings_dir: &Path, default_build_file_name: &str) -> Self {
        let root = ProjectDescriptor {
            path: ProjectPath::root(),
            name: default_root_name(settings_dir),
            project_dir: settings_dir.to_path_buf(),
            build_file_name: default_build_file_name.to_string(),
        };
        Self {
            settings_dir: settings_dir.to_path_buf(),
            default_build_file_name: default_build_file_name.to_string(),
            descriptors: BTreeMap::from([(ProjectPath::root(), root)]),
        }
    }

    pub fn settings_dir(&self) -> &Path {
        &self.settings_dir
    }

    /// Declare `path` and each missing ancestor. `a:b` lives in `settings_dir/a/b`.
    pub fn include(&mut self, path: &str) -> ProjectPath {
        let path = ProjectPath::parse(path);
        for ancestor in path.ancestors().into_iter().chain(std::iter::once(path.clone())) {
            if self.descriptors.contains_key(&ancestor) {
                continue;
            }
            let project_dir = ancestor
                .segments()
                .iter()
                .fold(self.settings_dir.clone(), |dir, segment| dir.join(segment));
            self.insert(ancestor, project_dir);
        }
        path
    }

    /// Declare a direct child of the root that lives next to the settings directory.
    /// `name` is a single project name, so it may not contain `:`.
    pub fn include_flat(&mut self, name: &str) -> Result<ProjectPath, String> {
        if name.is_empty() || name.contains(SEPARATOR) {
            return Err(format!("Project name '{name}' must be a single name without '{SEPARATOR}'."));
        }
        let path = ProjectPath::root().child(name);
        if !self.descriptors.contains_key(&path) {
            let project_dir = self.settings_dir.join("..").join(name);
            self.insert(path.clone(), project_dir);
        }
        Ok(path)
    }

    fn insert(&mut self, path: ProjectPath, project_dir: PathBuf) {
        let descriptor = ProjectDescriptor {
            name: path.name().unwrap_or_default().to_string(),
            path: path.clone(),
            project_dir,
            build_file_name: self.default_build_file_name.clone(),
        };
        self.descriptors.insert(path, descriptor);
    }

    pub fn get(&self, path: &ProjectPath) -> Option<&ProjectDescriptor> {
        self.descriptors.get(path)
    }

    pub fn get_mut(&mut self, path: &ProjectPath) -> Option<&mut ProjectDescriptor> {
        self.descriptors.get_mut(path)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Finish evaluation: derive normalised directories and build files
    pub fn freeze(self, paths: &dyn PathResolver) -> Vec<DeclaredProject> {
        self.descriptors
            .into_values()
            .map(|d| DeclaredProject::new(paths, d.path, d.name, d.project_dir, d.build_file_name))
            .collect()
    }
}

pub fn default_root_name(dir: &Path) -> String {
    dir.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("root")
        .to_string()
}
