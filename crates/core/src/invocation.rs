//! Normalised description of one run of the tool

use crate::error::{ResolutionError, Result};
use crate::interfaces::PathResolver;
use crate::types::project_path::SEPARATOR;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Every path is absolute and canonical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub current_dir: PathBuf,
    pub explicit_project_dir: Option<PathBuf>,
    pub explicit_build_file: Option<PathBuf>,
    pub explicit_settings_file: Option<PathBuf>,
    pub search_upwards: bool,
    pub task_selectors: Vec<String>,
    /// Forwarded to build evaluation as the highest-priority properties
    pub extra_arguments: BTreeMap<String, String>,
}

impl Invocation {
    pub fn builder(current_dir: impl Into<PathBuf>) -> InvocationBuilder {
        InvocationBuilder::new(current_dir)
    }

    /// Directory the settings search starts from
    pub fn start_dir(&self) -> &Path {
        if let Some(dir) = &self.explicit_project_dir {
            return dir;
        }
        if let Some(parent) = self.explicit_build_file.as_deref().and_then(Path::parent) {
            return parent;
        }
        &self.current_dir
    }
}

/// True when a selector names its project explicitly (`:a:task`)
pub fn is_qualified(selector: &str) -> bool {
    selector.starts_with(SEPARATOR)
}

/// Raw inputs as given on the command line or through the API
#[derive(Debug, Clone)]
pub struct InvocationBuilder {
    current_dir: PathBuf,
    project_dir: Option<PathBuf>,
    build_file: Option<PathBuf>,
    settings_file: Option<PathBuf>,
    search_upwards: bool,
    task_selectors: Vec<String>,
    extra_arguments: BTreeMap<String, String>,
}

impl InvocationBuilder {
    pub fn new(current_dir: impl Into<PathBuf>) -> Self {
        Self {
            current_dir: current_dir.into(),
            project_dir: None,
            build_file: None,
            settings_file: None,
            search_upwards: false,
            task_selectors: Vec::new(),
            extra_arguments: BTreeMap::new(),
        }
    }

    pub fn project_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.project_dir = Some(dir.into());
        self
    }

    pub fn build_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.build_file = Some(file.into());
        self
    }

    pub fn settings_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.settings_file = Some(file.into());
        self
    }

    pub fn search_upwards(mut self, enabled: bool) -> Self {
        self.search_upwards = enabled;
        self
    }

    pub fn task(mut self, selector: impl Into<String>) -> Self {
        self.task_selectors.push(selector.into());
        self
    }

    pub fn tasks<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.task_selectors
            .extend(selectors.into_iter().map(Into::into));
        self
    }

    pub fn extra_argument(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_arguments.insert(key.into(), value.into());
        self
    }

    /// Resolve every path to canonical absolute form.
    ///
    /// A relative build file given together with a project directory is
    /// resolved against that directory, and must lie inside it.
    pub fn build(self, paths: &dyn PathResolver) -> Result<Invocation> {
        let current_dir = paths.canonicalize(&self.current_dir);
        let absolute = |p: &Path, base: &Path| paths.canonicalize(&paths.resolve_relative(base, p));

        let explicit_project_dir = self.project_dir.as_deref().map(|p| absolute(p, current_dir.as_path()));
        let build_base = explicit_project_dir.as_deref().unwrap_or(current_dir.as_path());
        let explicit_build_file = self.build_file.as_deref().map(|p| absolute(p, build_base));
        let explicit_settings_file = self.settings_file.as_deref().map(|p| absolute(p, current_dir.as_path()));

        if let (Some(dir), Some(file)) = (&explicit_project_dir, &explicit_build_file) {
            if !paths.descendant_of(file, dir) {
                return Err(ResolutionError::InvalidInvocation {
                    build_file: file.clone(),
                    project_dir: dir.clone(),
                }
                .into());
            }
        }

        Ok(Invocation {
            current_dir,
            explicit_project_dir,
            explicit_build_file,
            explicit_settings_file,
            search_upwards: self.search_upwards,
            task_selectors: self.task_selectors,
            extra_arguments: self.extra_arguments,
        })
    }
}
