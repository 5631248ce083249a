//! Finds the settings description that governs an invocation

use crate::config::Config;
use crate::error::{ResolutionError, Result};
use crate::interfaces::{PathResolver, SettingsEvaluator, SettingsRequest};
use crate::invocation::Invocation;
use crate::resolver::DefaultProjectSpec;
use crate::types::{DeclaredProject, ProjectPath};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::registry::default_root_name;

/// A settings description together with the projects it declares.
/// `settings_file` is `None` for a synthesised single-project build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedSettings {
    pub settings_file: Option<PathBuf>,
    pub settings_dir: PathBuf,
    pub projects: Vec<DeclaredProject>,
}

pub struct SettingsLocator<'a> {
    paths: &'a dyn PathResolver,
    evaluator: &'a dyn SettingsEvaluator,
    config: &'a Config,
}

impl<'a> SettingsLocator<'a> {
    pub fn new(paths: &'a dyn PathResolver, evaluator: &'a dyn SettingsEvaluator, config: &'a Config) -> Self {
        Self {
            paths,
            evaluator,
            config,
        }
    }

    /// An explicit settings file is used as-is. Otherwise the start directory
    /// and, when searching upwards, each ancestor is tried in turn; a
    /// settings file only counts if its build meets the default project
    /// criteria. Without one, the start directory becomes a single-project
    /// build.
    pub fn locate(&self, invocation: &Invocation, spec: &DefaultProjectSpec) -> Result<LocatedSettings> {
        if let Some(file) = &invocation.explicit_settings_file {
            self.check_explicit(file)?;
            info!("Using settings file {:?}", file);
            return self.load(file);
        }

        let start = invocation.start_dir();
        let depth = if invocation.search_upwards { usize::MAX } else { 1 };
        for dir in self.paths.ascendants(start).take(depth) {
            let candidate = dir.join(&self.config.settings_file_name);
            if !self.paths.is_file(&candidate) {
                continue;
            }

            let located = self.load(&candidate)?;
            if spec.meets_criteria(&located.projects, &located.settings_dir) {
                info!("Using settings file {:?}", candidate);
                return Ok(located);
            }
            if dir == start {
                warn!(
                    "Ignoring settings file {:?}: no project of that build lives in {:?}",
                    candidate, start
                );
            } else {
                debug!(
                    "Settings file {:?} does not meet default project criteria, skipping",
                    candidate
                );
            }
        }

        debug!("No settings file applies, {:?} is a single-project build", start);
        Ok(self.single_project(invocation))
    }

    fn check_explicit(&self, file: &Path) -> Result<()> {
        if !self.paths.exists(file) {
            return Err(ResolutionError::SettingsFileMissing(file.to_path_buf()).into());
        }
        if !self.paths.is_file(file) {
            return Err(ResolutionError::SettingsFileNotAFile(file.to_path_buf()).into());
        }
        Ok(())
    }

    fn load(&self, settings_file: &Path) -> Result<LocatedSettings> {
        let settings_dir = settings_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| settings_file.to_path_buf());

        let mut projects = self.evaluator.evaluate_settings(&SettingsRequest {
            settings_file,
            settings_dir: &settings_dir,
            build_file_name: &self.config.build_file_name,
        })?;

        if !projects.iter().any(DeclaredProject::is_root) {
            projects.insert(
                0,
                DeclaredProject::new(
                    self.paths,
                    ProjectPath::root(),
                    default_root_name(&settings_dir),
                    settings_dir.clone(),
                    self.config.build_file_name.clone(),
                ),
            );
        }

        Ok(LocatedSettings {
            settings_file: Some(settings_file.to_path_buf()),
            settings_dir,
            projects,
        })
    }

    /// One root project in the start directory. An explicit build file is
    /// the root's build file.
    pub fn single_project(&self, invocation: &Invocation) -> LocatedSettings {
        let start = invocation.start_dir().to_path_buf();
        let build_file_name = match &invocation.explicit_build_file {
            Some(file) => file
                .strip_prefix(&start)
                .map(|relative| relative.to_string_lossy().into_owned())
                .unwrap_or_else(|_| {
                    file.file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| self.config.build_file_name.clone())
                }),
            None => self.config.build_file_name.clone(),
        };

        let root = DeclaredProject::new(
            self.paths,
            ProjectPath::root(),
            default_root_name(&start),
            start.clone(),
            build_file_name,
        );

        LocatedSettings {
            settings_file: None,
            settings_dir: start,
            projects: vec![root],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::services::DefaultPathResolver;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    /// Declares one child per line of the settings file, in that directory
    struct LineEvaluator {
        evaluated: RefCell<Vec<PathBuf>>,
    }

    impl SettingsEvaluator for LineEvaluator {
        fn evaluate_settings(&self, request: &SettingsRequest<'_>) -> Result<Vec<DeclaredProject>> {
            self.evaluated.borrow_mut().push(request.settings_file.to_path_buf());
            let content = fs::read_to_string(request.settings_file)?;
            let paths = DefaultPathResolver::new();
            Ok(content
                .lines()
                .filter(|l| !l.trim().is_empty())
                .map(|name| {
                    DeclaredProject::new(
                        &paths,
                        ProjectPath::root().child(name.trim()),
                        name.trim(),
                        request.settings_dir.join(name.trim()),
                        request.build_file_name,
                    )
                })
                .collect())
        }
    }

    fn fixture() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let base = fs::canonicalize(temp_dir.path()).unwrap();
        (temp_dir, base)
    }

    fn locate(invocation: &Invocation) -> (Result<LocatedSettings>, Vec<PathBuf>) {
        let paths = DefaultPathResolver::new();
        let evaluator = LineEvaluator {
            evaluated: RefCell::new(Vec::new()),
        };
        let config = Config::default();
        let locator = SettingsLocator::new(&paths, &evaluator, &config);
        let spec = DefaultProjectSpec::for_invocation(invocation);
        let result = locator.locate(invocation, &spec);
        (result, evaluator.evaluated.into_inner())
    }

    #[test]
    fn test_missing_root_is_synthesised() {
        let (_temp, base) = fixture();
        fs::write(base.join("settings.star"), "child\n").unwrap();
        let invocation = Invocation::builder(&base).build(&DefaultPathResolver::new()).unwrap();

        let (result, _) = locate(&invocation);
        let located = result.unwrap();
        assert_eq!(located.projects.len(), 2);
        assert!(located.projects[0].is_root());
        assert_eq!(located.projects[0].project_dir, base);
    }

    #[test]
    fn test_ancestor_that_does_not_claim_start_dir_is_skipped() {
        let (_temp, base) = fixture();
        let sub = base.join("subdirectory");
        fs::create_dir(&sub).unwrap();
        fs::write(base.join("settings.star"), "another\n").unwrap();

        let invocation = Invocation::builder(&sub)
            .search_upwards(true)
            .build(&DefaultPathResolver::new())
            .unwrap();
        let (result, evaluated) = locate(&invocation);
        let located = result.unwrap();

        assert_eq!(evaluated, vec![base.join("settings.star")]);
        assert_eq!(located.settings_file, None);
        assert_eq!(located.settings_dir, sub);
        assert_eq!(located.projects.len(), 1);
    }

    #[test]
    fn test_nearest_matching_ancestor_wins() {
        let (_temp, base) = fixture();
        let middle = base.join("middle");
        let leaf = middle.join("leaf");
        fs::create_dir_all(&leaf).unwrap();
        fs::write(middle.join("settings.star"), "other\n").unwrap();
        fs::write(base.join("settings.star"), "middle/leaf\n").unwrap();

        let invocation = Invocation::builder(&leaf)
            .search_upwards(true)
            .build(&DefaultPathResolver::new())
            .unwrap();
        let (result, evaluated) = locate(&invocation);

        assert_eq!(result.unwrap().settings_file, Some(base.join("settings.star")));
        assert_eq!(evaluated, vec![middle.join("settings.star"), base.join("settings.star")]);
    }

    #[test]
    fn test_settings_in_start_dir_claims_it_through_root() {
        let (_temp, base) = fixture();
        fs::write(base.join("settings.star"), "other\n").unwrap();

        let invocation = Invocation::builder(&base)
            .project_dir(&base)
            .build(&DefaultPathResolver::new())
            .unwrap();
        let (result, evaluated) = locate(&invocation);

        assert_eq!(result.unwrap().settings_file, Some(base.join("settings.star")));
        assert_eq!(evaluated.len(), 1);
    }

    #[test]
    fn test_no_search_upwards_ignores_ancestors() {
        let (_temp, base) = fixture();
        let child = base.join("child");
        fs::create_dir(&child).unwrap();
        fs::write(base.join("settings.star"), "child\n").unwrap();

        let invocation = Invocation::builder(&child).build(&DefaultPathResolver::new()).unwrap();
        let (result, evaluated) = locate(&invocation);

        assert!(evaluated.is_empty());
        assert_eq!(result.unwrap().settings_file, None);
    }

    #[test]
    fn test_explicit_settings_file_checks() {
        let (_temp, base) = fixture();
        let unknown = base.join("unknown");
        let invocation = Invocation::builder(&base)
            .settings_file(&unknown)
            .build(&DefaultPathResolver::new())
            .unwrap();

        let (result, _) = locate(&invocation);
        match result {
            Err(Error::Resolution(ResolutionError::SettingsFileMissing(p))) => assert_eq!(p, unknown),
            other => panic!("unexpected result: {other:?}"),
        }

        fs::create_dir(&unknown).unwrap();
        let (result, _) = locate(&invocation);
        match result {
            Err(Error::Resolution(ResolutionError::SettingsFileNotAFile(p))) => assert_eq!(p, unknown),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_single_project_uses_explicit_build_file() {
        let (_temp, base) = fixture();
        let file = base.join("similarly-named build.star");
        fs::write(&file, "").unwrap();

        let invocation = Invocation::builder(&base)
            .build_file(&file)
            .build(&DefaultPathResolver::new())
            .unwrap();
        let (result, _) = locate(&invocation);
        let located = result.unwrap();

        assert_eq!(located.projects[0].build_file, file);
        assert_eq!(located.projects[0].build_file_name, "similarly-named build.star");
    }
}
