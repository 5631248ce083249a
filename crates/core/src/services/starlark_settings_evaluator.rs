//! Settings evaluation backed by the Starlark interpreter

use crate::error::Result;
use crate::interfaces::{PathResolver, SettingsEvaluator, SettingsRequest};
use crate::script::{self, Arguments, ScriptHost, ScriptParser, Value};
use crate::settings::ProjectRegistry;
use crate::types::{DeclaredProject, ProjectPath};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Evaluates `settings.star` files
pub struct StarlarkSettingsEvaluator {
    paths: Arc<dyn PathResolver>,
}

impl StarlarkSettingsEvaluator {
    pub fn new(paths: Arc<dyn PathResolver>) -> Self {
        Self { paths }
    }
}

impl SettingsEvaluator for StarlarkSettingsEvaluator {
    fn evaluate_settings(&self, request: &SettingsRequest<'_>) -> Result<Vec<DeclaredProject>> {
        debug!("Evaluating settings file {:?}", request.settings_file);

        let mut parser = ScriptParser::new()?;
        let ast = parser.parse_file(request.settings_file)?;

        let mut host = SettingsHost {
            registry: ProjectRegistry::new(request.settings_dir, request.build_file_name),
            paths: self.paths.as_ref(),
        };
        script::run(&ast, &mut host)?;

        debug!(
            "Settings file {:?} declared {} project(s)",
            request.settings_file,
            host.registry.len()
        );
        Ok(host.registry.freeze(self.paths.as_ref()))
    }
}

struct SettingsHost<'a> {
    registry: ProjectRegistry,
    paths: &'a dyn PathResolver,
}

impl SettingsHost<'_> {
    /// Strings are relative to the settings directory
    fn to_path(&self, value: &Value, what: &str) -> std::result::Result<PathBuf, String> {
        let path = match value {
            Value::Path(p) => p.clone(),
            Value::Str(s) => self
                .paths
                .resolve_relative(self.registry.settings_dir(), PathBuf::from(s).as_path()),
            other => return Err(format!("{what} must be a path or string, got {}", other.type_name())),
        };
        Ok(self.paths.normalize(&path))
    }

    fn project_for(&self, value: &Value) -> Option<ProjectPath> {
        match value {
            Value::Project(path) if self.registry.get(path).is_some() => Some(path.clone()),
            _ => None,
        }
    }
}

impl ScriptHost for SettingsHost<'_> {
    fn global(&self, name: &str) -> Option<Value> {
        match name {
            "settings_dir" => Some(Value::Path(self.registry.settings_dir().to_path_buf())),
            "root_project" => Some(Value::Project(ProjectPath::root())),
            _ => None,
        }
    }

    fn call(&mut self, function: &str, args: Arguments, _line: usize) -> std::result::Result<Value, String> {
        match function {
            "include" => {
                for path in args.strings(function)? {
                    self.registry.include(path);
                }
                Ok(Value::None)
            }
            "include_flat" => {
                for name in args.strings(function)? {
                    self.registry.include_flat(name)?;
                }
                Ok(Value::None)
            }
            "project" => {
                let path = ProjectPath::parse(args.string_at(function, 0)?);
                if self.registry.get(&path).is_none() {
                    return Err(format!("Project with path '{path}' could not be found."));
                }
                Ok(Value::Project(path))
            }
            "file" => {
                let base = args
                    .positional
                    .first()
                    .ok_or_else(|| "file() is missing required argument 1".to_string())?;
                let mut path = self.to_path(base, "file() base")?;
                for i in 1..args.positional.len() {
                    path.push(args.string_at(function, i)?);
                }
                Ok(Value::Path(self.paths.normalize(&path)))
            }
            _ => Err(format!(
                "Could not find method {function}() for arguments {}.",
                Value::List(args.positional)
            )),
        }
    }

    fn get_attr(&self, target: &Value, attr: &str) -> std::result::Result<Value, String> {
        if let Some(path) = self.project_for(target) {
            let Some(descriptor) = self.registry.get(&path) else {
                return Err(format!("Project with path '{path}' could not be found."));
            };
            return match attr {
                "project_dir" => Ok(Value::Path(descriptor.project_dir.clone())),
                "build_file_name" => Ok(Value::Str(descriptor.build_file_name.clone())),
                "build_file" => Ok(Value::Path(
                    self.paths
                        .normalize(&descriptor.project_dir.join(&descriptor.build_file_name)),
                )),
                "name" => Ok(Value::Str(descriptor.name.clone())),
                "path" => Ok(Value::Str(descriptor.path.to_string())),
                _ => Err(format!("Could not get unknown property '{attr}' for {target}.")),
            };
        }

        match (target, attr) {
            (Value::Path(p), "name") => Ok(p
                .file_name()
                .map(|n| Value::Str(n.to_string_lossy().into_owned()))
                .unwrap_or(Value::None)),
            (Value::Path(p), "parent") => Ok(p
                .parent()
                .map(|parent| Value::Path(parent.to_path_buf()))
                .unwrap_or(Value::None)),
            _ => Err(format!("Could not get unknown property '{attr}' for {target}.")),
        }
    }

    fn set_attr(&mut self, target: &Value, attr: &str, value: Value) -> std::result::Result<(), String> {
        let Some(path) = self.project_for(target) else {
            return Err(format!("Cannot set property '{attr}' of {target}."));
        };

        let project_dir = match attr {
            "project_dir" => Some(self.to_path(&value, "project_dir")?),
            _ => None,
        };

        let descriptor = self
            .registry
            .get_mut(&path)
            .ok_or_else(|| format!("Project with path '{path}' could not be found."))?;

        match (attr, value) {
            ("project_dir", _) => {
                if let Some(dir) = project_dir {
                    descriptor.project_dir = dir;
                }
            }
            ("build_file_name", Value::Str(name)) => descriptor.build_file_name = name,
            ("name", Value::Str(name)) => descriptor.name = name,
            ("build_file_name" | "name", other) => {
                return Err(format!("{attr} must be a string, got {}", other.type_name()));
            }
            ("path" | "build_file", _) => {
                return Err(format!("Cannot set the value of read-only property '{attr}' for {target}."));
            }
            _ => return Err(format!("Could not set unknown property '{attr}' for {target}.")),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::services::DefaultPathResolver;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn workspace() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let base = fs::canonicalize(temp_dir.path()).unwrap();
        (temp_dir, base)
    }

    fn evaluate(dir: &Path, content: &str) -> Result<Vec<DeclaredProject>> {
        let settings_file = dir.join("settings.star");
        fs::write(&settings_file, content).unwrap();
        let evaluator = StarlarkSettingsEvaluator::new(Arc::new(DefaultPathResolver::new()));
        evaluator.evaluate_settings(&SettingsRequest {
            settings_file: &settings_file,
            settings_dir: dir,
            build_file_name: "build.star",
        })
    }

    fn find<'a>(projects: &'a [DeclaredProject], path: &str) -> &'a DeclaredProject {
        let path = ProjectPath::parse(path);
        projects.iter().find(|p| p.path == path).unwrap()
    }

    #[test]
    fn test_whitespace_only_settings_yield_root() {
        let (_temp, base) = workspace();
        let projects = evaluate(&base, "   \n  ").unwrap();

        assert_eq!(projects.len(), 1);
        assert!(projects[0].is_root());
        assert_eq!(projects[0].project_dir, base);
    }

    #[test]
    fn test_shared_project_dir() {
        let (_temp, base) = workspace();
        let projects = evaluate(
            &base,
            r#"
include("child1", "child2")
project(":child1").project_dir = file(settings_dir, "shared")
project(":child2").project_dir = file(settings_dir, "shared")
"#,
        )
        .unwrap();

        let shared = base.join("shared");
        assert_eq!(find(&projects, ":child1").project_dir, shared);
        assert_eq!(find(&projects, ":child2").project_dir, shared);
    }

    #[test]
    fn test_root_rehomed_and_build_file_renamed() {
        let (_temp, base) = workspace();
        let settings_dir = base.join("root");
        fs::create_dir(&settings_dir).unwrap();
        let projects = evaluate(
            &settings_dir,
            r#"
include_flat("child")
root_project.project_dir = file(settings_dir, "..")
root_project.build_file_name = "root/build.star"
"#,
        )
        .unwrap();

        let root = find(&projects, ":");
        assert_eq!(root.project_dir, base);
        assert_eq!(root.build_file, settings_dir.join("build.star"));
        assert_eq!(find(&projects, ":child").project_dir, base.join("child"));
    }

    #[test]
    fn test_project_dir_can_copy_another_project() {
        let (_temp, base) = workspace();
        let projects = evaluate(
            &base,
            "include('child')\nproject(':child').project_dir = root_project.project_dir\n",
        )
        .unwrap();

        assert_eq!(find(&projects, ":child").project_dir, base);
        assert_eq!(find(&projects, ":child").build_file, find(&projects, ":").build_file);
    }

    #[test]
    fn test_string_project_dir_is_relative_to_settings_dir() {
        let (_temp, base) = workspace();
        let projects = evaluate(
            &base,
            "include('sub')\nproject('sub').project_dir = '../sub'\nroot_project.name = 'renamed'\n",
        )
        .unwrap();

        let parent = base.parent().unwrap();
        assert_eq!(find(&projects, ":sub").project_dir, parent.join("sub"));
        assert_eq!(find(&projects, ":").name, "renamed");
    }

    #[test]
    fn test_unknown_project_fails_with_line() {
        let (_temp, base) = workspace();
        let err = evaluate(&base, "include('a')\nproject(':b').name = 'x'\n").unwrap_err();

        match err {
            Error::ScriptEvaluation { line, message, .. } => {
                assert_eq!(line, 2);
                assert_eq!(message, "Project with path ':b' could not be found.");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_only_path() {
        let (_temp, base) = workspace();
        let err = evaluate(&base, "root_project.path = ':x'\n").unwrap_err();
        assert!(err.to_string().contains("read-only property 'path'"));
    }

    #[test]
    fn test_include_flat_with_nested_name_fails() {
        let (_temp, base) = workspace();
        let err = evaluate(&base, "include('a')\ninclude_flat('a:b')\n").unwrap_err();

        match err {
            Error::ScriptEvaluation { line, message, .. } => {
                assert_eq!(line, 2);
                assert_eq!(message, "Project name 'a:b' must be a single name without ':'.");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
