//! Build evaluation backed by the Starlark interpreter

use crate::error::Result;
use crate::interfaces::{BuildEvaluator, BuildRequest, TaskDefinition};
use crate::properties::Properties;
use crate::script::{self, Arguments, ScriptHost, ScriptParser, Value};
use crate::types::DeclaredProject;
use tracing::debug;

/// Evaluates `build.star` files
#[derive(Debug, Default, Clone, Copy)]
pub struct StarlarkBuildEvaluator;

impl StarlarkBuildEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl BuildEvaluator for StarlarkBuildEvaluator {
    fn evaluate_build(&self, request: &BuildRequest<'_>) -> Result<Vec<TaskDefinition>> {
        debug!(
            "Evaluating build file {:?} for project {}",
            request.project.build_file, request.project.path
        );

        let mut parser = ScriptParser::new()?;
        let ast = parser.parse_file(&request.project.build_file)?;

        let mut host = BuildHost {
            project: request.project,
            properties: request.properties,
            tasks: Vec::new(),
        };
        script::run(&ast, &mut host)?;

        debug!("Project {} declared {} task(s)", request.project.path, host.tasks.len());
        Ok(host.tasks)
    }
}

struct BuildHost<'a> {
    project: &'a DeclaredProject,
    properties: &'a Properties,
    tasks: Vec<TaskDefinition>,
}

impl BuildHost<'_> {
    fn declare_task(&mut self, args: &Arguments, line: usize) -> std::result::Result<Value, String> {
        let name = args.string_at("task", 0)?.to_string();
        if self.tasks.iter().any(|t| t.name == name) {
            return Err(format!(
                "Cannot add task '{}' as a task with that name already exists.",
                self.project.path.task_path(&name)
            ));
        }

        let mut task = TaskDefinition::new(name);
        task.line = line;
        for (key, value) in &args.keyword {
            match (key.as_str(), value) {
                ("depends_on", Value::Str(dep)) => task.depends_on.push(dep.clone()),
                ("depends_on", Value::List(deps)) => {
                    for dep in deps {
                        match dep {
                            Value::Str(dep) => task.depends_on.push(dep.clone()),
                            other => return Err(format!("depends_on entries must be strings, got {}", other.type_name())),
                        }
                    }
                }
                ("all_projects", value) => task.all_projects = value.is_truthy(),
                ("description", Value::Str(text)) => task.description = Some(text.clone()),
                ("description", Value::None) => task.description = None,
                (key, value) => {
                    return Err(format!(
                        "task() got an unexpected value for '{key}': {}",
                        value.type_name()
                    ));
                }
            }
        }

        self.tasks.push(task);
        Ok(Value::None)
    }
}

impl ScriptHost for BuildHost<'_> {
    fn global(&self, name: &str) -> Option<Value> {
        match name {
            "project_name" => Some(Value::Str(self.project.name.clone())),
            "project_path" => Some(Value::Str(self.project.path.to_string())),
            "project_dir" => Some(Value::Path(self.project.project_dir.clone())),
            _ => None,
        }
    }

    fn call(&mut self, function: &str, args: Arguments, line: usize) -> std::result::Result<Value, String> {
        match function {
            "task" => self.declare_task(&args, line),
            "fail" => Err(args
                .positional
                .iter()
                .map(Value::to_string)
                .collect::<Vec<_>>()
                .join(" ")),
            "property" => {
                let name = args.string_at(function, 0)?;
                Ok(self
                    .properties
                    .get(name)
                    .map(|v| Value::Str(v.to_string()))
                    .unwrap_or(Value::None))
            }
            "has_property" => Ok(Value::Bool(self.properties.contains(args.string_at(function, 0)?))),
            "assert_property" => {
                let name = args.string_at(function, 0)?;
                let expected = args.string_at(function, 1)?;
                match self.properties.get(name) {
                    Some(actual) if actual == expected => Ok(Value::None),
                    Some(actual) => Err(format!(
                        "Expected property '{name}' to be '{expected}' but was '{actual}'."
                    )),
                    None => Err(format!(
                        "Expected property '{name}' to be '{expected}' but it is not defined."
                    )),
                }
            }
            "assert_no_property" => {
                let name = args.string_at(function, 0)?;
                match self.properties.get(name) {
                    Some(actual) => Err(format!(
                        "Expected property '{name}' to be undefined but was '{actual}'."
                    )),
                    None => Ok(Value::None),
                }
            }
            _ => Err(format!(
                "Could not find method {function}() for arguments {}.",
                Value::List(args.positional)
            )),
        }
    }

    fn get_attr(&self, target: &Value, attr: &str) -> std::result::Result<Value, String> {
        Err(format!("Could not get unknown property '{attr}' for {target}."))
    }

    fn set_attr(&mut self, target: &Value, attr: &str, _value: Value) -> std::result::Result<(), String> {
        Err(format!("Cannot set property '{attr}' of {target}."))
    }
}
