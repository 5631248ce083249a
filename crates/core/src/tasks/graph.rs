use crate::error::{Error, Result};
use crate::interfaces::{BuildEvaluator, BuildRequest, PathResolver};
use crate::properties::project_properties;
use crate::resolver::ResolvedBuild;
use crate::types::project_path::SEPARATOR;
use crate::types::ProjectPath;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// A task registered against one project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub project: ProjectPath,
    pub name: String,
    pub depends_on: Vec<String>,
    pub description: Option<String>,
}

impl Task {
    pub fn path(&self) -> String {
        self.project.task_path(&self.name)
    }
}

/// Every task of a configured build, keyed by project then task name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskGraph {
    tasks: BTreeMap<ProjectPath, BTreeMap<String, Task>>,
}

impl TaskGraph {
    /// Evaluates the build file of each project, in project path order.
    /// Projects without a build file contribute no tasks of their own.
    pub fn configure(
        build: &ResolvedBuild,
        evaluator: &dyn BuildEvaluator,
        paths: &dyn PathResolver,
        properties_file_name: &str,
        extra_properties: &BTreeMap<String, String>,
    ) -> Result<Self> {
        let mut graph = TaskGraph::default();

        for project in build.projects.values() {
            graph.tasks.entry(project.path.clone()).or_default();
            if !paths.is_file(&project.build_file) {
                debug!("Project {} has no build file at {:?}", project.path, project.build_file);
                continue;
            }

            let properties = project_properties(
                &build.settings_dir,
                &project.project_dir,
                properties_file_name,
                extra_properties,
            )?;
            let definitions = evaluator.evaluate_build(&BuildRequest {
                project,
                properties: &properties,
            })?;

            for definition in definitions {
                let targets: Vec<ProjectPath> = if definition.all_projects {
                    build
                        .project_and_descendants(&project.path)
                        .map(|p| p.path.clone())
                        .collect()
                } else {
                    vec![project.path.clone()]
                };

                for target in targets {
                    let task = Task {
                        project: target,
                        name: definition.name.clone(),
                        depends_on: definition.depends_on.clone(),
                        description: definition.description.clone(),
                    };
                    graph
                        .insert(task)
                        .map_err(|message| Error::ScriptEvaluation {
                            file: project.build_file.clone(),
                            line: definition.line,
                            message,
                        })?;
                }
            }
        }

        debug!("Configured {} task(s)", graph.len());
        Ok(graph)
    }

    pub(crate) fn insert(&mut self, task: Task) -> std::result::Result<(), String> {
        let tasks = self.tasks.entry(task.project.clone()).or_default();
        if tasks.contains_key(&task.name) {
            return Err(format!(
                "Cannot add task '{}' as a task with that name already exists.",
                task.path()
            ));
        }
        tasks.insert(task.name.clone(), task);
        Ok(())
    }

    pub fn find(&self, project: &ProjectPath, name: &str) -> Option<&Task> {
        self.tasks.get(project).and_then(|tasks| tasks.get(name))
    }

    /// Looks up a fully qualified task path such as `:child:task`
    pub fn get(&self, task_path: &str) -> Option<&Task> {
        let (project, name) = task_path.rsplit_once(SEPARATOR)?;
        self.find(&ProjectPath::parse(project), name)
    }

    /// Resolves a task reference made from `from`. References starting with
    /// `:` are absolute, anything else is relative to `from`.
    pub fn resolve_reference(&self, from: &ProjectPath, reference: &str) -> Option<&Task> {
        if reference.starts_with(SEPARATOR) {
            return self.get(reference);
        }
        match reference.rsplit_once(SEPARATOR) {
            Some((relative, name)) => {
                let project = relative
                    .split(SEPARATOR)
                    .filter(|s| !s.is_empty())
                    .fold(from.clone(), |path, segment| path.child(segment));
                self.find(&project, name)
            }
            None => self.find(from, reference),
        }
    }

    /// Tasks of one project in name order
    pub fn tasks_of<'a>(&'a self, project: &ProjectPath) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks.get(project).into_iter().flat_map(|tasks| tasks.values())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values().flat_map(|tasks| tasks.values())
    }

    pub fn len(&self) -> usize {
        self.tasks.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::TaskDefinition;
    use crate::services::DefaultPathResolver;
    use crate::types::DeclaredProject;
    use std::fs;
    use tempfile::TempDir;

    /// Declares one task per line of the build file: `name [dep...]`, with a
    /// leading `*` marking the task as applying to all projects.
    struct LineEvaluator;

    impl BuildEvaluator for LineEvaluator {
        fn evaluate_build(&self, request: &BuildRequest<'_>) -> Result<Vec<TaskDefinition>> {
            let content = fs::read_to_string(&request.project.build_file)?;
            Ok(content
                .lines()
                .enumerate()
                .filter(|(_, line)| !line.trim().is_empty())
                .map(|(index, line)| {
                    let mut words = line.split_whitespace();
                    let first = words.next().unwrap_or_default();
                    let (all_projects, name) = match first.strip_prefix('*') {
                        Some(name) => (true, name),
                        None => (false, first),
                    };
                    let mut task = TaskDefinition::new(name);
                    task.all_projects = all_projects;
                    task.depends_on = words.map(str::to_string).collect();
                    task.line = index + 1;
                    task
                })
                .collect())
        }
    }

    fn build_in(dir: &std::path::Path, children: &[&str]) -> ResolvedBuild {
        let paths = DefaultPathResolver::new();
        let mut projects = BTreeMap::new();
        let root = DeclaredProject::new(&paths, ProjectPath::root(), "root", dir.to_path_buf(), "build.txt");
        projects.insert(root.path.clone(), root);
        for child in children {
            let path = ProjectPath::parse(&format!(":{child}"));
            let project = DeclaredProject::new(&paths, path.clone(), *child, dir.join(child), "build.txt");
            projects.insert(path, project);
        }
        ResolvedBuild {
            settings_file: None,
            settings_dir: dir.to_path_buf(),
            projects,
            default_project: ProjectPath::root(),
        }
    }

    #[test]
    fn test_all_projects_tasks_reach_descendants() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::create_dir_all(root.join("b")).unwrap();
        fs::write(root.join("build.txt"), "*thing\nlocal\n").unwrap();
        fs::write(root.join("a/build.txt"), "other\n").unwrap();

        let build = build_in(root, &["a", "b"]);
        let graph = TaskGraph::configure(
            &build,
            &LineEvaluator,
            &DefaultPathResolver::new(),
            "plumb.properties",
            &BTreeMap::new(),
        )
        .unwrap();

        let all: Vec<String> = graph.iter().map(Task::path).collect();
        assert_eq!(all, vec![":local", ":thing", ":a:other", ":a:thing", ":b:thing"]);
    }

    #[test]
    fn test_duplicate_from_all_projects_fails() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::write(root.join("build.txt"), "*thing\n").unwrap();
        fs::write(root.join("a/build.txt"), "thing\n").unwrap();

        let build = build_in(root, &["a"]);
        let err = TaskGraph::configure(
            &build,
            &LineEvaluator,
            &DefaultPathResolver::new(),
            "plumb.properties",
            &BTreeMap::new(),
        )
        .unwrap_err();
        assert!(
            err.to_string()
                .contains("Cannot add task ':a:thing' as a task with that name already exists.")
        );
    }

    #[test]
    fn test_resolve_reference() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::write(root.join("build.txt"), "top\n").unwrap();
        fs::write(root.join("a/build.txt"), "task\n").unwrap();

        let build = build_in(root, &["a"]);
        let graph = TaskGraph::configure(
            &build,
            &LineEvaluator,
            &DefaultPathResolver::new(),
            "plumb.properties",
            &BTreeMap::new(),
        )
        .unwrap();

        let root_path = ProjectPath::root();
        let child = ProjectPath::parse(":a");
        assert_eq!(graph.resolve_reference(&root_path, "a:task").map(Task::path), Some(":a:task".into()));
        assert_eq!(graph.resolve_reference(&child, ":top").map(Task::path), Some(":top".into()));
        assert_eq!(graph.resolve_reference(&child, "task").map(Task::path), Some(":a:task".into()));
        assert!(graph.resolve_reference(&child, "top").is_none());
    }
}
