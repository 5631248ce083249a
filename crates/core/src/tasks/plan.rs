use crate::error::ResolutionError;
use crate::resolver::ResolvedBuild;
use serde::Serialize;
use std::collections::HashMap;

use super::graph::{Task, TaskGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Tasks in execution order: each task appears once, after everything it
/// depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionPlan {
    tasks: Vec<String>,
}

impl ExecutionPlan {
    /// Orders the selected tasks and their dependencies. Among independent
    /// tasks, selection order is kept; dependencies run in declaration
    /// order.
    pub fn build(build: &ResolvedBuild, graph: &TaskGraph, selected: &[String]) -> Result<Self, ResolutionError> {
        let mut planner = Planner {
            build,
            graph,
            marks: HashMap::new(),
            stack: Vec::new(),
            order: Vec::new(),
        };
        for task_path in selected {
            let task = graph.get(task_path).ok_or_else(|| not_found(build, task_path))?;
            planner.visit(task)?;
        }
        Ok(ExecutionPlan { tasks: planner.order })
    }

    pub fn tasks(&self) -> &[String] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

fn not_found(build: &ResolvedBuild, task_path: &str) -> ResolutionError {
    ResolutionError::TaskNotFound {
        task: task_path.to_string(),
        owner: build.root_project().display_name(),
    }
}

struct Planner<'a> {
    build: &'a ResolvedBuild,
    graph: &'a TaskGraph,
    marks: HashMap<String, Mark>,
    stack: Vec<String>,
    order: Vec<String>,
}

impl<'a> Planner<'a> {
    fn visit(&mut self, task: &'a Task) -> Result<(), ResolutionError> {
        let path = task.path();
        match self.marks.get(&path) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => {
                let start = self.stack.iter().position(|p| p == &path).unwrap_or(0);
                let mut cycle = self.stack[start..].to_vec();
                cycle.push(path);
                return Err(ResolutionError::TaskCycle(cycle));
            }
            None => {}
        }

        self.marks.insert(path.clone(), Mark::Visiting);
        self.stack.push(path.clone());

        for reference in &task.depends_on {
            let dependency = self
                .graph
                .resolve_reference(&task.project, reference)
                .ok_or_else(|| ResolutionError::TaskNotFound {
                    task: reference.clone(),
                    owner: self
                        .build
                        .project(&task.project)
                        .map(|p| p.display_name())
                        .unwrap_or_else(|| task.project.to_string()),
                })?;
            self.visit(dependency)?;
        }

        self.stack.pop();
        self.marks.insert(path.clone(), Mark::Done);
        self.order.push(path);
        Ok(())
    }
}
