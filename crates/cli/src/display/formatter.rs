use plumb_core::{ExecutionPlan, ResolvedBuild, TaskGraph};
use std::fmt::Write;

/// One line per planned task, dependencies first
pub fn format_plan(plan: &ExecutionPlan, dry_run: bool) -> String {
    let mut out = String::new();
    for task in plan.tasks() {
        if dry_run {
            let _ = writeln!(out, "{task} SKIPPED");
        } else {
            let _ = writeln!(out, "> Task {task}");
        }
    }
    out
}

/// Every project of the build with its tasks, in path order
pub fn format_task_listing(build: &ResolvedBuild, graph: &TaskGraph) -> String {
    let mut out = String::new();
    match &build.settings_file {
        Some(file) => {
            let _ = writeln!(out, "Settings file: {}", file.display());
        }
        None => {
            let _ = writeln!(out, "Settings file: none (single-project build)");
        }
    }

    for project in build.projects.values() {
        let marker = if project.path == build.default_project { " (default)" } else { "" };
        let _ = writeln!(out);
        let _ = writeln!(out, "{}{marker}", capitalize(&project.display_name()));
        let _ = writeln!(out, "  {}", project.project_dir.display());

        let mut tasks = graph.tasks_of(&project.path).peekable();
        if tasks.peek().is_none() {
            let _ = writeln!(out, "  No tasks");
        }
        for task in tasks {
            match &task.description {
                Some(description) => {
                    let _ = writeln!(out, "  {} - {description}", task.name);
                }
                None => {
                    let _ = writeln!(out, "  {}", task.name);
                }
            }
        }
    }
    out
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
