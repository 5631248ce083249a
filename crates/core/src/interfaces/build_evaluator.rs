//! Build evaluation interface
//!
//! Evaluates one project's build description into task definitions. Only
//! runs after project resolution has finished.

use crate::error::Result;
use crate::properties::Properties;
use crate::types::DeclaredProject;

pub struct BuildRequest<'a> {
    pub project: &'a DeclaredProject,
    pub properties: &'a Properties,
}

/// A task as declared by a build description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDefinition {
    pub name: String,
    /// Qualified task paths, or paths relative to the declaring project
    pub depends_on: Vec<String>,
    pub description: Option<String>,
    /// Also declare the task in every descendant project
    pub all_projects: bool,
    /// Line of the declaration, for diagnostics
    pub line: usize,
}

impl TaskDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            depends_on: Vec::new(),
            description: None,
            all_projects: false,
            line: 0,
        }
    }
}

/// Trait for evaluating build descriptions
pub trait BuildEvaluator {
    fn evaluate_build(&self, request: &BuildRequest<'_>) -> Result<Vec<TaskDefinition>>;
}
