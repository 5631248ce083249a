use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between segments of a project path, and the path of the root project.
pub const SEPARATOR: char = ':';

/// Colon-delimited logical identifier of a project (`:`, `:child`, `:child:grandchild`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct ProjectPath {
    segments: Vec<String>,
}

impl ProjectPath {
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Parse a path. Both `:a:b` and `a:b` name the same project; empty
    /// segments are dropped.
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path
                .split(SEPARATOR)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment, `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self { segments }
    }

    /// Every proper ancestor, from the root down to the parent.
    pub fn ancestors(&self) -> Vec<Self> {
        (0..self.segments.len())
            .map(|len| Self {
                segments: self.segments[..len].to_vec(),
            })
            .collect()
    }

    /// True for strict descendants only.
    pub fn is_descendant_of(&self, other: &ProjectPath) -> bool {
        self.segments.len() > other.segments.len() && self.segments.starts_with(&other.segments)
    }

    /// Absolute path of a task owned by this project.
    pub fn task_path(&self, task: &str) -> String {
        if self.is_root() {
            format!("{SEPARATOR}{task}")
        } else {
            format!("{self}{SEPARATOR}{task}")
        }
    }
}

impl fmt::Display for ProjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return write!(f, "{SEPARATOR}");
        }
        for segment in &self.segments {
            write!(f, "{SEPARATOR}{segment}")?;
        }
        Ok(())
    }
}

impl From<ProjectPath> for String {
    fn from(path: ProjectPath) -> Self {
        path.to_string()
    }
}

impl From<String> for ProjectPath {
    fn from(path: String) -> Self {
        ProjectPath::parse(&path)
    }
}
