use std::io;
use std::path::PathBuf;

/// Failures of project location and task routing.
///
/// The `Display` text of each variant is the user-facing description and is
/// printed verbatim by the front-end.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error("The specified build file '{}' does not exist.", .0.display())]
    BuildFileMissing(PathBuf),

    #[error("The specified build file '{}' is not a file.", .0.display())]
    BuildFileNotAFile(PathBuf),

    #[error("The specified project directory '{}' does not exist.", .0.display())]
    ProjectDirMissing(PathBuf),

    #[error("The specified project directory '{}' is not a directory.", .0.display())]
    ProjectDirNotADirectory(PathBuf),

    #[error("The specified settings file '{}' does not exist.", .0.display())]
    SettingsFileMissing(PathBuf),

    #[error("The specified settings file '{}' is not a file.", .0.display())]
    SettingsFileNotAFile(PathBuf),

    #[error(
        "Multiple projects in this build have project directory '{}': {}",
        dir.display(),
        projects.join(", ")
    )]
    MultipleProjectsForProjectDir { dir: PathBuf, projects: Vec<String> },

    #[error(
        "Multiple projects in this build have build file '{}': {}",
        file.display(),
        projects.join(", ")
    )]
    MultipleProjectsForBuildFile { file: PathBuf, projects: Vec<String> },

    #[error("No projects in this build have project directory '{}'.", .0.display())]
    NoProjectForProjectDir(PathBuf),

    #[error("No projects in this build have build file '{}'.", .0.display())]
    NoProjectForBuildFile(PathBuf),

    #[error(
        "The specified build file '{}' is not inside the specified project directory '{}'.",
        build_file.display(),
        project_dir.display()
    )]
    InvalidInvocation {
        build_file: PathBuf,
        project_dir: PathBuf,
    },

    #[error("Task '{task}' not found in {owner}.")]
    TaskNotFound { task: String, owner: String },

    #[error("Project '{project}' not found in {owner}.")]
    ProjectNotFound { project: String, owner: String },

    #[error("Circular dependency between the following tasks: {}", .0.join(" -> "))]
    TaskCycle(Vec<String>),
}

/// Errors that can occur during plumb operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Could not compile '{}' (line {line}): {message}", file.display())]
    ScriptParse {
        file: PathBuf,
        line: usize,
        message: String,
    },

    #[error("A problem occurred evaluating '{}' (line {line}): {message}", file.display())]
    ScriptEvaluation {
        file: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type alias for plumb operations
pub type Result<T> = std::result::Result<T, Error>;
