pub mod project;
pub mod project_path;

// Re-export commonly used types
pub use project::DeclaredProject;
pub use project_path::ProjectPath;
