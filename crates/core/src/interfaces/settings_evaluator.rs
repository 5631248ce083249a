//! Settings evaluation interface
//!
//! Evaluates a settings description and reports the projects it declares.

use crate::error::Result;
use crate::types::DeclaredProject;
use std::path::Path;

/// What a settings evaluation needs to know besides the script itself
#[derive(Debug, Clone, Copy)]
pub struct SettingsRequest<'a> {
    pub settings_file: &'a Path,
    /// Value of `settings_dir` inside the script
    pub settings_dir: &'a Path,
    /// Build file name of projects that do not set their own
    pub build_file_name: &'a str,
}

/// Trait for evaluating settings descriptions
pub trait SettingsEvaluator {
    /// Every declared project, including the root. Evaluation errors are
    /// returned as-is.
    fn evaluate_settings(&self, request: &SettingsRequest<'_>) -> Result<Vec<DeclaredProject>>;
}
