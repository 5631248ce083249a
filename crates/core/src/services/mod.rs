//! Default implementations of the interface traits

pub mod default_path_resolver;
pub mod starlark_build_evaluator;
pub mod starlark_settings_evaluator;

pub use default_path_resolver::DefaultPathResolver;
pub use starlark_build_evaluator::StarlarkBuildEvaluator;
pub use starlark_settings_evaluator::StarlarkSettingsEvaluator;
