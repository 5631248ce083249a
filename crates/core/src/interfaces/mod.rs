//! Core interfaces
//!
//! Path handling and script evaluation sit behind traits so the resolver can
//! be driven by in-memory fakes in tests.

pub mod build_evaluator;
pub mod path_resolver;
pub mod settings_evaluator;

pub use build_evaluator::{BuildEvaluator, BuildRequest, TaskDefinition};
pub use path_resolver::PathResolver;
pub use settings_evaluator::{SettingsEvaluator, SettingsRequest};
