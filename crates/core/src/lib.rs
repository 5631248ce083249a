//! plumb - multi-project build resolution
//!
//! This crate provides functionality to:
//! - Locate the settings description governing an invocation
//! - Resolve the root project, the project tree and the default project
//! - Evaluate build descriptions into tasks and route task selectors
//! - Order selected tasks after their dependencies
pub mod config;
pub mod error;
pub mod interfaces;
pub mod invocation;
pub mod properties;
pub mod resolver;
pub mod runner;
pub mod script;
pub mod services;
pub mod settings;
pub mod tasks;
pub mod types;

// Re-export commonly used types and traits
pub use error::{Error, ResolutionError, Result};
pub use types::*;

// Re-export main API components
pub use config::Config;
pub use invocation::{Invocation, InvocationBuilder};
pub use resolver::{BuildResolver, DefaultProjectSpec, ResolvedBuild};
pub use runner::{BuildOutcome, BuildRunner};
pub use tasks::{ExecutionPlan, Task, TaskGraph, TaskSelectorRouter};
