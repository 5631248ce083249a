//! Task configuration, selection and ordering
//!
//! Runs strictly after resolution: build files are evaluated against the
//! committed project set, then selectors are routed and ordered.

pub mod graph;
pub mod plan;
pub mod router;

pub use graph::{Task, TaskGraph};
pub use plan::ExecutionPlan;
pub use router::TaskSelectorRouter;
