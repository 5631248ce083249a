pub mod formatter;

pub use formatter::{format_plan, format_task_listing};
