pub mod layout;
pub mod run;

pub use layout::layout_command;
pub use run::run_command;

use anyhow::{Context, Result};
use plumb_core::{BuildRunner, Invocation};
use std::env;
use tracing::debug;

use crate::cli::Cli;

/// Runner configured from the current directory, and the invocation the
/// command line describes
fn prepare(cli: &Cli) -> Result<(BuildRunner, Invocation)> {
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    let runner = BuildRunner::new()?;

    let mut builder = runner.invocation(&current_dir).tasks(cli.tasks.iter().cloned());
    if let Some(dir) = &cli.project_dir {
        builder = builder.project_dir(dir);
    }
    if let Some(file) = &cli.build_file {
        builder = builder.build_file(file);
    }
    if let Some(file) = &cli.settings_file {
        builder = builder.settings_file(file);
    }
    if let Some(enabled) = cli.search_upwards_override() {
        builder = builder.search_upwards(enabled);
    }
    for (key, value) in &cli.properties {
        builder = builder.extra_argument(key, value);
    }

    let invocation = builder.build(runner.path_resolver())?;
    debug!("Invocation: {:?}", invocation);
    Ok((runner, invocation))
}
