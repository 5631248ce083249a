use anyhow::{Context, Result};

use super::prepare;
use crate::cli::Cli;

/// Resolves the build without evaluating any build file and prints it
pub fn layout_command(cli: &Cli) -> Result<()> {
    let (runner, invocation) = prepare(cli)?;
    let build = runner.resolve(&invocation)?;

    let json = serde_json::to_string_pretty(&build).context("Failed to serialize project layout")?;
    println!("{json}");
    Ok(())
}
