use anyhow::Result;
use tracing::info;

use super::prepare;
use crate::cli::Cli;
use crate::display::{format_plan, format_task_listing};

pub fn run_command(cli: &Cli) -> Result<()> {
    let (runner, invocation) = prepare(cli)?;
    let outcome = runner.run(&invocation)?;

    if invocation.task_selectors.is_empty() {
        print!("{}", format_task_listing(&outcome.build, &outcome.graph));
        return Ok(());
    }

    info!(
        "Running {} task(s) in {}",
        outcome.plan.len(),
        outcome.build.default_project().display_name()
    );
    print!("{}", format_plan(&outcome.plan, cli.dry_run));
    println!();
    println!("BUILD SUCCESSFUL");
    Ok(())
}
