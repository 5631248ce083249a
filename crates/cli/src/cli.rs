use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::commands::{layout_command, run_command};

#[derive(Parser, Debug)]
#[command(name = "plumb")]
#[command(version, about = "Resolve and run tasks of a multi-project build", long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
pub struct Cli {
    /// Directory of the default project
    #[arg(short = 'p', long = "project-dir", value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    /// Build file of the default project
    #[arg(short = 'b', long = "build-file", value_name = "FILE")]
    pub build_file: Option<PathBuf>,

    /// Settings file to use instead of searching for one
    #[arg(short = 'c', long = "settings-file", value_name = "FILE")]
    pub settings_file: Option<PathBuf>,

    /// Search parent directories for a settings file
    #[arg(long, overrides_with = "no_search_upwards")]
    pub search_upwards: bool,

    /// Only look for a settings file in the start directory
    #[arg(long, overrides_with = "search_upwards")]
    pub no_search_upwards: bool,

    /// Set a project property (e.g. -P version=1.0)
    #[arg(short = 'P', long = "property", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub properties: Vec<(String, String)>,

    /// Print the tasks that would run without running them
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Print the resolved project layout as JSON
    #[arg(long)]
    pub layout: bool,

    /// Tasks to run (`name`, `child:name` or `:child:name`)
    pub tasks: Vec<String>,
}

impl Cli {
    /// `None` when neither flag was given and the configured default applies
    pub fn search_upwards_override(&self) -> Option<bool> {
        if self.search_upwards {
            Some(true)
        } else if self.no_search_upwards {
            Some(false)
        } else {
            None
        }
    }

    /// Execute the command
    pub fn execute(self) -> Result<()> {
        if self.layout {
            layout_command(&self)
        } else {
            run_command(&self)
        }
    }
}

fn parse_key_value(arg: &str) -> std::result::Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.to_string())),
        Some(_) => Err(format!("missing property name in '{arg}'")),
        None => Ok((arg.trim().to_string(), String::new())),
    }
}
