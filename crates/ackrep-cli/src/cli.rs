//! CLI argument definitions using clap derive macros.

use std::path::{Path, PathBuf};

use ackrep_common_config::{AckrepConfig, ConfigLoader, CONFIG_DIR};
use clap::{ArgAction, Parser, Subcommand, ValueHint};
use tracing::debug;

use crate::commands::{
    CheckSolutionCommand, FindCommand, KeyCommand, ListCommand, RenderCommand, ShowCommand,
};
use crate::error::CliError;

/// ackrep - catalog of automatic control knowledge entities
///
/// Discovers entity descriptors in a repository, queries them by key and
/// renders files from their metadata.
#[derive(Debug, Parser)]
#[command(
    name = "ackrep",
    version,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(
        short,
        long,
        global = true,
        env = "ACKREP_CONFIG",
        value_hint = ValueHint::FilePath
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a random entity key
    Key(KeyCommand),

    /// Print a parsed descriptor
    #[command(visible_alias = "metadata")]
    Show(ShowCommand),

    /// List the entities of a repository
    List(ListCommand),

    /// Print the entity with a given key
    Find(FindCommand),

    /// Render a template
    Render(RenderCommand),

    /// Check that a solution's script exists
    CheckSolution(CheckSolutionCommand),
}

impl Cli {
    /// Load configuration from `--config`, the nearest `.ackrep` directory or
    /// defaults.
    pub fn load_config(&self) -> Result<AckrepConfig, CliError> {
        match &self.config {
            Some(path) => {
                let project_dir = path.parent().unwrap_or_else(|| Path::new("."));
                Ok(ConfigLoader::new(project_dir).load_file(path)?)
            }
            None => {
                let cwd = std::env::current_dir()?;
                let project_dir =
                    ackrep_common_fs::path::find_root_with(&cwd, CONFIG_DIR).unwrap_or(cwd);
                debug!(project_dir = %project_dir.display(), "loading configuration");
                Ok(ConfigLoader::new(project_dir).load()?)
            }
        }
    }

    /// Execute the selected command
    pub fn execute(self, config: AckrepConfig) -> Result<(), CliError> {
        let ctx = CommandContext {
            config,
            quiet: self.quiet,
        };

        match self.command {
            Command::Key(cmd) => cmd.execute(&ctx),
            Command::Show(cmd) => cmd.execute(&ctx),
            Command::List(cmd) => cmd.execute(&ctx),
            Command::Find(cmd) => cmd.execute(&ctx),
            Command::Render(cmd) => cmd.execute(&ctx),
            Command::CheckSolution(cmd) => cmd.execute(&ctx),
        }
    }
}

/// Context passed to all commands
#[derive(Debug)]
pub struct CommandContext {
    pub config: AckrepConfig,
    pub quiet: bool,
}
