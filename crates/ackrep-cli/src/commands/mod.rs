//! Command implementations.

mod check_solution;
mod find;
mod key;
mod list;
mod render;
mod show;

pub use check_solution::CheckSolutionCommand;
pub use find::FindCommand;
pub use key::KeyCommand;
pub use list::ListCommand;
pub use render::RenderCommand;
pub use show::ShowCommand;

use ackrep_core::{RebuildReport, RepoLoader};

use crate::cli::CommandContext;
use crate::error::CliError;

/// Repository loader for the configured schema.
fn repo_loader(ctx: &CommandContext) -> Result<RepoLoader, CliError> {
    Ok(RepoLoader::new(&ctx.config.schema)?)
}

/// Print descriptors and entries a rebuild left out.
fn report_problems(ctx: &CommandContext, report: &RebuildReport) {
    if ctx.quiet {
        return;
    }
    for failure in &report.failures {
        eprintln!("skipped {}: {}", failure.path.display(), failure.error);
    }
    for entry in &report.skipped {
        eprintln!("unreadable {}: {}", entry.path.display(), entry.reason);
    }
}
