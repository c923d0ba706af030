//! Check-solution command implementation.

use std::path::PathBuf;

use clap::{Parser, ValueHint};

use crate::cli::CommandContext;
use crate::error::CliError;

/// Check that the script a solution descriptor names exists
#[derive(Debug, Parser)]
pub struct CheckSolutionCommand {
    /// Solution descriptor, or the directory holding it
    #[arg(value_hint = ValueHint::AnyPath)]
    descriptor: PathBuf,
}

impl CheckSolutionCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let descriptor = if self.descriptor.is_dir() {
            self.descriptor.join(&ctx.config.schema.descriptor_filename)
        } else {
            self.descriptor.clone()
        };

        let check = super::repo_loader(ctx)?.solution_path(&descriptor)?;
        if !check.exists {
            return Err(CliError::validation(format!(
                "solution file not found: {}",
                check.path.display()
            )));
        }

        println!("{}", check.path.display());
        Ok(())
    }
}
