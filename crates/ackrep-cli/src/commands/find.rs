//! Find command implementation.

use std::path::PathBuf;

use ackrep_core::dump;
use anyhow::Context;
use clap::{Parser, ValueHint};

use crate::cli::{CommandContext, OutputFormat};
use crate::error::CliError;

/// Rebuild the catalog of a repository and print one entity
#[derive(Debug, Parser)]
pub struct FindCommand {
    /// Repository root
    #[arg(value_hint = ValueHint::DirPath)]
    root: PathBuf,

    /// Entity key
    key: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    format: OutputFormat,
}

impl FindCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let (catalog, report) = super::repo_loader(ctx)?.load_catalog(&self.root)?;
        super::report_problems(ctx, &report);

        let entity = catalog.find_by_key(&self.key)?;
        match self.format {
            OutputFormat::Json => {
                let json =
                    serde_json::to_string_pretty(entity).context("failed to serialize entity")?;
                println!("{json}");
            }
            OutputFormat::Text => {
                println!("# {}", entity.base_path().display());
                print!("{}", dump(&entity.to_mapping(), None)?);
            }
        }
        Ok(())
    }
}
