//! Show command implementation.

use std::path::PathBuf;

use ackrep_core::{dump, MetadataLoader};
use clap::{Parser, ValueHint};

use crate::cli::CommandContext;
use crate::error::CliError;

/// Print a parsed descriptor as YAML
#[derive(Debug, Parser)]
pub struct ShowCommand {
    /// Descriptor file, or the directory holding it
    #[arg(value_hint = ValueHint::AnyPath)]
    descriptor: PathBuf,

    /// Require every generic field and report soft rule violations
    #[arg(long)]
    check: bool,
}

impl ShowCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let schema = &ctx.config.schema;
        let descriptor = if self.descriptor.is_dir() {
            self.descriptor.join(&schema.descriptor_filename)
        } else {
            self.descriptor.clone()
        };

        let loader = MetadataLoader::new(schema);
        let mapping = loader.load(&descriptor, self.check)?;
        print!("{}", dump(&mapping, None)?);

        if self.check {
            let issues = loader.check_fields(&mapping);
            for issue in &issues {
                eprintln!("{}: {}", issue.field, issue.message);
            }
            if !issues.is_empty() {
                return Err(CliError::validation(format!(
                    "{} field issue(s) in {}",
                    issues.len(),
                    descriptor.display()
                )));
            }
        }
        Ok(())
    }
}
