//! List command implementation.

use std::collections::BTreeMap;
use std::path::PathBuf;

use ackrep_core::{Entity, EntityKind};
use anyhow::Context;
use clap::{Parser, ValueHint};

use crate::cli::{CommandContext, OutputFormat};
use crate::error::CliError;

/// Rebuild the catalog of a repository and list its entities by type
#[derive(Debug, Parser)]
pub struct ListCommand {
    /// Repository root
    #[arg(value_hint = ValueHint::DirPath)]
    pub root: PathBuf,

    /// Only list entities of this type
    #[arg(short = 't', long = "type", value_parser = parse_kind)]
    pub kind: Option<EntityKind>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

impl ListCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let (catalog, report) = super::repo_loader(ctx)?.load_catalog(&self.root)?;
        super::report_problems(ctx, &report);

        let mut groups = catalog.all_grouped_by_variant();
        if let Some(kind) = self.kind {
            groups.retain(|k, _| *k == kind);
        }

        match self.format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&groups)
                    .context("failed to serialize catalog")?;
                println!("{json}");
            }
            OutputFormat::Text => print_text(&groups),
        }
        Ok(())
    }
}

fn print_text(groups: &BTreeMap<EntityKind, Vec<&Entity>>) {
    for (kind, entities) in groups {
        if entities.is_empty() {
            continue;
        }
        println!("{kind} ({})", entities.len());
        for entity in entities {
            println!(
                "  {}  {}  {}",
                entity.key(),
                entity.name(),
                entity.base_path().display()
            );
        }
    }
}

fn parse_kind(s: &str) -> Result<EntityKind, String> {
    s.parse::<EntityKind>().map_err(|e| e.to_string())
}
