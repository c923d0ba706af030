//! Render command implementation.

use std::path::PathBuf;

use ackrep_core::{TemplateContext, TemplateRenderer};
use clap::{Parser, ValueHint};
use tracing::info;

use crate::cli::CommandContext;
use crate::error::CliError;

/// Render a template, using an entity's fields as context
#[derive(Debug, Parser)]
pub struct RenderCommand {
    /// Template path, relative to the base directory
    #[arg(value_hint = ValueHint::FilePath)]
    template: PathBuf,

    /// Output file; derived from the template name when omitted
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    target: Option<PathBuf>,

    /// Directory the template path is resolved against
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    base: Option<PathBuf>,

    /// Entity directory whose descriptor provides the context
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    entity_dir: Option<PathBuf>,

    /// Print the rendered text instead of writing it
    #[arg(long, conflicts_with = "target")]
    stdout: bool,
}

impl RenderCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let schema = &ctx.config.schema;

        let context = match &self.entity_dir {
            Some(dir) => {
                let descriptor = dir.join(&schema.descriptor_filename);
                super::repo_loader(ctx)?
                    .load_entity(&descriptor)?
                    .template_context()
            }
            None => TemplateContext::new(),
        };

        let mut renderer =
            TemplateRenderer::new().with_marker_token(schema.template_marker_token.clone());
        if let Some(base) = &self.base {
            renderer = renderer.with_base_path(base);
        }

        if self.stdout {
            print!("{}", renderer.render_to_string(&self.template, &context)?);
            return Ok(());
        }

        let output = renderer.render(&self.template, &context, self.target.as_deref())?;
        info!(output = %output.target_path.display(), "template rendered");
        if !ctx.quiet {
            println!("{}", output.target_path.display());
        }
        Ok(())
    }
}
