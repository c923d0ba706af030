//! Key command implementation.

use ackrep_common_core::EntityKey;
use clap::Parser;

use crate::cli::CommandContext;
use crate::error::CliError;

/// Print a random entity key
#[derive(Debug, Parser)]
pub struct KeyCommand {
    /// Number of keys to print
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,
}

impl KeyCommand {
    pub fn execute(&self, _ctx: &CommandContext) -> Result<(), CliError> {
        for _ in 0..self.count {
            println!("{}", EntityKey::generate());
        }
        Ok(())
    }
}
