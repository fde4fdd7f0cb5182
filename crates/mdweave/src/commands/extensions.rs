//! `mdweave extensions` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdweave_config::{Config, ExtensionName};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the extensions command.
#[derive(Args)]
pub(crate) struct ExtensionsArgs {
    /// Path to configuration file (default: auto-discover mdweave.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl ExtensionsArgs {
    /// Execute the extensions command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;

        output.highlight("Available extensions");
        for line in listing(&config.pipeline.extensions) {
            if line.enabled {
                output.success(&line.text);
            } else {
                output.info(&line.text);
            }
        }
        Ok(())
    }
}

struct ListingLine {
    text: String,
    enabled: bool,
}

/// Enabled extensions first, numbered in registration order, then the rest.
fn listing(enabled: &[ExtensionName]) -> Vec<ListingLine> {
    let numbered = enabled.iter().enumerate().map(|(index, name)| ListingLine {
        text: format!("  {}. {name}", index + 1),
        enabled: true,
    });
    let rest = ExtensionName::ALL
        .into_iter()
        .filter(|name| !enabled.contains(name))
        .map(|name| ListingLine {
            text: format!("     {name}"),
            enabled: false,
        });
    numbered.chain(rest).collect()
}
