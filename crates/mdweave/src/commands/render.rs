//! `mdweave render` command implementation.

use std::io::{Read, Write};
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use mdweave_config::{CliSettings, Config, ExtensionName};
use tracing::info;

use super::build_pipeline;
use crate::error::CliError;

/// Output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    Html,
    Normalize,
}

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render (default: stdin).
    file: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover mdweave.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Html)]
    format: Format,

    /// Extension to enable, in registration order (replaces the configured list).
    #[arg(short = 'e', long = "extension")]
    extensions: Vec<ExtensionName>,

    /// Write literal text without HTML escaping.
    #[arg(long)]
    no_escape: bool,

    /// Keep bare URLs as written in normalized output.
    #[arg(long)]
    no_expand_auto_links: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the input cannot be read.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = self.cli_settings();
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let pipeline = build_pipeline(&config)?;

        let markdown = match &self.file {
            Some(path) => std::fs::read_to_string(path)?,
            None => {
                let mut buffer = String::new();
                std::io::stdin().read_to_string(&mut buffer)?;
                buffer
            }
        };

        info!(
            format = ?self.format,
            extensions = ?pipeline.extension_names(),
            bytes = markdown.len(),
            "Rendering"
        );
        let rendered = match self.format {
            Format::Html => pipeline.to_html(&markdown)?,
            Format::Normalize => pipeline.normalize(&markdown)?,
        };

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(rendered.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }

    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            extensions: (!self.extensions.is_empty()).then(|| self.extensions.clone()),
            escape_html: self.no_escape.then_some(false),
            expand_auto_links: self.no_expand_auto_links.then_some(false),
        }
    }
}
