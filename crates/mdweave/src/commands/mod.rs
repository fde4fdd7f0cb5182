//! CLI command implementations.

pub(crate) mod extensions;
pub(crate) mod render;

pub(crate) use extensions::ExtensionsArgs;
pub(crate) use render::RenderArgs;

use mdweave_config::Config;
use mdweave_pipeline::render::html::HtmlOptions;
use mdweave_pipeline::render::normalize::NormalizeOptions;
use mdweave_pipeline::{Pipeline, PipelineBuilder};

use crate::error::CliError;

/// Assemble a pipeline from configuration, registering extensions in the
/// configured order.
pub(crate) fn build_pipeline(config: &Config) -> Result<Pipeline, CliError> {
    let mut builder = PipelineBuilder::new()
        .with_html_options(HtmlOptions {
            escape: config.html.escape,
            block_tags: config.html.block_tags,
            inline_tags: config.html.inline_tags,
        })
        .with_normalize_options(NormalizeOptions {
            expand_auto_links: config.normalize.expand_auto_links,
            empty_line_after_heading: config.normalize.empty_line_after_heading,
            empty_line_after_code_block: config.normalize.empty_line_after_code_block,
        });

    for name in &config.pipeline.extensions {
        let extension = mdweave_pipeline::extensions::by_name(name.as_str())
            .ok_or_else(|| CliError::Validation(format!("extension {name} is not available")))?;
        builder = builder.with_boxed_extension(extension);
    }

    Ok(builder.build()?)
}
