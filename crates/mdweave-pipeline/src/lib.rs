//! Extensible markdown pipeline with ordered, type-queryable registries.
//!
//! A [`Pipeline`] is assembled by a [`PipelineBuilder`] from three ordered
//! registries: block parsers, inline parsers and extensions. Extensions
//! configure the parser registries when the pipeline is built and the
//! object renderer registry of every renderer created from it.
//!
//! # Architecture
//!
//! - [`registry::OrderedList`]: ordered components addressable by concrete type
//! - [`delimiter`]: delimiter-run matching for emphasis-like spans
//! - [`render`]: claim/emit dispatch over object renderers, plus
//!   [`render::DecisionChain`] for newest-first overridable decisions
//! - [`extensions`]: citations, YAML front matter, list extras, custom
//!   containers, mathematics and bare URL links
//!
//! # Example
//!
//! ```
//! use mdweave_pipeline::PipelineBuilder;
//!
//! let pipeline = PipelineBuilder::new().with_auto_links().build()?;
//! let html = pipeline.to_html("**Bold** text, see https://example.com")?;
//! assert_eq!(
//!     html,
//!     "<p><strong>Bold</strong> text, see <a href=\"https://example.com\">https://example.com</a></p>\n"
//! );
//! # Ok::<(), mdweave_pipeline::PipelineError>(())
//! ```

pub mod delimiter;
mod error;
pub mod extensions;
pub mod parsers;
pub mod pipeline;
pub mod registry;
pub mod render;
pub mod syntax;

pub use error::PipelineError;
pub use pipeline::{Extension, Pipeline, PipelineBuilder};
pub use render::{HtmlRenderer, MarkdownRenderer, NormalizeRenderer, escape_html};
