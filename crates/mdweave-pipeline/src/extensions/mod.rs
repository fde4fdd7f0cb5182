//! Optional syntax extensions.
//!
//! Each extension adjusts the parser registries of a [`PipelineBuilder`] and
//! the renderers created from the built pipeline. They are registered by
//! name from configuration with [`by_name`] or directly through the
//! `with_*` builder methods.

mod auto_links;
mod citation;
mod custom_containers;
mod list_extras;
mod mathematics;
mod yaml_front_matter;

pub use auto_links::{AutoLinkExtension, BareUrlParser, NormalizeAutoLinkRenderer};
pub use citation::CitationExtension;
pub use custom_containers::{
    CustomContainerExtension, CustomContainerParser, HtmlCustomContainerInlineRenderer,
    HtmlCustomContainerRenderer, NormalizeCustomContainerRenderer,
};
pub use list_extras::{ListExtraItemParser, ListExtrasExtension};
pub use mathematics::{HtmlMathBlockRenderer, MathBlockParser, MathematicsExtension, NormalizeMathBlockRenderer};
pub use yaml_front_matter::{
    HtmlYamlFrontMatterRenderer, NormalizeYamlFrontMatterRenderer, YamlFrontMatterExtension,
    YamlFrontMatterParser,
};

use std::any::{Any, type_name};

use tracing::{debug, warn};

use crate::delimiter::{DelimiterDescriptor, DelimiterParser};
use crate::error::PipelineError;
use crate::pipeline::{Extension, PipelineBuilder};
use crate::registry::{AsComponent, OrderedList};

/// Names accepted by [`by_name`], in the order they are listed to users.
pub const AVAILABLE: [&str; 6] = [
    "citations",
    "yaml_front_matter",
    "list_extras",
    "custom_containers",
    "mathematics",
    "auto_links",
];

/// The extension registered under `name`.
#[must_use]
pub fn by_name(name: &str) -> Option<Box<dyn Extension>> {
    let extension: Box<dyn Extension> = match name {
        "citations" => Box::new(CitationExtension),
        "yaml_front_matter" => Box::new(YamlFrontMatterExtension),
        "list_extras" => Box::new(ListExtrasExtension),
        "custom_containers" => Box::new(CustomContainerExtension),
        "mathematics" => Box::new(MathematicsExtension),
        "auto_links" => Box::new(AutoLinkExtension),
        _ => return None,
    };
    Some(extension)
}

/// Insert `item` before the first component assignable to `K`, or first
/// when there is none.
pub(crate) fn insert_before<K: Any, T: ?Sized + AsComponent>(
    list: &mut OrderedList<T>,
    item: Box<T>,
    extension: &'static str,
) {
    let index = list.position::<K>().unwrap_or_else(|| {
        warn!(
            extension,
            anchor = type_name::<K>(),
            "Anchor component not found, inserting first"
        );
        0
    });
    list.insert(index, item);
}

/// Register `descriptor` with the pipeline's delimiter parser unless its
/// character is already governed.
pub(crate) fn add_descriptor(
    builder: &mut PipelineBuilder,
    descriptor: DelimiterDescriptor,
    extension: &'static str,
) -> Result<(), PipelineError> {
    let Some(parser) = builder.inline_parsers.find_exact_mut::<DelimiterParser>() else {
        warn!(extension, "No delimiter parser registered, delimiter not added");
        return Ok(());
    };
    if parser.has_descriptor(descriptor.character) {
        debug!(extension, character = %descriptor.character, "Delimiter already registered");
        return Ok(());
    }
    parser.add_descriptor(descriptor)
}
