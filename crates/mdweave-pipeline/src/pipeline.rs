//! Pipeline assembly.
//!
//! A [`PipelineBuilder`] holds mutable parser registries and the list of
//! extensions. [`build`](PipelineBuilder::build) lets every extension adjust
//! the parser registries, in registration order, and freezes the result into
//! a [`Pipeline`]. Parser registries of a built pipeline cannot be changed.
//!
//! Renderers are created per run. Each one is offered to every extension's
//! [`setup_renderer`](Extension::setup_renderer) and frozen before use.
//!
//! # Example
//!
//! ```
//! use mdweave_pipeline::pipeline::PipelineBuilder;
//!
//! let pipeline = PipelineBuilder::new().with_citations().build()?;
//! let html = pipeline.to_html(r#"As ""Knuth"" wrote, *premature* optimization."#)?;
//! assert_eq!(html, "<p>As <cite>Knuth</cite> wrote, <em>premature</em> optimization.</p>\n");
//! # Ok::<(), mdweave_pipeline::PipelineError>(())
//! ```

use tracing::debug;

use crate::error::PipelineError;
use crate::extensions::{
    AutoLinkExtension, CitationExtension, CustomContainerExtension, ListExtrasExtension,
    MathematicsExtension, YamlFrontMatterExtension,
};
use crate::parsers::{BlockParser, BlockProcessor, InlineParser, default_block_parsers, default_inline_parsers};
use crate::registry::{AsComponent, OrderedList};
use crate::render::html::{self, HtmlOptions};
use crate::render::normalize::{self, NormalizeOptions};
use crate::render::{HtmlRenderer, MarkdownRenderer, NormalizeRenderer};
use crate::syntax::Document;

/// A bundle of parser and renderer customisations.
///
/// Extensions are registered once per builder (by concrete type) and set up
/// in registration order.
pub trait Extension: AsComponent {
    /// Name used in configuration files and diagnostics.
    fn name(&self) -> &'static str;

    /// Adjust the parser registries before the pipeline is built.
    ///
    /// `builder.extensions` is detached and empty while setups run; the
    /// registered extensions are available from [`Pipeline::extension_names`]
    /// once the pipeline is built.
    fn setup_parsers(&self, builder: &mut PipelineBuilder) -> Result<(), PipelineError>;

    /// Adjust a renderer created from the built pipeline.
    ///
    /// Extensions downcast `renderer` to the formats they support and leave
    /// any other format untouched.
    fn setup_renderer(&self, pipeline: &Pipeline, renderer: &mut dyn MarkdownRenderer) -> Result<(), PipelineError> {
        let _ = (pipeline, renderer);
        Ok(())
    }
}

/// Mutable pipeline configuration.
pub struct PipelineBuilder {
    pub block_parsers: OrderedList<dyn BlockParser>,
    pub inline_parsers: OrderedList<dyn InlineParser>,
    /// Registered extensions, empty while [`PipelineBuilder::build`] runs
    /// their parser setup.
    pub extensions: OrderedList<dyn Extension>,
    html_options: HtmlOptions,
    normalize_options: NormalizeOptions,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineBuilder {
    /// Builder with the default block and inline parsers and no extensions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            block_parsers: default_block_parsers(),
            inline_parsers: default_inline_parsers(),
            extensions: OrderedList::new(),
            html_options: HtmlOptions::default(),
            normalize_options: NormalizeOptions::default(),
        }
    }

    /// Register an extension unless one of the same type is already registered.
    #[must_use]
    pub fn with_extension<E: Extension>(mut self, extension: E) -> Self {
        self.extensions.add_if_not_already::<E>(Box::new(extension));
        self
    }

    /// Register a boxed extension unless one of the same concrete type is
    /// already registered.
    #[must_use]
    pub fn with_boxed_extension(mut self, extension: Box<dyn Extension>) -> Self {
        let kind = extension.as_any().type_id();
        if !self
            .extensions
            .iter()
            .any(|registered| registered.as_any().type_id() == kind)
        {
            self.extensions.push(extension);
        }
        self
    }

    /// `""quoted""` spans rendered as `<cite>`.
    #[must_use]
    pub fn with_citations(self) -> Self {
        self.with_extension(CitationExtension)
    }

    /// `---` delimited YAML block at the start of the document.
    #[must_use]
    pub fn with_yaml_front_matter(self) -> Self {
        self.with_extension(YamlFrontMatterExtension)
    }

    /// Alphabetic and roman ordered list markers.
    #[must_use]
    pub fn with_list_extras(self) -> Self {
        self.with_extension(ListExtrasExtension)
    }

    /// `:::` fenced containers and `::inline::` spans.
    #[must_use]
    pub fn with_custom_containers(self) -> Self {
        self.with_extension(CustomContainerExtension)
    }

    /// `$$` display math blocks.
    #[must_use]
    pub fn with_mathematics(self) -> Self {
        self.with_extension(MathematicsExtension)
    }

    /// Links recognised from bare URLs in text.
    #[must_use]
    pub fn with_auto_links(self) -> Self {
        self.with_extension(AutoLinkExtension)
    }

    #[must_use]
    pub fn with_html_options(mut self, options: HtmlOptions) -> Self {
        self.html_options = options;
        self
    }

    #[must_use]
    pub fn with_normalize_options(mut self, options: NormalizeOptions) -> Self {
        self.normalize_options = options;
        self
    }

    /// Run every extension's parser setup and freeze the result.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by an extension's parser setup.
    pub fn build(mut self) -> Result<Pipeline, PipelineError> {
        let extensions = std::mem::take(&mut self.extensions);
        for extension in &extensions {
            extension.setup_parsers(&mut self)?;
        }

        let pipeline = Pipeline {
            block_parsers: self.block_parsers,
            inline_parsers: self.inline_parsers,
            extensions,
            html_options: self.html_options,
            normalize_options: self.normalize_options,
        };
        debug!(
            extensions = ?pipeline.extension_names(),
            block_parsers = pipeline.block_parsers.len(),
            inline_parsers = pipeline.inline_parsers.len(),
            "Pipeline built"
        );
        Ok(pipeline)
    }
}

/// An immutable, shareable parsing and rendering configuration.
pub struct Pipeline {
    block_parsers: OrderedList<dyn BlockParser>,
    inline_parsers: OrderedList<dyn InlineParser>,
    extensions: OrderedList<dyn Extension>,
    html_options: HtmlOptions,
    normalize_options: NormalizeOptions,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("block_parsers", &self.block_parsers)
            .field("inline_parsers", &self.inline_parsers)
            .field("extensions", &self.extension_names())
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Parse markdown into a document.
    #[must_use]
    pub fn parse(&self, markdown: &str) -> Document {
        BlockProcessor::new(&self.block_parsers, &self.inline_parsers).parse_document(markdown)
    }

    #[must_use]
    pub fn block_parsers(&self) -> &OrderedList<dyn BlockParser> {
        &self.block_parsers
    }

    #[must_use]
    pub fn inline_parsers(&self) -> &OrderedList<dyn InlineParser> {
        &self.inline_parsers
    }

    #[must_use]
    pub fn extensions(&self) -> &OrderedList<dyn Extension> {
        &self.extensions
    }

    /// Names of the registered extensions, in setup order.
    #[must_use]
    pub fn extension_names(&self) -> Vec<&'static str> {
        self.extensions.iter().map(|extension| extension.name()).collect()
    }

    #[must_use]
    pub fn html_options(&self) -> HtmlOptions {
        self.html_options
    }

    #[must_use]
    pub fn normalize_options(&self) -> NormalizeOptions {
        self.normalize_options
    }

    /// Offer `renderer` to every extension in registration order.
    ///
    /// For renderers built by the caller; [`html_renderer`](Self::html_renderer)
    /// and [`normalize_renderer`](Self::normalize_renderer) call this
    /// themselves. The renderer is not frozen.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by an extension, typically
    /// [`PipelineError::Frozen`] when `renderer` is already frozen.
    pub fn setup_renderer(&self, renderer: &mut dyn MarkdownRenderer) -> Result<(), PipelineError> {
        for extension in &self.extensions {
            extension.setup_renderer(self, renderer)?;
        }
        debug!(renderer = renderer.kind_name(), "Renderer set up");
        Ok(())
    }

    /// A frozen HTML renderer with every extension set up.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by an extension's renderer setup.
    pub fn html_renderer(&self) -> Result<HtmlRenderer, PipelineError> {
        let mut renderer = html::renderer(self.html_options);
        self.setup_renderer(&mut renderer)?;
        renderer.freeze();
        Ok(renderer)
    }

    /// A frozen normalize renderer with every extension set up.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by an extension's renderer setup.
    pub fn normalize_renderer(&self) -> Result<NormalizeRenderer, PipelineError> {
        let mut renderer = normalize::renderer(self.normalize_options);
        self.setup_renderer(&mut renderer)?;
        renderer.freeze();
        Ok(renderer)
    }

    /// Parse and render markdown as HTML.
    ///
    /// # Errors
    ///
    /// Returns an error if an extension fails to set up the renderer.
    pub fn to_html(&self, markdown: &str) -> Result<String, PipelineError> {
        let document = self.parse(markdown);
        Ok(self.html_renderer()?.render(&document))
    }

    /// Parse markdown and write it back in normalized form.
    ///
    /// # Errors
    ///
    /// Returns an error if an extension fails to set up the renderer.
    pub fn normalize(&self, markdown: &str) -> Result<String, PipelineError> {
        let document = self.parse(markdown);
        Ok(self.normalize_renderer()?.render(&document))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::delimiter::{DelimiterDescriptor, DelimiterParser};
    use crate::registry::Component;
    use crate::render::ObjectRenderer;
    use crate::render::html::{EmphasisRenderer, HtmlWriter};
    use crate::syntax::{Node, SpanNode};
    use pretty_assertions::assert_eq;

    /// Registers `~~` spans and renders them as `<del>`, counting setups.
    struct Strikethrough {
        renderer_setups: Arc<AtomicUsize>,
    }

    impl Component for Strikethrough {}

    impl Extension for Strikethrough {
        fn name(&self) -> &'static str {
            "strikethrough"
        }

        fn setup_parsers(&self, builder: &mut PipelineBuilder) -> Result<(), PipelineError> {
            if let Some(parser) = builder.inline_parsers.find_exact_mut::<DelimiterParser>()
                && !parser.has_descriptor('~')
            {
                parser.add_descriptor(DelimiterDescriptor::new('~', 2, 2, true)?)?;
            }
            Ok(())
        }

        fn setup_renderer(&self, _: &Pipeline, renderer: &mut dyn MarkdownRenderer) -> Result<(), PipelineError> {
            self.renderer_setups.fetch_add(1, Ordering::SeqCst);
            if let Some(html) = renderer.downcast_mut::<HtmlRenderer>()
                && let Some(emphasis) = html.find_exact_mut::<EmphasisRenderer>()?
            {
                emphasis
                    .tags_mut()
                    .push(|span: &SpanNode| (span.delimiter == '~').then_some("del"))?;
            }
            Ok(())
        }
    }

    fn strikethrough() -> (Strikethrough, Arc<AtomicUsize>) {
        let counter = Arc::new(AtomicUsize::new(0));
        (
            Strikethrough {
                renderer_setups: Arc::clone(&counter),
            },
            counter,
        )
    }

    /// Records how many extensions the builder lists during its own setup.
    struct ExtensionCounter {
        seen: Arc<AtomicUsize>,
    }

    impl Component for ExtensionCounter {}

    impl Extension for ExtensionCounter {
        fn name(&self) -> &'static str {
            "listing"
        }

        fn setup_parsers(&self, builder: &mut PipelineBuilder) -> Result<(), PipelineError> {
            self.seen.store(builder.extensions.len(), Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_extension_list_is_detached_during_setup() {
        let seen = Arc::new(AtomicUsize::new(usize::MAX));
        let (extension, _) = strikethrough();
        let pipeline = PipelineBuilder::new()
            .with_extension(extension)
            .with_extension(ExtensionCounter { seen: Arc::clone(&seen) })
            .build()
            .unwrap();

        assert_eq!(seen.load(Ordering::SeqCst), 0);
        assert_eq!(pipeline.extension_names(), vec!["strikethrough", "listing"]);
    }

    #[test]
    fn test_pipeline_is_send_sync() {
        static_assertions::assert_impl_all!(Pipeline: Send, Sync);
    }

    #[test]
    fn test_extension_configures_parser_and_renderer() {
        let (extension, setups) = strikethrough();
        let pipeline = PipelineBuilder::new().with_extension(extension).build().unwrap();

        assert_eq!(
            pipeline.to_html("~~gone~~ and *kept*").unwrap(),
            "<p><del>gone</del> and <em>kept</em></p>\n"
        );
        assert_eq!(pipeline.normalize("~~gone~~").unwrap(), "~~gone~~\n");
        assert_eq!(setups.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_extension_registered_once_per_type() {
        let (first, _) = strikethrough();
        let (second, _) = strikethrough();
        let pipeline = PipelineBuilder::new()
            .with_extension(first)
            .with_extension(second)
            .with_citations()
            .with_citations()
            .build()
            .unwrap();
        assert_eq!(pipeline.extension_names(), vec!["strikethrough", "citations"]);
    }

    #[test]
    fn test_boxed_extension_deduplicates_by_type() {
        let pipeline = PipelineBuilder::new()
            .with_citations()
            .with_boxed_extension(Box::new(CitationExtension))
            .with_boxed_extension(Box::new(MathematicsExtension))
            .build()
            .unwrap();
        assert_eq!(pipeline.extension_names(), vec!["citations", "mathematics"]);
    }

    #[test]
    fn test_setup_on_frozen_renderer_fails() {
        let (extension, _) = strikethrough();
        let pipeline = PipelineBuilder::new().with_extension(extension).build().unwrap();
        let mut renderer = pipeline.html_renderer().unwrap();

        let err = pipeline.setup_renderer(&mut renderer).unwrap_err();
        assert!(matches!(err, PipelineError::Frozen(_)));
    }

    #[test]
    fn test_caller_built_renderer_is_set_up() {
        let (extension, setups) = strikethrough();
        let pipeline = PipelineBuilder::new().with_extension(extension).build().unwrap();

        let mut renderer = html::renderer(HtmlOptions::default());
        pipeline.setup_renderer(&mut renderer).unwrap();
        assert!(!renderer.is_frozen());
        assert_eq!(setups.load(Ordering::SeqCst), 1);

        let document = pipeline.parse("~~x~~");
        assert_eq!(renderer.render(&document), "<p><del>x</del></p>\n");
    }

    #[test]
    fn test_inserted_renderer_takes_precedence() {
        struct DropsEmphasis;
        impl Component for DropsEmphasis {}
        impl ObjectRenderer<HtmlWriter> for DropsEmphasis {
            fn accept(&self, _: &HtmlWriter, node: Node<'_>) -> bool {
                node.as_span().is_some()
            }
            fn write(&self, _: &mut crate::render::RenderContext<'_, HtmlWriter>, _: Node<'_>) {}
        }

        let pipeline = PipelineBuilder::new().build().unwrap();
        let mut renderer = html::renderer(HtmlOptions::default());
        renderer
            .object_renderers_mut()
            .unwrap()
            .insert(0, Box::new(DropsEmphasis));
        let document = pipeline.parse("a *b* c");
        assert_eq!(renderer.render(&document), "<p>a  c</p>\n");
    }

    #[test]
    fn test_builder_registries_are_public() {
        let mut builder = PipelineBuilder::new();
        assert!(builder.inline_parsers.try_remove::<DelimiterParser>());
        let pipeline = builder.build().unwrap();
        assert_eq!(pipeline.to_html("*x*").unwrap(), "<p>*x*</p>\n");
    }
}
