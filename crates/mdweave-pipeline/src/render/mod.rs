//! Cooperative renderer dispatch.
//!
//! A [`Renderer`] owns an output writer and an ordered registry of
//! [`ObjectRenderer`]s. Every node of the document is offered to the object
//! renderers in registry order; the first whose [`accept`](ObjectRenderer::accept)
//! returns `true` writes it. A node no renderer accepts is skipped.
//!
//! Extensions specialise output by inserting object renderers ahead of the
//! generic ones, or by pushing strategies onto a renderer's
//! [`DecisionChain`].
//!
//! # Lifecycle
//!
//! The registry is mutable until [`Renderer::freeze`]. The pipeline freezes
//! every renderer it hands out once extension setup has run.

mod decision;
pub mod html;
pub mod normalize;

pub use decision::{Decision, DecisionChain};

use tracing::trace;

use crate::error::PipelineError;
use crate::registry::{AsComponent, Component, OrderedList};
use crate::syntax::{Block, Document, HtmlAttributes, Inline, Node};

/// Text sink used by object renderers.
pub trait OutputWriter: Send + Sync + 'static {
    /// Write text as is.
    fn write(&mut self, text: &str);

    /// Write text with output-format escaping applied.
    fn write_escaped(&mut self, text: &str);

    /// Start a new line unless already at the start of one.
    fn ensure_line(&mut self);

    /// Write text followed by a line ending.
    fn write_line(&mut self, text: &str) {
        self.write(text);
        self.write("\n");
    }

    /// Write node attributes, if the format has any.
    fn write_attributes(&mut self, attributes: &HtmlAttributes) {
        let _ = attributes;
    }

    /// Take the accumulated output, leaving the writer empty.
    fn take_output(&mut self) -> String;
}

/// Renders the nodes it accepts.
pub trait ObjectRenderer<W: OutputWriter>: AsComponent {
    /// Claim a node. Must not write anything.
    fn accept(&self, writer: &W, node: Node<'_>) -> bool;

    /// Write a node previously accepted.
    fn write(&self, ctx: &mut RenderContext<'_, W>, node: Node<'_>);

    /// Called when the owning renderer is frozen; freeze any decision chains.
    fn freeze(&mut self) {}
}

/// Dispatch state handed to object renderers while writing.
pub struct RenderContext<'r, W: OutputWriter> {
    pub writer: &'r mut W,
    renderers: &'r OrderedList<dyn ObjectRenderer<W>>,
}

impl<'r, W: OutputWriter> RenderContext<'r, W> {
    #[must_use]
    pub fn new(writer: &'r mut W, renderers: &'r OrderedList<dyn ObjectRenderer<W>>) -> Self {
        Self { writer, renderers }
    }

    /// Offer `node` to the object renderers in order; the first to accept writes it.
    pub fn render(&mut self, node: Node<'_>) {
        let renderers = self.renderers;
        match renderers.iter().find(|renderer| renderer.accept(&*self.writer, node)) {
            Some(renderer) => renderer.write(self, node),
            None => trace!(?node, "no object renderer accepted node"),
        }
    }

    pub fn render_blocks(&mut self, blocks: &[Block]) {
        for block in blocks {
            self.render(Node::Block(block));
        }
    }

    pub fn render_inlines(&mut self, inlines: &[Inline]) {
        for inline in inlines {
            self.render(Node::Inline(inline));
        }
    }
}

/// Object-safe view of a renderer, used by extension setup.
///
/// Extensions recognise the output format they target by downcasting:
///
/// ```
/// use mdweave_pipeline::render::{HtmlRenderer, MarkdownRenderer};
///
/// fn setup(renderer: &mut dyn MarkdownRenderer) {
///     if let Some(html) = renderer.downcast_mut::<HtmlRenderer>() {
///         // insert HTML object renderers here
///         let _ = html.object_renderers().len();
///     }
/// }
/// # setup(&mut mdweave_pipeline::render::html::renderer(Default::default()));
/// ```
pub trait MarkdownRenderer: AsComponent {
    /// Render a document, returning the output.
    fn render(&mut self, document: &Document) -> String;

    /// Freeze the object renderer registry and all decision chains.
    fn freeze(&mut self);

    fn is_frozen(&self) -> bool;
}

impl<'a> dyn MarkdownRenderer + 'a {
    /// The renderer as its concrete type.
    pub fn downcast_mut<R: MarkdownRenderer>(&mut self) -> Option<&mut R> {
        self.as_any_mut().downcast_mut::<R>()
    }

    /// The renderer as its concrete type.
    #[must_use]
    pub fn downcast_ref<R: MarkdownRenderer>(&self) -> Option<&R> {
        self.as_any().downcast_ref::<R>()
    }
}

/// Output writer plus an ordered registry of object renderers.
pub struct Renderer<W: OutputWriter> {
    writer: W,
    object_renderers: OrderedList<dyn ObjectRenderer<W>>,
    frozen: bool,
}

/// Renderer producing HTML.
pub type HtmlRenderer = Renderer<html::HtmlWriter>;

/// Renderer producing normalized markdown.
pub type NormalizeRenderer = Renderer<normalize::NormalizeWriter>;

impl<W: OutputWriter> Renderer<W> {
    /// Renderer with an empty object renderer registry.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            object_renderers: OrderedList::new(),
            frozen: false,
        }
    }

    #[must_use]
    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    #[must_use]
    pub fn object_renderers(&self) -> &OrderedList<dyn ObjectRenderer<W>> {
        &self.object_renderers
    }

    /// Mutable access to the object renderer registry.
    ///
    /// Fails with [`PipelineError::Frozen`] once the renderer is frozen.
    pub fn object_renderers_mut(&mut self) -> Result<&mut OrderedList<dyn ObjectRenderer<W>>, PipelineError> {
        if self.frozen {
            return Err(PipelineError::Frozen("object renderer registry"));
        }
        Ok(&mut self.object_renderers)
    }

    /// Mutable access to the first object renderer whose concrete type is `R`.
    ///
    /// Fails with [`PipelineError::Frozen`] once the renderer is frozen.
    pub fn find_exact_mut<R: ObjectRenderer<W>>(&mut self) -> Result<Option<&mut R>, PipelineError> {
        Ok(self.object_renderers_mut()?.find_exact_mut::<R>())
    }
}

impl<W: OutputWriter> Component for Renderer<W> {}

impl<W: OutputWriter> MarkdownRenderer for Renderer<W> {
    fn render(&mut self, document: &Document) -> String {
        let mut ctx = RenderContext::new(&mut self.writer, &self.object_renderers);
        ctx.render_blocks(&document.blocks);
        self.writer.take_output()
    }

    fn freeze(&mut self) {
        for renderer in self.object_renderers.iter_mut() {
            renderer.freeze();
        }
        self.frozen = true;
    }

    fn is_frozen(&self) -> bool {
        self.frozen
    }
}

/// Escape `&`, `<`, `>` and `"` for HTML text and attribute values.
#[must_use]
pub fn escape_html(text: &str) -> std::borrow::Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"']) {
        return std::borrow::Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    std::borrow::Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::syntax::{Paragraph, SpanNode};

    #[derive(Default)]
    struct Recorder {
        output: String,
    }

    impl OutputWriter for Recorder {
        fn write(&mut self, text: &str) {
            self.output.push_str(text);
        }

        fn write_escaped(&mut self, text: &str) {
            self.output.push_str(&escape_html(text));
        }

        fn ensure_line(&mut self) {
            if !self.output.is_empty() && !self.output.ends_with('\n') {
                self.output.push('\n');
            }
        }

        fn take_output(&mut self) -> String {
            std::mem::take(&mut self.output)
        }
    }

    /// Counts the spans it writes; accepts spans of one width or of any width.
    struct Counting {
        width: Option<usize>,
        emitted: Arc<AtomicUsize>,
        label: &'static str,
    }

    impl Component for Counting {}

    impl ObjectRenderer<Recorder> for Counting {
        fn accept(&self, _: &Recorder, node: Node<'_>) -> bool {
            node.as_span()
                .is_some_and(|span| self.width.is_none_or(|width| span.width == width))
        }

        fn write(&self, ctx: &mut RenderContext<'_, Recorder>, _: Node<'_>) {
            self.emitted.fetch_add(1, Ordering::SeqCst);
            ctx.writer.write(self.label);
        }
    }

    struct Paragraphs;

    impl Component for Paragraphs {}

    impl ObjectRenderer<Recorder> for Paragraphs {
        fn accept(&self, _: &Recorder, node: Node<'_>) -> bool {
            matches!(node, Node::Block(Block::Paragraph(_)))
        }

        fn write(&self, ctx: &mut RenderContext<'_, Recorder>, node: Node<'_>) {
            if let Some(Block::Paragraph(paragraph)) = node.as_block() {
                ctx.render_inlines(&paragraph.inlines);
            }
        }
    }

    fn span(width: usize) -> Inline {
        Inline::Span(SpanNode {
            delimiter: '*',
            width,
            children: Vec::new(),
        })
    }

    fn document(inlines: Vec<Inline>) -> Document {
        Document {
            blocks: vec![Block::Paragraph(Paragraph { inlines })],
        }
    }

    #[test]
    fn test_first_accepting_renderer_writes() {
        let specific = Arc::new(AtomicUsize::new(0));
        let general = Arc::new(AtomicUsize::new(0));

        let mut renderer = Renderer::new(Recorder::default());
        let registry = renderer.object_renderers_mut().unwrap();
        registry.push(Box::new(Paragraphs));
        registry.push(Box::new(Counting {
            width: Some(2),
            emitted: Arc::clone(&specific),
            label: "S",
        }));
        registry.push(Box::new(Counting {
            width: None,
            emitted: Arc::clone(&general),
            label: "G",
        }));

        let output = renderer.render(&document(vec![span(2), span(1), span(2)]));

        assert_eq!(output, "SGS");
        assert_eq!(specific.load(Ordering::SeqCst), 2);
        assert_eq!(general.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unclaimed_nodes_are_skipped() {
        let mut renderer = Renderer::new(Recorder::default());
        renderer
            .object_renderers_mut()
            .unwrap()
            .push(Box::new(Paragraphs));

        let output = renderer.render(&document(vec![span(1), Inline::text("x")]));
        assert_eq!(output, "");
    }

    #[test]
    fn test_frozen_registry_rejects_mutation() {
        let mut renderer = Renderer::new(Recorder::default());
        renderer.freeze();

        assert!(renderer.is_frozen());
        assert!(matches!(
            renderer.object_renderers_mut(),
            Err(PipelineError::Frozen(_))
        ));
        assert!(renderer.find_exact_mut::<Paragraphs>().is_err());
    }

    #[test]
    fn test_downcast_through_trait_object() {
        let mut renderer = Renderer::new(Recorder::default());
        let dynamic: &mut dyn MarkdownRenderer = &mut renderer;
        assert!(dynamic.downcast_mut::<Renderer<Recorder>>().is_some());
        assert!(dynamic.downcast_ref::<HtmlRenderer>().is_none());
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("plain"), "plain");
        assert_eq!(escape_html(r#"<a href="x">&</a>"#), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }
}
