use super::insert_before;
use crate::error::PipelineError;
use crate::parsers::inline::LinkParser;
use crate::parsers::{Cursor, InlineParser, InlineProcessor};
use crate::pipeline::{Extension, Pipeline, PipelineBuilder};
use crate::registry::Component;
use crate::render::normalize::{self, NormalizeWriter};
use crate::render::{MarkdownRenderer, NormalizeRenderer, ObjectRenderer, OutputWriter, RenderContext};
use crate::syntax::{Inline, Link, LinkKind, Node, plain_text};

/// Bare URLs in text become links.
///
/// Recognised prefixes are `http://`, `https://`, `ftp://`, `mailto:` and
/// `www.`. HTML output renders them like any link; normalized output expands
/// them to `[url](url)` unless
/// [`expand_auto_links`](crate::render::normalize::NormalizeOptions::expand_auto_links)
/// is off.
#[derive(Debug, Default)]
pub struct AutoLinkExtension;

impl Component for AutoLinkExtension {}

impl Extension for AutoLinkExtension {
    fn name(&self) -> &'static str {
        "auto_links"
    }

    fn setup_parsers(&self, builder: &mut PipelineBuilder) -> Result<(), PipelineError> {
        if !builder.inline_parsers.contains::<BareUrlParser>() {
            insert_before::<LinkParser, _>(&mut builder.inline_parsers, Box::new(BareUrlParser), self.name());
        }
        Ok(())
    }

    fn setup_renderer(&self, _: &Pipeline, renderer: &mut dyn MarkdownRenderer) -> Result<(), PipelineError> {
        if let Some(normalize_renderer) = renderer.downcast_mut::<NormalizeRenderer>() {
            let registry = normalize_renderer.object_renderers_mut()?;
            if !registry.contains::<NormalizeAutoLinkRenderer>() {
                insert_before::<normalize::LinkRenderer, _>(
                    registry,
                    Box::new(NormalizeAutoLinkRenderer),
                    self.name(),
                );
            }
        }
        Ok(())
    }
}

const PREFIXES: [&str; 5] = ["http://", "https://", "ftp://", "mailto:", "www."];

/// Characters that end a sentence rather than a URL.
const TRAILING: &[char] = &['.', ',', ':', ';', '!', '?', '\'', '"', '*', '_', '~'];

/// Recognises bare URLs at word starts.
#[derive(Debug, Default)]
pub struct BareUrlParser;

impl Component for BareUrlParser {}

impl InlineParser for BareUrlParser {
    fn opening_chars(&self) -> &[char] {
        &['h', 'f', 'm', 'w']
    }

    fn try_match(&self, _processor: &InlineProcessor<'_>, cursor: &mut Cursor<'_>) -> Option<Inline> {
        if cursor.prev().is_some_and(char::is_alphanumeric) {
            return None;
        }
        let rest = cursor.rest();
        let prefix = PREFIXES.iter().find(|prefix| rest.starts_with(*prefix))?;

        let end = rest
            .find(|c: char| c.is_whitespace() || c == '<')
            .unwrap_or(rest.len());
        let text = trim_trailing(&rest[..end]);
        let target = text.get(prefix.len()..).filter(|target| !target.is_empty())?;
        if !target.starts_with(|c: char| c.is_alphanumeric()) {
            return None;
        }

        let url = if *prefix == "www." {
            format!("http://{text}")
        } else {
            text.to_owned()
        };
        cursor.bump_bytes(text.len());
        Some(Inline::Link(Link {
            url,
            title: None,
            kind: LinkKind::BareUrl,
            children: vec![Inline::text(text)],
        }))
    }
}

/// Strip sentence punctuation and unbalanced closing parentheses.
fn trim_trailing(mut text: &str) -> &str {
    loop {
        let trimmed = text.trim_end_matches(TRAILING);
        let trimmed = match trimmed.strip_suffix(')') {
            Some(inner) if trimmed.matches(')').count() > trimmed.matches('(').count() => inner,
            _ => trimmed,
        };
        if trimmed.len() == text.len() {
            return text;
        }
        text = trimmed;
    }
}

/// Writes bare URLs as written when auto-link expansion is off.
#[derive(Debug, Default)]
pub struct NormalizeAutoLinkRenderer;

impl Component for NormalizeAutoLinkRenderer {}

impl ObjectRenderer<NormalizeWriter> for NormalizeAutoLinkRenderer {
    fn accept(&self, writer: &NormalizeWriter, node: Node<'_>) -> bool {
        !writer.options().expand_auto_links
            && matches!(node, Node::Inline(Inline::Link(link)) if link.kind == LinkKind::BareUrl)
    }

    fn write(&self, ctx: &mut RenderContext<'_, NormalizeWriter>, node: Node<'_>) {
        if let Some(Inline::Link(link)) = node.as_inline() {
            ctx.writer.write(&plain_text(&link.children));
        }
    }
}
