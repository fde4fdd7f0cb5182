use super::add_descriptor;
use crate::delimiter::DelimiterDescriptor;
use crate::error::PipelineError;
use crate::pipeline::{Extension, Pipeline, PipelineBuilder};
use crate::registry::Component;
use crate::render::html::EmphasisRenderer;
use crate::render::{HtmlRenderer, MarkdownRenderer};
use crate::syntax::SpanNode;

/// `""title""` rendered as `<cite>title</cite>`.
#[derive(Debug, Default)]
pub struct CitationExtension;

impl Component for CitationExtension {}

impl Extension for CitationExtension {
    fn name(&self) -> &'static str {
        "citations"
    }

    fn setup_parsers(&self, builder: &mut PipelineBuilder) -> Result<(), PipelineError> {
        add_descriptor(builder, DelimiterDescriptor::new('"', 2, 2, false)?, self.name())
    }

    fn setup_renderer(&self, _: &Pipeline, renderer: &mut dyn MarkdownRenderer) -> Result<(), PipelineError> {
        if let Some(html) = renderer.downcast_mut::<HtmlRenderer>()
            && let Some(emphasis) = html.find_exact_mut::<EmphasisRenderer>()?
        {
            emphasis.tags_mut().push(cite_tag)?;
        }
        Ok(())
    }
}

fn cite_tag(span: &SpanNode) -> Option<&'static str> {
    (span.delimiter == '"' && span.width == 2).then_some("cite")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delimiter::DelimiterParser;
    use pretty_assertions::assert_eq;

    fn pipeline() -> Pipeline {
        PipelineBuilder::new().with_citations().build().unwrap()
    }

    #[test]
    fn test_citation_span_is_parsed() {
        let document = pipeline().parse(r#"See ""hello"" there"#);
        let spans = document.spans('"');
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].width, 2);
        assert_eq!(crate::syntax::plain_text(&spans[0].children), "hello");
    }

    #[test]
    fn test_citation_html() {
        assert_eq!(
            pipeline().to_html(r#"""Dune"" is *long*"#).unwrap(),
            "<p><cite>Dune</cite> is <em>long</em></p>\n"
        );
    }

    #[test]
    fn test_lone_quote_stays_literal() {
        let pipeline = pipeline();
        assert!(pipeline.parse(r#"a "quote" b"#).spans('"').is_empty());
        assert_eq!(
            pipeline.to_html(r#"a "quote" b"#).unwrap(),
            "<p>a &quot;quote&quot; b</p>\n"
        );
    }

    #[test]
    fn test_citation_round_trips_through_normalize() {
        assert_eq!(pipeline().normalize(r#"""Dune"""#).unwrap(), "\"\"Dune\"\"\n");
    }

    #[test]
    fn test_existing_quote_descriptor_is_kept() {
        let mut builder = PipelineBuilder::new().with_citations();
        builder
            .inline_parsers
            .find_exact_mut::<DelimiterParser>()
            .unwrap()
            .add_descriptor(DelimiterDescriptor::new('"', 1, 1, true).unwrap())
            .unwrap();
        let pipeline = builder.build().unwrap();
        let parser = pipeline.inline_parsers().find_exact::<DelimiterParser>().unwrap();
        assert_eq!(parser.descriptor('"').map(|d| d.min_width), Some(1));
    }

    #[test]
    fn test_decision_composes_with_emphasis_tags() {
        let pipeline = pipeline();
        let renderer = pipeline.html_renderer().unwrap();
        let emphasis = renderer.object_renderers().find_exact::<EmphasisRenderer>().unwrap();
        let span = |delimiter, width| SpanNode {
            delimiter,
            width,
            children: Vec::new(),
        };

        assert_eq!(emphasis.tags().decide(&span('"', 2)), Some("cite"));
        assert_eq!(emphasis.tags().decide(&span('*', 1)), Some("em"));
        assert!(emphasis.tags().is_frozen());
    }
}
