use tracing::trace;

use super::{DelimiterDescriptor, DelimiterRun, DescriptorSet, matcher};
use crate::error::PipelineError;
use crate::parsers::{Cursor, InlineParser, InlineProcessor};
use crate::registry::Component;
use crate::syntax::Inline;

/// Inline parser that scans delimiter runs and pairs them after scanning.
///
/// Governs `*` and `_` by default. Extensions register further characters
/// with [`add_descriptor`](Self::add_descriptor), after checking
/// [`has_descriptor`](Self::has_descriptor).
///
/// ```
/// use mdweave_pipeline::delimiter::{DelimiterDescriptor, DelimiterParser};
///
/// let mut parser = DelimiterParser::new();
/// assert!(parser.has_descriptor('*'));
///
/// let tilde = DelimiterDescriptor::new('~', 2, 2, true).unwrap();
/// parser.add_descriptor(tilde).unwrap();
/// assert!(parser.add_descriptor(tilde).is_err());
/// ```
#[derive(Debug)]
pub struct DelimiterParser {
    descriptors: DescriptorSet,
}

impl Default for DelimiterParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DelimiterParser {
    /// Parser governing `*` (within words) and `_` (not within words), both
    /// producing spans of width 1 or 2.
    #[must_use]
    pub fn new() -> Self {
        let mut descriptors = DescriptorSet::new();
        for descriptor in [
            DelimiterDescriptor {
                character: '*',
                min_width: 1,
                max_width: 2,
                within_word: true,
            },
            DelimiterDescriptor {
                character: '_',
                min_width: 1,
                max_width: 2,
                within_word: false,
            },
        ] {
            // Both defaults are valid and distinct.
            let _ = descriptors.add(descriptor);
        }
        Self { descriptors }
    }

    /// Parser governing no characters.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            descriptors: DescriptorSet::new(),
        }
    }

    /// Whether `character` is already governed.
    #[must_use]
    pub fn has_descriptor(&self, character: char) -> bool {
        self.descriptors.contains(character)
    }

    /// Govern a new character.
    ///
    /// Fails with [`PipelineError::DuplicateDescriptor`] if the character is
    /// already governed and [`PipelineError::InvalidDescriptor`] if the
    /// descriptor is malformed.
    pub fn add_descriptor(&mut self, descriptor: DelimiterDescriptor) -> Result<(), PipelineError> {
        self.descriptors.add(descriptor)
    }

    #[must_use]
    pub fn descriptor(&self, character: char) -> Option<&DelimiterDescriptor> {
        self.descriptors.get(character)
    }

    #[must_use]
    pub fn descriptors(&self) -> &DescriptorSet {
        &self.descriptors
    }
}

impl Component for DelimiterParser {}

impl InlineParser for DelimiterParser {
    fn opening_chars(&self) -> &[char] {
        self.descriptors.characters()
    }

    fn try_match(&self, _processor: &InlineProcessor<'_>, cursor: &mut Cursor<'_>) -> Option<Inline> {
        let character = cursor.peek()?;
        let descriptor = self.descriptors.get(character)?;

        let before = cursor.prev();
        let width = cursor.eat_run(character);
        let after = cursor.peek();

        let run = DelimiterRun::scan(descriptor, width, before, after);
        if width < descriptor.min_width || !(run.can_open || run.can_close) {
            trace!(%character, width, "delimiter run cannot pair");
            return Some(Inline::text(
                std::iter::repeat_n(character, width).collect::<String>(),
            ));
        }

        Some(Inline::Delimiter(run))
    }

    fn post_process(&self, inlines: &mut Vec<Inline>) {
        matcher::resolve(inlines, &self.descriptors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::default_inline_parsers;
    use crate::registry::OrderedList;
    use crate::syntax::{SpanNode, plain_text};
    use pretty_assertions::assert_eq;

    fn parse_with(parsers: &OrderedList<dyn InlineParser>, text: &str) -> Vec<Inline> {
        InlineProcessor::new(parsers).parse(text)
    }

    fn parse(text: &str) -> Vec<Inline> {
        parse_with(&default_inline_parsers(), text)
    }

    fn span(delimiter: char, width: usize, children: Vec<Inline>) -> Inline {
        Inline::Span(SpanNode {
            delimiter,
            width,
            children,
        })
    }

    fn count_spans(inlines: &[Inline]) -> usize {
        inlines
            .iter()
            .map(|inline| match inline {
                Inline::Span(span) => 1 + count_spans(&span.children),
                Inline::Link(link) => count_spans(&link.children),
                _ => 0,
            })
            .sum()
    }

    fn with_citations() -> OrderedList<dyn InlineParser> {
        let mut parsers = default_inline_parsers();
        let delimiters = parsers.find_exact_mut::<DelimiterParser>().unwrap();
        delimiters
            .add_descriptor(DelimiterDescriptor::new('"', 2, 2, false).unwrap())
            .unwrap();
        parsers
    }

    #[test]
    fn test_strong() {
        assert_eq!(
            parse("**bold**"),
            vec![span('*', 2, vec![Inline::text("bold")])]
        );
    }

    #[test]
    fn test_emphasis() {
        assert_eq!(parse("*em*"), vec![span('*', 1, vec![Inline::text("em")])]);
    }

    #[test]
    fn test_triple_nests_strong_inside_emphasis() {
        assert_eq!(
            parse("***x***"),
            vec![span('*', 1, vec![span('*', 2, vec![Inline::text("x")])])]
        );
    }

    #[test]
    fn test_underscore_does_not_open_within_word() {
        assert_eq!(parse("snake_case_name"), vec![Inline::text("snake_case_name")]);
        assert_eq!(parse("_em_"), vec![span('_', 1, vec![Inline::text("em")])]);
    }

    #[test]
    fn test_citation_span() {
        let parsers = with_citations();
        assert_eq!(
            parse_with(&parsers, "\"\"hello\"\""),
            vec![span('"', 2, vec![Inline::text("hello")])]
        );
    }

    #[test]
    fn test_citation_span_in_sentence() {
        let parsers = with_citations();
        let inlines = parse_with(&parsers, "he said \"\"hello\"\" to me");
        assert_eq!(count_spans(&inlines), 1);
        assert_eq!(inlines[1], span('"', 2, vec![Inline::text("hello")]));
        assert_eq!(plain_text(&inlines), "he said hello to me");
    }

    #[test]
    fn test_single_quote_char_stays_literal() {
        let parsers = with_citations();
        let inlines = parse_with(&parsers, "say \"hi\" now");
        assert_eq!(count_spans(&inlines), 0);
        assert_eq!(plain_text(&inlines), "say \"hi\" now");
    }

    #[test]
    fn test_escaped_delimiters_produce_no_spans() {
        let inlines = parse("\\*not emphasis\\*");
        assert_eq!(count_spans(&inlines), 0);
        assert_eq!(plain_text(&inlines), "*not emphasis*");
    }

    #[test]
    fn test_unmatched_runs_are_text() {
        let inlines = parse("a * b ** c");
        assert_eq!(inlines, vec![Inline::text("a * b ** c")]);
    }

    #[test]
    fn test_spans_do_not_cross_code() {
        let inlines = parse("*a `*` b*");
        assert_eq!(count_spans(&inlines), 1);
    }

    #[test]
    fn test_empty_parser_governs_nothing() {
        let parser = DelimiterParser::empty();
        assert!(parser.opening_chars().is_empty());
        assert!(!parser.has_descriptor('*'));
    }
}
