//! Inline parsing.
//!
//! The [`InlineProcessor`] walks the text of one leaf block. At every
//! character that some parser lists in [`InlineParser::opening_chars`], the
//! parsers are tried in registry order and the first match wins; text
//! between matches becomes literal nodes. When the scan is complete every
//! parser gets a [`post_process`](InlineParser::post_process) pass, which is
//! where delimiter runs are paired.

mod autolink;
mod code_span;
mod escape;
mod line_break;
mod link;

pub use autolink::AutolinkParser;
pub use code_span::CodeSpanParser;
pub use escape::EscapeParser;
pub use line_break::LineBreakParser;
pub use link::LinkParser;

use crate::delimiter::matcher::push_merged;
use crate::parsers::Cursor;
use crate::registry::{AsComponent, OrderedList};
use crate::syntax::{Inline, LineBreak, Literal};

/// A pluggable inline grammar.
pub trait InlineParser: AsComponent {
    /// Characters at which [`try_match`](Self::try_match) is attempted.
    fn opening_chars(&self) -> &[char];

    /// Parse one node at the cursor.
    ///
    /// The cursor is positioned on one of the opening characters. Returning
    /// `None` leaves the next parser to try; the processor restores the
    /// cursor position.
    fn try_match(&self, processor: &InlineProcessor<'_>, cursor: &mut Cursor<'_>) -> Option<Inline>;

    /// Rewrite the inline list after the whole leaf has been scanned.
    fn post_process(&self, inlines: &mut Vec<Inline>) {
        let _ = inlines;
    }
}

/// Runs an inline parser registry over text.
pub struct InlineProcessor<'a> {
    parsers: &'a OrderedList<dyn InlineParser>,
}

impl<'a> InlineProcessor<'a> {
    #[must_use]
    pub fn new(parsers: &'a OrderedList<dyn InlineParser>) -> Self {
        Self { parsers }
    }

    #[must_use]
    pub fn parsers(&self) -> &'a OrderedList<dyn InlineParser> {
        self.parsers
    }

    /// Parse `text` into resolved inline nodes.
    ///
    /// Parsers may call this recursively for nested content such as link
    /// labels.
    #[must_use]
    pub fn parse(&self, text: &str) -> Vec<Inline> {
        let mut inlines = self.scan(text);
        for parser in self.parsers {
            parser.post_process(&mut inlines);
        }
        inlines
    }

    fn scan(&self, text: &str) -> Vec<Inline> {
        let mut out = Vec::new();
        let mut cursor = Cursor::new(text);
        let mut text_start = 0;

        while let Some(c) = cursor.peek() {
            let start = cursor.pos();
            let matched = self
                .parsers
                .iter()
                .filter(|parser| parser.opening_chars().contains(&c))
                .find_map(|parser| {
                    let inline = parser.try_match(self, &mut cursor);
                    if inline.is_none() {
                        cursor.set_pos(start);
                    }
                    inline
                });

            match matched {
                Some(inline) => {
                    push_text(&mut out, &text[text_start..start]);
                    if matches!(inline, Inline::LineBreak(_)) {
                        trim_trailing_spaces(&mut out);
                    }
                    push_merged(&mut out, inline);
                    text_start = cursor.pos();
                }
                None => {
                    cursor.bump();
                }
            }
        }

        push_text(&mut out, &text[text_start..]);
        out
    }
}

fn push_text(out: &mut Vec<Inline>, text: &str) {
    if !text.is_empty() {
        push_merged(out, Inline::text(text));
    }
}

/// Spaces before a line break are not part of the content.
fn trim_trailing_spaces(out: &mut Vec<Inline>) {
    if let Some(Inline::Literal(Literal { content, .. })) = out.last_mut() {
        let trimmed = content.trim_end_matches([' ', '\t']).len();
        content.truncate(trimmed);
        if content.is_empty() {
            out.pop();
        }
    }
}

/// A soft line break.
pub(crate) fn soft_break() -> Inline {
    Inline::LineBreak(LineBreak {
        hard: false,
        backslash: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::default_inline_parsers;
    use crate::registry::Component;
    use pretty_assertions::assert_eq;

    struct Mention;

    impl Component for Mention {}

    impl InlineParser for Mention {
        fn opening_chars(&self) -> &[char] {
            &['@']
        }

        fn try_match(&self, _: &InlineProcessor<'_>, cursor: &mut Cursor<'_>) -> Option<Inline> {
            cursor.bump();
            let rest = cursor.rest();
            let len = rest
                .find(|c: char| !c.is_alphanumeric())
                .unwrap_or(rest.len());
            if len == 0 {
                return None;
            }
            let name = &rest[..len];
            cursor.bump_bytes(len);
            Some(Inline::Code(crate::syntax::CodeSpan {
                content: name.to_owned(),
                delimiter_count: 0,
            }))
        }
    }

    #[test]
    fn test_plain_text_is_one_literal() {
        let parsers = default_inline_parsers();
        let inlines = InlineProcessor::new(&parsers).parse("just some words");
        assert_eq!(inlines, vec![Inline::text("just some words")]);
    }

    #[test]
    fn test_custom_parser_is_tried_on_its_chars() {
        let mut parsers = default_inline_parsers();
        parsers.push(Box::new(Mention));
        let inlines = InlineProcessor::new(&parsers).parse("hi @bob and @ alone");

        assert_eq!(inlines.len(), 3);
        assert_eq!(inlines[0], Inline::text("hi "));
        assert!(matches!(&inlines[1], Inline::Code(code) if code.content == "bob"));
        assert_eq!(inlines[2], Inline::text(" and @ alone"));
    }

    #[test]
    fn test_spaces_before_line_break_are_trimmed() {
        let parsers = default_inline_parsers();
        let inlines = InlineProcessor::new(&parsers).parse("one  \ntwo");
        assert_eq!(
            inlines,
            vec![
                Inline::text("one"),
                Inline::LineBreak(LineBreak {
                    hard: true,
                    backslash: false,
                }),
                Inline::text("two"),
            ]
        );
    }
}
