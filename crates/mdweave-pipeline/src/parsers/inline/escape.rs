use crate::parsers::{Cursor, InlineParser, InlineProcessor};
use crate::registry::Component;
use crate::syntax::{Inline, LineBreak, Literal};

/// Backslash escapes.
///
/// `\` before ASCII punctuation produces that character as literal text
/// marked as escaped; `\` at the end of a line produces a hard line break.
/// Any other backslash is plain text.
#[derive(Debug, Default)]
pub struct EscapeParser;

impl Component for EscapeParser {}

impl InlineParser for EscapeParser {
    fn opening_chars(&self) -> &[char] {
        &['\\']
    }

    fn try_match(&self, _processor: &InlineProcessor<'_>, cursor: &mut Cursor<'_>) -> Option<Inline> {
        cursor.bump();
        match cursor.peek()? {
            c if c.is_ascii_punctuation() => {
                cursor.bump();
                Some(Inline::Literal(Literal {
                    content: c.to_string(),
                    first_char_escaped: true,
                }))
            }
            '\n' => {
                cursor.bump();
                Some(Inline::LineBreak(LineBreak {
                    hard: true,
                    backslash: true,
                }))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::default_inline_parsers;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> Vec<Inline> {
        let parsers = default_inline_parsers();
        InlineProcessor::new(&parsers).parse(text)
    }

    #[test]
    fn test_escaped_punctuation() {
        assert_eq!(
            parse("\\*"),
            vec![Inline::Literal(Literal {
                content: "*".to_owned(),
                first_char_escaped: true,
            })]
        );
    }

    #[test]
    fn test_backslash_before_letter_is_text() {
        assert_eq!(parse("a\\b"), vec![Inline::text("a\\b")]);
    }

    #[test]
    fn test_trailing_backslash_is_text() {
        assert_eq!(parse("end\\"), vec![Inline::text("end\\")]);
    }

    #[test]
    fn test_backslash_newline_is_hard_break() {
        assert_eq!(
            parse("a\\\nb"),
            vec![
                Inline::text("a"),
                Inline::LineBreak(LineBreak {
                    hard: true,
                    backslash: true,
                }),
                Inline::text("b"),
            ]
        );
    }
}
