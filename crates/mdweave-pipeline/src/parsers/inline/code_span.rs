use crate::parsers::{Cursor, InlineParser, InlineProcessor};
use crate::registry::Component;
use crate::syntax::{CodeSpan, Inline};

/// Backtick code spans.
///
/// A run of N backticks is closed by the next run of exactly N backticks.
/// An opening run with no closer is emitted as literal text so that its
/// backticks are not reconsidered.
#[derive(Debug, Default)]
pub struct CodeSpanParser;

impl Component for CodeSpanParser {}

impl InlineParser for CodeSpanParser {
    fn opening_chars(&self) -> &[char] {
        &['`']
    }

    fn try_match(&self, _processor: &InlineProcessor<'_>, cursor: &mut Cursor<'_>) -> Option<Inline> {
        let open = cursor.eat_run('`');
        let content_start = cursor.pos();

        while !cursor.eof() {
            if cursor.peek() == Some('`') {
                let close_start = cursor.pos();
                if cursor.eat_run('`') == open {
                    let raw = &cursor.source()[content_start..close_start];
                    return Some(Inline::Code(CodeSpan {
                        content: normalize_content(raw),
                        delimiter_count: open,
                    }));
                }
            } else {
                cursor.bump();
            }
        }

        cursor.set_pos(content_start);
        Some(Inline::text("`".repeat(open)))
    }
}

/// Line endings become spaces; one surrounding space is stripped when the
/// content is not all spaces.
fn normalize_content(raw: &str) -> String {
    let content = raw.replace('\n', " ");
    let strip = content.len() >= 2
        && content.starts_with(' ')
        && content.ends_with(' ')
        && content.chars().any(|c| c != ' ');
    if strip {
        content[1..content.len() - 1].to_owned()
    } else {
        content
    }
}
