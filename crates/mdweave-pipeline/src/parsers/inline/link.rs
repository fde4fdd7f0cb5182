use crate::parsers::{Cursor, InlineParser, InlineProcessor};
use crate::registry::Component;
use crate::syntax::{Inline, Link, LinkKind};

/// Inline links: `[label](destination "title")`.
///
/// The label is parsed recursively with the same inline parsers.
/// Reference links are not supported; a `[` that does not start an inline
/// link is plain text.
#[derive(Debug, Default)]
pub struct LinkParser;

impl Component for LinkParser {}

impl InlineParser for LinkParser {
    fn opening_chars(&self) -> &[char] {
        &['[']
    }

    fn try_match(&self, processor: &InlineProcessor<'_>, cursor: &mut Cursor<'_>) -> Option<Inline> {
        cursor.bump();
        let label_start = cursor.pos();
        let label_end = find_label_end(cursor)?;
        let label = &cursor.source()[label_start..label_end];

        if cursor.bump() != Some('(') {
            return None;
        }
        skip_spaces(cursor);
        let url = parse_destination(cursor)?;

        let had_space = skip_spaces(cursor);
        let title = if had_space { parse_title(cursor) } else { None };
        skip_spaces(cursor);
        if cursor.bump() != Some(')') {
            return None;
        }

        Some(Inline::Link(Link {
            url,
            title,
            kind: LinkKind::Inline,
            children: processor.parse(label),
        }))
    }
}

/// Advance past the closing `]` of the label, returning its position.
fn find_label_end(cursor: &mut Cursor<'_>) -> Option<usize> {
    let mut depth = 0usize;
    loop {
        let pos = cursor.pos();
        match cursor.bump()? {
            '\\' => {
                if cursor.peek().is_some_and(|c| c.is_ascii_punctuation()) {
                    cursor.bump();
                }
            }
            '[' => depth += 1,
            ']' if depth == 0 => return Some(pos),
            ']' => depth -= 1,
            _ => {}
        }
    }
}

fn skip_spaces(cursor: &mut Cursor<'_>) -> bool {
    let start = cursor.pos();
    while cursor.peek().is_some_and(char::is_whitespace) {
        cursor.bump();
    }
    cursor.pos() > start
}

/// `<...>` or a run of non-space characters with balanced parentheses.
fn parse_destination(cursor: &mut Cursor<'_>) -> Option<String> {
    if cursor.peek() == Some('<') {
        cursor.bump();
        let mut url = String::new();
        loop {
            match cursor.bump()? {
                '>' => return Some(url),
                '<' | '\n' => return None,
                '\\' if cursor.peek().is_some_and(|c| c.is_ascii_punctuation()) => {
                    url.extend(cursor.bump());
                }
                c => url.push(c),
            }
        }
    }

    let mut url = String::new();
    let mut depth = 0usize;
    while let Some(c) = cursor.peek() {
        match c {
            c if c.is_whitespace() || c.is_control() => break,
            '(' => depth += 1,
            ')' if depth == 0 => break,
            ')' => depth -= 1,
            '\\' if cursor.peek_nth(1).is_some_and(|n| n.is_ascii_punctuation()) => {
                cursor.bump();
                url.extend(cursor.bump());
                continue;
            }
            _ => {}
        }
        url.push(c);
        cursor.bump();
    }
    (depth == 0).then_some(url)
}

fn parse_title(cursor: &mut Cursor<'_>) -> Option<String> {
    let close = match cursor.peek()? {
        '"' => '"',
        '\'' => '\'',
        '(' => ')',
        _ => return None,
    };
    let start = cursor.pos();
    cursor.bump();

    let mut title = String::new();
    while let Some(c) = cursor.bump() {
        if c == close {
            return Some(title);
        }
        if c == '\\' && cursor.peek().is_some_and(|n| n.is_ascii_punctuation()) {
            title.extend(cursor.bump());
        } else {
            title.push(c);
        }
    }

    cursor.set_pos(start);
    None
}
