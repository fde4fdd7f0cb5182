//! Inline syntax nodes.

use crate::delimiter::DelimiterRun;

/// An inline node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inline {
    Literal(Literal),
    Code(CodeSpan),
    /// Unresolved delimiter run. Only present between scanning and
    /// post-processing; a parsed document contains none.
    Delimiter(DelimiterRun),
    Span(SpanNode),
    Link(Link),
    LineBreak(LineBreak),
}

impl Inline {
    /// Plain literal text.
    pub fn text(content: impl Into<String>) -> Self {
        Inline::Literal(Literal {
            content: content.into(),
            first_char_escaped: false,
        })
    }

    /// Concatenated text content, ignoring markup.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.push_plain_text(&mut out);
        out
    }

    fn push_plain_text(&self, out: &mut String) {
        match self {
            Inline::Literal(literal) => out.push_str(&literal.content),
            Inline::Code(code) => out.push_str(&code.content),
            Inline::Delimiter(run) => {
                out.extend(std::iter::repeat_n(run.character, run.width));
            }
            Inline::Span(span) => {
                for child in &span.children {
                    child.push_plain_text(out);
                }
            }
            Inline::Link(link) => {
                for child in &link.children {
                    child.push_plain_text(out);
                }
            }
            Inline::LineBreak(_) => out.push('\n'),
        }
    }
}

/// Concatenated text content of an inline list.
#[must_use]
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        inline.push_plain_text(&mut out);
    }
    out
}

/// Literal text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Literal {
    pub content: String,
    /// Produced by a backslash escape; normalize output re-escapes it.
    pub first_char_escaped: bool,
}

/// Code span (`` `code` ``).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeSpan {
    pub content: String,
    pub delimiter_count: usize,
}

/// Content wrapped by a matched pair of delimiter runs.
///
/// `delimiter` is the delimiter character and `width` the number of
/// characters consumed from each side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpanNode {
    pub delimiter: char,
    pub width: usize,
    pub children: Vec<Inline>,
}

/// How a link was written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkKind {
    /// `[label](url "title")`
    Inline,
    /// `<url>` or `<user@example.com>`
    Autolink,
    /// A bare URL recognised in running text.
    BareUrl,
}

/// Link or auto-link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    pub url: String,
    pub title: Option<String>,
    pub kind: LinkKind,
    pub children: Vec<Inline>,
}

impl Link {
    /// Written as `<url>` or as a bare URL rather than `[label](url)`.
    #[must_use]
    pub fn is_auto_link(&self) -> bool {
        self.kind != LinkKind::Inline
    }
}

/// Line break between two lines of a paragraph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineBreak {
    pub hard: bool,
    /// Hard break written as a trailing backslash.
    pub backslash: bool,
}
