//! Block-level syntax nodes.

use super::{HtmlAttributes, Inline};

/// A block-level node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    Paragraph(Paragraph),
    Heading(Heading),
    ThematicBreak(ThematicBreak),
    CodeBlock(CodeBlock),
    List(List),
    Container(Container),
}

/// A run of text lines rendered as one paragraph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Paragraph {
    pub inlines: Vec<Inline>,
}

/// ATX heading (`#` to `######`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Heading {
    /// Level 1-6.
    pub level: u8,
    pub inlines: Vec<Inline>,
}

/// Thematic break (`***`, `---`, `___`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThematicBreak {
    pub marker: char,
    pub count: usize,
}

/// Which grammar produced a [`CodeBlock`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodeBlockKind {
    Indented,
    Fenced,
    /// YAML front matter delimited by `---`.
    FrontMatter,
    /// Display math delimited by `$$`.
    Math,
}

/// A block of verbatim lines.
///
/// Fenced, front matter and math blocks share this node and differ by
/// [`kind`](Self::kind). Renderers that claim one kind insert themselves
/// before the generic code block renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeBlock {
    pub kind: CodeBlockKind,
    /// Opening fence as written (e.g. "```", "~~~~", "$$", "---"), empty when indented.
    pub fence: String,
    /// First word of the info string.
    pub info: String,
    /// Rest of the info string after the first word.
    pub arguments: String,
    pub lines: Vec<String>,
    pub attributes: HtmlAttributes,
}

impl CodeBlock {
    /// A block of the given kind with no info string.
    #[must_use]
    pub fn new(kind: CodeBlockKind, fence: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            kind,
            fence: fence.into(),
            info: String::new(),
            arguments: String::new(),
            lines,
            attributes: HtmlAttributes::default(),
        }
    }
}

/// Numbering system of an ordered list marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Numbering {
    Decimal,
    LowerAlpha,
    UpperAlpha,
    LowerRoman,
    UpperRoman,
}

impl Numbering {
    /// Value of the HTML `type` attribute for `<ol>`.
    #[must_use]
    pub fn html_type(self) -> &'static str {
        match self {
            Numbering::Decimal => "1",
            Numbering::LowerAlpha => "a",
            Numbering::UpperAlpha => "A",
            Numbering::LowerRoman => "i",
            Numbering::UpperRoman => "I",
        }
    }

    /// Numeric value of a marker written in this numbering (`"c"` is 3, `"iv"` is 4).
    #[must_use]
    pub fn value(self, marker: &str) -> Option<u64> {
        match self {
            Numbering::Decimal => marker.parse().ok(),
            Numbering::LowerAlpha | Numbering::UpperAlpha => {
                let mut chars = marker.chars();
                let c = chars.next()?.to_ascii_lowercase();
                (chars.next().is_none() && c.is_ascii_lowercase())
                    .then(|| u64::from(c) - u64::from('a') + 1)
            }
            Numbering::LowerRoman | Numbering::UpperRoman => roman_value(marker),
        }
    }

    /// Marker text for `value` in this numbering.
    #[must_use]
    pub fn format(self, value: u64) -> String {
        match self {
            Numbering::Decimal => value.to_string(),
            Numbering::LowerAlpha => alpha(value, b'a'),
            Numbering::UpperAlpha => alpha(value, b'A'),
            Numbering::LowerRoman => roman(value),
            Numbering::UpperRoman => roman(value).to_ascii_uppercase(),
        }
    }
}

const ROMAN: [(u64, &str); 13] = [
    (1000, "m"),
    (900, "cm"),
    (500, "d"),
    (400, "cd"),
    (100, "c"),
    (90, "xc"),
    (50, "l"),
    (40, "xl"),
    (10, "x"),
    (9, "ix"),
    (5, "v"),
    (4, "iv"),
    (1, "i"),
];

fn roman_value(marker: &str) -> Option<u64> {
    let lower = marker.to_ascii_lowercase();
    let mut rest = lower.as_str();
    let mut value = 0;
    for (n, symbol) in ROMAN {
        while let Some(tail) = rest.strip_prefix(symbol) {
            value += n;
            rest = tail;
        }
    }
    (rest.is_empty() && value > 0).then_some(value)
}

fn roman(mut value: u64) -> String {
    let mut out = String::new();
    for (n, symbol) in ROMAN {
        while value >= n {
            out.push_str(symbol);
            value -= n;
        }
    }
    out
}

/// `a`..`z`, then `aa`, `ab`, ... like spreadsheet columns.
fn alpha(mut value: u64, base: u8) -> String {
    let mut out = Vec::new();
    while value > 0 {
        value -= 1;
        out.push(base + u8::try_from(value % 26).unwrap_or(0));
        value /= 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// List marker recognised by a list item parser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListMarker {
    /// Bullet character (`-`, `*`, `+`) or ordered delimiter (`.`, `)`).
    pub bullet: char,
    /// Ordered lists only: start value as written (e.g. "3", "c", "iv").
    pub start: Option<String>,
    pub numbering: Option<Numbering>,
}

impl ListMarker {
    /// Unordered marker.
    #[must_use]
    pub fn bullet(bullet: char) -> Self {
        Self {
            bullet,
            start: None,
            numbering: None,
        }
    }

    /// Ordered marker.
    #[must_use]
    pub fn ordered(numbering: Numbering, start: impl Into<String>, delimiter: char) -> Self {
        Self {
            bullet: delimiter,
            start: Some(start.into()),
            numbering: Some(numbering),
        }
    }

    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.numbering.is_some()
    }

    /// Whether an item with marker `other` continues a list started with `self`.
    #[must_use]
    pub fn continues(&self, other: &ListMarker) -> bool {
        self.bullet == other.bullet && self.numbering == other.numbering
    }
}

/// A bullet or ordered list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct List {
    pub marker: ListMarker,
    /// Items are separated by blank lines.
    pub loose: bool,
    pub items: Vec<ListItem>,
}

/// One list item with its nested blocks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListItem {
    pub blocks: Vec<Block>,
}

/// A fenced `:::` container holding nested blocks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Container {
    pub fence_count: usize,
    pub info: String,
    pub arguments: String,
    pub attributes: HtmlAttributes,
    pub blocks: Vec<Block>,
}
