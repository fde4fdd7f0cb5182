//! Markdown output.
//!
//! The normalize renderer writes a document back as markdown in a canonical
//! form: ATX headings, fenced code as written, one blank line between blocks.
//! Parsing the output again yields the same document.

mod blocks;
mod inlines;

pub use blocks::{
    CodeBlockRenderer, HeadingRenderer, ListRenderer, ParagraphRenderer, ThematicBreakRenderer,
};
pub use inlines::{
    CodeSpanRenderer, DelimiterRenderer, LineBreakRenderer, LinkRenderer, LiteralRenderer,
};

use super::{NormalizeRenderer, OutputWriter, Renderer};
use crate::syntax::HtmlAttributes;

/// Markdown output switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Write bare URLs recognised in text as `[url](url)` instead of as written.
    pub expand_auto_links: bool,
    pub empty_line_after_heading: bool,
    pub empty_line_after_code_block: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            expand_auto_links: true,
            empty_line_after_heading: true,
            empty_line_after_code_block: true,
        }
    }
}

/// [`OutputWriter`] accumulating markdown.
///
/// Keeps a stack of line prefixes (list item indentation) applied at the
/// start of every line, and tracks whether the next block must be preceded by
/// an empty line.
#[derive(Debug)]
pub struct NormalizeWriter {
    output: String,
    options: NormalizeOptions,
    prefixes: Vec<String>,
    at_line_start: bool,
    needs_blank: bool,
    compact: bool,
    continue_line: bool,
}

impl Default for NormalizeWriter {
    fn default() -> Self {
        Self::new(NormalizeOptions::default())
    }
}

impl NormalizeWriter {
    #[must_use]
    pub fn new(options: NormalizeOptions) -> Self {
        Self {
            output: String::new(),
            options,
            prefixes: Vec::new(),
            at_line_start: true,
            needs_blank: false,
            compact: false,
            continue_line: false,
        }
    }

    #[must_use]
    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Prefix every following line with `prefix` until [`pop_indent`](Self::pop_indent).
    pub fn push_indent(&mut self, prefix: impl Into<String>) {
        self.prefixes.push(prefix.into());
    }

    pub fn pop_indent(&mut self) {
        self.prefixes.pop();
    }

    /// Start a block: a new line, preceded by an empty line when the
    /// previous block asked for one.
    ///
    /// Right after [`continue_line`](Self::continue_line) the block starts on
    /// the current line instead.
    pub fn begin_block(&mut self) {
        if std::mem::take(&mut self.continue_line) {
            self.needs_blank = false;
            return;
        }
        self.ensure_line();
        if std::mem::take(&mut self.needs_blank) && !self.output.is_empty() {
            self.output.push('\n');
        }
    }

    /// End a block, requesting an empty line before the next one.
    ///
    /// The request is ignored in compact mode (tight list items).
    pub fn finish_block(&mut self, empty_line: bool) {
        self.ensure_line();
        self.needs_blank = empty_line && !self.compact;
    }

    /// Set compact mode, returning the previous value.
    pub fn set_compact(&mut self, compact: bool) -> bool {
        std::mem::replace(&mut self.compact, compact)
    }

    /// Let the next block start on the current line (after a list marker).
    pub fn continue_line(&mut self) {
        self.continue_line = true;
    }

    /// Override whether the next block is preceded by an empty line.
    pub fn set_needs_blank(&mut self, needs_blank: bool) {
        self.needs_blank = needs_blank;
    }

    fn push_piece(&mut self, piece: &str) {
        if self.at_line_start && piece != "\n" {
            for prefix in &self.prefixes {
                self.output.push_str(prefix);
            }
        }
        self.output.push_str(piece);
        self.at_line_start = piece.ends_with('\n');
    }
}

impl OutputWriter for NormalizeWriter {
    fn write(&mut self, text: &str) {
        for piece in text.split_inclusive('\n') {
            self.push_piece(piece);
        }
    }

    /// Backslash-escape characters that would otherwise start markup.
    fn write_escaped(&mut self, text: &str) {
        let mut escaped = String::with_capacity(text.len());
        for c in text.chars() {
            if matches!(c, '\\' | '*' | '_' | '`' | '[' | ']' | '<' | '>') {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        self.write(&escaped);
    }

    fn ensure_line(&mut self) {
        if !self.at_line_start {
            self.output.push('\n');
            self.at_line_start = true;
        }
    }

    fn write_attributes(&mut self, attributes: &HtmlAttributes) {
        if !attributes.is_empty() {
            self.write(" ");
            self.write(&attributes.to_syntax());
        }
    }

    fn take_output(&mut self) -> String {
        self.at_line_start = true;
        self.needs_blank = false;
        self.continue_line = false;
        std::mem::take(&mut self.output)
    }
}

/// Normalize renderer with the default object renderers registered.
#[must_use]
pub fn renderer(options: NormalizeOptions) -> NormalizeRenderer {
    let mut renderer = Renderer::new(NormalizeWriter::new(options));
    let registry = &mut renderer.object_renderers;
    registry.push(Box::new(ParagraphRenderer));
    registry.push(Box::new(HeadingRenderer));
    registry.push(Box::new(ThematicBreakRenderer));
    registry.push(Box::new(CodeBlockRenderer));
    registry.push(Box::new(ListRenderer));
    registry.push(Box::new(LiteralRenderer));
    registry.push(Box::new(CodeSpanRenderer));
    registry.push(Box::new(DelimiterRenderer));
    registry.push(Box::new(LinkRenderer));
    registry.push(Box::new(LineBreakRenderer));
    renderer
}
