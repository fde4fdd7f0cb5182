use super::{BlockMatch, BlockParser, BlockProcessor, block_start, indent_width, is_blank, strip_indent};
use crate::registry::Component;
use crate::syntax::{Block, CodeBlock, CodeBlockKind};

/// Opening fence of a fenced block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fence<'a> {
    pub indent: usize,
    pub marker: char,
    pub count: usize,
    /// Text after the fence, trimmed.
    pub info: &'a str,
}

impl<'a> Fence<'a> {
    /// Recognise an opening fence of at least `min_count` `marker` characters.
    #[must_use]
    pub fn open(line: &'a str, marker: char, min_count: usize) -> Option<Self> {
        let text = block_start(line)?;
        let count = text.chars().take_while(|&c| c == marker).count();
        if count < min_count {
            return None;
        }
        let info = text[count * marker.len_utf8()..].trim();
        Some(Self {
            indent: indent_width(line),
            marker,
            count,
            info,
        })
    }

    /// Whether `line` closes this fence.
    #[must_use]
    pub fn is_closed_by(&self, line: &str) -> bool {
        let Some(text) = block_start(line) else {
            return false;
        };
        let count = text.chars().take_while(|&c| c == self.marker).count();
        count >= self.count && text[count * self.marker.len_utf8()..].trim().is_empty()
    }

    /// Collect body lines after `lines[start]` up to the closing fence.
    ///
    /// Returns the body and the number of lines consumed including both
    /// fences. An unclosed fence runs to the end of the container.
    #[must_use]
    pub fn collect_body(&self, lines: &[&str], start: usize) -> (Vec<String>, usize) {
        let mut body = Vec::new();
        for (offset, line) in lines[start + 1..].iter().enumerate() {
            if self.is_closed_by(line) {
                return (body, offset + 2);
            }
            body.push(strip_indent(line, self.indent).to_owned());
        }
        (body, lines.len() - start)
    }

    /// Split the info text into its first word and the rest.
    #[must_use]
    pub fn info_and_arguments(&self) -> (String, String) {
        match self.info.split_once(char::is_whitespace) {
            Some((info, arguments)) => (info.to_owned(), arguments.trim().to_owned()),
            None => (self.info.to_owned(), String::new()),
        }
    }

    /// The fence as written.
    #[must_use]
    pub fn marker_string(&self) -> String {
        std::iter::repeat_n(self.marker, self.count).collect()
    }
}

/// Code fenced by three or more backticks or tildes.
#[derive(Debug, Default)]
pub struct FencedCodeParser;

impl Component for FencedCodeParser {}

impl BlockParser for FencedCodeParser {
    fn try_open(&self, _processor: &BlockProcessor<'_>, lines: &[&str], start: usize) -> Option<BlockMatch> {
        let fence = Fence::open(lines[start], '`', 3).or_else(|| Fence::open(lines[start], '~', 3))?;
        if fence.marker == '`' && fence.info.contains('`') {
            return None;
        }

        let (body, consumed) = fence.collect_body(lines, start);
        let (info, arguments) = fence.info_and_arguments();
        let mut code = CodeBlock::new(CodeBlockKind::Fenced, fence.marker_string(), body);
        code.info = info;
        code.arguments = arguments;

        Some(BlockMatch::new(Block::CodeBlock(code), consumed))
    }

    fn interrupts_paragraph(&self) -> bool {
        true
    }
}

/// Code indented by four or more columns.
#[derive(Debug, Default)]
pub struct IndentedCodeParser;

impl Component for IndentedCodeParser {}

impl BlockParser for IndentedCodeParser {
    fn try_open(&self, _processor: &BlockProcessor<'_>, lines: &[&str], start: usize) -> Option<BlockMatch> {
        if is_blank(lines[start]) || indent_width(lines[start]) < 4 {
            return None;
        }

        let mut end = start;
        let mut last_content = start;
        while end < lines.len() && (is_blank(lines[end]) || indent_width(lines[end]) >= 4) {
            if !is_blank(lines[end]) {
                last_content = end;
            }
            end += 1;
        }

        let body = lines[start..=last_content]
            .iter()
            .map(|line| strip_indent(line, 4).to_owned())
            .collect();

        Some(BlockMatch::new(
            Block::CodeBlock(CodeBlock::new(CodeBlockKind::Indented, "", body)),
            last_content - start + 1,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::{default_block_parsers, default_inline_parsers};
    use crate::syntax::Document;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> Document {
        let blocks = default_block_parsers();
        let inlines = default_inline_parsers();
        BlockProcessor::new(&blocks, &inlines).parse_document(text)
    }

    fn only_code(document: &Document) -> &CodeBlock {
        match document.blocks.as_slice() {
            [Block::CodeBlock(code)] => code,
            other => panic!("expected one code block, got {other:?}"),
        }
    }

    #[test]
    fn test_fenced_code_with_info_and_arguments() {
        let document = parse("```rust title=\"main.rs\"\nfn main() {}\n```");
        let code = only_code(&document);
        assert_eq!(code.kind, CodeBlockKind::Fenced);
        assert_eq!(code.fence, "```");
        assert_eq!(code.info, "rust");
        assert_eq!(code.arguments, "title=\"main.rs\"");
        assert_eq!(code.lines, vec!["fn main() {}"]);
    }

    #[test]
    fn test_closing_fence_must_be_long_enough() {
        let document = parse("~~~~\n~~~\n~~~~~");
        assert_eq!(only_code(&document).lines, vec!["~~~"]);
    }

    #[test]
    fn test_unclosed_fence_runs_to_end() {
        let document = parse("```\na\n\nb");
        assert_eq!(only_code(&document).lines, vec!["a", "", "b"]);
    }

    #[test]
    fn test_fence_indent_is_removed_from_body() {
        let document = parse("  ```\n    x\n  ```");
        assert_eq!(only_code(&document).lines, vec!["  x"]);
    }

    #[test]
    fn test_indented_code_drops_trailing_blank_lines() {
        let document = parse("    a\n\n    b\n\n\npara");
        assert_eq!(document.blocks.len(), 2);
        let Block::CodeBlock(code) = &document.blocks[0] else {
            panic!("expected code block");
        };
        assert_eq!(code.kind, CodeBlockKind::Indented);
        assert_eq!(code.lines, vec!["a", "", "b"]);
    }
}
