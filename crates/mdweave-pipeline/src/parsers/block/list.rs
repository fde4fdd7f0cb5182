use super::{
    BlockMatch, BlockParser, BlockProcessor, ThematicBreakParser, block_start, indent_width,
    is_blank, strip_indent,
};
use crate::registry::{AsComponent, Component, OrderedList};
use crate::syntax::{Block, List, ListItem, ListMarker, Numbering};

/// Recognises one family of list markers.
///
/// The [`ListBlockParser`] asks its item parsers in registry order.
pub trait ListItemParser: AsComponent {
    /// Match a marker at the start of `text` (indentation already removed).
    ///
    /// Returns the marker and its length in bytes, not including the space
    /// that must follow it.
    fn try_marker(&self, text: &str) -> Option<(ListMarker, usize)>;
}

/// `-`, `*` and `+` bullets.
#[derive(Debug, Default)]
pub struct BulletItemParser;

impl Component for BulletItemParser {}

impl ListItemParser for BulletItemParser {
    fn try_marker(&self, text: &str) -> Option<(ListMarker, usize)> {
        let bullet = text.chars().next().filter(|c| matches!(c, '-' | '*' | '+'))?;
        Some((ListMarker::bullet(bullet), 1))
    }
}

/// Decimal markers: `1.` or `1)` with up to nine digits.
#[derive(Debug, Default)]
pub struct OrderedItemParser;

impl Component for OrderedItemParser {}

impl ListItemParser for OrderedItemParser {
    fn try_marker(&self, text: &str) -> Option<(ListMarker, usize)> {
        let digits = text.chars().take_while(char::is_ascii_digit).count();
        if !(1..=9).contains(&digits) {
            return None;
        }
        let delimiter = text[digits..].chars().next().filter(|c| matches!(c, '.' | ')'))?;
        Some((
            ListMarker::ordered(Numbering::Decimal, &text[..digits], delimiter),
            digits + 1,
        ))
    }
}

/// Bullet and ordered lists.
///
/// Marker recognition is delegated to [`item_parsers`](Self::item_parsers),
/// which extensions may extend with further numbering systems.
pub struct ListBlockParser {
    pub item_parsers: OrderedList<dyn ListItemParser>,
}

impl Default for ListBlockParser {
    fn default() -> Self {
        Self::new()
    }
}

/// First line of a list item.
struct ItemStart<'l> {
    marker: ListMarker,
    /// Column at which continuation lines must be indented.
    content_indent: usize,
    content: &'l str,
}

impl ListBlockParser {
    /// List parser with bullet and decimal item parsers.
    #[must_use]
    pub fn new() -> Self {
        let mut item_parsers: OrderedList<dyn ListItemParser> = OrderedList::new();
        item_parsers.push(Box::new(BulletItemParser));
        item_parsers.push(Box::new(OrderedItemParser));
        Self { item_parsers }
    }

    fn match_item<'l>(&self, line: &'l str) -> Option<ItemStart<'l>> {
        let text = block_start(line)?;
        if ThematicBreakParser::parse_line(line).is_some() {
            return None;
        }
        let marker_indent = indent_width(line);

        let (marker, len) = self.item_parsers.iter().find_map(|parser| parser.try_marker(text))?;
        let after = &text[len..];

        if after.trim().is_empty() {
            return Some(ItemStart {
                marker,
                content_indent: marker_indent + len + 1,
                content: "",
            });
        }
        if !after.starts_with([' ', '\t']) {
            return None;
        }

        let spaces = indent_width(after);
        let (content_indent, content) = if spaces >= 5 {
            (marker_indent + len + 1, strip_indent(after, 1))
        } else {
            (marker_indent + len + spaces, after.trim_start())
        };

        Some(ItemStart {
            marker,
            content_indent,
            content,
        })
    }
}

impl Component for ListBlockParser {}

impl BlockParser for ListBlockParser {
    fn try_open(&self, processor: &BlockProcessor<'_>, lines: &[&str], start: usize) -> Option<BlockMatch> {
        let mut current = self.match_item(lines[start])?;
        let marker = current.marker.clone();
        let mut items = Vec::new();
        let mut loose = false;
        let mut index = start;

        loop {
            let mut item_lines: Vec<&str> = vec![current.content];
            let mut blank_run = 0;
            let mut inner_blank = false;
            index += 1;

            while index < lines.len() {
                let line = lines[index];
                if is_blank(line) {
                    blank_run += 1;
                } else if indent_width(line) >= current.content_indent {
                    if blank_run > 0 {
                        inner_blank = true;
                        item_lines.extend(std::iter::repeat_n("", blank_run));
                        blank_run = 0;
                    }
                    item_lines.push(strip_indent(line, current.content_indent));
                } else if blank_run == 0
                    && self.match_item(line).is_none()
                    && !processor.interrupts_paragraph(lines, index)
                {
                    // Lazy continuation of the item's paragraph.
                    item_lines.push(line.trim_start());
                } else {
                    break;
                }
                index += 1;
            }

            let blocks = processor.nested().parse_lines(&item_lines);
            if inner_blank && blocks.len() > 1 {
                loose = true;
            }
            items.push(ListItem { blocks });

            let next = lines
                .get(index)
                .and_then(|line| self.match_item(line))
                .filter(|next| marker.continues(&next.marker));
            match next {
                Some(next) => {
                    if blank_run > 0 {
                        loose = true;
                    }
                    current = next;
                }
                None => {
                    index -= blank_run;
                    break;
                }
            }
        }

        Some(BlockMatch::new(
            Block::List(List {
                marker,
                loose,
                items,
            }),
            index - start,
        ))
    }

    fn interrupts_paragraph(&self) -> bool {
        true
    }
}
