use tracing::warn;

use crate::error::PipelineError;
use crate::parsers::block::{ListBlockParser, ListItemParser};
use crate::pipeline::{Extension, PipelineBuilder};
use crate::registry::Component;
use crate::syntax::{ListMarker, Numbering};

/// Ordered list items numbered `a.`, `A.`, `i.` or `I.`.
#[derive(Debug, Default)]
pub struct ListExtrasExtension;

impl Component for ListExtrasExtension {}

impl Extension for ListExtrasExtension {
    fn name(&self) -> &'static str {
        "list_extras"
    }

    fn setup_parsers(&self, builder: &mut PipelineBuilder) -> Result<(), PipelineError> {
        match builder.block_parsers.find_mut::<ListBlockParser>() {
            Some(lists) => {
                lists
                    .item_parsers
                    .add_if_not_already::<ListExtraItemParser>(Box::new(ListExtraItemParser));
            }
            None => warn!(extension = self.name(), "No list parser registered"),
        }
        Ok(())
    }
}

/// Alphabetic and roman markers followed by `.` or `)`.
///
/// A single letter other than `i`, `v` and `x` is alphabetic; anything else
/// made of roman digits is roman. Letters must share one case.
#[derive(Debug, Default)]
pub struct ListExtraItemParser;

impl Component for ListExtraItemParser {}

impl ListItemParser for ListExtraItemParser {
    fn try_marker(&self, text: &str) -> Option<(ListMarker, usize)> {
        let len = text.chars().take_while(char::is_ascii_alphabetic).count();
        let letters = &text[..len];
        let delimiter = text[len..].chars().next().filter(|c| matches!(c, '.' | ')'))?;

        let upper = letters.chars().all(|c| c.is_ascii_uppercase());
        let lower = letters.chars().all(|c| c.is_ascii_lowercase());
        if len == 0 || !(upper || lower) {
            return None;
        }

        let roman = letters.chars().all(|c| "ivxlcdm".contains(c.to_ascii_lowercase()))
            && (len > 1 || matches!(letters, "i" | "v" | "x" | "I" | "V" | "X"));
        let numbering = match (roman, upper) {
            (true, false) => Numbering::LowerRoman,
            (true, true) => Numbering::UpperRoman,
            (false, _) if len > 1 => return None,
            (false, false) => Numbering::LowerAlpha,
            (false, true) => Numbering::UpperAlpha,
        };
        numbering.value(letters)?;

        Some((ListMarker::ordered(numbering, letters, delimiter), len + 1))
    }
}
