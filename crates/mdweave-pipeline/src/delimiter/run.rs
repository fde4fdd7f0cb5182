use super::DelimiterDescriptor;

/// A maximal run of one delimiter character, awaiting pairing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelimiterRun {
    pub character: char,
    /// Width as scanned. The rule of three looks at this, not `width`.
    pub original_width: usize,
    /// Characters not yet consumed by a span.
    pub width: usize,
    pub can_open: bool,
    pub can_close: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CharClass {
    Whitespace,
    Punctuation,
    Other,
}

/// Line start and end count as whitespace.
fn classify(c: Option<char>) -> CharClass {
    match c {
        None => CharClass::Whitespace,
        Some(c) if c.is_whitespace() => CharClass::Whitespace,
        Some(c) if c.is_ascii_punctuation() => CharClass::Punctuation,
        Some(c) if !c.is_alphanumeric() && !c.is_control() => CharClass::Punctuation,
        Some(_) => CharClass::Other,
    }
}

impl DelimiterRun {
    /// Classify a run of `width` characters surrounded by `before` and `after`.
    #[must_use]
    pub fn scan(
        descriptor: &DelimiterDescriptor,
        width: usize,
        before: Option<char>,
        after: Option<char>,
    ) -> Self {
        let before = classify(before);
        let after = classify(after);

        let left_flanking = after != CharClass::Whitespace
            && (after != CharClass::Punctuation || before != CharClass::Other);
        let right_flanking = before != CharClass::Whitespace
            && (before != CharClass::Punctuation || after != CharClass::Other);

        let (can_open, can_close) = if descriptor.within_word {
            (left_flanking, right_flanking)
        } else {
            (
                left_flanking && (!right_flanking || before == CharClass::Punctuation),
                right_flanking && (!left_flanking || after == CharClass::Punctuation),
            )
        };

        Self {
            character: descriptor.character,
            original_width: width,
            width,
            can_open,
            can_close,
        }
    }
}
