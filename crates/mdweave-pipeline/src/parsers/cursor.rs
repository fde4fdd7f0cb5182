/// Character cursor over the text of one inline leaf block.
///
/// Positions are byte offsets into the source and always lie on char
/// boundaries. Parsers that fail to match restore the position they started
/// from with [`set_pos`](Self::set_pos).
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    /// Whole source text.
    #[must_use]
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Current byte offset.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Move to a byte offset previously returned by [`pos`](Self::pos).
    pub fn set_pos(&mut self, pos: usize) {
        debug_assert!(self.source.is_char_boundary(pos));
        self.pos = pos.min(self.source.len());
    }

    #[must_use]
    pub fn eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Text from the current position to the end.
    #[must_use]
    pub fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Character `n` positions ahead (0 is the current character).
    #[must_use]
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    /// Character before the current position, `None` at the start.
    #[must_use]
    pub fn prev(&self) -> Option<char> {
        self.source[..self.pos].chars().next_back()
    }

    #[must_use]
    pub fn starts_with(&self, pat: &str) -> bool {
        self.rest().starts_with(pat)
    }

    /// Consume one character.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume `n` bytes. `n` must land on a char boundary.
    pub fn bump_bytes(&mut self, n: usize) {
        self.set_pos(self.pos + n);
    }

    /// Consume consecutive `c` characters, returning how many were consumed.
    pub fn eat_run(&mut self, c: char) -> usize {
        let mut count = 0;
        while self.peek() == Some(c) {
            self.pos += c.len_utf8();
            count += 1;
        }
        count
    }
}
