//! Cursor over the scrubbed line buffer.
//!
//! A [`Place`] is a plain value: every navigation method takes the buffer
//! and returns a new position. Positions are byte columns into the
//! scrubbed text, which match the raw text byte-for-byte.

use std::fmt;

use crate::lines::Lines;

/// A (line, column) position, ordered by line and then column.
///
/// Two sentinels bound every valid position: [`Place::rend`] sorts before
/// all of them and [`Place::end`] after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Place {
    // line + 1, so that `rend` can be row 0 and still order first
    row: usize,
    col: usize,
}

/// Bytes of a plain identifier; `::` qualifiers are handled by [`is_name_byte`].
fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0)
}

/// Whether `bytes[i]` is a word byte, counting `:` only as part of `::`.
fn is_name_byte(bytes: &[u8], i: usize) -> bool {
    match bytes.get(i) {
        Some(&b':') => {
            (i > 0 && bytes[i - 1] == b':') || bytes.get(i + 1) == Some(&b':')
        }
        Some(&b) => is_word_byte(b),
        None => false,
    }
}

impl Place {
    /// A position on a physical line.
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { row: line + 1, col }
    }

    /// The position before line 0.
    #[must_use]
    pub const fn rend() -> Self {
        Self { row: 0, col: 0 }
    }

    /// One past the last character of the buffer: column 0 of the guard line.
    #[must_use]
    pub fn end(lines: &Lines) -> Self {
        Self::new(lines.last_index(), 0)
    }

    /// Whether this is the [`Place::rend`] sentinel.
    #[must_use]
    pub const fn is_rend(self) -> bool {
        self.row == 0
    }

    /// Whether this is at or past [`Place::end`].
    #[must_use]
    pub fn is_end(self, lines: &Lines) -> bool {
        self >= Self::end(lines)
    }

    /// Line index (0 for [`Place::rend`]).
    #[must_use]
    pub const fn line(self) -> usize {
        self.row.saturating_sub(1)
    }

    /// Byte column.
    #[must_use]
    pub const fn col(self) -> usize {
        self.col
    }

    /// Byte at this position: `\n` at a line end, 0 outside the buffer.
    #[must_use]
    pub fn get(self, lines: &Lines) -> u8 {
        if self.is_rend() || self.is_end(lines) {
            return 0;
        }
        let text = lines.text(self.line()).as_bytes();
        text.get(self.col).copied().unwrap_or(b'\n')
    }

    /// The next position, wrapping to the start of the next line.
    #[must_use]
    pub fn next(self, lines: &Lines) -> Self {
        if self.is_rend() {
            return Self::new(0, 0);
        }
        if self.is_end(lines) {
            return Self::end(lines);
        }
        if self.col < lines.text(self.line()).len() {
            Self { col: self.col + 1, ..self }
        } else {
            Self::new(self.line() + 1, 0)
        }
    }

    /// The previous position, wrapping to the end of the previous line.
    #[must_use]
    pub fn prev(self, lines: &Lines) -> Self {
        if self.is_rend() {
            return self;
        }
        let len = lines.text(self.line()).len();
        if self.col > 0 {
            Self {
                col: self.col.min(len + 1) - 1,
                ..self
            }
        } else if self.line() == 0 {
            Self::rend()
        } else {
            let line = self.line() - 1;
            Self::new(line, lines.text(line).len())
        }
    }

    /// First position at or after this one holding a byte from `set`,
    /// or [`Place::end`].
    #[must_use]
    pub fn find_first_of(self, lines: &Lines, set: &[u8]) -> Self {
        let start = if self.is_rend() { Self::new(0, 0) } else { self };
        for line in start.line()..lines.last_index() {
            let from = if line == start.line() { start.col } else { 0 };
            let text = lines.text(line).as_bytes();
            if let Some(offset) = text
                .get(from..)
                .and_then(|rest| rest.iter().position(|b| set.contains(b)))
            {
                return Self::new(line, from + offset);
            }
        }
        Self::end(lines)
    }

    /// Last position at or before this one that is not whitespace.
    #[must_use]
    pub fn skip_space_back(self, lines: &Lines) -> Self {
        let mut p = self;
        while !p.is_rend() && is_space(p.get(lines)) {
            p = p.prev(lines);
        }
        p
    }

    /// First position at or after this one that is not whitespace.
    #[must_use]
    pub fn skip_space_forward(self, lines: &Lines) -> Self {
        let mut p = self;
        while !p.is_end(lines) && is_space(p.get(lines)) {
            p = p.next(lines);
        }
        p
    }

    /// The identifier ending at or before this position, skipping whitespace.
    ///
    /// Returns the word and its first position. When the nearest
    /// non-blank byte is not part of a word, the word is empty and the
    /// position is that byte's.
    #[must_use]
    pub fn word_before(self, lines: &Lines) -> (String, Self) {
        let p = self.skip_space_back(lines);
        if p.is_rend() || !is_word_byte(p.get(lines)) {
            return (String::new(), p);
        }
        let bytes = lines.text(p.line()).as_bytes();
        let mut start = p.col;
        while start > 0 && is_name_byte(bytes, start - 1) {
            start -= 1;
        }
        let word = String::from_utf8_lossy(&bytes[start..=p.col]).into_owned();
        (word, Self::new(p.line(), start))
    }

    /// The identifier starting at or after this position, skipping whitespace.
    #[must_use]
    pub fn name_after(self, lines: &Lines) -> (String, Self) {
        let p = self.skip_space_forward(lines);
        if p.is_end(lines) {
            return (String::new(), p);
        }
        let bytes = lines.text(p.line()).as_bytes();
        if !is_name_byte(bytes, p.col) {
            return (String::new(), p);
        }
        let mut end = p.col;
        while is_name_byte(bytes, end) {
            end += 1;
        }
        let word = String::from_utf8_lossy(&bytes[p.col..end]).into_owned();
        (word, p)
    }

    /// First code position of the statement containing this position.
    ///
    /// Walks up over lines that do not end a statement, then forward past
    /// any `;`, `{` or `}` outside parentheses that precedes this position.
    #[must_use]
    pub fn statement_start(self, lines: &Lines) -> Self {
        if self.is_rend() {
            return self;
        }
        let mut first = self.line();
        while first > 0 && !lines.is_statement_end(first - 1) {
            first -= 1;
        }

        let mut start = Self::new(first, lines.indent(first));
        if start > self {
            return self;
        }
        let mut depth = 0usize;
        for line in first..=self.line() {
            let text = lines.text(line).as_bytes();
            let from = if line == first { start.col } else { 0 };
            let to = if line == self.line() {
                self.col.min(text.len())
            } else {
                text.len()
            };
            for (col, &b) in text.iter().enumerate().take(to).skip(from) {
                match b {
                    b'(' | b'[' => depth += 1,
                    b')' | b']' => depth = depth.saturating_sub(1),
                    b';' | b'{' | b'}' if depth == 0 => start = Self::new(line, col + 1),
                    _ => {}
                }
            }
        }
        start.skip_space_forward(lines).min(self)
    }

    /// The name following a balanced `<...>` list starting at or after
    /// this position. Without a `<`, the plain [`Place::name_after`].
    #[must_use]
    pub fn template_name_after(self, lines: &Lines) -> (String, Self) {
        let mut p = self.skip_space_forward(lines);
        if p.get(lines) != b'<' {
            return p.name_after(lines);
        }
        let mut angles = 0usize;
        let mut parens = 0usize;
        while !p.is_end(lines) {
            match p.get(lines) {
                b'<' if parens == 0 => angles += 1,
                b'>' if parens == 0 => {
                    angles -= 1;
                    if angles == 0 {
                        return p.next(lines).name_after(lines);
                    }
                }
                b'(' => parens += 1,
                b')' => parens = parens.saturating_sub(1),
                b';' | b'{' | b'}' => break,
                _ => {}
            }
            p = p.next(lines);
        }
        (String::new(), Self::end(lines))
    }

    /// The name preceding a balanced `<...>` list whose closing `>` is at
    /// this position. Fails with an empty word and [`Place::rend`].
    #[must_use]
    pub fn template_name_before(self, lines: &Lines) -> (String, Self) {
        let mut p = self;
        let mut angles = 0usize;
        let mut parens = 0usize;
        while !p.is_rend() {
            match p.get(lines) {
                b'>' => {
                    let before = p.prev(lines);
                    if before.get(lines) == b'-' {
                        p = before;
                    } else {
                        angles += 1;
                    }
                }
                b'<' => {
                    angles = angles.saturating_sub(1);
                    if angles == 0 {
                        return p.prev(lines).word_before(lines);
                    }
                }
                b')' => parens += 1,
                b'(' => {
                    if parens == 0 {
                        break;
                    }
                    parens -= 1;
                }
                b';' | b'{' | b'}' => break,
                _ => {}
            }
            p = p.prev(lines);
        }
        (String::new(), Self::rend())
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_rend() {
            write!(f, "rend")
        } else {
            write!(f, "{}:{}", self.line(), self.col + 1)
        }
    }
}
