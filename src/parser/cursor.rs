use super::types::{QuoteMode, Scanned};
use crate::error::ScriptError;

/// Walks a script one character at a time and marks every character as live
/// (code, may be structural) or inert (inside a literal or comment).
///
/// Quote delimiters belong to their literal and are inert. Backslash escapes
/// only matter inside literals, where the escaped character never closes it.
pub struct Cursor {
    chars: Vec<(usize, char)>,
    pos: usize,
    mode: QuoteMode,
    escaped: bool,
    /// Characters still to be passed through as-is (rest of a triple quote).
    verbatim: usize,
    literal_start: usize,
}

impl Cursor {
    pub fn new(src: &str) -> Self {
        Self::at(src, 0)
    }

    /// Start scanning at byte `offset`, in code mode.
    pub fn at(src: &str, offset: usize) -> Self {
        Self {
            chars: src.char_indices().filter(|(i, _)| *i >= offset).collect(),
            pos: 0,
            mode: QuoteMode::None,
            escaped: false,
            verbatim: 0,
            literal_start: offset,
        }
    }

    pub fn mode(&self) -> QuoteMode {
        self.mode
    }

    /// Fails if the scan stopped inside an open literal. A trailing comment is fine.
    pub fn finish(&self) -> Result<(), ScriptError> {
        if self.mode.is_literal() {
            return Err(ScriptError::UnterminatedLiteral {
                offset: self.literal_start,
                quote: self.mode,
            });
        }
        Ok(())
    }

    fn repeats(&self, ch: char) -> bool {
        self.peek_char(0) == Some(ch) && self.peek_char(1) == Some(ch)
    }

    fn peek_char(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).map(|(_, c)| *c)
    }

    fn scan_code(&mut self, offset: usize, ch: char) -> bool {
        match ch {
            '\'' | '"' => {
                let triple = self.repeats(ch);
                self.mode = match (ch, triple) {
                    ('\'', false) => QuoteMode::Single,
                    ('\'', true) => QuoteMode::TripleSingle,
                    (_, false) => QuoteMode::Double,
                    (_, true) => QuoteMode::TripleDouble,
                };
                if triple {
                    self.verbatim = 2;
                }
                self.literal_start = offset;
                false
            }
            '#' => {
                self.mode = QuoteMode::Comment;
                false
            }
            _ => true,
        }
    }

    fn scan_literal(&mut self, ch: char) {
        if self.escaped {
            self.escaped = false;
            return;
        }
        if ch == '\\' {
            self.escaped = true;
            return;
        }
        if Some(ch) != self.mode.quote_char() {
            return;
        }
        if !self.mode.is_triple() {
            self.mode = QuoteMode::None;
        } else if self.repeats(ch) {
            self.verbatim = 2;
            self.mode = QuoteMode::None;
        }
    }
}

impl Iterator for Cursor {
    type Item = Scanned;

    fn next(&mut self) -> Option<Scanned> {
        let (offset, ch) = *self.chars.get(self.pos)?;
        self.pos += 1;

        if self.verbatim > 0 {
            self.verbatim -= 1;
            return Some(Scanned { offset, ch, live: false });
        }

        let live = match self.mode {
            QuoteMode::None => self.scan_code(offset, ch),
            QuoteMode::Comment => {
                // The line break that ends a comment is code again.
                if ch == '\n' {
                    self.mode = QuoteMode::None;
                }
                ch == '\n'
            }
            _ => {
                self.scan_literal(ch);
                false
            }
        };

        Some(Scanned { offset, ch, live })
    }
}
