use std::iter::Peekable;

use tracing::debug;

use super::cursor::Cursor;
use super::stack::IndentStack;
use super::types::{Emitted, Scanned, TransformedProgram, EACH_LINE_DEPTH};
use crate::error::ScriptError;

const EACH_LINE_MACRO: &str = "EL";

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// If `header` ends in the bare word `EL`, return whatever precedes it.
fn each_line_prefix(header: &str) -> Option<&str> {
    let prefix = header.strip_suffix(EACH_LINE_MACRO)?;
    match prefix.chars().last() {
        Some(c) if is_ident_char(c) => None,
        _ => Some(prefix),
    }
}

/// Single left-to-right pass that turns `;`/`{`/`}` structure into
/// indented lines.
struct Transformer {
    stack: IndentStack,
    lines: Vec<Emitted>,
    current: String,
    structural: bool,
    each_line_seen: bool,
}

impl Transformer {
    fn new() -> Self {
        Self {
            stack: IndentStack::new(),
            lines: Vec::new(),
            current: String::new(),
            structural: false,
            each_line_seen: false,
        }
    }

    /// End the current statement. Blank segments produce nothing.
    fn flush(&mut self) {
        let text = self.current.trim();
        if !text.is_empty() {
            self.lines.push(Emitted::Statement {
                level: self.stack.top(),
                text: text.to_string(),
            });
        }
        self.current.clear();
    }

    fn open_block(&mut self, offset: usize) -> Result<(), ScriptError> {
        // `EL` must touch the brace, so look at the untrimmed segment.
        let raw = std::mem::take(&mut self.current);
        let level = self.stack.top();

        if let Some(prefix) = each_line_prefix(&raw) {
            if self.each_line_seen {
                return Err(ScriptError::RepeatedEachLine { offset });
            }
            self.each_line_seen = true;

            let prefix = prefix.trim();
            if !prefix.is_empty() {
                self.lines.push(Emitted::Statement {
                    level,
                    text: prefix.to_string(),
                });
            }
            self.lines.push(Emitted::EachLine { level });
            self.stack.push(EACH_LINE_DEPTH, offset)?;
            return Ok(());
        }

        let header = raw.trim();
        if header.is_empty() {
            return Err(ScriptError::MissingBlockHeader { offset });
        }
        let text = if header.ends_with(':') {
            header.to_string()
        } else {
            format!("{header}:")
        };
        self.lines.push(Emitted::Statement { level, text });
        self.stack.push(1, offset)?;
        Ok(())
    }

    fn close_block(&mut self, offset: usize) -> Result<(), ScriptError> {
        self.flush();
        self.stack.pop(offset)?;
        Ok(())
    }

    /// Backslash-newline outside a literal: drop the break and the next
    /// line's leading blanks, leaving one space. Any other backslash is kept.
    fn backslash<I>(&mut self, chars: &mut Peekable<I>)
    where
        I: Iterator<Item = Scanned>,
    {
        let cr = chars.next_if(|s| s.live && s.ch == '\r').is_some();
        if chars.next_if(|s| s.live && s.ch == '\n').is_none() {
            self.current.push('\\');
            if cr {
                self.current.push('\r');
            }
            return;
        }
        while chars
            .next_if(|s| s.live && (s.ch == ' ' || s.ch == '\t'))
            .is_some()
        {}
        let kept = self.current.trim_end_matches([' ', '\t']).len();
        self.current.truncate(kept);
        self.current.push(' ');
    }

    fn feed<I>(&mut self, chars: &mut Peekable<I>) -> Result<(), ScriptError>
    where
        I: Iterator<Item = Scanned>,
    {
        while let Some(scanned) = chars.next() {
            if !scanned.live {
                self.current.push(scanned.ch);
                continue;
            }

            match scanned.ch {
                '{' => {
                    self.structural = true;
                    self.open_block(scanned.offset)?;
                }
                '}' => {
                    self.structural = true;
                    self.close_block(scanned.offset)?;
                }
                ';' => {
                    self.structural = true;
                    self.flush();
                }
                '\n' => self.flush(),
                '\\' => self.backslash(chars),
                ch => self.current.push(ch),
            }
        }
        Ok(())
    }
}

/// Expand a script into indented statement lines.
pub fn transform(src: &str) -> Result<TransformedProgram, ScriptError> {
    let mut cursor = Cursor::new(src);
    let mut transformer = Transformer::new();

    {
        let mut chars = cursor.by_ref().peekable();
        transformer.feed(&mut chars)?;
    }

    cursor.finish()?;
    transformer.flush();
    transformer.stack.finish()?;

    let program = TransformedProgram {
        lines: transformer.lines,
        structural: transformer.structural,
    };
    debug!(
        lines = program.lines.len(),
        expression = program.is_expression(),
        each_line = program.has_each_line(),
        "transformed script"
    );
    Ok(program)
}
