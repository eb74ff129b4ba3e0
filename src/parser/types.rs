use std::fmt;

/// Which literal (or comment) the cursor is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteMode {
    None,
    Single,
    Double,
    TripleSingle,
    TripleDouble,
    Comment,
}

impl QuoteMode {
    pub fn quote_char(self) -> Option<char> {
        match self {
            QuoteMode::Single | QuoteMode::TripleSingle => Some('\''),
            QuoteMode::Double | QuoteMode::TripleDouble => Some('"'),
            QuoteMode::None | QuoteMode::Comment => None,
        }
    }

    pub fn is_triple(self) -> bool {
        matches!(self, QuoteMode::TripleSingle | QuoteMode::TripleDouble)
    }

    pub fn is_literal(self) -> bool {
        self.quote_char().is_some()
    }
}

impl fmt::Display for QuoteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuoteMode::None => "code",
            QuoteMode::Single => "single-quoted",
            QuoteMode::Double => "double-quoted",
            QuoteMode::TripleSingle => "triple single-quoted",
            QuoteMode::TripleDouble => "triple double-quoted",
            QuoteMode::Comment => "comment",
        };
        f.write_str(name)
    }
}

/// One character of the source, tagged with whether it may be structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scanned {
    pub offset: usize,
    pub ch: char,
    pub live: bool,
}

/// A line of expanded output. The per-line loop stays a tagged variant until
/// rendering so its preamble is never re-scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emitted {
    Statement { level: usize, text: String },
    EachLine { level: usize },
}

/// Output of a transform pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedProgram {
    pub lines: Vec<Emitted>,
    /// Set once any `;`, `{` or `}` was consumed as structure.
    pub structural: bool,
}

/// Nesting added by the per-line loop: the `with` block plus the `for` block.
pub const EACH_LINE_DEPTH: usize = 2;

impl TransformedProgram {
    /// A bare expression: one statement line and no structure introduced.
    pub fn is_expression(&self) -> bool {
        !self.structural
            && self.lines.len() == 1
            && matches!(self.lines[0], Emitted::Statement { .. })
    }

    pub fn has_each_line(&self) -> bool {
        self.lines
            .iter()
            .any(|l| matches!(l, Emitted::EachLine { .. }))
    }

    /// Render to physical lines using `indent_width` spaces per level.
    pub fn render_lines(&self, indent_width: usize) -> Vec<String> {
        let pad = |level: usize| " ".repeat(level * indent_width);
        let mut out = Vec::with_capacity(self.lines.len());

        for line in &self.lines {
            match line {
                Emitted::Statement { level, text } => {
                    out.push(format!("{}{}", pad(*level), text));
                }
                Emitted::EachLine { level } => {
                    let body = pad(level + EACH_LINE_DEPTH);
                    out.push(format!("{}with fileinput.input() as _EL:", pad(*level)));
                    out.push(format!("{}for (L, S) in enumerate(_EL):", pad(level + 1)));
                    out.push(format!("{body}s = S.strip()"));
                    out.push(format!("{body}F = s.split(DELIM)"));
                    out.push(format!("{body}I = [toint(v) for v in F]"));
                }
            }
        }

        out
    }

    pub fn render(&self, indent_width: usize) -> String {
        self.render_lines(indent_width).join("\n")
    }
}
