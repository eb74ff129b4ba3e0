mod cursor;
mod stack;
mod transform;
mod types;

pub use cursor::Cursor;
pub use stack::{IndentStack, MAX_INDENT_LEVEL};
pub use transform::transform;
pub use types::{Emitted, QuoteMode, Scanned, TransformedProgram, EACH_LINE_DEPTH};
