use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::parser::QuoteMode;

/// Structural problems found while expanding a script. All of them are
/// reported before anything is handed to the interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("unterminated {quote} literal starting at offset {offset}")]
    UnterminatedLiteral { offset: usize, quote: QuoteMode },
    #[error("unbalanced brace: `}}` at offset {offset} has no matching `{{`")]
    UnbalancedBrace { offset: usize },
    #[error("unbalanced brace: `{{` at offset {offset} is never closed")]
    UnclosedBrace { offset: usize },
    #[error("blocks nested deeper than {max} levels at offset {offset}")]
    NestingTooDeep { offset: usize, max: usize },
    #[error("`{{` at offset {offset} has no block header before it")]
    MissingBlockHeader { offset: usize },
    #[error("second EL{{ at offset {offset}; only one per-line loop is allowed per script")]
    RepeatedEachLine { offset: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("indent_width must be between 1 and 8, got {0}")]
    IndentWidth(usize),
    #[error("field delimiter must not be empty")]
    EmptyDelimiter,
    #[error("cannot parse interpreter command `{0}`")]
    Interpreter(String),
}

#[derive(Debug, Error)]
pub enum PyoneError {
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to start interpreter `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    /// The interpreter rejected or failed the generated program. Its own
    /// traceback has already gone to stderr.
    #[error("generated code failed with exit status {code}")]
    GeneratedCode { code: i32 },
    #[error("cannot write output: {0}")]
    Output(#[from] io::Error),
    #[error("cannot encode generated code: {0}")]
    Encode(#[from] serde_json::Error),
}
