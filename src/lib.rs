//! pyone: expand brace-delimited one-line scripts into indented Python and
//! run them.
//!
//! `;` separates statements, `{ ... }` opens an indented block and `EL{ ... }`
//! wraps its body in a loop over the lines of the input files (or stdin).
//! A script that is a single bare expression is evaluated and its value
//! echoed; anything else runs as statements.
//!
//! The generated code runs in an ordinary interpreter process with the
//! caller's full privileges. There is no sandbox.

pub mod config;
pub mod error;
pub mod executor;
pub mod parser;

pub use config::Config;
pub use error::{ConfigError, PyoneError, ScriptError};
pub use executor::{dispatch, Invocation, Outcome};
