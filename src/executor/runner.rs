use std::process::{Command, ExitStatus};

use tracing::debug;

use super::plan::GeneratedProgram;
use crate::config::Config;
use crate::error::{ConfigError, PyoneError};

const SCRIPT_NAME: &str = "<script>";

/// Fixed Python program that sets up the names scripts rely on, then runs the
/// generated header and body in one shared namespace.
const DRIVER: &str = r#"import sys
import fileinput


def toint(x, v=0):
    try:
        return int(x)
    except (TypeError, ValueError):
        return v


DELIM = @DELIM@
sys.argv[0] = @SCRIPT@
argv = sys.argv
_ns = {
    '__name__': '__main__',
    '__builtins__': __builtins__,
    'sys': sys,
    'fileinput': fileinput,
    'toint': toint,
    'DELIM': DELIM,
    'argv': argv,
}
exec(compile(@HEADER@, @NAME@, 'exec'), _ns)
exec(compile(@BODY@, @NAME@, @MODE@), _ns)
"#;

/// Python string literal for `text`. JSON string syntax is a subset of it.
fn py_str(text: &str) -> Result<String, serde_json::Error> {
    serde_json::to_string(text)
}

/// Build the driver for one run. `script` becomes `argv[0]`.
pub fn driver_source(
    program: &GeneratedProgram,
    script: &str,
    delimiter: Option<&str>,
) -> Result<String, serde_json::Error> {
    let delim = match delimiter {
        Some(d) => py_str(d)?,
        None => "None".to_string(),
    };
    let body = format!("{}\n", program.body_text());

    Ok(fill(
        DRIVER,
        &[
            ("@DELIM@", delim),
            ("@SCRIPT@", py_str(script)?),
            ("@HEADER@", py_str(&program.header_text())?),
            ("@BODY@", py_str(&body)?),
            ("@NAME@", py_str(SCRIPT_NAME)?),
            ("@MODE@", py_str(program.mode.compile_mode())?),
        ],
    ))
}

/// Substitute `@SLOT@` placeholders in one pass; inserted values are never
/// scanned again.
fn fill(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(at) = rest.find('@') {
        out.push_str(&rest[..at]);
        let tail = &rest[at..];
        match values.iter().find(|(slot, _)| tail.starts_with(*slot)) {
            Some((slot, value)) => {
                out.push_str(value);
                rest = &tail[slot.len()..];
            }
            None => {
                out.push('@');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// The external Python interpreter.
#[derive(Debug, Clone)]
pub struct Interpreter {
    argv: Vec<String>,
}

impl Interpreter {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(config.interpreter_argv()?))
    }

    pub fn program(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or("python3")
    }

    /// `<interpreter> -c <driver> args...`. Stdio is left at the `Command`
    /// defaults: inherited by `status()`, captured by `output()`.
    pub fn command(&self, driver: &str, args: &[String]) -> Command {
        let mut cmd = Command::new(self.program());
        cmd.args(self.argv.iter().skip(1))
            .arg("-c")
            .arg(driver)
            .args(args);
        cmd
    }

    /// Run to completion. A failing exit means the generated code failed;
    /// the interpreter has already printed why.
    pub fn run(&self, driver: &str, args: &[String]) -> Result<ExitStatus, PyoneError> {
        debug!(program = self.program(), args = args.len(), "starting interpreter");
        let status = self
            .command(driver, args)
            .status()
            .map_err(|source| PyoneError::Spawn {
                program: self.program().to_string(),
                source,
            })?;
        debug!(%status, "interpreter finished");

        if status.success() {
            Ok(status)
        } else {
            Err(PyoneError::GeneratedCode {
                code: status.code().unwrap_or(1),
            })
        }
    }
}
