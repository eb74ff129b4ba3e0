mod plan;
mod runner;

pub use plan::{ExecutionPlan, GeneratedProgram, Import, Mode};
pub use runner::{driver_source, Interpreter};

use std::io::Write;

use tracing::debug;

use crate::config::{check_delimiter, Config};
use crate::error::PyoneError;
use crate::parser;

/// Everything the command line contributes to one run.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    pub script: String,
    pub args: Vec<String>,
    /// `-i` modules, in order.
    pub imports: Vec<String>,
    /// `-f` modules, in order, already split on commas.
    pub from_imports: Vec<String>,
    pub delimiter: Option<String>,
    pub debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Debug mode: the generated program was written out, nothing ran.
    Dumped,
    Ran,
}

impl Invocation {
    /// Header imports: config defaults first, then command line. Plain
    /// imports precede wildcard imports.
    pub fn header_imports(&self, config: &Config) -> Vec<Import> {
        let plain = config
            .imports
            .iter()
            .chain(self.imports.iter())
            .map(|m| Import::Module(m.clone()));
        let wildcard = config
            .from_imports
            .iter()
            .chain(self.from_imports.iter())
            .flat_map(|m| Import::wildcards(m));
        plain.chain(wildcard).collect()
    }

    /// Transform and assemble without running anything.
    pub fn generate(&self, config: &Config) -> Result<GeneratedProgram, PyoneError> {
        let program = parser::transform(&self.script)?;
        let plan = ExecutionPlan::new(&program, self.header_imports(config), self.debug);
        Ok(GeneratedProgram::assemble(&plan, &program, config.indent_width))
    }

    /// The driver handed to the interpreter for this invocation.
    pub fn driver(&self, config: &Config) -> Result<String, PyoneError> {
        let generated = self.generate(config)?;
        self.driver_for(&generated, config)
    }

    fn driver_for(&self, generated: &GeneratedProgram, config: &Config) -> Result<String, PyoneError> {
        let delimiter = self.delimiter.as_deref().or(config.delimiter.as_deref());
        check_delimiter(delimiter)?;
        Ok(driver_source(generated, &self.script, delimiter)?)
    }
}

/// Debug mode writes the generated program to `out`; otherwise the program
/// runs in the interpreter with the caller's full privileges.
pub fn dispatch<W: Write>(
    invocation: &Invocation,
    config: &Config,
    out: &mut W,
) -> Result<Outcome, PyoneError> {
    let generated = invocation.generate(config)?;

    if invocation.debug {
        writeln!(out, "{}", generated.text())?;
        return Ok(Outcome::Dumped);
    }

    debug!(mode = ?generated.mode, "dispatching");
    let driver = invocation.driver_for(&generated, config)?;
    Interpreter::from_config(config)?.run(&driver, &invocation.args)?;
    Ok(Outcome::Ran)
}
