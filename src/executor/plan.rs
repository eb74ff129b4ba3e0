use tracing::debug;

use crate::parser::TransformedProgram;

/// A header line injected ahead of the script body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Import {
    /// `import <modules>`
    Module(String),
    /// `from <module> import *`
    Wildcard(String),
}

impl Import {
    /// Split a `-f a,b` argument into one wildcard import per module.
    pub fn wildcards(modules: &str) -> Vec<Import> {
        modules
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(|m| Import::Wildcard(m.to_string()))
            .collect()
    }

    pub fn line(&self) -> String {
        match self {
            Import::Module(m) => format!("import {m}"),
            Import::Wildcard(m) => format!("from {m} import *"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Evaluate and echo the result.
    Expression,
    /// Run as statements, no implicit output.
    Script,
}

impl Mode {
    /// Compile mode the interpreter uses for the body.
    pub fn compile_mode(self) -> &'static str {
        match self {
            Mode::Expression => "single",
            Mode::Script => "exec",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    pub mode: Mode,
    pub imports: Vec<Import>,
    pub debug: bool,
}

impl ExecutionPlan {
    pub fn new(program: &TransformedProgram, imports: Vec<Import>, dump: bool) -> Self {
        let mode = if program.is_expression() {
            Mode::Expression
        } else {
            Mode::Script
        };
        debug!(?mode, imports = imports.len(), dump, "execution plan");
        Self {
            mode,
            imports,
            debug: dump,
        }
    }
}

/// Final program text, header and body kept apart so the body can be
/// compiled in its own mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedProgram {
    pub header: Vec<String>,
    pub body: Vec<String>,
    pub mode: Mode,
}

impl GeneratedProgram {
    pub fn assemble(plan: &ExecutionPlan, program: &TransformedProgram, indent_width: usize) -> Self {
        Self {
            header: plan.imports.iter().map(Import::line).collect(),
            body: program.render_lines(indent_width),
            mode: plan.mode,
        }
    }

    pub fn header_text(&self) -> String {
        self.header.join("\n")
    }

    pub fn body_text(&self) -> String {
        self.body.join("\n")
    }

    /// Everything, as shown in debug mode.
    pub fn text(&self) -> String {
        self.header
            .iter()
            .chain(self.body.iter())
            .cloned()
            .collect::<Vec<_>>()
            .join("\n")
    }
}
