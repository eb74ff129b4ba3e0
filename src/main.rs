use std::io;
use std::process::ExitCode;

use clap::Parser;
use pyone::{dispatch, Config, Invocation, PyoneError};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_ENV: &str = "PYONE_LOG";

#[derive(Parser, Debug)]
#[command(name = "pyone")]
#[command(version)]
#[command(about = "Expand and run brace-delimited Python one-liners", long_about = None)]
struct Args {
    /// Print the expanded code and exit
    #[arg(short = 'd')]
    debug: bool,

    /// Add `import MODULES` before the script (repeatable)
    #[arg(short = 'i', value_name = "MODULES")]
    imports: Vec<String>,

    /// Add `from M import *` for each comma-separated module (repeatable)
    #[arg(short = 'f', value_name = "MODULES")]
    from_imports: Vec<String>,

    /// Field delimiter bound to DELIM (default: runs of whitespace)
    #[arg(short = 'F', value_name = "DELIM")]
    delimiter: Option<String>,

    /// The one-line script
    script: String,

    /// Arguments passed to the script as argv; also the EL{} input files
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        // The interpreter already reported the failure.
        Err(PyoneError::GeneratedCode { code }) => ExitCode::from(code.clamp(1, 255) as u8),
        Err(e) => {
            eprintln!("pyone: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), PyoneError> {
    let config = Config::load()?;

    let invocation = Invocation {
        script: args.script,
        args: args.args,
        imports: args.imports,
        from_imports: args.from_imports,
        delimiter: args.delimiter,
        debug: args.debug,
    };

    let stdout = io::stdout();
    dispatch(&invocation, &config, &mut stdout.lock())?;
    Ok(())
}
