use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

pub const CONFIG_ENV: &str = "PYONE_CONFIG";
pub const PYTHON_ENV: &str = "PYONE_PYTHON";
pub const DELIM_ENV: &str = "PYONE_DELIM";
const DEFAULT_CONFIG_FILE: &str = ".pyone.json";

/// User settings, read from an optional JSON file and then the environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Interpreter command line, split shell-style.
    pub python: String,
    pub indent_width: usize,
    pub delimiter: Option<String>,
    /// Modules imported before any given with `-i`.
    pub imports: Vec<String>,
    /// Modules wildcard-imported before any given with `-f`.
    pub from_imports: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            python: "python3".to_string(),
            indent_width: 4,
            delimiter: None,
            imports: Vec::new(),
            from_imports: Vec::new(),
        }
    }
}

impl Config {
    /// Load from `$PYONE_CONFIG`, else `~/.pyone.json` if it exists, then
    /// apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match config_path() {
            Some((path, required)) if required || path.is_file() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config");
        config.validate()?;
        Ok(config)
    }

    /// Override fields from environment-style lookups.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(python) = lookup(PYTHON_ENV).filter(|p| !p.trim().is_empty()) {
            self.python = python;
        }
        if let Some(delim) = lookup(DELIM_ENV) {
            self.delimiter = Some(delim);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=8).contains(&self.indent_width) {
            return Err(ConfigError::IndentWidth(self.indent_width));
        }
        check_delimiter(self.delimiter.as_deref())?;
        self.interpreter_argv()?;
        Ok(())
    }

    /// The interpreter command split into program and leading arguments.
    pub fn interpreter_argv(&self) -> Result<Vec<String>, ConfigError> {
        match shlex::split(&self.python) {
            Some(argv) if !argv.is_empty() => Ok(argv),
            _ => Err(ConfigError::Interpreter(self.python.clone())),
        }
    }
}

/// `str.split` rejects an empty separator, so catch it before running.
pub fn check_delimiter(delimiter: Option<&str>) -> Result<(), ConfigError> {
    match delimiter {
        Some("") => Err(ConfigError::EmptyDelimiter),
        _ => Ok(()),
    }
}

/// Where to look for the config file, and whether it must exist.
fn config_path() -> Option<(PathBuf, bool)> {
    if let Some(explicit) = env::var_os(CONFIG_ENV) {
        return Some((PathBuf::from(explicit), true));
    }
    env::var_os("HOME").map(|home| (Path::new(&home).join(DEFAULT_CONFIG_FILE), false))
}
