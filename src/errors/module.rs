use std::{fmt::Display, path::PathBuf};

use thiserror::Error;

use super::{errors::Error, runtime::RuntimeError};

/// Failure to bring the entry file into memory.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not tokenize {path}: {error}")]
    Lex { path: String, error: Error },
}

/// An import chain that leads back to where it started, in source-to-sink order.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportCycle {
    pub path: Vec<PathBuf>,
}

impl Display for ImportCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "import cycle found: ")?;
        for module in &self.path {
            write!(f, "{} -> ", module.display())?;
        }
        match self.path.first() {
            Some(first) => write!(f, "{}", first.display()),
            None => Ok(()),
        }
    }
}

impl std::error::Error for ImportCycle {}

/// Everything that can stop a program between reading the entry file and finishing evaluation.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("{0}")]
    Cycle(#[from] ImportCycle),
    #[error("{rendered}")]
    Diagnostics { count: usize, rendered: String },
    #[error("eval error: {0}")]
    Runtime(#[from] RuntimeError),
}
