//! Command-line support for the `minet` binary.
//!
//! Arguments are positional input files plus `/name[:value]` flags. The
//! functions here do the file I/O around [`crate::compiler::compile`] so the
//! binary itself stays a thin clap wrapper.

mod build;
mod config;

pub use build::{BuildReport, STDIN_NAME, execute_build};
pub use config::BuildConfig;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Host-level failures, as opposed to compile errors in the sources.
#[derive(Debug, Error)]
pub enum CliError {
    /// Problems with the arguments found before compiling
    #[error("Errors:\n{}", .0.join("\n"))]
    Config(Vec<String>),

    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
