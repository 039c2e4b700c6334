//! The build command: read inputs, compile, write the output file.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::cli::config::FLAG_OUT;
use crate::cli::{BuildConfig, CliError};
use crate::compiler::{Compilation, Source, compile};

/// File name reported for source read from standard input.
pub const STDIN_NAME: &str = "<stdin>";

#[derive(Debug)]
pub struct BuildReport {
    pub compilation: Compilation,
    /// Where the output was written; `None` when it was left to the caller
    pub written_to: Option<PathBuf>,
}

fn read_sources(config: &BuildConfig, stdin: Option<String>) -> Result<Vec<Source>, CliError> {
    if config.files.is_empty() {
        return Ok(stdin
            .map(|text| vec![Source::new(STDIN_NAME, text)])
            .unwrap_or_default());
    }
    config
        .files
        .iter()
        .map(|file| {
            let text = fs::read_to_string(file).map_err(|source| CliError::Read {
                path: PathBuf::from(file),
                source,
            })?;
            Ok(Source::new(file.as_str(), text))
        })
        .collect()
}

/// Runs one compile for `config`.
///
/// Compile errors are part of the report, not an `Err`: they end up in the
/// output file like the generated code would.
pub fn execute_build(config: &BuildConfig, stdin: Option<String>) -> Result<BuildReport, CliError> {
    config.validate(stdin.is_some())?;
    let sources = read_sources(config, stdin)?;
    let compilation = compile(&sources, &config.compile_options());

    let written_to = match config.get(FLAG_OUT) {
        Some(out) => {
            let path = Path::new(out);
            fs::write(path, &compilation.output).map_err(|source| CliError::Write {
                path: path.to_path_buf(),
                source,
            })?;
            info!("Wrote {} bytes to {}", compilation.output.len(), path.display());
            Some(path.to_path_buf())
        }
        None => None,
    };

    Ok(BuildReport {
        compilation,
        written_to,
    })
}
