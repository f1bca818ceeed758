//! File-level driver: read a source file, compile it, write the artifact
//! next to it.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::CompileConfig;
use crate::error::DriverError;
use crate::output::CompileOutput;
use crate::pipeline::compile_unit;

/// Result of [`compile_file`].
#[derive(Debug)]
pub struct FileOutput {
    pub unit: CompileOutput,
    /// The source text, kept for rendering diagnostics.
    pub source: String,
    /// Where the artifact was written; `None` when compilation failed.
    pub artifact_path: Option<PathBuf>,
}

/// Where [`compile_file`] writes the artifact for `input`.
pub fn artifact_path(input: &Path, config: &CompileConfig) -> PathBuf {
    input.with_extension(config.emit.extension())
}

/// Compile `input` and write the artifact beside it (`main.qrk` → `main.s`).
///
/// `config.file_path` is replaced by `input` for diagnostics. Compile errors
/// are reported in [`FileOutput::unit`]; only I/O failures are `Err`.
#[tracing::instrument(level = "debug", skip_all, fields(input = %input.display()))]
pub fn compile_file(input: &Path, config: &CompileConfig) -> Result<FileOutput, DriverError> {
    let source = fs::read_to_string(input).map_err(|source| DriverError::Read {
        path: input.to_path_buf(),
        source,
    })?;

    let config = CompileConfig {
        file_path: input.display().to_string(),
        ..config.clone()
    };
    let unit = compile_unit(&source, &config);

    let artifact_path = match &unit.artifact {
        Some(text) => {
            let path = artifact_path(input, &config);
            fs::write(&path, text).map_err(|source| DriverError::Write {
                path: path.clone(),
                source,
            })?;
            tracing::debug!(output = %path.display(), "artifact written");
            Some(path)
        }
        None => None,
    };

    Ok(FileOutput {
        unit,
        source,
        artifact_path,
    })
}
