//! GitHub Actions workflow files.
//!
//! When running inside a workflow, results are published by appending to the
//! files named by `GITHUB_PATH`, `GITHUB_OUTPUT` and `GITHUB_ENV`. Outside a
//! workflow every operation is a no-op.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

pub const PATH_FILE_ENV: &str = "GITHUB_PATH";
pub const OUTPUT_FILE_ENV: &str = "GITHUB_OUTPUT";
pub const ENV_FILE_ENV: &str = "GITHUB_ENV";

/// Files a workflow step communicates through.
#[derive(Debug, Clone, Default)]
pub struct WorkflowFiles {
    pub path_file: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

impl WorkflowFiles {
    pub fn from_env() -> Self {
        let var = |name: &str| {
            std::env::var_os(name)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        Self {
            path_file: var(PATH_FILE_ENV),
            output_file: var(OUTPUT_FILE_ENV),
            env_file: var(ENV_FILE_ENV),
        }
    }

    /// Prepend `dir` to `PATH` for later steps.
    pub fn add_path(&self, dir: &Path) -> Result<()> {
        let Some(file) = &self.path_file else {
            return Ok(());
        };
        let dir = dir.to_string_lossy();
        reject_newline("path entry", &dir)?;
        append_line(file, &dir)
    }

    /// Set a step output.
    pub fn set_output(&self, name: &str, value: &str) -> Result<()> {
        match &self.output_file {
            Some(file) => append_pair(file, name, value),
            None => Ok(()),
        }
    }

    /// Export an environment variable to later steps.
    pub fn export_variable(&self, name: &str, value: &str) -> Result<()> {
        match &self.env_file {
            Some(file) => append_pair(file, name, value),
            None => Ok(()),
        }
    }
}

fn reject_newline(what: &str, value: &str) -> Result<()> {
    if value.contains(['\n', '\r']) {
        bail!("{what} contains a newline: {value:?}");
    }
    Ok(())
}

fn append_pair(file: &Path, name: &str, value: &str) -> Result<()> {
    if name.is_empty() || name.contains('=') {
        bail!("invalid workflow variable name {name:?}");
    }
    reject_newline(name, name)?;
    reject_newline(name, value)?;
    append_line(file, &format!("{name}={value}"))
}

fn append_line(file: &Path, line: &str) -> Result<()> {
    let mut handle = OpenOptions::new()
        .create(true)
        .append(true)
        .open(file)
        .with_context(|| format!("Failed to open {}", file.display()))?;
    writeln!(handle, "{line}").with_context(|| format!("Failed to write {}", file.display()))
}
