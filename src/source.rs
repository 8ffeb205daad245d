//! Turning files and text blobs into the ordered line sequence the tree
//! builder consumes.

use crate::tree::{BuildError, ConfigTree, ParseOptions};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build tree for {path}: {source}")]
    Build {
        path: PathBuf,
        #[source]
        source: BuildError,
    },
}

fn line_break() -> &'static Regex {
    static LINE_BREAK: OnceLock<Regex> = OnceLock::new();
    LINE_BREAK.get_or_init(|| Regex::new(r"\r*\n+").expect("line break pattern is valid"))
}

/// Split configuration text into lines.
///
/// Runs of blank lines collapse into a single break and carriage returns
/// before a newline are dropped. A trailing line break does not produce an
/// empty final line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = line_break().split(text).collect();
    if lines.last().is_some_and(|last| last.is_empty()) {
        lines.pop();
    }
    lines
}

/// Read a configuration file and split it into lines.
pub fn read_lines(path: impl AsRef<Path>) -> Result<Vec<String>, SourceError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(split_lines(&text).into_iter().map(str::to_string).collect())
}

/// Read and parse a configuration file.
pub fn parse_path(
    path: impl AsRef<Path>,
    options: &ParseOptions,
) -> Result<ConfigTree, SourceError> {
    let path = path.as_ref();
    let lines = read_lines(path)?;
    ConfigTree::parse(&lines, options).map_err(|source| SourceError::Build {
        path: path.to_path_buf(),
        source,
    })
}
