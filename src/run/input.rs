//! Target input sources.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader, Lines};

use crate::config::Config;

/// Where the targets of a run come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// A single target given on the command line
    Url(String),
    /// A file with one target per line
    File(PathBuf),
    /// Standard input, one target per line
    Stdin,
}

impl InputSource {
    /// Picks the input source for `config`.
    ///
    /// Piped standard input wins over `--urls`, which wins over `--url`.
    /// Returns `None` when no source is available.
    pub fn from_config(config: &Config, stdin_is_piped: bool) -> Option<Self> {
        if stdin_is_piped {
            Some(InputSource::Stdin)
        } else if let Some(path) = &config.urls {
            Some(InputSource::File(path.clone()))
        } else {
            config.url.clone().map(InputSource::Url)
        }
    }

    /// Opens the source for line-by-line reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the target file cannot be opened.
    pub(crate) async fn open(&self) -> Result<UrlSource> {
        Ok(match self {
            InputSource::Url(url) => UrlSource::Single(Some(url.clone())),
            InputSource::File(path) => {
                let file = tokio::fs::File::open(path)
                    .await
                    .with_context(|| format!("Failed to open input file {}", path.display()))?;
                UrlSource::File(BufReader::new(file).lines())
            }
            InputSource::Stdin => UrlSource::Stdin(BufReader::new(tokio::io::stdin()).lines()),
        })
    }
}

/// Opened input, yielding raw lines.
pub(crate) enum UrlSource {
    /// One target, taken on the first read
    Single(Option<String>),
    /// Targets from a file
    File(Lines<BufReader<tokio::fs::File>>),
    /// Targets from stdin
    Stdin(Lines<BufReader<tokio::io::Stdin>>),
}

impl UrlSource {
    /// Read the next line from the source.
    ///
    /// Returns `Ok(Some(line))` if a line was read, `Ok(None)` at EOF,
    /// or an error if reading failed.
    pub(crate) async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        match self {
            UrlSource::Single(url) => Ok(url.take()),
            UrlSource::File(lines) => lines.next_line().await,
            UrlSource::Stdin(lines) => lines.next_line().await,
        }
    }
}

/// Trims `line` and drops blanks and `#` comments.
pub(crate) fn target_line(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        None
    } else {
        Some(trimmed)
    }
}
