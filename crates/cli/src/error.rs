//! CLI errors mapped to process exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: render error (bad dimensions, cancelled)
//! - 11: I/O error (context file read, PNG write)
//! - 12: input error (unknown algorithm or palette, bad color, bad context JSON)
//! - 13: serialization error

use opencip_core::RenderError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
pub enum CliError {
    /// A render failure (bad dimensions, cancelled).
    Render(RenderError),
    /// An I/O error (context file read, PNG write).
    Io(String),
    /// A user input error (unknown algorithm or palette, bad color, bad JSON).
    Input(String),
    /// A serialization error (JSON output failure).
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Render(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Render(e) => write!(f, "{e}"),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                write!(f, "{msg}")
            }
        }
    }
}

impl From<RenderError> for CliError {
    fn from(e: RenderError) -> Self {
        match e {
            RenderError::Io(msg) => CliError::Io(msg),
            RenderError::InvalidColor(_)
            | RenderError::InvalidPalette(_)
            | RenderError::UnknownAlgorithm(_)
            | RenderError::UnknownPalette(_) => CliError::Input(e.to_string()),
            other => CliError::Render(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
