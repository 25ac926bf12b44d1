//! Error types
//!
//! Only startup problems and renderer lifecycle failures surface here.
//! Stream read errors are absorbed by the poll loop and retried.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Fatal spooler errors
#[derive(Debug, Error)]
pub enum Error {
    /// Rejected command line values
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Printer file could not be truncated or opened at startup
    #[error("Failed to open printer file {}: {source}", .path.display())]
    Stream {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Pid file could not be written
    #[error("Failed to write pid file {}: {source}", .path.display())]
    PidFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Termination handler could not be installed
    #[error("Failed to install termination handler: {0}")]
    Signal(#[source] nix::Error),

    /// Renderer process could not be started
    #[error("Failed to launch renderer {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Renderer exited with a non-zero status
    #[error("Renderer exited with status {code}")]
    RendererFailed { code: i32 },
}

impl Error {
    /// Process exit status for this error
    ///
    /// A failed renderer's own status is passed through; everything else
    /// exits with 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::RendererFailed { code } => u8::try_from(*code)
                .ok()
                .filter(|&code| code != 0)
                .unwrap_or(1),
            _ => 1,
        }
    }
}

/// Result type for spooler operations
pub type Result<T> = std::result::Result<T, Error>;
