//=========================================================================
// Errors
//=========================================================================
//
// Error types for session construction and configuration loading.
//
// Runtime collaborator failures are not errors: missing labels, screens
// and audio are skipped, and scene requests are assumed to succeed.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;

use thiserror::Error;

//=== SessionError ========================================================

/// Failures when creating a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A controller already exists in this process.
    #[error("a session controller is already running in this process")]
    AlreadyRunning,
}

//=== ConfigError =========================================================

/// Failures when reading session settings from disk.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

//=========================================================================
// Unit Tests
//=========================================================================
