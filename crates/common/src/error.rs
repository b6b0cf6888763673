//! Error types for TMAT fixtures and models

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the TMAT common Error
pub type Result<T> = std::result::Result<T, Error>;

/// TMAT common error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Fixture not found: {}", .0.display())]
    FixtureNotFound(PathBuf),

    #[error("Malformed fixture {path}: {reason}")]
    MalformedFixture { path: String, reason: String },
}
