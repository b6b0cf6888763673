//! TMAT Common Library
//!
//! Scenario records for the three test families and the loader that reads
//! them from their JSON fixture files.

pub mod error;
pub mod fixtures;
pub mod types;

pub use error::{Error, Result};
pub use fixtures::FixtureSet;
pub use types::*;

/// TMAT version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
