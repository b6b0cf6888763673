//! CLI Commands

pub mod fixtures;
pub mod run;

use std::path::Path;

use anyhow::{Context, Result};
use tmat_e2e::RunnerConfig;

/// Load the configuration file, falling back to defaults when it is absent
pub fn load_config(path: &Path) -> Result<RunnerConfig> {
    RunnerConfig::load(path).with_context(|| format!("failed to load {}", path.display()))
}
