//! Fixture Commands

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use tmat_common::{FixtureSet, ScenarioFamily};

use crate::output::{print_list, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct FixturesArgs {
    /// Directory holding the scenario JSON files
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,
}

/// Record count of one family
#[derive(Serialize)]
pub struct FamilyDisplay {
    pub family: String,
    pub file: String,
    pub records: usize,
}

impl TableDisplay for FamilyDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Family", "File", "Records"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.family.clone(), self.file.clone(), self.records.to_string()]
    }
}

pub fn execute(args: FixturesArgs, config_path: &Path, format: OutputFormat) -> Result<()> {
    let config = super::load_config(config_path)?;
    let dir = args.data_dir.unwrap_or(config.data_dir);
    let fixtures = FixtureSet::load_dir(&dir);

    let rows: Vec<FamilyDisplay> = ScenarioFamily::ALL
        .iter()
        .map(|family| FamilyDisplay {
            family: family.to_string(),
            file: dir.join(family.fixture_file()).display().to_string(),
            records: match family {
                ScenarioFamily::Login => fixtures.logins.len(),
                ScenarioFamily::ListQuery => fixtures.list_queries.len(),
                ScenarioFamily::FormSubmission => fixtures.form_submissions.len(),
            },
        })
        .collect();

    print_list(&rows, format);
    Ok(())
}
