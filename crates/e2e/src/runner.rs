//! Session runner: drives every scenario family through one browser session

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use tmat_common::{FixtureSet, ScenarioFamily};

use crate::browser::Browser;
use crate::config::RunnerConfig;
use crate::error::E2eResult;
use crate::executor::ScenarioExecutor;
use crate::tally::{ResultAccumulator, RunTally, Summary, Verdict};

/// Name of the JSON report written to the output directory
pub const REPORT_FILE: &str = "tmat-report.json";

/// A family that stopped early on an infrastructure failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyAbort {
    pub family: ScenarioFamily,
    pub error: String,
}

/// Everything one browser session produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub run_id: Uuid,
    pub browser: String,
    pub started_at: DateTime<Utc>,
    pub tally: RunTally,
    pub summary: Summary,
    pub verdicts: Vec<Verdict>,
    pub aborted_families: Vec<FamilyAbort>,
    pub duration_ms: u64,
}

impl SessionReport {
    /// A session counts as clean when nothing failed and no family aborted
    pub fn is_clean(&self) -> bool {
        self.tally.failed == 0 && self.aborted_families.is_empty()
    }
}

pub struct SessionRunner<'a> {
    config: &'a RunnerConfig,
    fixtures: &'a FixtureSet,
    results: ResultAccumulator,
}

impl<'a> SessionRunner<'a> {
    pub fn new(config: &'a RunnerConfig, fixtures: &'a FixtureSet) -> Self {
        Self {
            config,
            fixtures,
            results: ResultAccumulator::new(),
        }
    }

    /// Run the login, list-query and form-submission families in order.
    ///
    /// The accumulator is reset first, so a runner can be reused across
    /// browsers. An infrastructure error ends only the family it occurred
    /// in; verdicts recorded before it are kept.
    pub async fn run(&mut self, browser: &dyn Browser, browser_name: &str) -> SessionReport {
        let started_at = Utc::now();
        let start = Instant::now();
        let (config, fixtures) = (self.config, self.fixtures);
        let results = &mut self.results;
        results.reset();

        let executor = ScenarioExecutor::new(browser, config);
        let mut aborted_families = Vec::new();

        info!("Running scenarios on {}...", browser_name);

        for family in ScenarioFamily::ALL {
            let outcome = match family {
                ScenarioFamily::Login => run_logins(config, fixtures, browser, &executor, results).await,
                ScenarioFamily::ListQuery => {
                    run_list_queries(config, fixtures, browser, &executor, results).await
                }
                ScenarioFamily::FormSubmission => {
                    run_form_submissions(config, fixtures, &executor, results).await
                }
            };

            if let Err(e) = outcome {
                error!("Error running {} scenarios: {}", family, e);
                aborted_families.push(FamilyAbort {
                    family,
                    error: e.to_string(),
                });
            }
        }

        let summary = results.summary();
        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "{}: {} total, {} passed, {} failed ({} ms)",
            browser_name, summary.total, summary.passed, summary.failed, duration_ms
        );

        SessionReport {
            run_id: Uuid::new_v4(),
            browser: browser_name.to_string(),
            started_at,
            tally: results.tally(),
            summary,
            verdicts: results.verdicts().to_vec(),
            aborted_families,
            duration_ms,
        }
    }
}

async fn run_logins(
    config: &RunnerConfig,
    fixtures: &FixtureSet,
    browser: &dyn Browser,
    executor: &ScenarioExecutor<'_>,
    results: &mut ResultAccumulator,
) -> E2eResult<()> {
    browser.navigate(config.target.base_url()).await?;
    for credential in &fixtures.logins {
        executor.execute(credential, results).await?;
        browser.refresh().await?;
    }
    Ok(())
}

async fn run_list_queries(
    config: &RunnerConfig,
    fixtures: &FixtureSet,
    browser: &dyn Browser,
    executor: &ScenarioExecutor<'_>,
    results: &mut ResultAccumulator,
) -> E2eResult<()> {
    executor.driver().open_session(&config.admin).await?;
    for query in &fixtures.list_queries {
        executor.execute(query, results).await?;
        browser.refresh().await?;
    }
    Ok(())
}

async fn run_form_submissions(
    config: &RunnerConfig,
    fixtures: &FixtureSet,
    executor: &ScenarioExecutor<'_>,
    results: &mut ResultAccumulator,
) -> E2eResult<()> {
    executor.driver().open_session(&config.admin).await?;
    for submission in &fixtures.form_submissions {
        executor.execute(submission, results).await?;
    }
    Ok(())
}

/// Write all session reports to `<output_dir>/tmat-report.json`
pub fn write_report(output_dir: &Path, sessions: &[SessionReport]) -> E2eResult<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let path = output_dir.join(REPORT_FILE);
    let json = serde_json::to_string_pretty(sessions)?;
    std::fs::write(&path, json)?;

    info!("Report written to: {}", path.display());
    Ok(path)
}
