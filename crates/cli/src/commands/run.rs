//! Run Command

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, ValueEnum};
use tracing::{info, warn};

use tmat_common::FixtureSet;
use tmat_e2e::{
    write_report, BrowserEndpoint, BrowserEngine, SessionReport, SessionRunner, WebDriverSession,
};

use crate::output::{self, OutputFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BrowserArg {
    Firefox,
    Chrome,
    Edge,
}

impl From<BrowserArg> for BrowserEngine {
    fn from(arg: BrowserArg) -> Self {
        match arg {
            BrowserArg::Firefox => BrowserEngine::Firefox,
            BrowserArg::Chrome => BrowserEngine::Chrome,
            BrowserArg::Edge => BrowserEngine::Edge,
        }
    }
}

#[derive(Args)]
pub struct RunArgs {
    /// Only run on these browsers (default: every configured endpoint)
    #[arg(short, long, value_enum)]
    pub browser: Vec<BrowserArg>,

    /// Directory holding the scenario JSON files
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Directory for the JSON report
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the application base URL
    #[arg(long, env = "TMAT_BASE_URL")]
    pub base_url: Option<String>,

    /// Ask every browser to run headless
    #[arg(long)]
    pub headless: bool,

    /// Do not write the JSON report
    #[arg(long)]
    pub no_report: bool,
}

/// Run all sessions; returns whether the run was clean
pub async fn execute(args: RunArgs, config_path: &Path, format: OutputFormat) -> Result<bool> {
    let mut config = super::load_config(config_path)?;
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    if let Some(dir) = args.output {
        config.output_dir = dir;
    }
    if let Some(url) = args.base_url {
        config.target.base_url = url;
    }

    let endpoints = select_endpoints(&config.browsers, &args.browser, args.headless);
    if endpoints.is_empty() {
        output::print_warning("No browser endpoint selected");
        return Ok(false);
    }

    let fixtures = FixtureSet::load_dir(&config.data_dir);
    info!(
        "Loaded {} scenario(s) from {}",
        fixtures.len(),
        config.data_dir.display()
    );

    let mut runner = SessionRunner::new(&config, &fixtures);
    let mut reports = Vec::with_capacity(endpoints.len());
    let mut all_started = true;

    for endpoint in &endpoints {
        output::print_info(&format!("Running tests on {}...", endpoint.engine));

        let session = match WebDriverSession::start(endpoint, &config.timing).await {
            Ok(session) => session,
            Err(e) => {
                output::print_error(&format!(
                    "Cannot start {} session at {}: {}",
                    endpoint.engine, endpoint.webdriver_url, e
                ));
                all_started = false;
                continue;
            }
        };

        let report = runner.run(&session, &endpoint.engine.to_string()).await;
        if let Err(e) = session.quit().await {
            warn!("Failed to end {} session: {}", endpoint.engine, e);
        }

        output::print_session(&report, format);
        reports.push(report);
    }

    output::print_list(&reports, format);

    if !args.no_report && !reports.is_empty() {
        let path = write_report(&config.output_dir, &reports)?;
        output::print_success(&format!("Report written to {}", path.display()));
    }

    Ok(run_is_clean(all_started, &reports))
}

/// Exit cleanly only if every session started, nothing failed and no family aborted
fn run_is_clean(all_started: bool, reports: &[SessionReport]) -> bool {
    all_started && reports.iter().all(SessionReport::is_clean)
}

fn select_endpoints(configured: &[BrowserEndpoint], wanted: &[BrowserArg], headless: bool) -> Vec<BrowserEndpoint> {
    configured
        .iter()
        .filter(|e| wanted.is_empty() || wanted.iter().any(|w| BrowserEngine::from(*w) == e.engine))
        .cloned()
        .map(|mut e| {
            e.headless |= headless;
            e
        })
        .collect()
}
