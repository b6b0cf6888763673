//! Verdicts and the per-session result accumulator

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use tmat_common::Scenario;

/// Outcome of one scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    Failed,
    /// Neither pass nor fail: the record itself could not be driven
    Skipped,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Passed => write!(f, "PASS"),
            Outcome::Failed => write!(f, "FAIL"),
            Outcome::Skipped => write!(f, "SKIP"),
        }
    }
}

/// The immutable result of executing one scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub scenario: Scenario,
    pub outcome: Outcome,
    pub detail: String,
}

impl Verdict {
    pub fn passed(scenario: Scenario, detail: impl Into<String>) -> Self {
        Self {
            scenario,
            outcome: Outcome::Passed,
            detail: detail.into(),
        }
    }

    pub fn failed(scenario: Scenario, detail: impl Into<String>) -> Self {
        Self {
            scenario,
            outcome: Outcome::Failed,
            detail: detail.into(),
        }
    }

    pub fn skipped(scenario: Scenario, detail: impl Into<String>) -> Self {
        Self {
            scenario,
            outcome: Outcome::Skipped,
            detail: detail.into(),
        }
    }

    pub fn is_pass(&self) -> bool {
        self.outcome == Outcome::Passed
    }
}

/// Pass/fail/skip counters of one browser session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTally {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Session summary; `total` counts decided scenarios only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

/// Collects verdicts for one session.
///
/// Owned by the session runner and lent to the executor; not shared across
/// sessions or threads.
#[derive(Debug, Default)]
pub struct ResultAccumulator {
    tally: RunTally,
    verdicts: Vec<Verdict>,
}

impl ResultAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, verdict: Verdict) {
        let family = verdict.scenario.family();
        match verdict.outcome {
            Outcome::Passed => {
                self.tally.passed += 1;
                info!("✓ {} - {}", family, verdict.detail);
            }
            Outcome::Failed => {
                self.tally.failed += 1;
                error!("✗ {} - {}", family, verdict.detail);
            }
            Outcome::Skipped => {
                self.tally.skipped += 1;
                warn!("- {} skipped - {}", family, verdict.detail);
            }
        }
        self.verdicts.push(verdict);
    }

    pub fn summary(&self) -> Summary {
        Summary {
            passed: self.tally.passed,
            failed: self.tally.failed,
            total: self.tally.passed + self.tally.failed,
        }
    }

    pub fn tally(&self) -> RunTally {
        self.tally
    }

    pub fn verdicts(&self) -> &[Verdict] {
        &self.verdicts
    }

    /// Start a new session
    pub fn reset(&mut self) {
        self.tally = RunTally::default();
        self.verdicts.clear();
    }
}
