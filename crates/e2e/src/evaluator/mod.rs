//! Outcome evaluation
//!
//! After the driver has brought the browser to a post-action state, the
//! evaluator reads that state back and decides whether it matches what the
//! scenario record implies. Evaluation never returns an engine error: a
//! browser failure while inspecting the page is itself a failed expectation.

pub mod form;
pub mod list;
pub mod login;

use crate::browser::Browser;
use crate::config::RunnerConfig;
use crate::dialog::DialogReconciler;
use crate::error::E2eError;

pub use form::FormBranch;

/// A failed expectation, with the reason shown in the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionFailure(pub String);

impl std::fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<E2eError> for AssertionFailure {
    fn from(e: E2eError) -> Self {
        AssertionFailure(format!("browser error during verification: {}", e))
    }
}

/// Result of verifying one scenario; `Ok` carries the pass detail
pub type Check = Result<String, AssertionFailure>;

pub fn ensure(condition: bool, reason: impl FnOnce() -> String) -> Result<(), AssertionFailure> {
    if condition {
        Ok(())
    } else {
        Err(AssertionFailure(reason()))
    }
}

pub struct OutcomeEvaluator<'a> {
    browser: &'a dyn Browser,
    config: &'a RunnerConfig,
    dialogs: DialogReconciler,
}

impl<'a> OutcomeEvaluator<'a> {
    pub fn new(browser: &'a dyn Browser, config: &'a RunnerConfig) -> Self {
        Self {
            browser,
            config,
            dialogs: DialogReconciler::from_timing(&config.timing),
        }
    }
}
