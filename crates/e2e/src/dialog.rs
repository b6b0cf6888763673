//! Native confirmation dialog handling
//!
//! The application answers some submissions with a browser-native dialog,
//! including a few invalid ones. The reconciler never assumes either way: it
//! polls for a bounded window, accepts the dialog if one shows up, and treats
//! a dialog that never appears as a normal outcome.

use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::browser::Browser;
use crate::config::Timing;
use crate::error::{E2eError, E2eResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    Dismissed,
    Absent,
}

/// Bounded-retry dialog watcher
#[derive(Debug, Clone)]
pub struct DialogReconciler {
    timeout: Duration,
    poll_interval: Duration,
}

impl DialogReconciler {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    pub fn from_timing(timing: &Timing) -> Self {
        Self::new(timing.dialog_timeout(), timing.dialog_poll())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Accept a dialog if one appears within the timeout.
    ///
    /// Errors other than "no dialog" end polling and are returned for the
    /// caller to report.
    pub async fn reconcile(&self, browser: &dyn Browser) -> E2eResult<DialogOutcome> {
        let deadline = Instant::now() + self.timeout;
        loop {
            match browser.accept_alert().await {
                Ok(()) => {
                    debug!("Dialog accepted");
                    return Ok(DialogOutcome::Dismissed);
                }
                Err(E2eError::NoAlertPresent) => {}
                Err(e) => return Err(e),
            }

            if Instant::now() >= deadline {
                debug!("No dialog within {:?}", self.timeout);
                return Ok(DialogOutcome::Absent);
            }
            sleep(self.poll_interval).await;
        }
    }

    /// Wait for a dialog to be present without touching it
    pub async fn await_dialog(&self, browser: &dyn Browser) -> E2eResult<bool> {
        let deadline = Instant::now() + self.timeout;
        loop {
            match browser.alert_text().await {
                Ok(text) => {
                    debug!("Dialog present: {}", text);
                    return Ok(true);
                }
                Err(E2eError::NoAlertPresent) => {}
                Err(e) => return Err(e),
            }

            if Instant::now() >= deadline {
                return Ok(false);
            }
            sleep(self.poll_interval).await;
        }
    }
}
