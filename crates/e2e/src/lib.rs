//! TMAT scenario engine
//!
//! This crate drives a browser through declarative scenario records and
//! judges what the application did:
//! - Talks to browsers through the `Browser` capability trait, backed by a
//!   W3C WebDriver session over HTTP
//! - Turns login, list-query and form-submission records into UI actions
//! - Verifies the resulting page state and records one verdict per record
//! - Dismisses native dialogs the application may leave open
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   SessionRunner (per browser)               │
//! │    login family ─► list-query family ─► form family         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ScenarioExecutor                                           │
//! │    act      ActionDriver        navigate / fill / click     │
//! │    verify   OutcomeEvaluator    url params, rows, messages  │
//! │    reconcile DialogReconciler   accept stray alerts         │
//! │    record   ResultAccumulator   pass / fail / skip          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Browser trait ◄── WebDriverSession (reqwest, W3C JSON)     │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod browser;
pub mod config;
pub mod dialog;
pub mod driver;
pub mod error;
pub mod evaluator;
pub mod executor;
pub mod runner;
pub mod tally;
pub mod webdriver;

pub use browser::{Browser, ElementRef, Locator, ScriptArg};
pub use config::{BrowserEndpoint, BrowserEngine, RunnerConfig};
pub use error::{E2eError, E2eResult};
pub use executor::{ScenarioCase, ScenarioExecutor};
pub use runner::{write_report, SessionReport, SessionRunner};
pub use tally::{Outcome, ResultAccumulator, RunTally, Summary, Verdict};
pub use webdriver::WebDriverSession;
