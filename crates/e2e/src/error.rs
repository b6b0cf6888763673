//! Error types for scenario execution

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Stale element reference: {0}")]
    StaleElement(String),

    #[error("Option '{value}' is not selectable in {select}")]
    UnselectableOption { select: String, value: String },

    #[error("No dialog present")]
    NoAlertPresent,

    #[error("WebDriver error ({error}): {message}")]
    WebDriver { error: String, message: String },

    #[error("Browser session error: {0}")]
    Session(String),

    #[error("Unexpected script result: {0}")]
    ScriptResult(String),

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl E2eError {
    /// Data-authoring problems skip the scenario instead of failing it
    pub fn is_data_authoring(&self) -> bool {
        matches!(self, E2eError::UnselectableOption { .. })
    }
}

pub type E2eResult<T> = Result<T, E2eError>;
