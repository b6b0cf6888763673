//! Browser capability consumed by the engine
//!
//! The engine never talks to a concrete automation backend. Everything it
//! needs from a browser goes through [`Browser`], and every element it looks
//! up is described by a [`Locator`] taken from configuration.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::E2eResult;

/// How to find an element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locator {
    /// CSS selector
    Css(String),
    /// XPath expression
    XPath(String),
    /// Element `id` attribute
    Id(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn xpath(expr: impl Into<String>) -> Self {
        Locator::XPath(expr.into())
    }

    pub fn id(id: impl Into<String>) -> Self {
        Locator::Id(id.into())
    }

    /// W3C WebDriver location strategy and value
    pub fn strategy(&self) -> (&'static str, String) {
        match self {
            Locator::Css(selector) => ("css selector", selector.clone()),
            Locator::XPath(expr) => ("xpath", expr.clone()),
            Locator::Id(id) => ("css selector", format!("[id=\"{}\"]", css_escape(id))),
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locator::Css(selector) => write!(f, "css:{}", selector),
            Locator::XPath(expr) => write!(f, "xpath:{}", expr),
            Locator::Id(id) => write!(f, "id:{}", id),
        }
    }
}

/// Escape a value for use inside a double-quoted CSS attribute selector
pub fn css_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Opaque handle to an element in the current page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementRef(pub String);

impl ElementRef {
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Argument passed to an injected script
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptArg {
    Element(ElementRef),
    Value(serde_json::Value),
}

impl From<&ElementRef> for ScriptArg {
    fn from(element: &ElementRef) -> Self {
        ScriptArg::Element(element.clone())
    }
}

/// Browser automation capability.
///
/// Element lookups fail with `E2eError::ElementNotFound` once the backend's
/// implicit wait has elapsed. Dialog methods fail with
/// `E2eError::NoAlertPresent` when no native dialog is open.
#[async_trait]
pub trait Browser: Send + Sync {
    async fn navigate(&self, url: &str) -> E2eResult<()>;

    async fn refresh(&self) -> E2eResult<()>;

    async fn current_url(&self) -> E2eResult<String>;

    async fn find_element(&self, locator: &Locator) -> E2eResult<ElementRef>;

    async fn find_elements(&self, locator: &Locator) -> E2eResult<Vec<ElementRef>>;

    async fn find_child(&self, parent: &ElementRef, locator: &Locator) -> E2eResult<ElementRef>;

    async fn find_children(&self, parent: &ElementRef, locator: &Locator) -> E2eResult<Vec<ElementRef>>;

    async fn text(&self, element: &ElementRef) -> E2eResult<String>;

    /// DOM attribute value, `None` when the attribute is not set
    async fn attribute(&self, element: &ElementRef, name: &str) -> E2eResult<Option<String>>;

    async fn clear(&self, element: &ElementRef) -> E2eResult<()>;

    async fn send_keys(&self, element: &ElementRef, text: &str) -> E2eResult<()>;

    async fn click(&self, element: &ElementRef) -> E2eResult<()>;

    async fn execute_script(&self, script: &str, args: Vec<ScriptArg>) -> E2eResult<serde_json::Value>;

    async fn alert_text(&self) -> E2eResult<String>;

    async fn accept_alert(&self) -> E2eResult<()>;
}
