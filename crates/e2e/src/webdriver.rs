//! W3C WebDriver backend
//!
//! Talks the WebDriver JSON protocol to an already running driver server
//! (geckodriver, chromedriver, msedgedriver). One [`WebDriverSession`] is one
//! browser window for the lifetime of a run over that engine.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

use crate::browser::{Browser, ElementRef, Locator, ScriptArg};
use crate::config::{BrowserEndpoint, BrowserEngine, Timing};
use crate::error::{E2eError, E2eResult};

/// Key under which the protocol serializes element references
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// An open WebDriver session
pub struct WebDriverSession {
    client: reqwest::Client,
    endpoint: String,
    session_id: String,
    engine: BrowserEngine,
}

impl WebDriverSession {
    /// Open a session on the endpoint and apply the implicit element wait
    pub async fn start(endpoint: &BrowserEndpoint, timing: &Timing) -> E2eResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        let base = endpoint.webdriver_url.trim_end_matches('/').to_string();

        info!("Opening {} session via {}", endpoint.engine, base);

        let resp = client
            .post(format!("{}/session", base))
            .json(&json!({ "capabilities": capabilities(endpoint) }))
            .send()
            .await
            .map_err(|e| E2eError::Session(format!("cannot reach {}: {}", base, e)))?;
        let value = unwrap_response(resp, "new session").await?;

        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| E2eError::Session(format!("no sessionId in response: {}", value)))?
            .to_string();

        let session = Self {
            client,
            endpoint: base,
            session_id,
            engine: endpoint.engine,
        };
        session.set_implicit_wait(timing.implicit_wait()).await?;

        info!("{} session {} ready", session.engine, session.session_id);
        Ok(session)
    }

    pub fn engine(&self) -> BrowserEngine {
        self.engine
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Retry window applied to every element lookup
    pub async fn set_implicit_wait(&self, wait: Duration) -> E2eResult<()> {
        self.post("timeouts", json!({ "implicit": wait.as_millis() as u64 }), "timeouts")
            .await?;
        Ok(())
    }

    /// Close the browser and end the session
    pub async fn quit(self) -> E2eResult<()> {
        info!("Closing {} session {}", self.engine, self.session_id);
        let resp = self
            .client
            .delete(format!("{}/session/{}", self.endpoint, self.session_id))
            .send()
            .await?;
        unwrap_response(resp, "delete session").await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/session/{}/{}", self.endpoint, self.session_id, path)
    }

    async fn get(&self, path: &str, context: &str) -> E2eResult<Value> {
        debug!("GET {}", path);
        let resp = self.client.get(self.url(path)).send().await?;
        unwrap_response(resp, context).await
    }

    async fn post(&self, path: &str, body: Value, context: &str) -> E2eResult<Value> {
        debug!("POST {}", path);
        let resp = self.client.post(self.url(path)).json(&body).send().await?;
        unwrap_response(resp, context).await
    }
}

/// Capabilities requested for an endpoint
pub fn capabilities(endpoint: &BrowserEndpoint) -> Value {
    let mut always_match = json!({
        "browserName": endpoint.engine.browser_name(),
        // Leave native dialogs open so the engine decides when to accept them
        "unhandledPromptBehavior": "ignore",
    });

    if endpoint.headless {
        let (key, arg) = match endpoint.engine {
            BrowserEngine::Firefox => ("moz:firefoxOptions", "-headless"),
            BrowserEngine::Chrome => ("goog:chromeOptions", "--headless=new"),
            BrowserEngine::Edge => ("ms:edgeOptions", "--headless=new"),
        };
        always_match[key] = json!({ "args": [arg] });
    }

    json!({ "alwaysMatch": always_match })
}

/// Extract `value` from a protocol response, mapping protocol errors
async fn unwrap_response(resp: reqwest::Response, context: &str) -> E2eResult<Value> {
    let status = resp.status();
    let body: Value = resp.json().await?;
    let value = body.get("value").cloned().unwrap_or(Value::Null);

    if status.is_success() {
        Ok(value)
    } else {
        Err(map_error(&value, context))
    }
}

/// Translate a WebDriver error payload into an engine error
pub fn map_error(value: &Value, context: &str) -> E2eError {
    let error = value
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("unknown error");
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    match error {
        "no such element" => E2eError::ElementNotFound(context.to_string()),
        "stale element reference" => E2eError::StaleElement(context.to_string()),
        "no such alert" => E2eError::NoAlertPresent,
        "invalid session id" | "session not created" => E2eError::Session(message),
        "timeout" | "script timeout" => E2eError::Timeout(format!("{}: {}", context, message)),
        other => E2eError::WebDriver {
            error: other.to_string(),
            message,
        },
    }
}

/// Read an element reference out of a protocol value
pub fn element_from(value: &Value) -> E2eResult<ElementRef> {
    value
        .get(ELEMENT_KEY)
        .and_then(Value::as_str)
        .map(|id| ElementRef(id.to_string()))
        .ok_or_else(|| E2eError::ScriptResult(format!("not an element reference: {}", value)))
}

fn elements_from(value: &Value) -> E2eResult<Vec<ElementRef>> {
    match value.as_array() {
        Some(items) => items.iter().map(element_from).collect(),
        None => Err(E2eError::ScriptResult(format!("not an element list: {}", value))),
    }
}

fn locator_body(locator: &Locator) -> Value {
    let (using, value) = locator.strategy();
    json!({ "using": using, "value": value })
}

fn script_arg(arg: ScriptArg) -> Value {
    match arg {
        ScriptArg::Element(element) => json!({ ELEMENT_KEY: element.0 }),
        ScriptArg::Value(value) => value,
    }
}

#[async_trait]
impl Browser for WebDriverSession {
    async fn navigate(&self, url: &str) -> E2eResult<()> {
        self.post("url", json!({ "url": url }), url).await?;
        Ok(())
    }

    async fn refresh(&self) -> E2eResult<()> {
        self.post("refresh", json!({}), "refresh").await?;
        Ok(())
    }

    async fn current_url(&self) -> E2eResult<String> {
        let value = self.get("url", "current url").await?;
        value
            .as_str()
            .map(String::from)
            .ok_or_else(|| E2eError::ScriptResult(format!("url is not a string: {}", value)))
    }

    async fn find_element(&self, locator: &Locator) -> E2eResult<ElementRef> {
        let value = self
            .post("element", locator_body(locator), &locator.to_string())
            .await?;
        element_from(&value)
    }

    async fn find_elements(&self, locator: &Locator) -> E2eResult<Vec<ElementRef>> {
        let value = self
            .post("elements", locator_body(locator), &locator.to_string())
            .await?;
        elements_from(&value)
    }

    async fn find_child(&self, parent: &ElementRef, locator: &Locator) -> E2eResult<ElementRef> {
        let path = format!("element/{}/element", parent.id());
        let value = self.post(&path, locator_body(locator), &locator.to_string()).await?;
        element_from(&value)
    }

    async fn find_children(&self, parent: &ElementRef, locator: &Locator) -> E2eResult<Vec<ElementRef>> {
        let path = format!("element/{}/elements", parent.id());
        let value = self.post(&path, locator_body(locator), &locator.to_string()).await?;
        elements_from(&value)
    }

    async fn text(&self, element: &ElementRef) -> E2eResult<String> {
        let value = self
            .get(&format!("element/{}/text", element.id()), element.id())
            .await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn attribute(&self, element: &ElementRef, name: &str) -> E2eResult<Option<String>> {
        let value = self
            .get(&format!("element/{}/attribute/{}", element.id(), name), element.id())
            .await?;
        Ok(value.as_str().map(String::from))
    }

    async fn clear(&self, element: &ElementRef) -> E2eResult<()> {
        self.post(&format!("element/{}/clear", element.id()), json!({}), element.id())
            .await?;
        Ok(())
    }

    async fn send_keys(&self, element: &ElementRef, text: &str) -> E2eResult<()> {
        self.post(
            &format!("element/{}/value", element.id()),
            json!({ "text": text }),
            element.id(),
        )
        .await?;
        Ok(())
    }

    async fn click(&self, element: &ElementRef) -> E2eResult<()> {
        self.post(&format!("element/{}/click", element.id()), json!({}), element.id())
            .await?;
        Ok(())
    }

    async fn execute_script(&self, script: &str, args: Vec<ScriptArg>) -> E2eResult<Value> {
        let args: Vec<Value> = args.into_iter().map(script_arg).collect();
        self.post("execute/sync", json!({ "script": script, "args": args }), "execute script")
            .await
    }

    async fn alert_text(&self) -> E2eResult<String> {
        let value = self.get("alert/text", "alert").await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn accept_alert(&self) -> E2eResult<()> {
        self.post("alert/accept", json!({}), "alert").await?;
        Ok(())
    }
}
