//! Runner configuration
//!
//! Target URLs, locators and timings are tied to one deployed instance of the
//! test-management console. Every section has defaults so a partial TOML file
//! only needs the values that differ.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tmat_common::{Credential, SortField};

use crate::browser::Locator;
use crate::error::E2eResult;

/// Top-level runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Application under test
    pub target: TargetConfig,

    /// Account used to open the list and form families
    pub admin: Credential,

    /// Element locators
    pub locators: Locators,

    /// List-view expectations
    pub list: ListRules,

    /// Create-form expectations
    pub form: FormRules,

    /// Fixed waits and polling windows
    pub timing: Timing,

    /// WebDriver endpoints, run one after another
    pub browsers: Vec<BrowserEndpoint>,

    /// Directory holding the JSON fixtures
    pub data_dir: PathBuf,

    /// Directory for the JSON report
    pub output_dir: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            target: TargetConfig::default(),
            admin: Credential::new("admin1@mail.com", "123456"),
            locators: Locators::default(),
            list: ListRules::default(),
            form: FormRules::default(),
            timing: Timing::default(),
            browsers: vec![
                BrowserEndpoint::new(BrowserEngine::Firefox, "http://127.0.0.1:4444"),
                BrowserEndpoint::new(BrowserEngine::Chrome, "http://127.0.0.1:9515"),
                BrowserEndpoint::new(BrowserEngine::Edge, "http://127.0.0.1:9516"),
            ],
            data_dir: PathBuf::from("fixtures"),
            output_dir: PathBuf::from("test-results"),
        }
    }
}

impl RunnerConfig {
    /// Load configuration from file, falling back to defaults when it is absent
    pub fn load(path: &Path) -> E2eResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> E2eResult<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Where the application lives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub base_url: String,
    pub login_path: String,
    pub project_id: String,
    /// URL fragment that identifies a successful login
    pub dashboard_marker: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000".to_string(),
            login_path: "/login".to_string(),
            project_id: "66fa0056e0d5ccc14eab0a2e".to_string(),
            dashboard_marker: "dashboard".to_string(),
        }
    }
}

impl TargetConfig {
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn login_url(&self) -> String {
        format!("{}{}", self.base_url(), self.login_path)
    }

    /// Test-case list of the configured project
    pub fn list_url(&self) -> String {
        format!("{}/project/{}/test-case", self.base_url(), self.project_id)
    }

    /// Test-plan page of the configured project
    pub fn plan_url(&self) -> String {
        format!("{}/project/{}/test-plan", self.base_url(), self.project_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Locators {
    pub email_input: Locator,
    pub password_input: Locator,
    pub login_button: Locator,
    pub error_banner: Locator,
    pub field_feedback: Locator,
    pub list_table: Locator,
    /// Body rows, relative to the list table
    pub table_rows: Locator,
    pub add_plan_button: Locator,
    pub plan_name: Locator,
    pub release_select: Locator,
    pub start_date: Locator,
    pub end_date: Locator,
    pub description: Locator,
    pub submit_button: Locator,
}

impl Default for Locators {
    fn default() -> Self {
        Self {
            email_input: Locator::id("fEmail"),
            password_input: Locator::id("fPassword"),
            login_button: Locator::xpath("/html/body/main/main/div/div[2]/div/form/div[3]/button"),
            error_banner: Locator::css(".alert-danger"),
            field_feedback: Locator::css(".invalid-feedback"),
            list_table: Locator::css("table.table"),
            table_rows: Locator::css("tbody tr"),
            add_plan_button: Locator::xpath("//button[@data-bs-target='#addTestPlan']"),
            plan_name: Locator::id("name"),
            release_select: Locator::id("releaseId"),
            start_date: Locator::id("startDate"),
            end_date: Locator::id("endDate"),
            description: Locator::id("description"),
            submit_button: Locator::xpath("//button[@type='submit']"),
        }
    }
}

/// What the list view is expected to do with a query
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListRules {
    /// Last page of the fixture dataset; anything outside 1..=max_page clamps to 1
    pub max_page: i64,
    /// Keyword whose every result title must contain it
    pub positive_keyword: String,
    /// Keyword that must produce an empty list
    pub negative_keyword: String,
    pub default_sort_field: String,
    pub default_sort_order: String,
    /// 1-based cell positions within a row
    pub title_column: usize,
    pub created_date_column: usize,
    pub case_code_column: usize,
}

impl Default for ListRules {
    fn default() -> Self {
        Self {
            max_page: 2,
            positive_keyword: "verify user".to_string(),
            negative_keyword: "remove user".to_string(),
            default_sort_field: SortField::CreatedDate.as_str().to_string(),
            default_sort_order: "asc".to_string(),
            title_column: 3,
            created_date_column: 4,
            case_code_column: 1,
        }
    }
}

impl ListRules {
    pub fn column_for(&self, field: SortField) -> usize {
        match field {
            SortField::Title => self.title_column,
            SortField::CreatedDate => self.created_date_column,
            SortField::CaseCode => self.case_code_column,
        }
    }

    /// Locator of the cell at `column` within a row
    pub fn cell(column: usize) -> Locator {
        Locator::css(format!("td:nth-child({})", column))
    }
}

/// What the create-plan form is expected to report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormRules {
    /// Class added to the start-date input when the range is inverted
    pub invalid_marker: String,
    /// Exact message for an over-long description
    pub description_limit_message: String,
}

impl Default for FormRules {
    fn default() -> Self {
        Self {
            invalid_marker: "is-invalid".to_string(),
            description_limit_message: "Description không được vượt quá 500 ký tự.".to_string(),
        }
    }
}

/// Fixed waits, in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// Element lookup retry window, set once per session
    pub implicit_wait_ms: u64,
    pub login_settle_ms: u64,
    pub scenario_settle_ms: u64,
    pub date_validation_settle_ms: u64,
    pub dialog_timeout_ms: u64,
    pub dialog_poll_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            implicit_wait_ms: 3000,
            login_settle_ms: 500,
            scenario_settle_ms: 500,
            date_validation_settle_ms: 1500,
            dialog_timeout_ms: 5000,
            dialog_poll_ms: 500,
        }
    }
}

impl Timing {
    pub fn implicit_wait(&self) -> Duration {
        Duration::from_millis(self.implicit_wait_ms)
    }

    pub fn login_settle(&self) -> Duration {
        Duration::from_millis(self.login_settle_ms)
    }

    pub fn scenario_settle(&self) -> Duration {
        Duration::from_millis(self.scenario_settle_ms)
    }

    pub fn date_validation_settle(&self) -> Duration {
        Duration::from_millis(self.date_validation_settle_ms)
    }

    pub fn dialog_timeout(&self) -> Duration {
        Duration::from_millis(self.dialog_timeout_ms)
    }

    pub fn dialog_poll(&self) -> Duration {
        Duration::from_millis(self.dialog_poll_ms)
    }
}

/// Browser engines the runner knows how to request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserEngine {
    Firefox,
    Chrome,
    Edge,
}

impl BrowserEngine {
    /// `browserName` capability sent when opening a session
    pub fn browser_name(&self) -> &'static str {
        match self {
            BrowserEngine::Firefox => "firefox",
            BrowserEngine::Chrome => "chrome",
            BrowserEngine::Edge => "MicrosoftEdge",
        }
    }
}

impl std::fmt::Display for BrowserEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BrowserEngine::Firefox => write!(f, "Firefox"),
            BrowserEngine::Chrome => write!(f, "Chrome"),
            BrowserEngine::Edge => write!(f, "Edge"),
        }
    }
}

/// A WebDriver server for one engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserEndpoint {
    pub engine: BrowserEngine,
    pub webdriver_url: String,
    #[serde(default)]
    pub headless: bool,
}

impl BrowserEndpoint {
    pub fn new(engine: BrowserEngine, webdriver_url: impl Into<String>) -> Self {
        Self {
            engine,
            webdriver_url: webdriver_url.into(),
            headless: false,
        }
    }
}
