//! In-memory stand-in for the test-management web application.
//!
//! Implements `Browser` directly, so scenarios run against it exactly as they
//! would against a WebDriver session. `AppBugs` switches on misbehaviour the
//! engine is expected to catch.

#![allow(dead_code)]

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use serde_json::Value;
use url::Url;

use tmat_common::{SortField, SortOrder};
use tmat_e2e::browser::{css_escape, Browser, ElementRef, Locator, ScriptArg};
use tmat_e2e::config::{ListRules, RunnerConfig};
use tmat_e2e::evaluator::list::compare_ignore_case;
use tmat_e2e::{E2eError, E2eResult};

pub const ADMIN_EMAIL: &str = "admin1@mail.com";
pub const ADMIN_PASSWORD: &str = "123456";
pub const RELEASES: [&str; 2] = ["rel-1", "rel-2"];
pub const PAGE_SIZE: usize = 5;
pub const CREATED_MESSAGE: &str = "Test plan created successfully";

/// Misbehaviour toggles
#[derive(Debug, Clone, Default)]
pub struct AppBugs {
    pub no_page_clamp: bool,
    pub case_sensitive_sort: bool,
    pub ignore_keyword: bool,
    pub silent_login_failure: bool,
    pub dialog_on_invalid: bool,
    pub wrong_description_message: bool,
    pub no_confirmation: bool,
    pub missing_list_table: bool,
    pub broken_alert_accept: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub code: String,
    pub title: String,
    pub created: String,
    /// Archived cases stay in the project but never appear in the list view
    pub archived: bool,
}

impl Row {
    pub fn new(code: &str, title: &str, created: &str) -> Self {
        Self {
            code: code.to_string(),
            title: title.to_string(),
            created: created.to_string(),
            archived: false,
        }
    }

    pub fn archived(code: &str, title: &str, created: &str) -> Self {
        Self {
            archived: true,
            ..Self::new(code, title, created)
        }
    }

    fn sort_key(&self, field: SortField) -> &str {
        match field {
            SortField::Title => &self.title,
            SortField::CreatedDate => &self.created,
            SortField::CaseCode => &self.code,
        }
    }

    fn cell(&self, column: usize) -> Option<String> {
        match column {
            1 => Some(self.code.clone()),
            2 => Some("Active".to_string()),
            3 => Some(self.title.clone()),
            4 => Some(self.created.clone()),
            _ => None,
        }
    }
}

/// Test cases of the seeded project. Codes, titles and creation dates all
/// sort the same way, case-insensitively.
pub fn seed_rows() -> Vec<Row> {
    vec![
        Row::new("TC-006", "Verify User Login", "2024-01-06"),
        Row::new("TC-001", "Add Test Plan", "2024-01-01"),
        Row::new("TC-004", "Delete User Session", "2024-01-04"),
        Row::new("TC-002", "archive release", "2024-01-02"),
        Row::new("TC-008", "Verify User Profile", "2024-01-08"),
        Row::new("TC-005", "export report", "2024-01-05"),
        Row::new("TC-003", "Bulk Import Cases", "2024-01-03"),
        Row::new("TC-007", "verify user logout", "2024-01-07"),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Blank,
    Login,
    Dashboard,
    List,
    Plan,
    NotFound,
}

#[derive(Debug, Default)]
struct PlanFields {
    open: bool,
    name: String,
    release: String,
    start: String,
    end: String,
    description: String,
    start_class: String,
}

#[derive(Debug)]
struct State {
    url: String,
    page: Page,
    logged_in: bool,
    email: String,
    password: String,
    banner: Option<String>,
    feedback: Vec<String>,
    visible_rows: Vec<Row>,
    plan: PlanFields,
    alert: Option<String>,
    alerts_accepted: usize,
    plans_created: Vec<String>,
    navigations: Vec<String>,
}

pub struct FakeApp {
    config: RunnerConfig,
    rows: Vec<Row>,
    bugs: AppBugs,
    state: Mutex<State>,
}

impl FakeApp {
    pub fn new() -> Self {
        Self::with_bugs(AppBugs::default())
    }

    pub fn with_bugs(bugs: AppBugs) -> Self {
        Self::build(seed_rows(), bugs)
    }

    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self::build(rows, AppBugs::default())
    }

    pub fn build(rows: Vec<Row>, bugs: AppBugs) -> Self {
        Self {
            config: RunnerConfig::default(),
            rows,
            bugs,
            state: Mutex::new(State {
                url: "about:blank".to_string(),
                page: Page::Blank,
                logged_in: false,
                email: String::new(),
                password: String::new(),
                banner: None,
                feedback: Vec::new(),
                visible_rows: Vec::new(),
                plan: PlanFields::default(),
                alert: None,
                alerts_accepted: 0,
                plans_created: Vec::new(),
                navigations: Vec::new(),
            }),
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn logged_in(&self) -> bool {
        self.state.lock().logged_in
    }

    /// Sign the admin in without going through the form
    pub fn sign_in(&self) {
        self.state.lock().logged_in = true;
    }

    pub fn alerts_accepted(&self) -> usize {
        self.state.lock().alerts_accepted
    }

    pub fn alert_open(&self) -> bool {
        self.state.lock().alert.is_some()
    }

    /// Open a native dialog as if the page had raised one
    pub fn raise_alert(&self, text: &str) {
        self.state.lock().alert = Some(text.to_string());
    }

    pub fn plans_created(&self) -> Vec<String> {
        self.state.lock().plans_created.clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state.lock().navigations.clone()
    }

    fn dashboard_url(&self) -> String {
        format!("{}/dashboard", self.config.target.base_url())
    }

    fn open(&self, s: &mut State, raw: &str) -> E2eResult<()> {
        if s.alert.is_some() {
            return Err(unexpected_alert());
        }
        s.navigations.push(raw.to_string());

        let url = Url::parse(raw)?;
        s.banner = None;
        s.feedback.clear();
        s.visible_rows.clear();
        s.plan = PlanFields::default();

        let list_path = format!("/project/{}/test-case", self.config.target.project_id);
        let plan_path = format!("/project/{}/test-plan", self.config.target.project_id);
        let path = url.path().trim_end_matches('/');

        if path.is_empty() || path == "/dashboard" {
            if s.logged_in {
                s.page = Page::Dashboard;
                s.url = self.dashboard_url();
            } else {
                self.show_login(s);
            }
        } else if path == self.config.target.login_path {
            self.show_login(s);
        } else if path == list_path || path == plan_path {
            if !s.logged_in {
                self.show_login(s);
            } else if path == list_path {
                self.show_list(s, &url);
            } else {
                s.page = Page::Plan;
                s.url = self.config.target.plan_url();
            }
        } else {
            s.page = Page::NotFound;
            s.url = raw.to_string();
        }
        Ok(())
    }

    fn show_login(&self, s: &mut State) {
        s.page = Page::Login;
        s.url = self.config.target.login_url();
        s.email.clear();
        s.password.clear();
    }

    fn show_list(&self, s: &mut State, url: &Url) {
        let params: BTreeMap<String, String> = url.query_pairs().into_owned().collect();
        let keyword = params
            .get("testCaseKeyword")
            .filter(|k| !k.is_empty())
            .map(|k| k.to_lowercase());
        let field = params
            .get("sortField")
            .and_then(|f| SortField::from_wire(f))
            .unwrap_or(SortField::CreatedDate);
        let order = params
            .get("sortOrder")
            .and_then(|o| SortOrder::from_wire(o))
            .unwrap_or(SortOrder::Asc);
        let requested: i64 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
        let max_page = self.config.list.max_page;
        let page = if self.bugs.no_page_clamp || (1..=max_page).contains(&requested) {
            requested
        } else {
            1
        };

        let mut rows: Vec<Row> = self
            .rows
            .iter()
            .filter(|row| !row.archived)
            .filter(|row| match &keyword {
                Some(k) if !self.bugs.ignore_keyword => row.title.to_lowercase().contains(k),
                _ => true,
            })
            .cloned()
            .collect();
        if self.bugs.case_sensitive_sort {
            rows.sort_by(|a, b| a.sort_key(field).cmp(b.sort_key(field)));
        } else {
            rows.sort_by(|a, b| compare_ignore_case(a.sort_key(field), b.sort_key(field)));
        }
        if order == SortOrder::Desc {
            rows.reverse();
        }

        let skip = (page.max(1) as usize - 1) * PAGE_SIZE;
        s.visible_rows = rows.into_iter().skip(skip).take(PAGE_SIZE).collect();
        s.page = Page::List;

        let mut query = String::new();
        if let Some(k) = params.get("testCaseKeyword").filter(|k| !k.is_empty()) {
            query.push_str(&format!("testCaseKeyword={}&", urlencoding::encode(k)));
        }
        query.push_str(&format!(
            "sortField={}&sortOrder={}&page={}",
            field.as_str(),
            order.as_str(),
            page
        ));
        s.url = format!("{}?{}", self.config.target.list_url(), query);
    }

    fn locate(&self, s: &State, locator: &Locator) -> Option<&'static str> {
        let l = &self.config.locators;
        match s.page {
            Page::Login => {
                if *locator == l.email_input {
                    Some("email")
                } else if *locator == l.password_input {
                    Some("password")
                } else if *locator == l.login_button {
                    Some("login")
                } else if *locator == l.error_banner && s.banner.is_some() {
                    Some("banner")
                } else {
                    None
                }
            }
            Page::List if *locator == l.list_table && !self.bugs.missing_list_table => Some("table"),
            Page::Plan if *locator == l.add_plan_button => Some("add"),
            Page::Plan if s.plan.open => {
                if *locator == l.plan_name {
                    Some("name")
                } else if *locator == l.release_select {
                    Some("release")
                } else if *locator == l.start_date {
                    Some("start")
                } else if *locator == l.end_date {
                    Some("end")
                } else if *locator == l.description {
                    Some("description")
                } else if *locator == l.submit_button {
                    Some("submit")
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn field<'s>(&self, s: &'s mut State, id: &str) -> Option<&'s mut String> {
        match id {
            "email" => Some(&mut s.email),
            "password" => Some(&mut s.password),
            "name" if s.plan.open => Some(&mut s.plan.name),
            "start" if s.plan.open => Some(&mut s.plan.start),
            "end" if s.plan.open => Some(&mut s.plan.end),
            "description" if s.plan.open => Some(&mut s.plan.description),
            _ => None,
        }
    }

    fn press(&self, s: &mut State, element: &ElementRef) -> E2eResult<()> {
        match element.id() {
            "login" => self.submit_login(s),
            "add" => {
                s.plan = PlanFields {
                    open: true,
                    start_class: "form-control".to_string(),
                    ..PlanFields::default()
                };
            }
            "submit" => self.submit_plan(s),
            id => {
                if let Some(value) = id.strip_prefix("option:") {
                    s.plan.release = value.to_string();
                }
            }
        }
        Ok(())
    }

    fn submit_login(&self, s: &mut State) {
        s.banner = None;
        s.feedback.clear();

        let mut missing = Vec::new();
        if s.email.is_empty() {
            missing.push("Email is required.".to_string());
        }
        if s.password.is_empty() {
            missing.push("Password is required.".to_string());
        }

        if !missing.is_empty() {
            if !self.bugs.silent_login_failure {
                s.feedback = missing;
            }
        } else if s.email == ADMIN_EMAIL && s.password == ADMIN_PASSWORD {
            s.logged_in = true;
            s.page = Page::Dashboard;
            s.url = self.dashboard_url();
        } else if !self.bugs.silent_login_failure {
            s.banner = Some("Invalid email or password.".to_string());
        }
    }

    fn submit_plan(&self, s: &mut State) {
        let constraint_failed = ["name", "release", "description"]
            .iter()
            .any(|id| !self.validation_message(s, id).is_empty());
        if constraint_failed {
            if self.bugs.dialog_on_invalid {
                s.alert = Some("Please check the form".to_string());
            }
            return;
        }

        let start = NaiveDate::parse_from_str(&s.plan.start, "%m/%d/%Y");
        let end = NaiveDate::parse_from_str(&s.plan.end, "%m/%d/%Y");
        if let (Ok(start), Ok(end)) = (start, end) {
            if start > end {
                s.plan.start_class = "form-control is-invalid".to_string();
                if self.bugs.dialog_on_invalid {
                    s.alert = Some("Start date must be before end date".to_string());
                }
                return;
            }
        }

        if !self.bugs.no_confirmation {
            s.plans_created.push(s.plan.name.clone());
            s.alert = Some(CREATED_MESSAGE.to_string());
        }
    }

    fn validation_message(&self, s: &State, id: &str) -> String {
        match id {
            "name" if s.plan.name.is_empty() => "Please fill out this field.".to_string(),
            "name" if s.plan.name.encode_utf16().count() > 250 => {
                "Please shorten this text to 250 characters or less.".to_string()
            }
            "release" if s.plan.release.is_empty() => "Please select an item in the list.".to_string(),
            "description" if s.plan.description.encode_utf16().count() > 500 => {
                if self.bugs.wrong_description_message {
                    "Description is too long.".to_string()
                } else {
                    self.config.form.description_limit_message.clone()
                }
            }
            _ => String::new(),
        }
    }
}

fn unexpected_alert() -> E2eError {
    E2eError::WebDriver {
        error: "unexpected alert open".to_string(),
        message: "a dialog is blocking the page".to_string(),
    }
}

fn stale(element: &ElementRef) -> E2eError {
    E2eError::StaleElement(element.id().to_string())
}

#[async_trait]
impl Browser for FakeApp {
    async fn navigate(&self, url: &str) -> E2eResult<()> {
        let mut s = self.state.lock();
        self.open(&mut s, url)
    }

    async fn refresh(&self) -> E2eResult<()> {
        let mut s = self.state.lock();
        let url = s.url.clone();
        self.open(&mut s, &url)
    }

    async fn current_url(&self) -> E2eResult<String> {
        Ok(self.state.lock().url.clone())
    }

    async fn find_element(&self, locator: &Locator) -> E2eResult<ElementRef> {
        let s = self.state.lock();
        self.locate(&s, locator)
            .map(|id| ElementRef(id.to_string()))
            .ok_or_else(|| E2eError::ElementNotFound(locator.to_string()))
    }

    async fn find_elements(&self, locator: &Locator) -> E2eResult<Vec<ElementRef>> {
        let s = self.state.lock();
        if s.page == Page::Login && *locator == self.config.locators.field_feedback {
            return Ok((0..s.feedback.len())
                .map(|i| ElementRef(format!("feedback:{}", i)))
                .collect());
        }
        Ok(self
            .locate(&s, locator)
            .map(|id| vec![ElementRef(id.to_string())])
            .unwrap_or_default())
    }

    async fn find_child(&self, parent: &ElementRef, locator: &Locator) -> E2eResult<ElementRef> {
        if let Some(row) = parent.id().strip_prefix("row:") {
            if let Some(column) = (1..=4).find(|c| ListRules::cell(*c) == *locator) {
                return Ok(ElementRef(format!("cell:{}:{}", row, column)));
            }
        }
        Err(E2eError::ElementNotFound(locator.to_string()))
    }

    async fn find_children(&self, parent: &ElementRef, locator: &Locator) -> E2eResult<Vec<ElementRef>> {
        let s = self.state.lock();
        match parent.id() {
            "table" if *locator == self.config.locators.table_rows => Ok((0..s.visible_rows.len())
                .map(|i| ElementRef(format!("row:{}", i)))
                .collect()),
            "release" => Ok(std::iter::once("")
                .chain(RELEASES)
                .filter(|v| Locator::css(format!("option[value=\"{}\"]", css_escape(v))) == *locator)
                .map(|v| ElementRef(format!("option:{}", v)))
                .collect()),
            _ => Ok(Vec::new()),
        }
    }

    async fn text(&self, element: &ElementRef) -> E2eResult<String> {
        let s = self.state.lock();
        let id = element.id();
        if id == "banner" {
            return s.banner.clone().ok_or_else(|| stale(element));
        }
        if let Some(index) = id.strip_prefix("feedback:") {
            return index
                .parse::<usize>()
                .ok()
                .and_then(|i| s.feedback.get(i).cloned())
                .ok_or_else(|| stale(element));
        }
        if let Some(rest) = id.strip_prefix("cell:") {
            let mut parts = rest.split(':').filter_map(|p| p.parse::<usize>().ok());
            if let (Some(row), Some(column)) = (parts.next(), parts.next()) {
                if let Some(text) = s.visible_rows.get(row).and_then(|r| r.cell(column)) {
                    return Ok(text);
                }
            }
        }
        Err(stale(element))
    }

    async fn attribute(&self, element: &ElementRef, name: &str) -> E2eResult<Option<String>> {
        let s = self.state.lock();
        match (element.id(), name) {
            ("start", "class") => Ok(Some(s.plan.start_class.clone())),
            _ => Ok(None),
        }
    }

    async fn clear(&self, element: &ElementRef) -> E2eResult<()> {
        let mut s = self.state.lock();
        let field = self.field(&mut s, element.id()).ok_or_else(|| stale(element))?;
        field.clear();
        Ok(())
    }

    async fn send_keys(&self, element: &ElementRef, text: &str) -> E2eResult<()> {
        let mut s = self.state.lock();
        let field = self.field(&mut s, element.id()).ok_or_else(|| stale(element))?;
        field.push_str(text);
        Ok(())
    }

    async fn click(&self, element: &ElementRef) -> E2eResult<()> {
        let mut s = self.state.lock();
        self.press(&mut s, element)
    }

    async fn execute_script(&self, script: &str, args: Vec<ScriptArg>) -> E2eResult<Value> {
        let element = match args.into_iter().next() {
            Some(ScriptArg::Element(element)) => element,
            _ => return Err(E2eError::ScriptResult("expected an element argument".to_string())),
        };

        let mut s = self.state.lock();
        if script.contains("validationMessage") {
            Ok(Value::String(self.validation_message(&s, element.id())))
        } else if script.contains(".click()") {
            self.press(&mut s, &element)?;
            Ok(Value::Null)
        } else {
            Err(E2eError::ScriptResult(format!("unsupported script: {}", script)))
        }
    }

    async fn alert_text(&self) -> E2eResult<String> {
        self.state.lock().alert.clone().ok_or(E2eError::NoAlertPresent)
    }

    async fn accept_alert(&self) -> E2eResult<()> {
        let mut s = self.state.lock();
        if self.bugs.broken_alert_accept {
            return Err(E2eError::WebDriver {
                error: "unknown error".to_string(),
                message: "alert could not be accepted".to_string(),
            });
        }
        match s.alert.take() {
            Some(_) => {
                s.alerts_accepted += 1;
                Ok(())
            }
            None => Err(E2eError::NoAlertPresent),
        }
    }
}
