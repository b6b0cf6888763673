//! Action driver: turns scenario records into browser actions

use chrono::NaiveDate;
use tokio::time::sleep;
use tracing::debug;

use tmat_common::{Credential, FormSubmission, ListQuery};

use crate::browser::{css_escape, Browser, ElementRef, Locator, ScriptArg};
use crate::config::RunnerConfig;
use crate::error::{E2eError, E2eResult};

/// Date format the plan form's inputs accept
pub const INPUT_DATE_FORMAT: &str = "%m/%d/%Y";

/// Dispatches the click from inside the page, bypassing hit-testing
const DOM_CLICK_SCRIPT: &str = "arguments[0].click();";

/// The list page after a query was applied
#[derive(Debug, Clone)]
pub struct ListPage {
    pub rows: Vec<ElementRef>,
}

/// Plan form fields the evaluator inspects after submission
#[derive(Debug, Clone)]
pub struct PlanForm {
    pub name: ElementRef,
    pub release: ElementRef,
    pub description: ElementRef,
}

pub struct ActionDriver<'a> {
    browser: &'a dyn Browser,
    config: &'a RunnerConfig,
}

impl<'a> ActionDriver<'a> {
    pub fn new(browser: &'a dyn Browser, config: &'a RunnerConfig) -> Self {
        Self { browser, config }
    }

    /// Go to the login page and sign in
    pub async fn open_session(&self, credential: &Credential) -> E2eResult<()> {
        self.browser.navigate(&self.config.target.login_url()).await?;
        self.drive_login(credential).await
    }

    /// Fill the login form on the current page and submit it
    pub async fn drive_login(&self, credential: &Credential) -> E2eResult<()> {
        let locators = &self.config.locators;
        self.fill(&locators.email_input, &credential.email).await?;
        self.fill(&locators.password_input, &credential.password).await?;

        let button = self.browser.find_element(&locators.login_button).await?;
        self.browser
            .execute_script(DOM_CLICK_SCRIPT, vec![ScriptArg::from(&button)])
            .await?;

        sleep(self.config.timing.login_settle()).await;
        Ok(())
    }

    /// Open the list view with the query applied and read back its rows
    pub async fn drive_list_query(&self, query: &ListQuery) -> E2eResult<ListPage> {
        let url = list_query_url(&self.config.target.list_url(), query);
        debug!("Navigating to {}", url);
        self.browser.navigate(&url).await?;

        let locators = &self.config.locators;
        let table = self.browser.find_element(&locators.list_table).await?;
        let rows = self.browser.find_children(&table, &locators.table_rows).await?;
        Ok(ListPage { rows })
    }

    /// Open the create form, fill every field and submit.
    ///
    /// Fails with `UnselectableOption` before submitting when the release id is
    /// not one of the dropdown's values.
    pub async fn drive_form_submission(&self, payload: &FormSubmission) -> E2eResult<PlanForm> {
        let locators = &self.config.locators;
        self.browser.navigate(&self.config.target.plan_url()).await?;

        let add = self.browser.find_element(&locators.add_plan_button).await?;
        self.browser.click(&add).await?;

        let name = self.fill(&locators.plan_name, &payload.plan_name).await?;

        let release = self.browser.find_element(&locators.release_select).await?;
        self.select_by_value(&locators.release_select, &release, &payload.release_id)
            .await?;

        self.fill(&locators.start_date, &format_input_date(payload.from_date))
            .await?;
        self.fill(&locators.end_date, &format_input_date(payload.to_date))
            .await?;
        let description = self
            .fill(&locators.description, payload.description.as_deref().unwrap_or_default())
            .await?;

        let submit = self.browser.find_element(&locators.submit_button).await?;
        self.browser.click(&submit).await?;

        Ok(PlanForm {
            name,
            release,
            description,
        })
    }

    /// Clear an input and type into it
    async fn fill(&self, locator: &Locator, text: &str) -> E2eResult<ElementRef> {
        let element = self.browser.find_element(locator).await?;
        self.browser.clear(&element).await?;
        if !text.is_empty() {
            self.browser.send_keys(&element, text).await?;
        }
        Ok(element)
    }

    async fn select_by_value(&self, locator: &Locator, select: &ElementRef, value: &str) -> E2eResult<()> {
        let option = Locator::css(format!("option[value=\"{}\"]", css_escape(value)));
        let options = self.browser.find_children(select, &option).await?;
        match options.first() {
            Some(option) => self.browser.click(option).await,
            None => Err(E2eError::UnselectableOption {
                select: locator.to_string(),
                value: value.to_string(),
            }),
        }
    }
}

/// Build `{list_url}?{query}` from the present fields, always ending with `page`
pub fn list_query_url(list_url: &str, query: &ListQuery) -> String {
    let mut params = Vec::new();

    if let Some(keyword) = query.keyword() {
        params.push(format!("testCaseKeyword={}", urlencoding::encode(keyword)));
    }
    if let Some(field) = query.raw_sort_field() {
        params.push(format!("sortField={}", urlencoding::encode(field)));
    }
    if let Some(order) = query.raw_sort_order() {
        params.push(format!("sortOrder={}", urlencoding::encode(order)));
    }
    params.push(format!("page={}", query.page));

    format!("{}?{}", list_url, params.join("&"))
}

pub fn format_input_date(date: NaiveDate) -> String {
    date.format(INPUT_DATE_FORMAT).to_string()
}
