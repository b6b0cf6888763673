//! Scenario model: the declarative records each test family is driven from

use serde::{Deserialize, Serialize};

/// One login attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    #[serde(alias = "Email", default)]
    pub email: String,
    #[serde(alias = "Password", default)]
    pub password: String,
}

impl Credential {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Sortable columns of the test-case list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortField {
    Title,
    CreatedDate,
    CaseCode,
}

impl SortField {
    pub const ALL: [SortField; 3] = [SortField::Title, SortField::CreatedDate, SortField::CaseCode];

    /// Value used in the `sortField` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::CreatedDate => "created-date",
            SortField::CaseCode => "case-code",
        }
    }

    /// Exact, case-sensitive match against the wire value
    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == value)
    }
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction of the test-case list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of one list-view request.
///
/// Sort field and order keep the raw fixture strings so that invalid values
/// reach the application untouched; `page` is never range-checked here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(alias = "Keyword", default)]
    pub keyword: Option<String>,
    #[serde(alias = "SortField", default)]
    pub sort_field: Option<String>,
    #[serde(alias = "SortOrder", default)]
    pub sort_order: Option<String>,
    #[serde(alias = "Page", default)]
    pub page: i64,
}

impl ListQuery {
    pub fn for_page(page: i64) -> Self {
        Self {
            keyword: None,
            sort_field: None,
            sort_order: None,
            page,
        }
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn with_sort(mut self, field: impl Into<String>, order: impl Into<String>) -> Self {
        self.sort_field = Some(field.into());
        self.sort_order = Some(order.into());
        self
    }

    /// Keyword, with an empty string treated as absent
    pub fn keyword(&self) -> Option<&str> {
        non_empty(&self.keyword)
    }

    pub fn raw_sort_field(&self) -> Option<&str> {
        non_empty(&self.sort_field)
    }

    pub fn raw_sort_order(&self) -> Option<&str> {
        non_empty(&self.sort_order)
    }

    /// Typed sort field, `None` when absent or not one of the known columns
    pub fn sort_field(&self) -> Option<SortField> {
        self.raw_sort_field().and_then(SortField::from_wire)
    }

    pub fn sort_order(&self) -> Option<SortOrder> {
        self.raw_sort_order().and_then(SortOrder::from_wire)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Payload of the "add test plan" form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSubmission {
    #[serde(rename = "testPlanName", alias = "TestPlanName", default)]
    pub plan_name: String,
    #[serde(alias = "ReleaseId", default)]
    pub release_id: String,
    #[serde(alias = "FromDate", with = "crate::fixtures::day_first_date")]
    pub from_date: chrono::NaiveDate,
    #[serde(alias = "ToDate", with = "crate::fixtures::day_first_date")]
    pub to_date: chrono::NaiveDate,
    #[serde(alias = "Description", default)]
    pub description: Option<String>,
}

impl FormSubmission {
    /// Name length as the browser's constraint validation counts it
    pub fn plan_name_len(&self) -> usize {
        self.plan_name.encode_utf16().count()
    }

    pub fn description_len(&self) -> usize {
        self.description
            .as_deref()
            .map(|d| d.encode_utf16().count())
            .unwrap_or(0)
    }
}

/// Scenario families, in the order a session runs them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioFamily {
    Login,
    ListQuery,
    FormSubmission,
}

impl ScenarioFamily {
    pub const ALL: [ScenarioFamily; 3] = [
        ScenarioFamily::Login,
        ScenarioFamily::ListQuery,
        ScenarioFamily::FormSubmission,
    ];

    /// Fixed fixture file identifier for this family
    pub fn fixture_file(&self) -> &'static str {
        match self {
            ScenarioFamily::Login => "login-data.json",
            ScenarioFamily::ListQuery => "view-tc-list-data.json",
            ScenarioFamily::FormSubmission => "add-test-plan-data.json",
        }
    }
}

impl std::fmt::Display for ScenarioFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioFamily::Login => write!(f, "login"),
            ScenarioFamily::ListQuery => write!(f, "list-query"),
            ScenarioFamily::FormSubmission => write!(f, "form-submission"),
        }
    }
}

/// A single declarative test-case record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "family", content = "payload", rename_all = "snake_case")]
pub enum Scenario {
    Login(Credential),
    ListQuery(ListQuery),
    FormSubmission(FormSubmission),
}

impl Scenario {
    pub fn family(&self) -> ScenarioFamily {
        match self {
            Scenario::Login(_) => ScenarioFamily::Login,
            Scenario::ListQuery(_) => ScenarioFamily::ListQuery,
            Scenario::FormSubmission(_) => ScenarioFamily::FormSubmission,
        }
    }

    /// Pretty-printed record, as shown next to each verdict
    pub fn payload_json(&self) -> String {
        let payload = match self {
            Scenario::Login(c) => serde_json::to_string_pretty(c),
            Scenario::ListQuery(q) => serde_json::to_string_pretty(q),
            Scenario::FormSubmission(f) => serde_json::to_string_pretty(f),
        };
        payload.unwrap_or_default()
    }
}

impl From<Credential> for Scenario {
    fn from(value: Credential) -> Self {
        Scenario::Login(value)
    }
}

impl From<ListQuery> for Scenario {
    fn from(value: ListQuery) -> Self {
        Scenario::ListQuery(value)
    }
}

impl From<FormSubmission> for Scenario {
    fn from(value: FormSubmission) -> Self {
        Scenario::FormSubmission(value)
    }
}
