//! Plan form verification

use tokio::time::sleep;

use tmat_common::FormSubmission;

use super::{ensure, AssertionFailure, Check, OutcomeEvaluator};
use crate::browser::{ElementRef, ScriptArg};
use crate::driver::PlanForm;

pub const MAX_PLAN_NAME_LEN: usize = 250;
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Forces the field's constraint check and returns its message
const VALIDATION_MESSAGE_SCRIPT: &str =
    "let field = arguments[0]; field.reportValidity(); return field.validationMessage;";

/// Which validation rule a submission trips, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormBranch {
    EmptyName,
    NameTooLong,
    EmptyRelease,
    InvertedDateRange,
    DescriptionTooLong,
    Valid,
}

impl FormBranch {
    /// Classify a submission. Rules are tried in order and the first match wins,
    /// so a record breaking several rules is judged by the earliest one.
    pub fn classify(payload: &FormSubmission) -> Self {
        if payload.plan_name.is_empty() {
            FormBranch::EmptyName
        } else if payload.plan_name_len() > MAX_PLAN_NAME_LEN {
            FormBranch::NameTooLong
        } else if payload.release_id.is_empty() {
            FormBranch::EmptyRelease
        } else if payload.from_date > payload.to_date {
            FormBranch::InvertedDateRange
        } else if payload.description_len() > MAX_DESCRIPTION_LEN {
            FormBranch::DescriptionTooLong
        } else {
            FormBranch::Valid
        }
    }
}

impl std::fmt::Display for FormBranch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FormBranch::EmptyName => "empty plan name",
            FormBranch::NameTooLong => "plan name too long",
            FormBranch::EmptyRelease => "no release selected",
            FormBranch::InvertedDateRange => "start date after end date",
            FormBranch::DescriptionTooLong => "description too long",
            FormBranch::Valid => "valid plan",
        };
        f.write_str(label)
    }
}

impl OutcomeEvaluator<'_> {
    pub async fn verify_form_submission(&self, payload: &FormSubmission, form: &PlanForm) -> Check {
        let branch = FormBranch::classify(payload);
        match branch {
            FormBranch::EmptyName | FormBranch::NameTooLong => {
                let message = self.validation_message(&form.name).await?;
                ensure(!message.is_empty(), || format!("{}: plan name accepted", branch))?;
                Ok(format!("{} rejected: {}", branch, message))
            }
            FormBranch::EmptyRelease => {
                let message = self.validation_message(&form.release).await?;
                ensure(!message.is_empty(), || format!("{}: release accepted", branch))?;
                Ok(format!("{} rejected: {}", branch, message))
            }
            FormBranch::InvertedDateRange => {
                sleep(self.config.timing.date_validation_settle()).await;
                let marker = &self.config.form.invalid_marker;
                let start = self
                    .browser
                    .find_element(&self.config.locators.start_date)
                    .await?;
                let class = self
                    .browser
                    .attribute(&start, "class")
                    .await?
                    .unwrap_or_default();
                ensure(class.split_whitespace().any(|c| c == marker), || {
                    format!("{}: start date not marked '{}' (class '{}')", branch, marker, class)
                })?;
                Ok(format!("{} rejected", branch))
            }
            FormBranch::DescriptionTooLong => {
                let expected = &self.config.form.description_limit_message;
                let message = self.validation_message(&form.description).await?;
                ensure(&message == expected, || {
                    format!("{}: message '{}', expected '{}'", branch, message, expected)
                })?;
                Ok(format!("{} rejected: {}", branch, message))
            }
            FormBranch::Valid => {
                let confirmed = self.dialogs.await_dialog(self.browser).await?;
                ensure(confirmed, || {
                    format!("no confirmation dialog within {:?}", self.dialogs.timeout())
                })?;
                Ok(format!("{} created", branch))
            }
        }
    }

    async fn validation_message(&self, field: &ElementRef) -> Result<String, AssertionFailure> {
        let value = self
            .browser
            .execute_script(VALIDATION_MESSAGE_SCRIPT, vec![ScriptArg::from(field)])
            .await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }
}
