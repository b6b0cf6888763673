//! Login verification

use tmat_common::Credential;

use super::{ensure, AssertionFailure, Check, OutcomeEvaluator};
use crate::error::E2eError;

impl OutcomeEvaluator<'_> {
    /// A login attempt passes when it either reaches the dashboard or is
    /// visibly rejected. Silently staying on the form is the only failure.
    pub async fn verify_login(&self, credential: &Credential) -> Check {
        let url = self.browser.current_url().await?;
        if url.contains(&self.config.target.dashboard_marker) {
            return Ok(format!("'{}' reached the dashboard", credential.email));
        }

        let message = self.login_error().await?;
        ensure(!message.is_empty(), || {
            format!("'{}' neither logged in nor shown an error", credential.email)
        })?;
        Ok(format!("'{}' rejected: {}", credential.email, message))
    }

    /// Banner text if a banner is shown, otherwise the joined field feedback
    async fn login_error(&self) -> Result<String, AssertionFailure> {
        let locators = &self.config.locators;
        match self.browser.find_element(&locators.error_banner).await {
            Ok(banner) => Ok(self.browser.text(&banner).await?.trim().to_string()),
            Err(E2eError::ElementNotFound(_)) => {
                let mut messages = Vec::new();
                for feedback in self.browser.find_elements(&locators.field_feedback).await? {
                    let text = self.browser.text(&feedback).await?;
                    let text = text.trim();
                    if !text.is_empty() {
                        messages.push(text.to_string());
                    }
                }
                Ok(messages.join(" "))
            }
            Err(e) => Err(e.into()),
        }
    }
}
