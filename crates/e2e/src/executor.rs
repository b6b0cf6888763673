//! Scenario execution: act, verify, reconcile, record

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{debug, warn};

use tmat_common::{Credential, FormSubmission, ListQuery, Scenario};

use crate::browser::Browser;
use crate::config::RunnerConfig;
use crate::dialog::DialogReconciler;
use crate::driver::{ActionDriver, ListPage, PlanForm};
use crate::error::E2eResult;
use crate::evaluator::{Check, OutcomeEvaluator};
use crate::tally::{ResultAccumulator, Verdict};

/// One family's hooks into the shared execution protocol
#[async_trait]
pub trait ScenarioCase: Clone + Into<Scenario> + Send + Sync {
    /// What the action leaves behind for verification
    type Observed: Send + Sync;

    async fn act(&self, driver: &ActionDriver<'_>) -> E2eResult<Self::Observed>;

    async fn verify(&self, evaluator: &OutcomeEvaluator<'_>, observed: &Self::Observed) -> Check;

    /// Whether a native dialog may be left open after verification
    fn reconciles_dialog(&self) -> bool {
        false
    }
}

#[async_trait]
impl ScenarioCase for Credential {
    type Observed = ();

    async fn act(&self, driver: &ActionDriver<'_>) -> E2eResult<()> {
        driver.drive_login(self).await
    }

    async fn verify(&self, evaluator: &OutcomeEvaluator<'_>, _: &()) -> Check {
        evaluator.verify_login(self).await
    }
}

#[async_trait]
impl ScenarioCase for ListQuery {
    type Observed = ListPage;

    async fn act(&self, driver: &ActionDriver<'_>) -> E2eResult<ListPage> {
        driver.drive_list_query(self).await
    }

    async fn verify(&self, evaluator: &OutcomeEvaluator<'_>, page: &ListPage) -> Check {
        evaluator.verify_list_query(self, page).await
    }
}

#[async_trait]
impl ScenarioCase for FormSubmission {
    type Observed = PlanForm;

    async fn act(&self, driver: &ActionDriver<'_>) -> E2eResult<PlanForm> {
        driver.drive_form_submission(self).await
    }

    async fn verify(&self, evaluator: &OutcomeEvaluator<'_>, form: &PlanForm) -> Check {
        evaluator.verify_form_submission(self, form).await
    }

    fn reconciles_dialog(&self) -> bool {
        true
    }
}

/// Runs scenarios of any family against one browser
pub struct ScenarioExecutor<'a> {
    browser: &'a dyn Browser,
    config: &'a RunnerConfig,
    driver: ActionDriver<'a>,
    evaluator: OutcomeEvaluator<'a>,
    dialogs: DialogReconciler,
}

impl<'a> ScenarioExecutor<'a> {
    pub fn new(browser: &'a dyn Browser, config: &'a RunnerConfig) -> Self {
        Self {
            browser,
            config,
            driver: ActionDriver::new(browser, config),
            evaluator: OutcomeEvaluator::new(browser, config),
            dialogs: DialogReconciler::from_timing(&config.timing),
        }
    }

    pub fn driver(&self) -> &ActionDriver<'a> {
        &self.driver
    }

    /// Execute one scenario and record exactly one verdict for it.
    ///
    /// Only infrastructure failures during the action are returned; the
    /// caller decides how far they abort.
    pub async fn execute<C: ScenarioCase>(&self, case: &C, results: &mut ResultAccumulator) -> E2eResult<()> {
        let scenario: Scenario = case.clone().into();
        debug!("Executing {} scenario", scenario.family());

        let observed = match case.act(&self.driver).await {
            Ok(observed) => observed,
            Err(e) if e.is_data_authoring() => {
                results.record(Verdict::skipped(scenario, e.to_string()));
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let check = case.verify(&self.evaluator, &observed).await;

        if case.reconciles_dialog() {
            if let Err(e) = self.dialogs.reconcile(self.browser).await {
                warn!("Dialog reconciliation failed: {}", e);
            }
        }

        let verdict = match check {
            Ok(detail) => Verdict::passed(scenario, detail),
            Err(failure) => Verdict::failed(scenario, failure.0),
        };
        results.record(verdict);

        sleep(self.config.timing.scenario_settle()).await;
        Ok(())
    }
}
