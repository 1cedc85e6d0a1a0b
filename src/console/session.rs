//! Operator session: the credential, the API client, one operation runner and
//! the stage controller wired together.
//!
//! A stage action runs its remote call through the runner and, on success, lets
//! the controller unlock and jump to the following stage. Failures leave
//! navigation untouched. Only manual selection is gated by the watermark.

use super::error::ConsoleError;
use crate::api::{
    AlertRequest, AnalyzeRequest, ApiClient, CostSimulationRequest, CostSimulationResult,
    Metric, Recommendation, RequestError, SavingsSummary, WhatIfEntry, WhatIfRequest,
};
use crate::auth::AuthStore;
use crate::config::{load_settings, Settings, StatePaths};
use crate::shared::{append_console_log, LogLevel};
use crate::workflow::{
    clear_workflow_state, load_workflow_state, save_workflow_state, OperationRunner,
    SelectOutcome, Stage, WorkflowController, WorkflowState, WorkflowTransition,
};
use std::cmp::Ordering;
use std::sync::Arc;
use std::thread;

pub const WHATIF_TOP_N: usize = 5;

/// Typed result of the last action, one variant per response shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult {
    SignedIn(Option<SavingsSummary>),
    Resources(Vec<String>),
    Metric(Metric),
    Metrics(Vec<Metric>),
    Recommendations(Vec<Recommendation>),
    Recommendation(Option<Recommendation>),
    CostSimulation(CostSimulationResult),
    WhatIf(Vec<WhatIfEntry>),
    SavingsSummary(SavingsSummary),
    AlertSent(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSnapshot {
    pub resources: Vec<String>,
    pub latest_recommendation: Option<Recommendation>,
    pub savings: Option<SavingsSummary>,
}

pub struct ConsoleSession {
    paths: Option<StatePaths>,
    settings: Settings,
    client: ApiClient,
    controller: WorkflowController,
    runner: OperationRunner<ActionResult>,
}

impl ConsoleSession {
    /// Session without on-disk state; navigation starts from the credential
    /// already held by `auth`.
    pub fn new(settings: Settings, auth: Arc<AuthStore>) -> Self {
        let state = if auth.is_authenticated() {
            WorkflowState::signed_in()
        } else {
            WorkflowState::locked()
        };
        Self {
            paths: None,
            client: ApiClient::from_settings(&settings, auth),
            settings,
            controller: WorkflowController::from_state(state),
            runner: OperationRunner::new(),
        }
    }

    /// Loads settings, credential and navigation state from a state root.
    pub fn open(paths: StatePaths) -> Result<Self, ConsoleError> {
        let settings = load_settings(&paths)?;
        let auth = Arc::new(AuthStore::load(paths.credential_path())?);
        let state = if auth.is_authenticated() {
            load_workflow_state(&paths.workflow_state_path())?
                .filter(|state| state.unlocked.is_some())
                .unwrap_or_else(WorkflowState::signed_in)
        } else {
            WorkflowState::locked()
        };
        let mut client = ApiClient::from_settings(&settings, auth);
        if settings.log_requests {
            client = client.with_log_root(&paths.root);
        }
        Ok(Self {
            paths: Some(paths),
            settings,
            client,
            controller: WorkflowController::from_state(state),
            runner: OperationRunner::new(),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn auth(&self) -> &Arc<AuthStore> {
        self.client.auth()
    }

    pub fn controller(&self) -> &WorkflowController {
        &self.controller
    }

    pub fn runner(&self) -> &OperationRunner<ActionResult> {
        &self.runner
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth().is_authenticated()
    }

    /// Stores the credential and probes the savings summary with it. The
    /// credential is kept only if the probe succeeds; an empty answer counts
    /// as success.
    pub fn login(&mut self, raw: &str) -> Result<(), ConsoleError> {
        if !matches!(raw.split_once(':'), Some((user, _)) if !user.trim().is_empty()) {
            return Err(ConsoleError::MalformedCredential);
        }
        self.auth().set_credential(raw)?;

        let client = &self.client;
        let probe = self.runner.run("login", || {
            client
                .savings_summary_or_empty()
                .map(ActionResult::SignedIn)
                .map_err(|err| match err {
                    RequestError::Transport => ConsoleError::Request(err),
                    _ => ConsoleError::InvalidCredentials,
                })
        });

        match probe {
            Ok(_) => {
                self.auth().mark_authenticated();
                self.controller.login();
                self.persist()?;
                self.log(LogLevel::Info, "session.login", "signed in");
                Ok(())
            }
            Err(err) => {
                self.auth().clear()?;
                self.controller.logout();
                self.persist()?;
                self.log(LogLevel::Warn, "session.login", &err.to_string());
                Err(err)
            }
        }
    }

    pub fn logout(&mut self) -> Result<(), ConsoleError> {
        self.auth().clear()?;
        self.controller.logout();
        if let Some(paths) = &self.paths {
            clear_workflow_state(&paths.workflow_state_path())?;
        }
        self.log(LogLevel::Info, "session.logout", "signed out");
        Ok(())
    }

    /// Manual stage selection; locked targets are ignored.
    pub fn select(&mut self, stage: Stage) -> Result<SelectOutcome, ConsoleError> {
        let outcome = self.controller.select(stage);
        if matches!(outcome, SelectOutcome::Switched(_)) {
            self.persist()?;
        }
        Ok(outcome)
    }

    /// Fetches the three dashboard figures concurrently. Individual failures
    /// leave their figure empty and are not reported as errors.
    pub fn load_dashboard(&self) -> Result<DashboardSnapshot, ConsoleError> {
        self.require_authenticated()?;
        let client = &self.client;
        let (resources, latest, savings) = thread::scope(|scope| {
            let resources = scope.spawn(|| client.get_resources());
            let latest = scope.spawn(|| client.latest_recommendation());
            let savings = scope.spawn(|| client.savings_summary());
            (resources.join(), latest.join(), savings.join())
        });
        Ok(DashboardSnapshot {
            resources: resources.ok().and_then(Result::ok).unwrap_or_default(),
            latest_recommendation: latest.ok().and_then(Result::ok).flatten(),
            savings: savings.ok().and_then(Result::ok),
        })
    }

    /// The dashboard's primary action: unlock and open Metrics.
    pub fn continue_to_metrics(&mut self) -> Result<WorkflowTransition, ConsoleError> {
        self.require_authenticated()?;
        let transition = self.controller.complete(Stage::Dashboard);
        self.persist()?;
        Ok(transition)
    }

    pub fn list_resources(&mut self) -> Result<Vec<String>, ConsoleError> {
        self.stage_action(
            Stage::Dashboard,
            "list resources",
            false,
            |client| client.get_resources(),
            ActionResult::Resources,
        )
    }

    pub fn collect_metric(&mut self, metric: &Metric) -> Result<Metric, ConsoleError> {
        let mut metric = metric.clone();
        if metric.resource_id.trim().is_empty() {
            metric.resource_id = self.settings.default_resource_id.clone();
        }
        self.stage_action(
            Stage::Metrics,
            "collect metric",
            true,
            |client| client.collect_metric(&metric),
            ActionResult::Metric,
        )
    }

    pub fn load_metrics(&mut self, resource_id: &str) -> Result<Vec<Metric>, ConsoleError> {
        let resource_id = self.resource_or_default(resource_id);
        self.stage_action(
            Stage::Metrics,
            "load metrics",
            true,
            |client| client.get_metrics(&resource_id),
            ActionResult::Metrics,
        )
    }

    pub fn load_recommendations(
        &mut self,
        resource_id: &str,
    ) -> Result<Vec<Recommendation>, ConsoleError> {
        let resource_id = self.resource_or_default(resource_id);
        self.stage_action(
            Stage::Recommendations,
            "load recommendations",
            true,
            |client| client.get_recommendations(&resource_id),
            ActionResult::Recommendations,
        )
    }

    pub fn analyze_usage(
        &mut self,
        request: &AnalyzeRequest,
    ) -> Result<Option<Recommendation>, ConsoleError> {
        let mut request = request.clone();
        if request.resource_id.trim().is_empty() {
            request.resource_id = self.settings.default_resource_id.clone();
        }
        self.stage_action(
            Stage::Recommendations,
            "analyze usage",
            true,
            |client| client.analyze_usage(&request),
            ActionResult::Recommendation,
        )
    }

    pub fn latest_recommendation(&mut self) -> Result<Option<Recommendation>, ConsoleError> {
        self.stage_action(
            Stage::Recommendations,
            "latest recommendation",
            false,
            |client| client.latest_recommendation(),
            ActionResult::Recommendation,
        )
    }

    pub fn simulate_cost(
        &mut self,
        request: &CostSimulationRequest,
    ) -> Result<CostSimulationResult, ConsoleError> {
        self.stage_action(
            Stage::Cost,
            "simulate cost",
            true,
            |client| client.simulate_cost(request),
            ActionResult::CostSimulation,
        )
    }

    /// Compares candidate instance types; the result keeps the top five by
    /// monthly savings, highest first. Does not advance the workflow.
    pub fn compare_what_if(
        &mut self,
        current_instance_type: &str,
        candidates: &[String],
        action: &str,
    ) -> Result<Vec<WhatIfEntry>, ConsoleError> {
        let request = WhatIfRequest {
            current_instance_type: current_instance_type.to_string(),
            candidates: if candidates.is_empty() {
                self.settings.whatif_candidates.clone()
            } else {
                candidates.to_vec()
            },
            action: action.to_string(),
        };
        self.stage_action(
            Stage::Cost,
            "compare what-if",
            false,
            |client| client.cost_what_if(&request).map(top_savings),
            ActionResult::WhatIf,
        )
    }

    pub fn savings_summary(&mut self) -> Result<SavingsSummary, ConsoleError> {
        self.stage_action(
            Stage::Cost,
            "savings summary",
            false,
            |client| client.savings_summary(),
            ActionResult::SavingsSummary,
        )
    }

    pub fn send_alert(&mut self, request: &AlertRequest) -> Result<String, ConsoleError> {
        self.stage_action(
            Stage::Alerts,
            "send alert",
            true,
            |client| client.send_alert(request),
            ActionResult::AlertSent,
        )
    }

    fn resource_or_default(&self, resource_id: &str) -> String {
        if resource_id.trim().is_empty() {
            self.settings.default_resource_id.clone()
        } else {
            resource_id.trim().to_string()
        }
    }

    fn require_authenticated(&self) -> Result<(), ConsoleError> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(ConsoleError::NotAuthenticated)
        }
    }

    fn stage_action<T, F>(
        &mut self,
        stage: Stage,
        label: &str,
        advances: bool,
        call: F,
        wrap: fn(T) -> ActionResult,
    ) -> Result<T, ConsoleError>
    where
        T: Clone,
        F: FnOnce(&ApiClient) -> Result<T, RequestError>,
    {
        self.require_authenticated()?;

        let client = &self.client;
        let mut typed = None;
        let outcome = self.runner.run(label, || {
            let value = call(client)?;
            typed = Some(value.clone());
            Ok::<_, RequestError>(wrap(value))
        });

        let outcome =
            outcome.and_then(|_| typed.ok_or(RequestError::Decode { expected: "action result" }));
        match outcome {
            Ok(value) => {
                if advances {
                    self.controller.complete(stage);
                }
                self.persist()?;
                Ok(value)
            }
            Err(err) => {
                self.controller.fail(stage);
                self.persist()?;
                self.log(LogLevel::Warn, "session.action", &format!("{label}: {err}"));
                Err(err.into())
            }
        }
    }

    fn persist(&self) -> Result<(), ConsoleError> {
        if let Some(paths) = &self.paths {
            save_workflow_state(&paths.workflow_state_path(), &self.controller.state())?;
        }
        Ok(())
    }

    fn log(&self, level: LogLevel, event: &str, message: &str) {
        if let Some(paths) = &self.paths {
            append_console_log(&paths.root, level, event, message);
        }
    }
}

/// Orders what-if entries by monthly savings, highest first, and keeps the
/// top five.
pub fn top_savings(mut entries: Vec<WhatIfEntry>) -> Vec<WhatIfEntry> {
    entries.sort_by(|a, b| {
        b.result
            .monthly_savings
            .partial_cmp(&a.result.monthly_savings)
            .unwrap_or(Ordering::Equal)
    });
    entries.truncate(WHATIF_TOP_N);
    entries
}
