use super::stage::Stage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct WorkflowState {
    pub active: Stage,
    /// Highest stage unlocked this session; `None` while signed out.
    pub unlocked: Option<Stage>,
}

impl WorkflowState {
    pub fn locked() -> Self {
        Self {
            active: Stage::first(),
            unlocked: None,
        }
    }

    pub fn signed_in() -> Self {
        Self {
            active: Stage::first(),
            unlocked: Some(Stage::first()),
        }
    }

    /// Watermark as an index into the stage order; `-1` when locked.
    pub fn watermark(&self) -> i64 {
        self.unlocked.map(|stage| stage.index() as i64).unwrap_or(-1)
    }

    pub fn can_go(&self, target: Stage) -> bool {
        self.unlocked.is_some_and(|unlocked| target <= unlocked)
    }

    fn unlock(&mut self, stage: Stage) {
        self.unlocked = Some(match self.unlocked {
            Some(current) => current.max(stage),
            None => stage,
        });
    }
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::locked()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowEvent {
    LoginSucceeded,
    LoggedOut,
    /// The primary action of a stage completed successfully.
    ActionSucceeded(Stage),
    ActionFailed(Stage),
    Select(Stage),
}

impl WorkflowEvent {
    fn as_str(self) -> &'static str {
        match self {
            Self::LoginSucceeded => "login_succeeded",
            Self::LoggedOut => "logged_out",
            Self::ActionSucceeded(_) => "action_succeeded",
            Self::ActionFailed(_) => "action_failed",
            Self::Select(_) => "select",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowEffect {
    None,
    Activated(Stage),
    Advanced { from: Stage, to: Stage },
    Locked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowTransition {
    pub effect: WorkflowEffect,
    pub feedback: Option<String>,
}

impl WorkflowTransition {
    fn no_op(feedback: Option<String>) -> Self {
        Self {
            effect: WorkflowEffect::None,
            feedback,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Switched(Stage),
    Ignored { requested: Stage, active: Stage },
}

/// Applies one event to the navigation state. Rejected selections and failed
/// actions are no-ops, never errors.
pub fn workflow_transition(state: &mut WorkflowState, event: WorkflowEvent) -> WorkflowTransition {
    match event {
        WorkflowEvent::LoginSucceeded => {
            *state = WorkflowState::signed_in();
            WorkflowTransition {
                effect: WorkflowEffect::Activated(state.active),
                feedback: None,
            }
        }
        WorkflowEvent::LoggedOut => {
            *state = WorkflowState::locked();
            WorkflowTransition {
                effect: WorkflowEffect::Locked,
                feedback: None,
            }
        }
        WorkflowEvent::ActionSucceeded(stage) => {
            if state.unlocked.is_none() {
                return WorkflowTransition::no_op(Some(format!(
                    "ignored {} while signed out",
                    event.as_str()
                )));
            }
            let Some(next) = stage.next() else {
                return WorkflowTransition::no_op(None);
            };
            state.unlock(next);
            state.active = next;
            WorkflowTransition {
                effect: WorkflowEffect::Advanced {
                    from: stage,
                    to: next,
                },
                feedback: None,
            }
        }
        WorkflowEvent::ActionFailed(_) => WorkflowTransition::no_op(None),
        WorkflowEvent::Select(target) => {
            if !state.can_go(target) {
                return WorkflowTransition::no_op(Some(format!(
                    "{} is locked",
                    target.title()
                )));
            }
            state.active = target;
            WorkflowTransition {
                effect: WorkflowEffect::Activated(target),
                feedback: None,
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowController {
    state: WorkflowState,
}

impl WorkflowController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: WorkflowState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn active(&self) -> Stage {
        self.state.active
    }

    pub fn watermark(&self) -> i64 {
        self.state.watermark()
    }

    pub fn can_go(&self, target: Stage) -> bool {
        self.state.can_go(target)
    }

    pub fn apply(&mut self, event: WorkflowEvent) -> WorkflowTransition {
        workflow_transition(&mut self.state, event)
    }

    pub fn login(&mut self) -> WorkflowTransition {
        self.apply(WorkflowEvent::LoginSucceeded)
    }

    pub fn logout(&mut self) -> WorkflowTransition {
        self.apply(WorkflowEvent::LoggedOut)
    }

    pub fn complete(&mut self, stage: Stage) -> WorkflowTransition {
        self.apply(WorkflowEvent::ActionSucceeded(stage))
    }

    pub fn fail(&mut self, stage: Stage) -> WorkflowTransition {
        self.apply(WorkflowEvent::ActionFailed(stage))
    }

    pub fn select(&mut self, target: Stage) -> SelectOutcome {
        match self.apply(WorkflowEvent::Select(target)).effect {
            WorkflowEffect::Activated(stage) => SelectOutcome::Switched(stage),
            _ => SelectOutcome::Ignored {
                requested: target,
                active: self.state.active,
            },
        }
    }
}
