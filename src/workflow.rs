pub mod controller;
pub mod runner;
pub mod stage;
pub mod state_file;

pub use controller::{
    workflow_transition, SelectOutcome, WorkflowController, WorkflowEffect, WorkflowEvent,
    WorkflowState, WorkflowTransition,
};
pub use runner::{OperationOutcome, OperationRunner};
pub use stage::{Stage, ALL_STAGES};
pub use state_file::{
    clear_workflow_state, load_workflow_state, save_workflow_state, StateError,
};
