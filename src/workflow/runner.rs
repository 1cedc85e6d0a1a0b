//! Busy/error/result tracking around a single action.
//!
//! Runs are neither queued nor merged. When two runs overlap, each writes its
//! outcome as it completes, so the last completion wins even if it was the
//! first to start. Every run is stamped with a sequence number so a caller can
//! tell that the outcome on display belongs to an older invocation than the
//! label; stale completions are still applied.

use std::fmt::Display;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutcome<T> {
    Idle,
    Pending,
    Success(T),
    Failure(String),
}

#[derive(Debug)]
struct RunnerState<T> {
    outcome: OperationOutcome<T>,
    busy: bool,
    label: Option<String>,
    started_seq: u64,
    outcome_seq: u64,
}

#[derive(Debug)]
pub struct OperationRunner<T> {
    inner: Arc<Mutex<RunnerState<T>>>,
}

impl<T> Clone for OperationRunner<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for OperationRunner<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears `busy` on every exit from `run`, unwinding included.
struct BusyGuard<'a, T> {
    runner: &'a OperationRunner<T>,
}

impl<T> Drop for BusyGuard<'_, T> {
    fn drop(&mut self) {
        self.runner.lock().busy = false;
    }
}

impl<T> OperationRunner<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(RunnerState {
                outcome: OperationOutcome::Idle,
                busy: false,
                label: None,
                started_seq: 0,
                outcome_seq: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RunnerState<T>> {
        self.inner.lock().unwrap_or_else(|err| err.into_inner())
    }

    pub fn busy(&self) -> bool {
        self.lock().busy
    }

    pub fn error(&self) -> Option<String> {
        match &self.lock().outcome {
            OperationOutcome::Failure(message) => Some(message.clone()),
            _ => None,
        }
    }

    /// Label of the most recently started run.
    pub fn label(&self) -> Option<String> {
        self.lock().label.clone()
    }

    pub fn started_seq(&self) -> u64 {
        self.lock().started_seq
    }

    /// Sequence number of the run whose outcome is currently stored.
    pub fn outcome_seq(&self) -> u64 {
        self.lock().outcome_seq
    }

    /// True when the stored outcome came from an older run than the label.
    pub fn outcome_is_stale(&self) -> bool {
        let state = self.lock();
        state.outcome_seq != 0 && state.outcome_seq < state.started_seq
    }
}

impl<T: Clone> OperationRunner<T> {
    pub fn outcome(&self) -> OperationOutcome<T> {
        self.lock().outcome.clone()
    }

    pub fn last_result(&self) -> Option<T> {
        match &self.lock().outcome {
            OperationOutcome::Success(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// Marks the runner pending, runs `action`, then records its outcome. The
    /// error is handed back unchanged so the caller can react to it.
    pub fn run<E, F>(&self, label: &str, action: F) -> Result<T, E>
    where
        E: Display,
        F: FnOnce() -> Result<T, E>,
    {
        let seq = {
            let mut state = self.lock();
            state.started_seq += 1;
            state.busy = true;
            state.label = Some(label.to_string());
            state.outcome = OperationOutcome::Pending;
            state.started_seq
        };
        let _guard = BusyGuard { runner: self };

        let result = action();

        let mut state = self.lock();
        state.outcome_seq = seq;
        match &result {
            Ok(value) => state.outcome = OperationOutcome::Success(value.clone()),
            Err(err) => state.outcome = OperationOutcome::Failure(err.to_string()),
        }
        result
    }
}
