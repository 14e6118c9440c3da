//! Per-operation UI state.
//!
//! Every operation kind owns one [`StateCell`], created with the executor and
//! kept for the whole session. A cell holds an [`OperationState`] and pushes
//! every change to its subscribers through a `tokio::sync::watch` channel.
//!
//! # Lifecycle
//!
//! ```text
//! idle --start()--> loading --succeed(v)--> settled (has_succeeded, last_response)
//!                           \--fail(msg)--> settled (error)
//! ```
//!
//! `has_succeeded` is a one-shot flag: a screen reacts to it once and calls
//! [`StateCell::consume_success`] so the same success cannot trigger a second
//! reaction.

use tokio::sync::watch;

/// Snapshot of one operation kind's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationState<T> {
    /// True only between `start()` and the matching settle.
    pub is_loading: bool,
    /// One-shot success flag, reset by `consume_success()`.
    pub has_succeeded: bool,
    /// Message of the last failure, until cleared or replaced.
    pub error: Option<String>,
    /// Value of the last success, until cleared or replaced.
    pub last_response: Option<T>,
}

impl<T> Default for OperationState<T> {
    fn default() -> Self {
        Self {
            is_loading: false,
            has_succeeded: false,
            error: None,
            last_response: None,
        }
    }
}

impl<T> OperationState<T> {
    /// Begin an execution. Clears the error; keeps the previous response and
    /// success flag until the execution settles.
    pub fn start(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    /// Settle successfully.
    pub fn succeed(&mut self, value: T) {
        self.is_loading = false;
        self.has_succeeded = true;
        self.error = None;
        self.last_response = Some(value);
    }

    /// Settle with an error message. The previous response is kept; callers
    /// that need it gone call [`clear_response`](Self::clear_response).
    pub fn fail(&mut self, message: impl Into<String>) {
        self.is_loading = false;
        self.has_succeeded = false;
        self.error = Some(message.into());
    }

    /// Forget the last error.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Forget the last response.
    pub fn clear_response(&mut self) {
        self.last_response = None;
    }

    /// Reset the one-shot success flag.
    pub fn consume_success(&mut self) {
        self.has_succeeded = false;
    }

    /// True if neither loading nor holding an error or response.
    pub fn is_idle(&self) -> bool {
        !self.is_loading && self.error.is_none() && self.last_response.is_none()
    }
}

/// Observable holder of an [`OperationState`].
///
/// All primitives are total and idempotent; none of them fail.
#[derive(Debug)]
pub struct StateCell<T> {
    tx: watch::Sender<OperationState<T>>,
}

impl<T> Default for StateCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> StateCell<T> {
    /// Create an idle cell.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(OperationState::default());
        Self { tx }
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<OperationState<T>> {
        self.tx.subscribe()
    }

    /// Whether an execution is in flight.
    pub fn is_loading(&self) -> bool {
        self.tx.borrow().is_loading
    }

    /// Whether an unconsumed success is pending.
    pub fn has_succeeded(&self) -> bool {
        self.tx.borrow().has_succeeded
    }

    /// The current error message.
    pub fn error(&self) -> Option<String> {
        self.tx.borrow().error.clone()
    }

    /// See [`OperationState::start`].
    pub fn start(&self) {
        self.tx.send_modify(OperationState::start);
    }

    /// See [`OperationState::succeed`].
    pub fn succeed(&self, value: T) {
        self.tx.send_modify(|state| state.succeed(value));
    }

    /// See [`OperationState::fail`].
    pub fn fail(&self, message: impl Into<String>) {
        let message = message.into();
        self.tx.send_modify(|state| state.fail(message));
    }

    /// See [`OperationState::clear_error`].
    pub fn clear_error(&self) {
        self.tx.send_if_modified(|state| {
            let changed = state.error.is_some();
            state.clear_error();
            changed
        });
    }

    /// See [`OperationState::clear_response`].
    pub fn clear_response(&self) {
        self.tx.send_if_modified(|state| {
            let changed = state.last_response.is_some();
            state.clear_response();
            changed
        });
    }

    /// See [`OperationState::consume_success`]. Returns whether a pending
    /// success was consumed.
    pub fn consume_success(&self) -> bool {
        self.tx.send_if_modified(|state| {
            let was_set = state.has_succeeded;
            state.consume_success();
            was_set
        })
    }
}

impl<T: Clone> StateCell<T> {
    /// A copy of the current state.
    pub fn snapshot(&self) -> OperationState<T> {
        self.tx.borrow().clone()
    }

    /// A copy of the last successful response.
    pub fn last_response(&self) -> Option<T> {
        self.tx.borrow().last_response.clone()
    }
}
