//! Fire-and-forget usage charging
//!
//! The charge stage must never block the caller's response: by the time a
//! charge runs, the handler's success response is already on the wire. A
//! charging failure is logged and swallowed, never surfaced.

use axum::response::Response;
use tokio::sync::mpsc;

use tollgate_core::{PolicyConfig, SharedPolicy};
use tollgate_types::{Action, UserId};

/// Handler-declared outcome for the charge decision
///
/// A handler whose HTTP status is successful can still declare the
/// underlying operation failed by inserting this into the response
/// extensions; the charge stage then skips the charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationOutcome {
    /// Whether the protected operation actually succeeded
    pub success: bool,
}

impl OperationOutcome {
    /// Declare the operation succeeded
    pub const fn succeeded() -> Self {
        Self { success: true }
    }

    /// Declare the operation failed despite the response status
    pub const fn failed() -> Self {
        Self { success: false }
    }
}

/// Whether a handler response warrants a usage charge
///
/// A charge is due iff the status is below the client-error threshold and
/// the handler did not explicitly declare failure.
pub(crate) fn should_charge(response: &Response) -> bool {
    if response.status().as_u16() >= 400 {
        return false;
    }
    response
        .extensions()
        .get::<OperationOutcome>()
        .map_or(true, |outcome| outcome.success)
}

/// A queued usage charge
#[derive(Debug, Clone)]
pub struct ChargeEvent {
    /// User to charge
    pub user_id: UserId,
    /// Completed action
    pub action: Action,
    /// Count to record
    pub amount: u64,
}

impl ChargeEvent {
    /// Create a new charge event
    pub fn new(user_id: UserId, action: Action, amount: u64) -> Self {
        Self {
            user_id,
            action,
            amount,
        }
    }
}

/// Background task for fire-and-forget usage charging
///
/// Accepts charge events via a bounded channel and records them against the
/// policy backend with a per-charge timeout.
#[derive(Clone, Debug)]
pub struct ChargeRecorder {
    tx: mpsc::Sender<ChargeEvent>,
}

impl ChargeRecorder {
    /// Create a recorder and spawn its background task
    pub fn new(policy: SharedPolicy, config: &PolicyConfig) -> (Self, ChargeRecorderHandle) {
        let (tx, rx) = mpsc::channel(config.charge_buffer);
        let timeout = config.charge_timeout;

        let handle = ChargeRecorderHandle {
            task: tokio::spawn(Self::run_background(policy, rx, timeout)),
        };

        (Self { tx }, handle)
    }

    /// Queue a charge (fire-and-forget)
    ///
    /// Does not block; if the buffer is full the charge is dropped with a
    /// warning rather than stalling the response path.
    pub fn record(&self, event: ChargeEvent) {
        if let Err(err) = self.tx.try_send(event) {
            tracing::warn!(error = %err, "charge buffer full, dropping usage charge");
        }
    }

    async fn run_background(
        policy: SharedPolicy,
        mut rx: mpsc::Receiver<ChargeEvent>,
        timeout: std::time::Duration,
    ) {
        while let Some(event) = rx.recv().await {
            let charge = policy.charge(event.user_id, event.action, event.amount);
            match tokio::time::timeout(timeout, charge).await {
                Ok(Ok(())) => {
                    tracing::debug!(
                        user_id = %event.user_id,
                        action = %event.action,
                        amount = event.amount,
                        "usage charged"
                    );
                }
                Ok(Err(err)) => {
                    tracing::warn!(
                        error = %err,
                        user_id = %event.user_id,
                        action = %event.action,
                        "failed to charge usage"
                    );
                }
                Err(_) => {
                    tracing::warn!(
                        user_id = %event.user_id,
                        action = %event.action,
                        "usage charge timed out"
                    );
                }
            }
        }
    }
}

/// Handle for the background charge task
pub struct ChargeRecorderHandle {
    task: tokio::task::JoinHandle<()>,
}

impl ChargeRecorderHandle {
    /// Wait for the recorder to drain (all senders must be dropped first)
    pub async fn shutdown(self) {
        let _ = self.task.await;
    }
}
