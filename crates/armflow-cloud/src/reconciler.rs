//! Existence checks and retrying create/delete
//!
//! The reconciler wraps remote calls so that every resource gets the same
//! behaviour: refuse to create over an unmanaged object, retry transient
//! failures with backoff inside the operation timeout, treat not-found on
//! read as "drop from state" and on delete as done.
//!
//! ```text
//! NotChecked -> Checking -> NotFound -> Creating -> Done
//!                  |                       |  ^
//!                  v                       v  |
//!                Found / Error          Retrying -> Failed
//! ```

use crate::error::{ArmError, Result};
use crate::remote::RemoteError;
use crate::retry::{ErrorClassifier, Operation, RetryConfig, RetryDecision, Timeouts, TransientConditions};
use std::future::Future;
use std::sync::Arc;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, trace, warn};

/// Progress of one reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotChecked,
    Checking,
    Found,
    NotFound,
    Error,
    Creating,
    Retrying,
    Done,
    Failed,
}

impl Phase {
    pub fn can_transition_to(self, next: Phase) -> bool {
        use Phase::*;
        matches!(
            (self, next),
            (NotChecked, Checking)
                | (NotChecked, Creating)
                | (Checking, Found)
                | (Checking, NotFound)
                | (Checking, Error)
                | (NotFound, Creating)
                | (Creating, Done)
                | (Creating, Retrying)
                | (Creating, Failed)
                | (Retrying, Creating)
                | (Retrying, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Found | Phase::Error | Phase::Done | Phase::Failed)
    }
}

/// Logs phase transitions for one id
struct Progress<'a> {
    id: &'a str,
    phase: Phase,
}

impl<'a> Progress<'a> {
    fn new(id: &'a str) -> Self {
        Self {
            id,
            phase: Phase::NotChecked,
        }
    }

    fn enter(&mut self, next: Phase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "invalid transition {:?} -> {:?}",
            self.phase,
            next
        );
        if next.is_terminal() {
            debug!(id = %self.id, from = ?self.phase, to = ?next, "reconcile finished");
        } else {
            trace!(id = %self.id, from = ?self.phase, to = ?next, "reconcile");
        }
        self.phase = next;
    }
}

/// Value produced by a successful create
#[derive(Debug, Clone, PartialEq)]
pub struct Created<T> {
    pub value: T,
    pub attempts: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    AlreadyGone,
}

#[derive(Clone)]
pub struct Reconciler {
    retry: RetryConfig,
    timeouts: Timeouts,
    classifier: Arc<dyn ErrorClassifier>,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(RetryConfig::default(), Timeouts::default())
    }
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("retry", &self.retry)
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}

impl Reconciler {
    pub fn new(retry: RetryConfig, timeouts: Timeouts) -> Self {
        Self {
            retry,
            timeouts,
            classifier: Arc::new(TransientConditions::default()),
        }
    }

    /// A copy of this reconciler using a resource-specific classifier.
    pub fn with_classifier(&self, classifier: impl ErrorClassifier + 'static) -> Self {
        Self {
            classifier: Arc::new(classifier),
            ..self.clone()
        }
    }

    pub fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    pub fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    /// Fail if the resource already exists.
    ///
    /// Not-found means creation may proceed; any other error propagates.
    pub async fn ensure_absent<F, Fut, T>(&self, id: &str, resource_type: &str, get: F) -> Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, RemoteError>>,
    {
        let mut progress = Progress::new(id);
        progress.enter(Phase::Checking);

        let result = self.bounded(Operation::Read, id, get()).await?;
        match result {
            Ok(_) => {
                progress.enter(Phase::Found);
                Err(ArmError::AlreadyExists {
                    id: id.to_string(),
                    resource_type: resource_type.to_string(),
                })
            }
            Err(e) if e.is_not_found() => {
                progress.enter(Phase::NotFound);
                Ok(())
            }
            Err(e) => {
                progress.enter(Phase::Error);
                Err(ArmError::remote(Operation::Read, id, e))
            }
        }
    }

    /// Run `op`, retrying transient failures until it succeeds, fails
    /// permanently or the create timeout expires.
    pub async fn create<F, Fut, T>(&self, id: &str, op: F) -> Result<Created<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, RemoteError>>,
    {
        let mut progress = Progress::new(id);
        progress.phase = Phase::NotFound;
        let Retried { value, attempts, .. } = self
            .retrying(Operation::Create, id, op, None, &mut progress)
            .await?;
        info!(id = %id, attempts, "created");
        Ok(Created { value, attempts })
    }

    /// Read a resource; `None` means it is gone and should leave the state.
    pub async fn read<F, Fut, T>(&self, id: &str, get: F) -> Result<Option<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, RemoteError>>,
    {
        match self.bounded(Operation::Read, id, get()).await? {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() => {
                info!(id = %id, "resource was not found, removing from state");
                Ok(None)
            }
            Err(e) => Err(ArmError::remote(Operation::Read, id, e)),
        }
    }

    pub async fn update<F, Fut, T>(&self, id: &str, op: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, RemoteError>>,
    {
        self.bounded(Operation::Update, id, op())
            .await?
            .map_err(|e| ArmError::remote(Operation::Update, id, e))
    }

    /// Delete a resource; one that is already gone counts as deleted.
    pub async fn delete<F, Fut>(&self, id: &str, op: F) -> Result<DeleteOutcome>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<(), RemoteError>>,
    {
        let mut progress = Progress::new(id);
        progress.phase = Phase::NotFound;
        let retried = self
            .retrying(Operation::Delete, id, op, Some(()), &mut progress)
            .await?;
        if retried.already_gone {
            info!(id = %id, "resource was already gone");
            Ok(DeleteOutcome::AlreadyGone)
        } else {
            Ok(DeleteOutcome::Deleted)
        }
    }

    async fn bounded<Fut, T>(&self, operation: Operation, id: &str, fut: Fut) -> Result<T>
    where
        Fut: Future<Output = T>,
    {
        let limit = self.timeouts.for_operation(operation);
        timeout(limit, fut).await.map_err(|_| ArmError::Timeout {
            operation,
            id: id.to_string(),
            timeout: limit,
        })
    }

    async fn retrying<F, Fut, T>(
        &self,
        operation: Operation,
        id: &str,
        mut op: F,
        mut gone: Option<T>,
        progress: &mut Progress<'_>,
    ) -> Result<Retried<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, RemoteError>>,
    {
        let limit = self.timeouts.for_operation(operation);
        let mut attempts = 0u32;
        let mut last_error: Option<RemoteError> = None;

        let attempt_loop = async {
            loop {
                attempts += 1;
                progress.enter(Phase::Creating);
                let error = match op().await {
                    Ok(value) => {
                        progress.enter(Phase::Done);
                        return Ok((value, false));
                    }
                    Err(e) => e,
                };

                let decision = self.classifier.classify(operation, &error);
                if matches!(decision, RetryDecision::Success) {
                    if let Some(value) = gone.take() {
                        progress.enter(Phase::Done);
                        return Ok((value, true));
                    }
                }
                match decision {
                    RetryDecision::Success | RetryDecision::Fail => {
                        progress.enter(Phase::Failed);
                        return Err(ArmError::remote(operation, id, error));
                    }
                    RetryDecision::Retry => {}
                }

                if self.retry.max_attempts.is_some_and(|max| attempts >= max) {
                    progress.enter(Phase::Failed);
                    return Err(ArmError::RetryExhausted {
                        operation,
                        id: id.to_string(),
                        attempts,
                        message: error.to_string(),
                    });
                }

                let delay = self.retry.delay_for_attempt(attempts - 1);
                warn!(id = %id, %operation, attempts, ?delay, error = %error, "transient failure, retrying");
                last_error = Some(error);
                progress.enter(Phase::Retrying);
                sleep(delay).await;
            }
        };

        let outcome = timeout(limit, attempt_loop).await;
        match outcome {
            Ok(result) => result.map(|(value, already_gone)| Retried {
                value,
                attempts,
                already_gone,
            }),
            Err(_) => Err(match last_error {
                Some(error) => ArmError::RetryExhausted {
                    operation,
                    id: id.to_string(),
                    attempts,
                    message: error.to_string(),
                },
                None => ArmError::Timeout {
                    operation,
                    id: id.to_string(),
                    timeout: limit,
                },
            }),
        }
    }
}

/// Result of a retried call.
///
/// `already_gone` is set when the classifier reported the goal as already
/// met and the caller-supplied `gone` value stands in for the response.
struct Retried<T> {
    value: T,
    attempts: u32,
    already_gone: bool,
}
