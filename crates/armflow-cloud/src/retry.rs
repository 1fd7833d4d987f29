//! Retry policy, error classification and per-operation timeouts

use crate::remote::RemoteError;
use armflow_config::{RetryOverrides, TimeoutOverrides};
use std::fmt;
use std::time::Duration;

/// The lifecycle operation being attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "creating"),
            Operation::Read => write!(f, "reading"),
            Operation::Update => write!(f, "updating"),
            Operation::Delete => write!(f, "deleting"),
        }
    }
}

/// What to do with a failed remote call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Transient; try again after backoff
    Retry,
    /// Permanent; surface the error
    Fail,
    /// The failure means the goal is already reached (e.g. deleting something gone)
    Success,
}

/// Classifies remote failures per operation.
pub trait ErrorClassifier: Send + Sync {
    fn classify(&self, operation: Operation, error: &RemoteError) -> RetryDecision;
}

/// Classifier driven by known transient conditions.
///
/// Structured error codes are checked before message substrings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientConditions {
    statuses: Vec<u16>,
    codes: Vec<String>,
    messages: Vec<String>,
}

impl TransientConditions {
    /// No transient conditions at all
    pub fn none() -> Self {
        Self {
            statuses: Vec::new(),
            codes: Vec::new(),
            messages: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.statuses.push(status);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.codes.push(code.into());
        self
    }

    pub fn with_message(mut self, substring: impl Into<String>) -> Self {
        self.messages.push(substring.into());
        self
    }

    fn is_transient(&self, error: &RemoteError) -> bool {
        if let Some(code) = error.code.as_deref()
            && self.codes.iter().any(|c| c.eq_ignore_ascii_case(code))
        {
            return true;
        }
        if let Some(status) = error.status
            && self.statuses.contains(&status)
        {
            return true;
        }
        self.messages.iter().any(|m| error.message.contains(m.as_str()))
    }
}

impl Default for TransientConditions {
    /// Throttling is always transient.
    fn default() -> Self {
        Self::none().with_status(429).with_code("TooManyRequests")
    }
}

impl ErrorClassifier for TransientConditions {
    fn classify(&self, operation: Operation, error: &RemoteError) -> RetryDecision {
        if operation == Operation::Delete && error.is_not_found() {
            return RetryDecision::Success;
        }
        if self.is_transient(error) {
            RetryDecision::Retry
        } else {
            RetryDecision::Fail
        }
    }
}

/// Exponential backoff between retries
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts; `None` retries until the operation timeout
    pub max_attempts: Option<u32>,

    /// Initial delay between retries
    pub initial_delay: Duration,

    /// Maximum delay between retries
    pub max_delay: Duration,

    /// Backoff multiplier
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: None,
            initial_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(60),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `attempt` (0-based), capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = self.backoff_multiplier.max(1.0).powi(attempt.min(i32::MAX as u32) as i32);
        let delay = self.initial_delay.as_secs_f64() * factor;
        if !delay.is_finite() || delay >= self.max_delay.as_secs_f64() {
            self.max_delay
        } else {
            Duration::from_secs_f64(delay)
        }
    }

    pub fn with_overrides(mut self, overrides: &RetryOverrides) -> Self {
        if let Some(secs) = overrides.initial_delay_secs {
            self.initial_delay = Duration::from_secs(secs);
        }
        if let Some(secs) = overrides.max_delay_secs {
            self.max_delay = Duration::from_secs(secs);
        }
        if let Some(multiplier) = overrides.backoff_multiplier {
            self.backoff_multiplier = multiplier;
        }
        self
    }
}

/// Upper bound on each lifecycle operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub create: Duration,
    pub read: Duration,
    pub update: Duration,
    pub delete: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            create: Duration::from_secs(30 * 60),
            read: Duration::from_secs(5 * 60),
            update: Duration::from_secs(30 * 60),
            delete: Duration::from_secs(30 * 60),
        }
    }
}

impl Timeouts {
    pub fn for_operation(&self, operation: Operation) -> Duration {
        match operation {
            Operation::Create => self.create,
            Operation::Read => self.read,
            Operation::Update => self.update,
            Operation::Delete => self.delete,
        }
    }

    /// Apply per-operation overrides given in minutes.
    pub fn with_overrides(mut self, overrides: &TimeoutOverrides) -> Self {
        let minutes = |m: u64| Duration::from_secs(m.saturating_mul(60));
        if let Some(m) = overrides.create {
            self.create = minutes(m);
        }
        if let Some(m) = overrides.read {
            self.read = minutes(m);
        }
        if let Some(m) = overrides.update {
            self.update = minutes(m);
        }
        if let Some(m) = overrides.delete {
            self.delete = minutes(m);
        }
        self
    }
}
