// Rust guideline compliant 2026-10-19

//! Verdict poller -- queries a `VerdictSource` port at a fixed interval until
//! a verdict appears or a wall-clock timeout elapses.
//!
//! Entry points: [`VerdictPoller::poll`], [`VerdictPoller::poll_outcome`].
//! Configuration via [`PollerConfig::builder`].
//!
//! The loop is `Waiting -> {Resolved, TimedOut}`: every failed query (HTTP
//! status, transport or decode error) counts as "not yet ready" and is retried
//! after `interval`. Dropping the returned future cancels the poll.

use domain::{QueryError, Verdict, VerdictSource};
use std::time::Duration;
use tokio::time::Instant;

// ---------------------------------------------------------------------------
// PollerError
// ---------------------------------------------------------------------------

/// Errors that can occur while configuring a poller.
#[derive(Debug, thiserror::Error)]
pub enum PollerError {
    /// The supplied configuration is invalid.
    #[error("invalid poller configuration: {reason}")]
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// PollerConfig + builder
// ---------------------------------------------------------------------------

/// Runtime configuration for a [`VerdictPoller`].
///
/// Construct via [`PollerConfig::builder`].
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Wall-clock budget measured from the first query.
    pub timeout: Duration,
    /// Delay between successive queries.
    pub interval: Duration,
    /// Upper bound on a single query.
    pub attempt_timeout: Duration,
}

/// Builder for [`PollerConfig`].
///
/// Obtain via [`PollerConfig::builder`]; finalize with [`build`](Self::build).
#[derive(Debug)]
pub struct PollerConfigBuilder {
    timeout: Duration,
    interval: Duration,
    attempt_timeout: Duration,
}

impl PollerConfig {
    /// Create a builder.
    ///
    /// Default values: `timeout = 10 s`, `interval = 1 s`, `attempt_timeout = 2 s`.
    #[must_use]
    pub fn builder() -> PollerConfigBuilder {
        PollerConfigBuilder {
            timeout: Duration::from_secs(10),
            interval: Duration::from_secs(1),
            attempt_timeout: Duration::from_secs(2),
        }
    }
}

impl PollerConfigBuilder {
    /// Override the overall wall-clock budget. Zero means "query once".
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the delay between queries.
    #[must_use]
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Override the upper bound on a single query.
    #[must_use]
    pub fn attempt_timeout(mut self, attempt_timeout: Duration) -> Self {
        self.attempt_timeout = attempt_timeout;
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PollerError::InvalidConfig`] when `interval` or
    /// `attempt_timeout` is zero.
    #[must_use = "the Result must be checked; use ? or unwrap"]
    pub fn build(self) -> Result<PollerConfig, PollerError> {
        if self.interval.is_zero() {
            return Err(PollerError::InvalidConfig {
                reason: "interval must be > 0".to_owned(),
            });
        }
        if self.attempt_timeout.is_zero() {
            return Err(PollerError::InvalidConfig {
                reason: "attempt_timeout must be > 0".to_owned(),
            });
        }
        Ok(PollerConfig {
            timeout: self.timeout,
            interval: self.interval,
            attempt_timeout: self.attempt_timeout,
        })
    }
}

// ---------------------------------------------------------------------------
// PollOutcome
// ---------------------------------------------------------------------------

/// Why a poll ended without a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutReason {
    /// The endpoint answered but had no verdict yet (or answered garbage).
    StillProcessing,
    /// The last query could not reach the endpoint.
    Unreachable,
}

/// Terminal state of one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// A query succeeded.
    Resolved {
        /// Verdict returned by the successful query.
        verdict: Verdict,
        /// Number of queries issued, including the successful one.
        attempts: u32,
    },
    /// The wall-clock budget elapsed first.
    TimedOut {
        /// Number of queries issued.
        attempts: u32,
        /// Failure reported by the last query.
        last_error: QueryError,
    },
}

impl PollOutcome {
    /// Number of queries issued.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Resolved { attempts, .. } | Self::TimedOut { attempts, .. } => *attempts,
        }
    }

    /// Classify a timeout; `None` when resolved.
    #[must_use]
    pub fn timeout_reason(&self) -> Option<TimeoutReason> {
        match self {
            Self::Resolved { .. } => None,
            Self::TimedOut {
                last_error: QueryError::Transport { .. },
                ..
            } => Some(TimeoutReason::Unreachable),
            Self::TimedOut { .. } => Some(TimeoutReason::StillProcessing),
        }
    }

    /// Drop the tag: `Some(verdict)` when resolved, `None` on timeout.
    #[must_use]
    pub fn into_verdict(self) -> Option<Verdict> {
        match self {
            Self::Resolved { verdict, .. } => Some(verdict),
            Self::TimedOut { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// VerdictPoller
// ---------------------------------------------------------------------------

/// Fixed-interval, wall-clock-bounded verdict poller.
///
/// Generic over the `VerdictSource` port per call; holds no adapter and no
/// mutable state, so one poller may serve any number of concurrent polls.
#[derive(Debug, Clone)]
pub struct VerdictPoller {
    config: PollerConfig,
}

impl VerdictPoller {
    /// Create a new poller from `config`.
    #[must_use]
    pub fn new(config: PollerConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Poll `source` for `key`; `None` when the timeout elapsed first.
    ///
    /// An unreachable endpoint and a verdict that is not ready yet both
    /// yield `None`; use [`poll_outcome`](Self::poll_outcome) to tell them apart.
    pub async fn poll<V: VerdictSource>(&self, source: &V, key: &str) -> Option<Verdict> {
        self.poll_outcome(source, key).await.into_verdict()
    }

    /// Poll `source` for `key` and report the tagged terminal state.
    ///
    /// Issues the first query immediately. After each failed query the loop
    /// stops once `timeout` has elapsed since the start, otherwise it sleeps
    /// `interval` and queries again. Each query is cut off after
    /// `attempt_timeout` and counted as a transport failure.
    pub async fn poll_outcome<V: VerdictSource>(&self, source: &V, key: &str) -> PollOutcome {
        let started = Instant::now();
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            let result = tokio::time::timeout(self.config.attempt_timeout, source.fetch(key))
                .await
                .unwrap_or_else(|_elapsed| {
                    Err(QueryError::Transport {
                        reason: format!("no response within {:?}", self.config.attempt_timeout),
                    })
                });

            let error = match result {
                Ok(verdict) => {
                    tracing::info!(key, attempts, status = %verdict.status, "poller.resolved");
                    return PollOutcome::Resolved { verdict, attempts };
                }
                Err(e) => e,
            };
            tracing::debug!(key, attempts, error = %error, "poller.attempt.failed");

            if started.elapsed() >= self.config.timeout {
                tracing::info!(key, attempts, "poller.timed_out");
                return PollOutcome::TimedOut {
                    attempts,
                    last_error: error,
                };
            }

            tokio::time::sleep(self.config.interval).await;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
