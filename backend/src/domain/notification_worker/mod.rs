//! Background delivery of account notifications.
//!
//! The worker drains [`AccountEvent`]s from a bounded channel, renders each
//! one into an [`OutboundMail`] and hands it to the [`Mailer`] port. Transient
//! failures are retried with capped exponential backoff; permanent failures
//! and exhausted retries are logged and the event is dropped.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::domain::ports::{Mailer, MailerError};
use crate::domain::{AccountEvent, EmailAddress, TraceId};

mod render;

pub use render::{ACCOUNT_UPDATED_SUBJECT, render};

/// Async sleeping abstraction so retry delays can be skipped in tests.
#[async_trait]
pub trait NotificationSleeper: Send + Sync {
    /// Suspend the caller for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Tokio-based sleeper implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl NotificationSleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Retry schedule applied to transient delivery failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delivery attempts per event, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub initial_backoff: Duration,
    /// Upper bound for any single delay.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = 2_u32.saturating_pow(attempt.saturating_sub(1));
        let base_ms = u64::try_from(self.initial_backoff.as_millis()).unwrap_or(u64::MAX);
        let max_ms = u64::try_from(self.max_backoff.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(base_ms.saturating_mul(u64::from(exponent)).min(max_ms))
    }
}

/// Result of delivering one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The mailer accepted the message.
    Delivered {
        /// Attempts used.
        attempts: u32,
    },
    /// The mailer refused the message permanently.
    Rejected {
        /// Attempts used.
        attempts: u32,
    },
    /// Every attempt failed transiently.
    Exhausted {
        /// Attempts used.
        attempts: u32,
    },
}

/// Worker delivering account notifications through a [`Mailer`].
pub struct NotificationWorker {
    mailer: Arc<dyn Mailer>,
    sleeper: Arc<dyn NotificationSleeper>,
    policy: RetryPolicy,
    from: EmailAddress,
}

impl NotificationWorker {
    /// Create a worker sending as `from` with the default retry policy.
    pub fn new(mailer: Arc<dyn Mailer>, from: EmailAddress) -> Self {
        Self {
            mailer,
            sleeper: Arc::new(TokioSleeper),
            policy: RetryPolicy::default(),
            from,
        }
    }

    /// Replace the retry policy.
    #[must_use]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the sleeper used between retries.
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn NotificationSleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Drain `receiver` until every sender has been dropped.
    ///
    /// Each event is delivered with its originating trace id in scope.
    pub async fn run(self, mut receiver: mpsc::Receiver<AccountEvent>) {
        info!("notification worker started");
        while let Some(event) = receiver.recv().await {
            TraceId::scope_optional(event.trace_id(), self.deliver(&event)).await;
        }
        info!("notification worker stopped");
    }

    /// Render and deliver one event, retrying transient failures.
    pub async fn deliver(&self, event: &AccountEvent) -> DeliveryOutcome {
        let mail = render(event, &self.from);
        let max_attempts = self.policy.max_attempts.max(1);
        let user_id = event.user_id();

        for attempt in 1..=max_attempts {
            match self.mailer.send(&mail).await {
                Ok(()) => {
                    info!(user_id = %user_id, event = event.kind(), attempts = attempt, "notification delivered");
                    return DeliveryOutcome::Delivered { attempts: attempt };
                }
                Err(MailerError::Transient { message }) if attempt < max_attempts => {
                    let delay = self.policy.delay_after(attempt);
                    warn!(
                        user_id = %user_id,
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %message,
                        "notification delivery failed; retrying"
                    );
                    self.sleeper.sleep(delay).await;
                }
                Err(MailerError::Transient { message }) => {
                    warn!(
                        user_id = %user_id,
                        attempts = attempt,
                        error = %message,
                        trace_id = ?TraceId::current().map(|id| id.to_string()),
                        "notification dropped after exhausting retries"
                    );
                    return DeliveryOutcome::Exhausted { attempts: attempt };
                }
                Err(MailerError::Permanent { message }) => {
                    warn!(
                        user_id = %user_id,
                        attempts = attempt,
                        error = %message,
                        trace_id = ?TraceId::current().map(|id| id.to_string()),
                        "notification rejected by mailer"
                    );
                    return DeliveryOutcome::Rejected { attempts: attempt };
                }
            }
        }

        DeliveryOutcome::Exhausted {
            attempts: max_attempts,
        }
    }
}
