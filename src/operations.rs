//! Waiting on long-running operations
//!
//! Import and delete return an [`Operation`] handle. [`OperationWaiter`]
//! polls it with exponential backoff until the service reports it `done`.
//! There is no timeout: a wait ends only when the operation resolves or a
//! poll fails.

use rand::Rng;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

use crate::datasets::DatasetApi;
use crate::error::{Error, Result};
use crate::types::Operation;

/// Upper bound of the delay between two polls
const MAX_POLL_DELAY: Duration = Duration::from_secs(30);

/// Growth factor of the delay after every poll
const POLL_MULTIPLIER: f64 = 1.5;

/// Outcome of a successfully completed operation
#[derive(Debug, Clone, PartialEq)]
pub struct OperationReport {
    pub name: String,
    pub response: Option<Value>,
    /// Number of polls it took, 0 when the first response was already done
    pub polls: u32,
}

impl fmt::Display for OperationReport {
    /// Compact JSON of the response; empty when the response carries no fields
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.response {
            None | Some(Value::Null) => Ok(()),
            Some(Value::Object(map)) if map.keys().all(|k| k == "@type") => Ok(()),
            Some(value) => write!(f, "{}", value),
        }
    }
}

/// Polling schedule for long-running operations
#[derive(Debug, Clone)]
pub struct OperationWaiter {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    /// Add up to 25% random jitter to each delay
    pub jitter: bool,
}

impl Default for OperationWaiter {
    fn default() -> Self {
        Self::new(crate::client::DEFAULT_POLL_INTERVAL)
    }
}

impl OperationWaiter {
    /// Create a waiter whose first poll comes after `initial_delay`
    pub fn new(initial_delay: Duration) -> Self {
        Self {
            initial_delay,
            max_delay: MAX_POLL_DELAY.max(initial_delay),
            multiplier: POLL_MULTIPLIER,
            jitter: true,
        }
    }

    /// Delay before poll number `attempt` (0-based), without jitter
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.powi(attempt.min(64) as i32);
        let delay = self.initial_delay.as_secs_f64() * factor;
        if !delay.is_finite() || delay >= self.max_delay.as_secs_f64() {
            self.max_delay
        } else {
            Duration::from_secs_f64(delay)
        }
    }

    fn with_jitter(&self, delay: Duration) -> Duration {
        if !self.jitter {
            return delay;
        }
        let jitter_range = delay.as_millis() as u64 / 4;
        let jitter = rand::rng().random_range(0..=jitter_range);
        delay + Duration::from_millis(jitter)
    }

    /// Block until `operation` is done, polling `api` as needed
    pub async fn wait<A: DatasetApi + ?Sized>(
        &self,
        api: &A,
        operation: Operation,
    ) -> Result<OperationReport> {
        if !operation.done && operation.name.is_empty() {
            return Err(Error::Validation(
                "service returned an unfinished operation without a name".to_string(),
            ));
        }

        let mut operation = operation;
        let mut polls = 0u32;

        while !operation.done {
            let delay = self.with_jitter(self.delay_for(polls));
            tracing::debug!(
                operation = %operation.name,
                delay_ms = delay.as_millis() as u64,
                "Operation still running"
            );
            tokio::time::sleep(delay).await;

            let name = operation.name.clone();
            operation = api.get_operation(&name).await?;
            if operation.name.is_empty() {
                operation.name = name;
            }
            polls += 1;
        }

        finish(operation, polls)
    }
}

fn finish(operation: Operation, polls: u32) -> Result<OperationReport> {
    if let Some(status) = operation.error {
        tracing::warn!(operation = %operation.name, code = status.code, "Operation failed");
        return Err(Error::Operation {
            name: operation.name,
            code: status.code,
            message: status.message,
        });
    }

    tracing::info!(operation = %operation.name, polls, "Operation completed");
    Ok(OperationReport {
        name: operation.name,
        response: operation.response,
        polls,
    })
}
