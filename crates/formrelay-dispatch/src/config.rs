//! Dispatch configuration.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

pub const WORKER_CONCURRENCY_VAR: &str = "FORMRELAY_WORKER_CONCURRENCY";
pub const QUEUE_CAPACITY_VAR: &str = "FORMRELAY_QUEUE_CAPACITY";
pub const MAX_ATTEMPTS_VAR: &str = "FORMRELAY_MAX_ATTEMPTS";
pub const BACKOFF_SECS_VAR: &str = "FORMRELAY_BACKOFF_SECS";

/// Default number of attempts per connector task.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default fixed delay between attempts.
pub const DEFAULT_BACKOFF_SECS: u64 = 60;

/// Worker pool, queue and retry settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Number of tasks executed concurrently.
    pub worker_concurrency: usize,
    /// Capacity of the in-process task queue.
    pub queue_capacity: usize,
    /// Attempts per task, the first included.
    pub max_attempts: u32,
    /// Fixed delay before a failed task is retried, in seconds.
    pub backoff_secs: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            worker_concurrency: 4,
            queue_capacity: 1024,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_secs: DEFAULT_BACKOFF_SECS,
        }
    }
}

impl DispatchConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `FORMRELAY_WORKER_CONCURRENCY`: concurrent tasks (default: 4)
    /// - `FORMRELAY_QUEUE_CAPACITY`: queue capacity (default: 1024)
    /// - `FORMRELAY_MAX_ATTEMPTS`: attempts per task (default: 3)
    /// - `FORMRELAY_BACKOFF_SECS`: delay between attempts (default: 60)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load configuration through a variable lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            worker_concurrency: parse_var(&lookup, WORKER_CONCURRENCY_VAR, defaults.worker_concurrency)?,
            queue_capacity: parse_var(&lookup, QUEUE_CAPACITY_VAR, defaults.queue_capacity)?,
            max_attempts: parse_var(&lookup, MAX_ATTEMPTS_VAR, defaults.max_attempts)?,
            backoff_secs: parse_var(&lookup, BACKOFF_SECS_VAR, defaults.backoff_secs)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_concurrency == 0 {
            return Err(ConfigError::invalid(WORKER_CONCURRENCY_VAR, "must be at least 1"));
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::invalid(QUEUE_CAPACITY_VAR, "must be at least 1"));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::invalid(MAX_ATTEMPTS_VAR, "must be at least 1"));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_worker_concurrency(mut self, concurrency: usize) -> Self {
        self.worker_concurrency = concurrency;
        self
    }

    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    #[must_use]
    pub fn with_backoff_secs(mut self, backoff_secs: u64) -> Self {
        self.backoff_secs = backoff_secs;
        self
    }

    /// Backoff as a duration.
    #[must_use]
    pub fn backoff(&self) -> Duration {
        Duration::from_secs(self.backoff_secs)
    }
}

fn parse_var<T, F>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid(var, format!("{raw:?}: {e}"))),
        _ => Ok(default),
    }
}
