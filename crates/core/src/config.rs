//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. The intent is to avoid reading process-wide environment variables
//! during request handling, which can lead to inconsistent behaviour in multi-threaded runtimes
//! and test harnesses.

use crate::constants::{DEFAULT_QUEUE_POLL_INTERVAL, DEFAULT_RECORD_POLL_INTERVAL};
use crate::{WorkflowError, WorkflowResult};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    care_data_dir: PathBuf,
    record_poll_interval: Duration,
    queue_poll_interval: Duration,
}

impl CoreConfig {
    /// Create a new `CoreConfig` with the default polling intervals.
    pub fn new(care_data_dir: PathBuf) -> WorkflowResult<Self> {
        Self::with_poll_intervals(
            care_data_dir,
            DEFAULT_RECORD_POLL_INTERVAL,
            DEFAULT_QUEUE_POLL_INTERVAL,
        )
    }

    /// Create a new `CoreConfig` with explicit polling intervals.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidInput` if either interval is zero; a
    /// zero-interval watcher would spin on the store.
    pub fn with_poll_intervals(
        care_data_dir: PathBuf,
        record_poll_interval: Duration,
        queue_poll_interval: Duration,
    ) -> WorkflowResult<Self> {
        if record_poll_interval.is_zero() || queue_poll_interval.is_zero() {
            return Err(WorkflowError::InvalidInput(
                "poll intervals must be greater than zero".into(),
            ));
        }

        Ok(Self {
            care_data_dir,
            record_poll_interval,
            queue_poll_interval,
        })
    }

    pub fn care_data_dir(&self) -> &Path {
        &self.care_data_dir
    }

    pub fn record_poll_interval(&self) -> Duration {
        self.record_poll_interval
    }

    pub fn queue_poll_interval(&self) -> Duration {
        self.queue_poll_interval
    }
}

/// Parse a polling interval from an optional environment value in seconds.
///
/// If `value` is `None` or empty/whitespace, returns `default`.
pub fn poll_interval_from_env_value(
    value: Option<String>,
    default: Duration,
) -> WorkflowResult<Duration> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let Some(value) = value else {
        return Ok(default);
    };

    let secs: u64 = value.parse().map_err(|_| {
        WorkflowError::InvalidInput(format!(
            "poll interval must be a whole number of seconds, got '{value}'"
        ))
    })?;

    if secs == 0 {
        return Err(WorkflowError::InvalidInput(
            "poll interval must be greater than zero".into(),
        ));
    }

    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_intervals() {
        let cfg = CoreConfig::new(PathBuf::from("/tmp/care_data")).expect("new should succeed");
        assert_eq!(cfg.record_poll_interval(), DEFAULT_RECORD_POLL_INTERVAL);
        assert_eq!(cfg.queue_poll_interval(), DEFAULT_QUEUE_POLL_INTERVAL);
        assert_eq!(cfg.care_data_dir(), Path::new("/tmp/care_data"));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = CoreConfig::with_poll_intervals(
            PathBuf::from("/tmp/care_data"),
            Duration::ZERO,
            DEFAULT_QUEUE_POLL_INTERVAL,
        )
        .expect_err("zero interval should be rejected");
        assert!(matches!(err, WorkflowError::InvalidInput(_)));
    }

    #[test]
    fn test_poll_interval_env_value_absent_uses_default() {
        let interval = poll_interval_from_env_value(None, Duration::from_secs(2)).unwrap();
        assert_eq!(interval, Duration::from_secs(2));
    }

    #[test]
    fn test_poll_interval_env_value_blank_uses_default() {
        let interval =
            poll_interval_from_env_value(Some("  ".into()), Duration::from_secs(3)).unwrap();
        assert_eq!(interval, Duration::from_secs(3));
    }

    #[test]
    fn test_poll_interval_env_value_parses_seconds() {
        let interval =
            poll_interval_from_env_value(Some("5".into()), Duration::from_secs(2)).unwrap();
        assert_eq!(interval, Duration::from_secs(5));
    }

    #[test]
    fn test_poll_interval_env_value_rejects_garbage_and_zero() {
        assert!(poll_interval_from_env_value(Some("fast".into()), Duration::from_secs(2)).is_err());
        assert!(poll_interval_from_env_value(Some("0".into()), Duration::from_secs(2)).is_err());
    }
}
