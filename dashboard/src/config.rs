use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, DashboardResult};
use crate::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::retry::RetryPolicy;
use crate::source::FailurePlan;
use crate::view_model::ViewSettings;

pub const DEFAULT_LOG_FILTER: &str = "crm_dashboard=info,crm_shared=info";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub page_size: usize,
    /// Delay of every mock data source call
    pub sim_latency: Duration,
    /// Probability that a mock call fails
    pub sim_failure_rate: f64,
    pub request_timeout: Duration,
    pub retry_max_attempts: u32,
    pub retry_backoff: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            sim_latency: Duration::from_millis(400),
            sim_failure_rate: 0.0,
            request_timeout: Duration::from_millis(5000),
            retry_max_attempts: 3,
            retry_backoff: Duration::from_millis(200),
        }
    }
}

impl DashboardConfig {
    /// Reads the process environment. Call `dotenv::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> DashboardResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys take their default
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DashboardResult<Self> {
        let defaults = Self::default();

        let config = Self {
            page_size: parse_or(&lookup, "DASHBOARD_PAGE_SIZE", defaults.page_size)?,
            sim_latency: millis_or(&lookup, "SIM_LATENCY_MS", defaults.sim_latency)?,
            sim_failure_rate: parse_or(&lookup, "SIM_FAILURE_RATE", defaults.sim_failure_rate)?,
            request_timeout: millis_or(&lookup, "REQUEST_TIMEOUT_MS", defaults.request_timeout)?,
            retry_max_attempts: parse_or(&lookup, "RETRY_MAX_ATTEMPTS", defaults.retry_max_attempts)?,
            retry_backoff: millis_or(&lookup, "RETRY_BACKOFF_MS", defaults.retry_backoff)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DashboardResult<()> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(DashboardError::Config(format!(
                "DASHBOARD_PAGE_SIZE must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        if !(0.0..=1.0).contains(&self.sim_failure_rate) {
            return Err(DashboardError::Config(
                "SIM_FAILURE_RATE must be between 0.0 and 1.0".to_string(),
            ));
        }
        if self.retry_max_attempts == 0 {
            return Err(DashboardError::Config(
                "RETRY_MAX_ATTEMPTS must be at least 1".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(DashboardError::Config(
                "REQUEST_TIMEOUT_MS must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_max_attempts,
            initial_backoff: self.retry_backoff,
            timeout: self.request_timeout,
            ..Default::default()
        }
    }

    pub fn view_settings(&self) -> ViewSettings {
        ViewSettings {
            page_size: self.page_size,
            retry: self.retry_policy(),
        }
    }

    pub fn failure_plan(&self) -> FailurePlan {
        if self.sim_failure_rate > 0.0 {
            FailurePlan::Rate(self.sim_failure_rate)
        } else {
            FailurePlan::Never
        }
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> DashboardResult<T> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| DashboardError::Config(format!("{} has an invalid value '{}'", key, raw))),
    }
}

fn millis_or(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> DashboardResult<Duration> {
    let millis = parse_or(lookup, key, default.as_millis() as u64)?;
    Ok(Duration::from_millis(millis))
}
