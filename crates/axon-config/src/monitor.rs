use serde::Deserialize;

/// Background monitor schedule
///
/// All delays are in seconds. The startup delays apply while waiting for the
/// server to become ready; the remaining delays apply to the steady-state
/// polling loop.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorConfig {
    /// Delay between readiness probes while the server is unreachable
    #[serde(default = "default_startup_retry_seconds")]
    pub startup_retry_seconds: u64,
    /// Delay between readiness probes while the server is healthy but has no models
    #[serde(default = "default_startup_no_models_seconds")]
    pub startup_no_models_seconds: u64,
    /// Delay between health polls while the server is ready
    #[serde(default = "default_poll_interval_seconds")]
    pub poll_interval_seconds: u64,
    /// Delay before re-polling after the server goes unreachable
    #[serde(default = "default_offline_retry_seconds")]
    pub offline_retry_seconds: u64,
    /// Delay before re-polling after the server loses all models
    #[serde(default = "default_degraded_retry_seconds")]
    pub degraded_retry_seconds: u64,
    /// Delay before retrying after a transient failure in the poll body
    #[serde(default = "default_error_retry_seconds")]
    pub error_retry_seconds: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            startup_retry_seconds: default_startup_retry_seconds(),
            startup_no_models_seconds: default_startup_no_models_seconds(),
            poll_interval_seconds: default_poll_interval_seconds(),
            offline_retry_seconds: default_offline_retry_seconds(),
            degraded_retry_seconds: default_degraded_retry_seconds(),
            error_retry_seconds: default_error_retry_seconds(),
        }
    }
}

fn default_startup_retry_seconds() -> u64 {
    30
}

fn default_startup_no_models_seconds() -> u64 {
    10
}

fn default_poll_interval_seconds() -> u64 {
    60
}

fn default_offline_retry_seconds() -> u64 {
    120
}

fn default_degraded_retry_seconds() -> u64 {
    30
}

fn default_error_retry_seconds() -> u64 {
    30
}
