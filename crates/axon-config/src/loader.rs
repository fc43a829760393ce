use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, TOML parsing fails, or
    /// validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let config: Self = toml::from_str(&raw).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the server URL is unusable or any delay is zero
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.base_url.host_str().is_none() {
            anyhow::bail!("server.base_url must carry a host");
        }

        if self.server.request_timeout_seconds == 0 {
            anyhow::bail!("server.request_timeout_seconds must be greater than 0");
        }

        let monitor = &self.monitor;
        let delays = [
            ("monitor.startup_retry_seconds", monitor.startup_retry_seconds),
            ("monitor.startup_no_models_seconds", monitor.startup_no_models_seconds),
            ("monitor.poll_interval_seconds", monitor.poll_interval_seconds),
            ("monitor.offline_retry_seconds", monitor.offline_retry_seconds),
            ("monitor.degraded_retry_seconds", monitor.degraded_retry_seconds),
            ("monitor.error_retry_seconds", monitor.error_retry_seconds),
        ];
        for (name, value) in delays {
            if value == 0 {
                anyhow::bail!("{name} must be greater than 0");
            }
        }

        Ok(())
    }
}
