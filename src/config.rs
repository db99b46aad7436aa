use serde::Deserialize;

use crate::presentation::{MetricThreshold, Thresholds};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub publishing: PublishingConfig,
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub thresholds: Thresholds,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_pool_size: u32,
    #[serde(default = "default_alert_retention_days")]
    pub alert_retention_days: u32,
}

fn default_alert_retention_days() -> u32 {
    7
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishingConfig {
    /// Max number of dashboard views kept in the broadcast channel for /ws/dashboard (slow clients may lag).
    pub broadcast_capacity: usize,
    /// Alert rows included in each dashboard view.
    #[serde(default = "default_recent_alerts_limit")]
    pub recent_alerts_limit: usize,
}

fn default_recent_alerts_limit() -> usize {
    20
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    /// How often the worker re-reads the store and publishes a dashboard view.
    pub sample_interval_ms: u64,
    /// How often to log app stats (ws_dashboard clients, views published) at INFO level.
    pub stats_log_interval_secs: u64,
    #[serde(default = "default_prune_interval_secs")]
    pub prune_interval_secs: u64,
}

fn default_prune_interval_secs() -> u64 {
    3600
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.database.path.is_empty(),
            "database.path must be non-empty"
        );
        anyhow::ensure!(
            self.database.max_pool_size > 0,
            "database.max_pool_size must be > 0, got {}",
            self.database.max_pool_size
        );
        anyhow::ensure!(
            self.database.alert_retention_days > 0,
            "database.alert_retention_days must be > 0, got {}",
            self.database.alert_retention_days
        );
        anyhow::ensure!(
            self.publishing.broadcast_capacity > 0,
            "publishing.broadcast_capacity must be > 0, got {}",
            self.publishing.broadcast_capacity
        );
        anyhow::ensure!(
            self.monitoring.sample_interval_ms > 0,
            "monitoring.sample_interval_ms must be > 0, got {}",
            self.monitoring.sample_interval_ms
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        anyhow::ensure!(
            self.monitoring.prune_interval_secs > 0,
            "monitoring.prune_interval_secs must be > 0, got {}",
            self.monitoring.prune_interval_secs
        );
        let t = &self.thresholds;
        validate_threshold("thresholds.call_processing", &t.call_processing)?;
        validate_threshold("thresholds.agent_processing", &t.agent_processing)?;
        validate_threshold("thresholds.psap_transfer", &t.psap_transfer)?;
        validate_threshold("thresholds.system_load", &t.system_load)?;
        Ok(())
    }
}

fn validate_threshold(name: &str, t: &MetricThreshold) -> anyhow::Result<()> {
    anyhow::ensure!(
        t.target.is_finite() && t.target > 0.0,
        "{}.target must be > 0, got {}",
        name,
        t.target
    );
    anyhow::ensure!(
        t.warning_factor.is_finite() && t.warning_factor >= 1.0,
        "{}.warning_factor must be >= 1.0, got {}",
        name,
        t.warning_factor
    );
    Ok(())
}
