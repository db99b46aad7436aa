// Config loading and validation tests

use firefly::config::AppConfig;
use firefly::presentation::MetricThreshold;

const VALID_CONFIG: &str = r#"
[server]
port = 8081
host = "0.0.0.0"

[database]
path = "data/dispatch.db"
max_pool_size = 10

[publishing]
broadcast_capacity = 60

[monitoring]
sample_interval_ms = 1000
stats_log_interval_secs = 60
"#;

const VALID_CONFIG_WITH_THRESHOLDS: &str = r#"
[server]
port = 8081
host = "0.0.0.0"

[database]
path = "data/dispatch.db"
max_pool_size = 10
alert_retention_days = 3

[publishing]
broadcast_capacity = 60
recent_alerts_limit = 5

[monitoring]
sample_interval_ms = 1000
stats_log_interval_secs = 60
prune_interval_secs = 600

[thresholds.call_processing]
target = 45.0
warning_factor = 1.5

[thresholds.system_load]
target = 90.0
warning_factor = 1.05
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.server.port, 8081);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.database.path, "data/dispatch.db");
    assert_eq!(config.database.max_pool_size, 10);
    assert_eq!(config.publishing.broadcast_capacity, 60);
    assert_eq!(config.monitoring.sample_interval_ms, 1000);
}

#[test]
fn test_config_defaults_when_omitted() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("valid");
    assert_eq!(config.database.alert_retention_days, 7);
    assert_eq!(config.publishing.recent_alerts_limit, 20);
    assert_eq!(config.monitoring.prune_interval_secs, 3600);
    let t = config.thresholds;
    assert_eq!(t.call_processing, MetricThreshold::new(60.0, 1.2));
    assert_eq!(t.agent_processing, MetricThreshold::new(15.0, 1.2));
    assert_eq!(t.psap_transfer, MetricThreshold::new(30.0, 1.2));
    assert_eq!(t.system_load, MetricThreshold::new(80.0, 1.15));
}

#[test]
fn test_config_loads_thresholds_partially() {
    let config = AppConfig::load_from_str(VALID_CONFIG_WITH_THRESHOLDS).expect("valid");
    assert_eq!(config.database.alert_retention_days, 3);
    assert_eq!(config.publishing.recent_alerts_limit, 5);
    assert_eq!(config.monitoring.prune_interval_secs, 600);
    let t = config.thresholds;
    assert_eq!(t.call_processing, MetricThreshold::new(45.0, 1.5));
    assert_eq!(t.system_load, MetricThreshold::new(90.0, 1.05));
    // untouched sections keep their defaults
    assert_eq!(t.psap_transfer, MetricThreshold::new(30.0, 1.2));
}

#[test]
fn test_config_validation_rejects_invalid_port() {
    let bad = VALID_CONFIG.replace("port = 8081", "port = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("server.port"));
}

#[test]
fn test_config_validation_rejects_empty_db_path() {
    let bad = VALID_CONFIG.replace("path = \"data/dispatch.db\"", "path = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("database.path"));
}

#[test]
fn test_config_validation_rejects_max_pool_size_zero() {
    let bad = VALID_CONFIG.replace("max_pool_size = 10", "max_pool_size = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("max_pool_size"));
}

#[test]
fn test_config_validation_rejects_alert_retention_zero() {
    let bad = VALID_CONFIG_WITH_THRESHOLDS
        .replace("alert_retention_days = 3", "alert_retention_days = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("alert_retention_days"));
}

#[test]
fn test_config_validation_rejects_broadcast_capacity_zero() {
    let bad = VALID_CONFIG.replace("broadcast_capacity = 60", "broadcast_capacity = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("broadcast_capacity"));
}

#[test]
fn test_config_validation_rejects_sample_interval_zero() {
    let bad = VALID_CONFIG.replace("sample_interval_ms = 1000", "sample_interval_ms = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("sample_interval_ms"));
}

#[test]
fn test_config_validation_rejects_stats_log_interval_zero() {
    let bad = VALID_CONFIG.replace(
        "stats_log_interval_secs = 60",
        "stats_log_interval_secs = 0",
    );
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("stats_log_interval_secs"));
}

#[test]
fn test_config_validation_rejects_prune_interval_zero() {
    let bad = VALID_CONFIG_WITH_THRESHOLDS
        .replace("prune_interval_secs = 600", "prune_interval_secs = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("prune_interval_secs"));
}

#[test]
fn test_config_validation_rejects_warning_factor_below_one() {
    let bad = VALID_CONFIG_WITH_THRESHOLDS.replace("warning_factor = 1.5", "warning_factor = 0.9");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(
        err.to_string()
            .contains("thresholds.call_processing.warning_factor")
    );
}

#[test]
fn test_config_validation_rejects_non_positive_target() {
    let bad = VALID_CONFIG_WITH_THRESHOLDS.replace("target = 90.0", "target = 0.0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("thresholds.system_load.target"));
}

#[test]
fn test_config_validation_rejects_invalid_toml() {
    let err = AppConfig::load_from_str("not valid toml [[[").unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_config_load_from_file_via_env() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, VALID_CONFIG).unwrap();
    unsafe { std::env::set_var("CONFIG_FILE", path.to_str().unwrap()) };
    let result = AppConfig::load();
    unsafe { std::env::remove_var("CONFIG_FILE") };
    let config = result.expect("load from CONFIG_FILE");
    assert_eq!(config.server.port, 8081);
    assert_eq!(config.database.path, "data/dispatch.db");
}
