use std::collections::HashMap;

use tracing::warn;

use crate::error::{MonitorError, Result};
use crate::types::{Config, ThresholdConfig};

pub const DEFAULT_API_URL: &str = "https://api.hetzner.cloud/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Trait for abstracting environment variable access
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;
}

/// Production implementation using std::env
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Mock implementation for testing
#[derive(Debug, Default)]
pub struct MockEnvironment {
    vars: HashMap<String, String>,
}

impl MockEnvironment {
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    pub fn set_var<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn with_var<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.set_var(key, value);
        self
    }
}

impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

pub fn load_config() -> Result<Config> {
    load_config_with_env(&SystemEnvironment)
}

pub fn load_config_with_env<E: EnvironmentProvider>(env: &E) -> Result<Config> {
    let api_token = non_blank(env.get_var("HETZNER_API_TOKEN"))
        .ok_or_else(|| MonitorError::Config("HETZNER_API_TOKEN must be set".to_string()))?;

    let slack_webhook_url = non_blank(env.get_var("SLACK_WEBHOOK_URL"));

    let api_base_url = non_blank(env.get_var("HETZNER_API_URL"))
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
        .trim_end_matches('/')
        .to_string();

    let defaults = ThresholdConfig::default();
    let thresholds = ThresholdConfig {
        notify_percent: parse_threshold(env, "THRESHOLD_PERCENT_NOTIF", defaults.notify_percent)?,
        kill_percent: parse_threshold(env, "THRESHOLD_PERCENT_KILL", defaults.kill_percent)?,
    };
    if thresholds.notify_percent > thresholds.kill_percent {
        warn!(
            "THRESHOLD_PERCENT_NOTIF ({}) is above THRESHOLD_PERCENT_KILL ({}); no server will be notified without being killed",
            thresholds.notify_percent, thresholds.kill_percent
        );
    }

    let send_always = env.get_var("SEND_USAGE_NOTIF_ALWAYS")
        .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "True"))
        .unwrap_or(false);

    let request_timeout_secs: u64 = env.get_var("HTTP_TIMEOUT_SECONDS")
        .and_then(|v| v.trim().parse().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    Ok(Config {
        api_token,
        api_base_url,
        slack_webhook_url,
        thresholds,
        send_always,
        request_timeout_secs,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_threshold<E: EnvironmentProvider>(env: &E, key: &str, default: f64) -> Result<f64> {
    let Some(raw) = non_blank(env.get_var(key)) else {
        return Ok(default);
    };
    let value: f64 = raw
        .parse()
        .map_err(|_| MonitorError::Config(format!("Invalid {}: {:?} is not a number", key, raw)))?;
    if !(value > 0.0 && value <= 100.0) {
        return Err(MonitorError::Config(format!(
            "Invalid {}: {} must be within (0, 100]",
            key, value
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_loading_with_env() {
        let env = MockEnvironment::new()
            .with_var("HETZNER_API_TOKEN", "secret-token")
            .with_var("SLACK_WEBHOOK_URL", "https://hooks.slack.com/test")
            .with_var("THRESHOLD_PERCENT_NOTIF", "60")
            .with_var("THRESHOLD_PERCENT_KILL", "95.5")
            .with_var("SEND_USAGE_NOTIF_ALWAYS", "true")
            .with_var("HETZNER_API_URL", "http://localhost:8080/v1/")
            .with_var("HTTP_TIMEOUT_SECONDS", "10");

        let config = load_config_with_env(&env).unwrap();

        assert_eq!(config.api_token, "secret-token");
        assert_eq!(config.slack_webhook_url, Some("https://hooks.slack.com/test".to_string()));
        assert_eq!(config.thresholds.notify_percent, 60.0);
        assert_eq!(config.thresholds.kill_percent, 95.5);
        assert!(config.send_always);
        assert_eq!(config.api_base_url, "http://localhost:8080/v1");
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_config_loading_defaults() {
        let env = MockEnvironment::new()
            .with_var("HETZNER_API_TOKEN", "secret-token");

        let config = load_config_with_env(&env).unwrap();

        assert_eq!(config.slack_webhook_url, None);
        assert_eq!(config.thresholds.notify_percent, 50.0); // default
        assert_eq!(config.thresholds.kill_percent, 90.0); // default
        assert!(!config.send_always); // default
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_config_loading_missing_token() {
        let env = MockEnvironment::new()
            .with_var("SLACK_WEBHOOK_URL", "https://hooks.slack.com/test");

        let result = load_config_with_env(&env);
        assert!(matches!(result, Err(MonitorError::Config(_))));
        assert!(result.unwrap_err().to_string().contains("HETZNER_API_TOKEN"));

        // Whitespace-only counts as missing
        let env = MockEnvironment::new()
            .with_var("HETZNER_API_TOKEN", "   ");
        assert!(load_config_with_env(&env).is_err());
    }

    #[test]
    fn test_blank_webhook_is_absent() {
        let env = MockEnvironment::new()
            .with_var("HETZNER_API_TOKEN", "t")
            .with_var("SLACK_WEBHOOK_URL", "");

        let config = load_config_with_env(&env).unwrap();
        assert_eq!(config.slack_webhook_url, None);
    }

    #[test]
    fn test_config_loading_invalid_threshold() {
        let env = MockEnvironment::new()
            .with_var("HETZNER_API_TOKEN", "t")
            .with_var("THRESHOLD_PERCENT_NOTIF", "invalid");

        let result = load_config_with_env(&env);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("THRESHOLD_PERCENT_NOTIF"));

        for val in ["0", "-5", "100.1", "NaN"] {
            let env = MockEnvironment::new()
                .with_var("HETZNER_API_TOKEN", "t")
                .with_var("THRESHOLD_PERCENT_KILL", val);

            let result = load_config_with_env(&env);
            assert!(result.is_err(), "Accepted value: {}", val);
            assert!(result.unwrap_err().to_string().contains("THRESHOLD_PERCENT_KILL"));
        }

        // Upper bound is inclusive
        let env = MockEnvironment::new()
            .with_var("HETZNER_API_TOKEN", "t")
            .with_var("THRESHOLD_PERCENT_KILL", "100");
        assert_eq!(load_config_with_env(&env).unwrap().thresholds.kill_percent, 100.0);
    }

    #[test]
    fn test_inverted_thresholds_are_accepted() {
        let env = MockEnvironment::new()
            .with_var("HETZNER_API_TOKEN", "t")
            .with_var("THRESHOLD_PERCENT_NOTIF", "95")
            .with_var("THRESHOLD_PERCENT_KILL", "80");

        let config = load_config_with_env(&env).unwrap();
        assert_eq!(config.thresholds.notify_percent, 95.0);
        assert_eq!(config.thresholds.kill_percent, 80.0);
    }

    #[test]
    fn test_boolean_parsing() {
        for val in ["1", "true", "TRUE", "True"] {
            let env = MockEnvironment::new()
                .with_var("HETZNER_API_TOKEN", "t")
                .with_var("SEND_USAGE_NOTIF_ALWAYS", val);

            let config = load_config_with_env(&env).unwrap();
            assert!(config.send_always, "Failed for value: {}", val);
        }

        for val in ["0", "false", "FALSE", "False", "no", "off", ""] {
            let env = MockEnvironment::new()
                .with_var("HETZNER_API_TOKEN", "t")
                .with_var("SEND_USAGE_NOTIF_ALWAYS", val);

            let config = load_config_with_env(&env).unwrap();
            assert!(!config.send_always, "Failed for value: {}", val);
        }
    }

    #[test]
    fn test_invalid_timeout_uses_default() {
        for val in ["invalid", "0", "-1"] {
            let env = MockEnvironment::new()
                .with_var("HETZNER_API_TOKEN", "t")
                .with_var("HTTP_TIMEOUT_SECONDS", val);

            let config = load_config_with_env(&env).unwrap();
            assert_eq!(config.request_timeout_secs, 30, "Failed for value: {}", val);
        }
    }

    #[test]
    fn test_debug_output_redacts_token() {
        let env = MockEnvironment::new()
            .with_var("HETZNER_API_TOKEN", "super-secret")
            .with_var("SLACK_WEBHOOK_URL", "https://hooks.slack.com/services/T/B/X");

        let config = load_config_with_env(&env).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("services/T/B/X"));
        assert!(rendered.contains("<redacted>"));
    }
}
