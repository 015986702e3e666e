use std::fmt;

use serde::Serialize;

use crate::units::{bytes_to_tb, format_percentage, usage_ratio};

#[derive(Clone)]
pub struct Config {
    pub api_token: String,
    pub api_base_url: String,
    pub slack_webhook_url: Option<String>,
    pub thresholds: ThresholdConfig,
    pub send_always: bool,
    pub request_timeout_secs: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("slack_webhook_url", &self.slack_webhook_url.as_ref().map(|_| "<set>"))
            .field("thresholds", &self.thresholds)
            .field("send_always", &self.send_always)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Percent thresholds, both in (0, 100].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdConfig {
    pub notify_percent: f64,
    pub kill_percent: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            notify_percent: 50.0,
            kill_percent: 90.0,
        }
    }
}

/// Snapshot of one server's traffic at fetch time.
///
/// The ratio and the formatted figures are computed once in [`ServerUsageRecord::new`]
/// so that every output path renders identical strings.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerUsageRecord {
    pub id: u64,
    pub name: String,
    pub status: String,
    pub outgoing_bytes: u64,
    pub included_bytes: u64,
    pub ratio: f64,
    pub usage_percentage: String,
    pub outgoing_tb: String,
    pub limit_tb: String,
}

impl ServerUsageRecord {
    pub fn new(
        id: u64,
        name: impl Into<String>,
        status: impl Into<String>,
        outgoing_bytes: u64,
        included_bytes: u64,
    ) -> Self {
        let ratio = usage_ratio(outgoing_bytes, included_bytes);
        Self {
            id,
            name: name.into(),
            status: status.into(),
            outgoing_bytes,
            included_bytes,
            ratio,
            usage_percentage: format_percentage(ratio),
            outgoing_tb: bytes_to_tb(outgoing_bytes),
            limit_tb: bytes_to_tb(included_bytes),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    None,
    Notify,
    Kill,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Tier::None => "None",
            Tier::Notify => "NOTIFY",
            Tier::Kill => "KILL",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedServer {
    pub record: ServerUsageRecord,
    pub tier: Tier,
}

/// Records partitioned by tier. Every bucket keeps fetch order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassificationResult {
    pub all: Vec<ClassifiedServer>,
    pub kill: Vec<ServerUsageRecord>,
    pub notify: Vec<ServerUsageRecord>,
    pub none: Vec<ServerUsageRecord>,
}

impl ClassificationResult {
    pub fn all_records(&self) -> Vec<ServerUsageRecord> {
        self.all.iter().map(|c| c.record.clone()).collect()
    }
}

/// Result of one shutdown request.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    pub server: ServerUsageRecord,
    pub success: bool,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SlackPayload {
    /// Plain-text fallback shown in notifications.
    pub text: String,
    pub blocks: Vec<serde_json::Value>,
}
