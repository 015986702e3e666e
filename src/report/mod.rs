use chrono::{DateTime, SecondsFormat, Utc};

use crate::types::{ServerUsageRecord, ThresholdConfig};

pub const KILL_HEADER: &str = "🚨 Server Bandwidth Alert - Servers Killed 🚨";
pub const NOTIFY_HEADER: &str = "⚠️ Server Bandwidth Alert ⚠️";
pub const FULL_REPORT_HEADER: &str = "🔍 Server Bandwidth Report";
pub const KILLED_SECTION_TITLE: &str = "Servers that were shut down:";
pub const OTHERS_SECTION_TITLE: &str = "Other servers with high usage:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Kill,
    Notify,
    FullReport,
}

/// Alert assembled for one run, rendered to both console and Slack.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertReport {
    pub kind: AlertKind,
    pub header: String,
    pub subheader: String,
    pub killed_lines: Vec<String>,
    pub server_lines: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

pub fn server_line(server: &ServerUsageRecord) -> String {
    format!(
        "{} ({}): {} used ({} TB of {} TB)",
        server.name, server.status, server.usage_percentage, server.outgoing_tb, server.limit_tb
    )
}

pub fn killed_line(server: &ServerUsageRecord) -> String {
    format!(
        "{} (was {}): {} used ({} TB of {} TB) - SHUT DOWN",
        server.name, server.status, server.usage_percentage, server.outgoing_tb, server.limit_tb
    )
}

/// Build the alert for a run, or `None` when there is nothing to say.
///
/// Killed servers take priority over notify-tier ones; the full report is
/// only produced when `send_always` is set and no threshold was breached.
pub fn compose(
    notify: &[ServerUsageRecord],
    all: &[ServerUsageRecord],
    killed: &[ServerUsageRecord],
    send_always: bool,
    thresholds: &ThresholdConfig,
) -> Option<AlertReport> {
    let exceeded = |count: usize| {
        format!(
            "{} server(s) have exceeded {}% bandwidth usage:",
            count, thresholds.notify_percent
        )
    };

    let (kind, header, subheader, listed) = if !killed.is_empty() {
        let subheader = format!(
            "{} server(s) have been shut down for exceeding {}% bandwidth usage.\n{}",
            killed.len(),
            thresholds.kill_percent,
            exceeded(notify.len())
        );
        (AlertKind::Kill, KILL_HEADER, subheader, notify)
    } else if !notify.is_empty() {
        (AlertKind::Notify, NOTIFY_HEADER, exceeded(notify.len()), notify)
    } else if send_always {
        let subheader = format!("Full report: showing all {} server(s)", all.len());
        (AlertKind::FullReport, FULL_REPORT_HEADER, subheader, all)
    } else {
        return None;
    };

    Some(AlertReport {
        kind,
        header: header.to_string(),
        subheader,
        killed_lines: killed.iter().map(killed_line).collect(),
        server_lines: listed.iter().map(server_line).collect(),
        generated_at: Utc::now(),
    })
}

impl AlertReport {
    /// Title shown above `server_lines`, if they need one.
    pub fn server_section_title(&self) -> Option<&'static str> {
        match self.kind {
            AlertKind::Kill if !self.server_lines.is_empty() => Some(OTHERS_SECTION_TITLE),
            _ => None,
        }
    }

    pub fn generated_at_text(&self) -> String {
        format!(
            "Generated at {}",
            self.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }

    /// Plain-text rendering for the console.
    pub fn render_text(&self) -> String {
        let mut lines = vec![self.header.clone(), self.subheader.clone()];
        if !self.killed_lines.is_empty() {
            lines.push(String::new());
            lines.push(KILLED_SECTION_TITLE.to_string());
            lines.extend(self.killed_lines.iter().map(|l| format!("  • {}", l)));
        }
        if !self.server_lines.is_empty() {
            lines.push(String::new());
            if let Some(title) = self.server_section_title() {
                lines.push(title.to_string());
            }
            lines.extend(self.server_lines.iter().map(|l| format!("  • {}", l)));
        }
        lines.push(String::new());
        lines.push(self.generated_at_text());
        lines.join("\n")
    }
}
