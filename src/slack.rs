use std::time::Duration;

use crate::error::{MonitorError, Result};
use crate::report::{AlertReport, KILLED_SECTION_TITLE};
use crate::types::SlackPayload;

/// Slack rejects messages with more blocks than this.
pub const MAX_BLOCKS: usize = 50;

pub const FETCH_FAILED_HEADER: &str = "❌ Server Bandwidth Monitor - Fetch Failed";

fn header_block(text: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "header",
        "text": {"type": "plain_text", "text": text, "emoji": true}
    })
}

fn section_block(text: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "section",
        "text": {"type": "mrkdwn", "text": text}
    })
}

pub fn build_slack_payload(report: &AlertReport) -> SlackPayload {
    let mut blocks: Vec<serde_json::Value> = vec![
        header_block(&report.header),
        section_block(&report.subheader),
    ];

    // (block, lists a server)
    let mut body: Vec<(serde_json::Value, bool)> = Vec::new();
    if !report.killed_lines.is_empty() {
        blocks.push(section_block(&format!("*{}*", KILLED_SECTION_TITLE)));
        body.extend(report.killed_lines.iter().map(|l| (section_block(l), true)));
        if !report.server_lines.is_empty() {
            body.push((serde_json::json!({"type": "divider"}), false));
        }
    }
    if let Some(title) = report.server_section_title() {
        body.push((section_block(&format!("*{}*", title)), false));
    }
    body.extend(report.server_lines.iter().map(|l| (section_block(l), true)));

    // Reserve room for the footer, and for the overflow notice when needed
    let room = MAX_BLOCKS - blocks.len() - 1;
    if body.len() > room {
        let listed = body.iter().filter(|(_, is_server)| *is_server).count();
        body.truncate(room - 1);
        while matches!(body.last(), Some((_, false))) {
            body.pop();
        }
        let shown = body.iter().filter(|(_, is_server)| *is_server).count();
        body.push((
            section_block(&format!("...and {} more server(s)", listed - shown)),
            false,
        ));
    }
    blocks.extend(body.into_iter().map(|(block, _)| block));

    blocks.push(serde_json::json!({
        "type": "context",
        "elements": [{"type": "mrkdwn", "text": report.generated_at_text()}]
    }));

    SlackPayload {
        text: report.header.clone(),
        blocks,
    }
}

pub fn build_fetch_failure_payload(err: &MonitorError) -> SlackPayload {
    SlackPayload {
        text: FETCH_FAILED_HEADER.to_string(),
        blocks: vec![
            header_block(FETCH_FAILED_HEADER),
            section_block(&format!("Could not retrieve server usage: {}", err)),
        ],
    }
}

pub async fn send_to_slack(webhook_url: &str, payload: &SlackPayload, timeout: Duration) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| MonitorError::Delivery(format!("build HTTP client: {}", e)))?;
    let res = client
        .post(webhook_url)
        .json(payload)
        .send()
        .await
        .map_err(|e| MonitorError::Delivery(format!("Failed to send Slack request: {}", e)))?;
    if !res.status().is_success() {
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        return Err(MonitorError::Delivery(format!(
            "Slack webhook returned non-success status {} - {}",
            status, body
        )));
    }
    Ok(())
}
