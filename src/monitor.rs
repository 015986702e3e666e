use std::time::Duration;

use tracing::{error, info};

use crate::classifier::classify;
use crate::error::Result;
use crate::executor::{ActionExecutor, ShutdownReport};
use crate::hetzner::HetznerClient;
use crate::report::{compose, AlertReport};
use crate::slack::{build_fetch_failure_payload, build_slack_payload, send_to_slack};
use crate::table::render_usage_table;
use crate::types::{ClassificationResult, Config, SlackPayload};

/// What a single run did.
#[derive(Debug)]
pub struct RunSummary {
    pub classification: ClassificationResult,
    pub shutdowns: ShutdownReport,
    pub report: Option<AlertReport>,
    pub delivered: bool,
}

/// Fetch, classify, shut down kill-tier servers, then report.
///
/// Only configuration and fetch failures are returned as errors.
pub async fn run(config: &Config) -> Result<RunSummary> {
    let client = HetznerClient::new(config)?;
    let timeout = Duration::from_secs(config.request_timeout_secs);

    let records = match client.fetch_servers().await {
        Ok(records) => records,
        Err(e) => {
            error!("{}", e);
            if let Some(url) = &config.slack_webhook_url {
                deliver(url, &build_fetch_failure_payload(&e), timeout).await;
            }
            return Err(e);
        }
    };

    let classification = classify(&records, &config.thresholds);
    info!(
        "{} server(s): {} kill, {} notify, {} below thresholds",
        classification.all.len(),
        classification.kill.len(),
        classification.notify.len(),
        classification.none.len()
    );
    println!("{}", render_usage_table(&classification.all));

    let shutdowns = ActionExecutor::new(&client)
        .shutdown_all(&classification.kill)
        .await;
    let killed = shutdowns.killed();

    let report = compose(
        &classification.notify,
        &classification.all_records(),
        &killed,
        config.send_always,
        &config.thresholds,
    );

    let mut delivered = false;
    match &report {
        None => info!("No servers above thresholds, skipping alert"),
        Some(report) => {
            println!("\n{}", report.render_text());
            match &config.slack_webhook_url {
                Some(url) => {
                    delivered = deliver(url, &build_slack_payload(report), timeout).await;
                    if delivered {
                        info!(
                            "Slack alert sent for {} server(s) and {} killed server(s)",
                            report.server_lines.len(),
                            report.killed_lines.len()
                        );
                    }
                }
                None => info!("Set SLACK_WEBHOOK_URL environment variable to receive Slack alerts."),
            }
        }
    }

    Ok(RunSummary {
        classification,
        shutdowns,
        report,
        delivered,
    })
}

async fn deliver(webhook_url: &str, payload: &SlackPayload, timeout: Duration) -> bool {
    match send_to_slack(webhook_url, payload, timeout).await {
        Ok(()) => true,
        Err(e) => {
            error!("{}", e);
            false
        }
    }
}
