use tracing::{error, info, warn};

use crate::hetzner::HetznerClient;
use crate::types::{ActionOutcome, ServerUsageRecord};

/// Shuts down kill-tier servers one at a time, in list order.
pub struct ActionExecutor<'a> {
    client: &'a HetznerClient,
}

impl<'a> ActionExecutor<'a> {
    pub fn new(client: &'a HetznerClient) -> Self {
        Self { client }
    }

    /// Request one shutdown; the outcome's `success` flag drives the killed set.
    pub async fn shutdown(&self, server: &ServerUsageRecord) -> ActionOutcome {
        info!(
            "Server {} ({}) exceeds kill threshold with {} usage. Shutting down...",
            server.name, server.id, server.usage_percentage
        );
        match self.client.shutdown_server(server.id).await {
            Ok(()) => {
                info!("Server {} has been shut down due to exceeding bandwidth threshold", server.id);
                ActionOutcome {
                    server: server.clone(),
                    success: true,
                    error: None,
                }
            }
            Err(e) => {
                error!("{}", e);
                ActionOutcome {
                    server: server.clone(),
                    success: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Each call completes before the next begins; failures never stop the loop.
    pub async fn shutdown_all(&self, kill_list: &[ServerUsageRecord]) -> ShutdownReport {
        let mut outcomes = Vec::with_capacity(kill_list.len());
        for server in kill_list {
            outcomes.push(self.shutdown(server).await);
        }
        let report = ShutdownReport { outcomes };
        let failed = report.failed_count();
        if failed > 0 {
            warn!("{} of {} shutdown request(s) failed", failed, report.outcomes.len());
        }
        report
    }
}

#[derive(Debug, Default)]
pub struct ShutdownReport {
    pub outcomes: Vec<ActionOutcome>,
}

impl ShutdownReport {
    /// Servers whose shutdown succeeded, in request order.
    pub fn killed(&self) -> Vec<ServerUsageRecord> {
        self.outcomes
            .iter()
            .filter(|o| o.success)
            .map(|o| o.server.clone())
            .collect()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.success).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{load_config_with_env, MockEnvironment};

    fn outcome(id: u64, success: bool) -> ActionOutcome {
        ActionOutcome {
            server: ServerUsageRecord::new(id, format!("srv-{}", id), "running", 95, 100),
            success,
            error: (!success).then(|| "boom".to_string()),
        }
    }

    #[test]
    fn test_killed_keeps_only_successes_in_order() {
        let report = ShutdownReport {
            outcomes: vec![outcome(1, true), outcome(2, false), outcome(3, true)],
        };
        let ids: Vec<u64> = report.killed().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(report.failed_count(), 1);
    }

    #[test]
    fn test_empty_kill_list_makes_no_requests() {
        let env = MockEnvironment::new()
            .with_var("HETZNER_API_TOKEN", "t")
            // Nothing listens here; any request would fail the assertion below
            .with_var("HETZNER_API_URL", "http://127.0.0.1:9");
        let config = load_config_with_env(&env).unwrap();
        let client = HetznerClient::new(&config).unwrap();
        let executor = ActionExecutor::new(&client);

        let report = tokio_test::block_on(executor.shutdown_all(&[]));
        assert!(report.outcomes.is_empty());
        assert!(report.killed().is_empty());
    }
}
