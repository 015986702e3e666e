use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{MonitorError, Result};
use crate::types::{Config, ServerUsageRecord};

const PAGE_SIZE: u32 = 50;

#[derive(Debug, Deserialize)]
pub struct ApiServer {
    pub id: u64,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub outgoing_traffic: Option<u64>,
    #[serde(default)]
    pub included_traffic: Option<u64>,
}

impl From<ApiServer> for ServerUsageRecord {
    fn from(s: ApiServer) -> Self {
        ServerUsageRecord::new(
            s.id,
            s.name,
            s.status,
            s.outgoing_traffic.unwrap_or(0),
            s.included_traffic.unwrap_or(0),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct ServerList {
    pub servers: Vec<ApiServer>,
    #[serde(default)]
    pub meta: Option<ListMeta>,
}

#[derive(Debug, Deserialize)]
pub struct ListMeta {
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub next_page: Option<u32>,
}

impl ServerList {
    fn next_page(&self) -> Option<u32> {
        self.meta
            .as_ref()
            .and_then(|m| m.pagination.as_ref())
            .and_then(|p| p.next_page)
    }
}

/// Client for the Hetzner Cloud servers API.
pub struct HetznerClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl HetznerClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| MonitorError::Config(format!("build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            token: config.api_token.clone(),
        })
    }

    /// List every server on the account, following pagination in order.
    pub async fn fetch_servers(&self) -> Result<Vec<ServerUsageRecord>> {
        let mut records = Vec::new();
        let mut page = 1;
        loop {
            let list = self.fetch_page(page).await?;
            let next = list.next_page();
            debug!("page {} returned {} server(s)", page, list.servers.len());
            records.extend(list.servers.into_iter().map(ServerUsageRecord::from));
            match next {
                Some(n) if n > page => page = n,
                _ => break,
            }
        }
        info!("Fetched {} server(s)", records.len());
        Ok(records)
    }

    async fn fetch_page(&self, page: u32) -> Result<ServerList> {
        let url = format!("{}/servers", self.base_url);
        let res = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("page", page), ("per_page", PAGE_SIZE)])
            .send()
            .await
            .map_err(|e| MonitorError::Fetch(format!("GET {}: {}", url, e)))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(MonitorError::Fetch(describe_status(status, &body)));
        }
        res.json::<ServerList>()
            .await
            .map_err(|e| MonitorError::Fetch(format!("decode server list: {}", e)))
    }

    /// Request a graceful shutdown of one server.
    pub async fn shutdown_server(&self, server_id: u64) -> Result<()> {
        let url = format!("{}/servers/{}/actions/shutdown", self.base_url, server_id);
        let shutdown_err = |reason: String| MonitorError::Shutdown { server_id, reason };

        let res = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| shutdown_err(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(shutdown_err(describe_status(status, &body)));
        }
        Ok(())
    }
}

fn describe_status(status: StatusCode, body: &str) -> String {
    if body.is_empty() {
        format!("provider returned {}", status)
    } else {
        format!("provider returned {} - {}", status, body)
    }
}
