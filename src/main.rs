use anyhow::Result;
use tracing::info;

use hcloud_bandwidth_guard::{init_tracing, load_config, run};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cfg = load_config()?;
    info!(
        "thresholds: notify {}%, kill {}%, send always: {}",
        cfg.thresholds.notify_percent, cfg.thresholds.kill_percent, cfg.send_always
    );

    run(&cfg).await?;
    Ok(())
}
