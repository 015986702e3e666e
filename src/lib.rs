// Public modules
pub mod types;
pub mod error;
pub mod config;
pub mod units;
pub mod hetzner;
pub mod classifier;
pub mod executor;
pub mod report;
pub mod table;
pub mod slack;
pub mod monitor;
pub mod logging;

// Re-export commonly used items
pub use types::*;
pub use error::MonitorError;
pub use config::{load_config, load_config_with_env, EnvironmentProvider, SystemEnvironment, MockEnvironment};
pub use units::{usage_ratio, format_percentage, bytes_to_tb};
pub use hetzner::HetznerClient;
pub use classifier::{classify, tier_for_ratio};
pub use executor::{ActionExecutor, ShutdownReport};
pub use report::{compose, AlertKind, AlertReport};
pub use table::render_usage_table;
pub use slack::{build_slack_payload, build_fetch_failure_payload, send_to_slack};
pub use monitor::{run, RunSummary};
pub use logging::{env_filter_with_env, init_tracing};
