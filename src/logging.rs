use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::{EnvironmentProvider, SystemEnvironment};

/// Filter built from `RUST_LOG`, falling back to INFO so per-server shutdown
/// lines and delivery results are always visible.
pub fn env_filter_with_env<E: EnvironmentProvider>(env: &E) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(env.get_var(EnvFilter::DEFAULT_ENV).unwrap_or_default())
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter_with_env(&SystemEnvironment))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
