//! House Probe binary.

use std::process::ExitCode;

use houseprobe_infrastructure::ProbeConfig;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("House Probe v{}", env!("CARGO_PKG_VERSION"));

    houseprobe::main_with(ProbeConfig::load()).await
}
