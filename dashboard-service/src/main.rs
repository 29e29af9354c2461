use std::sync::Arc;

use anyhow::Result;
use dashboard_service::{api, config::AppConfig, metrics_server, observability, Dashboard};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let cfg = AppConfig::load()?;

    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    let dashboard = Arc::new(Dashboard::from_config(&cfg)?);

    api::serve(&cfg.api.bind_addr, dashboard).await
}
