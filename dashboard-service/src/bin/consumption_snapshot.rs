use anyhow::{bail, Result};
use dashboard_service::{config::AppConfig, observability, sinks::PanelState, Dashboard};
use energy_client::domain::SessionContext;

/// Run one consumption cycle for the meter given on the command line and print
/// the resulting panel as JSON.
#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let Some(meter_id) = std::env::args().nth(1) else {
        bail!("usage: consumption_snapshot <meter-id>");
    };

    let cfg = AppConfig::load()?;
    let dashboard = Dashboard::from_config(&cfg)?;

    let outcome = dashboard
        .consumption
        .refresh(SessionContext::new(meter_id))
        .await;
    tracing::info!(request_id = outcome.request_id, "consumption cycle finished");

    let state = dashboard.consumption.settled().await;
    println!("{}", serde_json::to_string_pretty(&state)?);

    if let PanelState::Failed { errors, .. } = &state {
        for error in errors {
            tracing::warn!(error = %error, "cycle reported an error");
        }
    }
    Ok(())
}
