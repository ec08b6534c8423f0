use std::sync::Arc;

use tracing::info;
use wallet_ledger::api::{create_router, AppState};
use wallet_ledger::config::Settings;
use wallet_ledger::observability::{init_logging, init_metrics, LogConfig};
use wallet_ledger::repositories::LedgerRepository;
use wallet_ledger::services::LedgerService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;

    // Initialize logging
    init_logging(&LogConfig::from(&settings.logging));
    info!("Configuration loaded");

    // One ledger store for the lifetime of the process
    let repository = Arc::new(LedgerRepository::new());
    let ledger = Arc::new(LedgerService::new(repository, settings.ledger.clone()));

    let mut state = AppState::new(ledger);
    if settings.metrics.enabled {
        state = state.with_metrics(init_metrics());
        info!("Prometheus metrics enabled");
    }

    let app = create_router(state);

    let address = settings.address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Ledger service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
