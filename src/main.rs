use wallet_ledger::config::AppConfig;
use wallet_ledger::db::{Database, schema};
use wallet_ledger::gateway::{self, state::AppState};
use wallet_ledger::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = std::env::var("WLT_ENV").unwrap_or_else(|_| "dev".to_string());
    let config = AppConfig::load(&env)?;

    let _guard = logging::init_logging(&config);
    tracing::info!(env = %env, version = env!("WLT_BUILD_REV"), "Starting wallet-ledger");

    let db = Database::connect(&config.storage).await?;
    schema::init_schema(db.pool()).await?;

    let state = AppState::new(db);
    gateway::run_server(&config.gateway, state).await
}
