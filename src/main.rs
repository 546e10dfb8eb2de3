use dotenvy::dotenv;
use fabric_calc::{
    config::{self, database},
    core::{form::FormController, history::HistoryStore, slot::DatabaseSlot},
    errors::Result,
    terminal,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible). Logs go to stderr, the session owns stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // 2. Load .env file
    dotenv().ok(); // Non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Load application settings
    let app_config = config::load_app_configuration()
        .inspect_err(|e| error!("Failed to load application configuration: {}", e))?;
    info!(
        history_key = %app_config.history_key,
        delay_ms = app_config.calculation_delay_ms,
        "Loaded application configuration."
    );

    // 4. Initialize database
    let db = database::create_connection(&database::get_database_url())
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Run the calculator session
    let store = HistoryStore::new(DatabaseSlot::new(db, app_config.history_key.clone()));
    let mut controller = FormController::open(store, app_config.calculation_delay()).await;
    terminal::run(&mut controller).await
}
