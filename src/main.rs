use axum::serve;
use model_storage::api::handlers::AppState;
use model_storage::api::routes::create_router;
use model_storage::auth::TokenVerifier;
use model_storage::config::AppConfig;
use model_storage::seed;
use model_storage::store::PostgresStore;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging with explicit filter to suppress sqlx debug logs
    use env_logger::Builder;
    use log::LevelFilter;

    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("sqlx", LevelFilter::Warn)
        .init();

    println!("model-storage: the storage for metabolic models");

    // Load configuration
    let config = AppConfig::load()?;
    println!(
        "Configuration loaded: server={}:{}",
        config.server.host, config.server.port
    );

    println!("Connecting to PostgreSQL...");
    let database_url = config.database_url()?;
    let max_connections = config.database.max_connections.unwrap_or(20);
    let postgres_store = PostgresStore::new(&database_url, max_connections).await?;

    println!("Bootstrapping database schema...");
    postgres_store.migrate().await?;

    let store = Arc::new(postgres_store);

    // Load seed data for demonstration (optional)
    if std::env::var("LOAD_SEED_DATA").unwrap_or_default() == "true" {
        println!("Loading seed data...");
        seed::load_seed_data(&*store).await?;
        println!("Seed data loaded successfully");
    }

    let verifier = match config.jwt_public_key() {
        Some(pem) => TokenVerifier::new(Some(&pem))?,
        None => {
            log::warn!("No JWT public key configured; all callers are treated as anonymous");
            TokenVerifier::disabled()
        }
    };

    let state = AppState::new(store, verifier);
    run_server(create_router().with_state(state), &config).await?;

    Ok(())
}

async fn run_server(app: axum::Router, config: &AppConfig) -> anyhow::Result<()> {
    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    println!("model-storage server running on http://{}", bind_address);

    serve(listener, app).await?;

    Ok(())
}
