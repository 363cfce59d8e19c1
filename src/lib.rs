pub mod api;
pub mod auth;
pub mod config;
pub mod logic;
pub mod model;
pub mod seed;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;
pub use api::{ApiError, ErrorResponse};

// Export auth types
pub use auth::{AuthError, TokenVerifier};

// Export logic types
pub use logic::{
    can_view, reaction_identifiers, require_authenticated, require_project_claim, AccessDenied,
    ModelParseError, ModelValidator, ValidationError,
};

// Export all model types
pub use model::*;

// Export store types
pub use store::{MemoryStore, ModelStore, PostgresStore};

// Function for integration testing
pub async fn run_server() -> anyhow::Result<()> {
    use axum::serve;
    use std::sync::Arc;
    use tokio::net::TcpListener;

    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging with INFO level only (suppress DEBUG logs)
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    // Load configuration
    let config = crate::config::AppConfig::load()?;

    // Connect to PostgreSQL
    let database_url = config.database_url()?;
    let max_connections = config.database.max_connections.unwrap_or(20);
    let postgres_store = crate::store::PostgresStore::new(&database_url, max_connections).await?;

    // Bootstrap the schema
    postgres_store.migrate().await?;

    let verifier = match config.jwt_public_key() {
        Some(pem) => crate::auth::TokenVerifier::new(Some(&pem))?,
        None => crate::auth::TokenVerifier::disabled(),
    };

    let state = crate::api::handlers::AppState::new(Arc::new(postgres_store), verifier);

    // Create router with state
    let app = crate::api::routes::create_router().with_state(state);

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;

    serve(listener, app).await?;

    Ok(())
}
