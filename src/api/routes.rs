use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::api::handlers::{self, AppState};
use crate::store::traits::ModelStore;

pub fn create_router<S: ModelStore + 'static>() -> Router<AppState<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Model collection
        .route("/models", get(handlers::list_models::<S>))
        .route("/models", post(handlers::create_model::<S>))
        // Individual models
        .route("/models/:id", get(handlers::get_model::<S>))
        .route("/models/:id", put(handlers::update_model::<S>))
        .route("/models/:id", delete(handlers::delete_model::<S>))
        // The API is consumed cross-origin by the platform frontend.
        .layer(CorsLayer::permissive())
}
