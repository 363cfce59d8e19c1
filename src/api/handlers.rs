use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Json,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::auth::TokenVerifier;
use crate::logic::authorize;
use crate::logic::validate::{ModelValidator, ValidationError};
use crate::model::{AccessTier, AuthContext, Model, ModelHeader};
use crate::store::traits::ModelStore;

/// Shared request state: the injected store plus the token verifier.
pub struct AppState<S> {
    pub store: Arc<S>,
    pub verifier: TokenVerifier,
}

impl<S> AppState<S> {
    pub fn new(store: Arc<S>, verifier: TokenVerifier) -> Self {
        Self { store, verifier }
    }
}

// Manual impl: `S` itself does not need to be Clone behind the Arc.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            verifier: self.verifier.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// List all models visible to the caller as header projections.
pub async fn list_models<S: ModelStore>(
    State(state): State<AppState<S>>,
    auth: AuthContext,
) -> Result<Json<Vec<ModelHeader>>, ApiError> {
    log::debug!("Retrieving all visible models");
    let headers = state.store.list_visible(&auth.visible_projects()).await?;
    Ok(Json(headers))
}

/// Create a new model.
pub async fn create_model<S: ModelStore>(
    State(state): State<AppState<S>>,
    auth: AuthContext,
    body: Bytes,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<Model>), ApiError> {
    log::debug!("Creating a new model in the model storage");
    authorize::require_authenticated(&auth)?;
    let payload = parse_json_body(&body)?;
    // A write claim is demanded up front when the payload targets a
    // project; a public submission only needs authentication.
    if let Some(project_id) = payload.get("project_id").and_then(Value::as_i64) {
        authorize::require_project_claim(&auth, Some(project_id), AccessTier::Write)?;
    }
    let new_model = ModelValidator::validate_new(&payload)?;
    let model = state.store.insert(new_model).await?;

    // Relative URL of the new resource for the Location header.
    let location = format!("/models/{}", model.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(model)))
}

/// Return a model by id, subject to the visibility rule. An invisible
/// record is indistinguishable from a missing one.
pub async fn get_model<S: ModelStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
    auth: AuthContext,
) -> Result<Json<Model>, ApiError> {
    log::debug!("Fetching model by id {}", id);
    match state.store.get(id).await? {
        Some(model) if authorize::can_view(&auth, model.project_id) => Ok(Json(model)),
        _ => Err(not_found(id)),
    }
}

/// Update a model by id. Existence is reported before the tier check;
/// the tier is checked against the record's current project.
pub async fn update_model<S: ModelStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
    auth: AuthContext,
    body: Bytes,
) -> Result<Json<Model>, ApiError> {
    log::debug!("Updating model by id {}", id);
    authorize::require_authenticated(&auth)?;
    let current = state.store.get(id).await?.ok_or_else(|| not_found(id))?;
    authorize::require_project_claim(&auth, current.project_id, AccessTier::Write)?;

    let payload = parse_json_body(&body)?;
    let patch = ModelValidator::validate_patch(&payload, &current)?;
    match state.store.update(id, patch).await? {
        Some(model) => Ok(Json(model)),
        // The row vanished between the existence check and the write.
        None => Err(not_found(id)),
    }
}

/// Delete a model by id. Requires the admin tier on the record's current
/// project.
pub async fn delete_model<S: ModelStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
    auth: AuthContext,
) -> Result<StatusCode, ApiError> {
    log::debug!("Deleting model by id {}", id);
    authorize::require_authenticated(&auth)?;
    let current = state.store.get(id).await?.ok_or_else(|| not_found(id))?;
    authorize::require_project_claim(&auth, current.project_id, AccessTier::Admin)?;

    if state.store.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

fn not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Cannot find any model with id {id}"))
}

fn parse_json_body(body: &Bytes) -> Result<Value, ApiError> {
    serde_json::from_slice(body)
        .map_err(|e| ValidationError::single(format!("request body is not valid JSON: {e}")).into())
}
