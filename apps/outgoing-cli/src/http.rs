//! HTTP surface of the correspondence store
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | GET | `/all-correspondences` | 200, all records |
//! | GET | `/correspondence/{id}` | 200, one record |
//! | POST | `/correspondence` | 201, message and stored record |
//! | PUT | `/correspondence/{id}` | 200, message and stored record |
//! | DELETE | `/correspondence/{id}` | 200, message and removed record |
//!
//! Failures answer with `{"detail": "<message>"}`: 400 for rejected input,
//! 404 for unknown ids, 500 when the table cannot be written.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use outgoing_core::{CatalogueError, CorrespondenceRecord, CorrespondenceStore, MutationResponse};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, instrument};

pub const CREATED_MESSAGE: &str = "Correspondence added successfully.";
pub const UPDATED_MESSAGE: &str = "Correspondence updated successfully.";
pub const DELETED_MESSAGE: &str = "Correspondence deleted successfully.";

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CorrespondenceStore>,
}

/// Error answered to HTTP clients
#[derive(Debug)]
pub enum ApiError {
    Catalogue(CatalogueError),
    BadRequest(String),
    Internal(String),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Catalogue(e) if e.is_validation() => StatusCode::BAD_REQUEST,
            Self::Catalogue(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            Self::Catalogue(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Catalogue(e) => e.to_string(),
            Self::BadRequest(message) | Self::Internal(message) => message.clone(),
        }
    }
}

impl From<CatalogueError> for ApiError {
    fn from(error: CatalogueError) -> Self {
        Self::Catalogue(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.detail());
        }
        (status, Json(json!({ "detail": self.detail() }))).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Run a store call on the blocking pool
async fn with_store<T, F>(state: &AppState, call: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&CorrespondenceStore) -> outgoing_core::Result<T> + Send + 'static,
{
    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || call(&store))
        .await
        .map_err(|e| ApiError::Internal(format!("Store task failed: {e}")))?
        .map_err(ApiError::from)
}

/// Build the service router
pub fn router(store: Arc<CorrespondenceStore>) -> Router {
    Router::new()
        .route("/all-correspondences", get(list_correspondences))
        .route("/correspondence", post(create_correspondence))
        .route(
            "/correspondence/:id",
            get(get_correspondence)
                .put(replace_correspondence)
                .delete(delete_correspondence),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState { store })
}

async fn list_correspondences(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<CorrespondenceRecord>>> {
    with_store(&state, |store| Ok(store.list_all())).await.map(Json)
}

async fn get_correspondence(
    State(state): State<AppState>,
    id: std::result::Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<CorrespondenceRecord>> {
    let Path(id) = id?;
    with_store(&state, move |store| store.get(id)).await.map(Json)
}

async fn create_correspondence(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CorrespondenceRecord>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MutationResponse>)> {
    let Json(candidate) = payload?;
    let stored = with_store(&state, move |store| store.insert(&candidate)).await?;
    Ok((
        StatusCode::CREATED,
        Json(MutationResponse::new(CREATED_MESSAGE, stored)),
    ))
}

async fn replace_correspondence(
    State(state): State<AppState>,
    id: std::result::Result<Path<u64>, PathRejection>,
    payload: std::result::Result<Json<CorrespondenceRecord>, JsonRejection>,
) -> ApiResult<Json<MutationResponse>> {
    let Path(id) = id?;
    let Json(candidate) = payload?;
    let stored = with_store(&state, move |store| store.replace(id, &candidate)).await?;
    Ok(Json(MutationResponse::new(UPDATED_MESSAGE, stored)))
}

async fn delete_correspondence(
    State(state): State<AppState>,
    id: std::result::Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<MutationResponse>> {
    let Path(id) = id?;
    let removed = with_store(&state, move |store| store.delete(id)).await?;
    Ok(Json(MutationResponse::new(DELETED_MESSAGE, removed)))
}

/// Serve the router on `address` until the process is interrupted
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails
#[instrument(skip(store))]
pub async fn serve(store: Arc<CorrespondenceStore>, address: &str) -> std::io::Result<()> {
    let listener = TcpListener::bind(address).await?;
    info!("Correspondence service listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down correspondence service");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ApiError::from(CatalogueError::DuplicateIdentifier { id: 42 }),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(CatalogueError::NotFound { id: 7 }),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::from(CatalogueError::persistence("disk full")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::BadRequest("missing field".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Internal("panic".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(error.status(), status, "{error:?}");
        }
    }

    #[test]
    fn test_detail_uses_error_message() {
        let error = ApiError::from(CatalogueError::NotFound { id: 7 });
        assert_eq!(error.detail(), "Correspondence not found: 7");
    }
}
