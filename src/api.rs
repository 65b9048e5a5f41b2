use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{serve, Json, Router};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::error;

use crate::config::ServerConfig;
use crate::embedding;
use crate::errors::FaceSearchError;
use crate::model::*;
use crate::resolver;
use crate::search;
use crate::store::DocStore;

#[derive(Clone)]
struct AppState {
    store: DocStore,
    config: ServerConfig,
}

#[derive(Debug, Error)]
enum ApiError {
    #[error(transparent)]
    Core(#[from] FaceSearchError),

    #[error("storage error")]
    Storage(#[from] anyhow::Error),

    #[error("storage unavailable")]
    Unavailable(#[source] anyhow::Error),

    #[error("{0}")]
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Core(FaceSearchError::Decode(reason)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("uploaded bytes are not a valid image: {reason}"),
            ),
            ApiError::Core(FaceSearchError::InvalidThreshold(t)) => (
                StatusCode::BAD_REQUEST,
                format!("threshold {t} must lie in [0, 1]"),
            ),
            ApiError::Core(FaceSearchError::DimensionMismatch { .. }) => {
                error!("corpus integrity fault: {self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "stored embeddings are inconsistent".to_string(),
                )
            }
            ApiError::Core(FaceSearchError::Storage(e)) | ApiError::Storage(e) => {
                error!("storage failure: {e:?}");
                (
                    StatusCode::BAD_GATEWAY,
                    "document store unavailable".to_string(),
                )
            }
            ApiError::Unavailable(e) => {
                error!("health check failed: {e:?}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "document store unavailable".to_string(),
                )
            }
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

// GET /health - confirms storage connectivity
async fn health(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    state.store.ping().await.map_err(ApiError::Unavailable)?;
    Ok(Json(json!({ "status": "ok" })))
}

// POST /faces/known - photos containing the named known persons
async fn known_faces(
    State(state): State<AppState>,
    Json(req): Json<KnownFacesRequest>,
) -> Result<Json<KnownFacesResponse>, ApiError> {
    let photos = state.store.fetch_photos().await?;
    let known = state.store.fetch_known_faces().await?;

    let resolved = resolver::find_known(&req.names, &photos, &known);
    Ok(Json(KnownFacesResponse {
        results: resolved.matches,
        skipped_names: resolved.skipped,
    }))
}

// GET /faces/unknown - photos showing only unidentified visitors
async fn unknown_faces(
    State(state): State<AppState>,
) -> Result<Json<PhotoListResponse>, ApiError> {
    let photos = state.store.fetch_photos().await?;
    Ok(Json(PhotoListResponse {
        results: resolver::find_unknown(&photos),
    }))
}

#[derive(Deserialize)]
struct SearchParams {
    threshold: Option<f32>,
}

// POST /faces/search - rank stored faces against an uploaded image
async fn similarity_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
    body: Bytes,
) -> Result<Json<SimilaritySearchResponse>, ApiError> {
    let threshold = params.threshold.unwrap_or(state.config.default_threshold);

    let query = embedding::generate(&body)?;
    let corpus = state.store.fetch_face_vectors().await?;
    let hits = search::rank(&query, &corpus, threshold)?;

    Ok(Json(SimilaritySearchResponse {
        results: hits
            .into_iter()
            .map(|hit| SimilarFace {
                face: hit.record,
                similarity: hit.similarity,
            })
            .collect(),
        threshold,
    }))
}

// GET /known_faces - every registered reference identity
async fn list_known_faces(
    State(state): State<AppState>,
) -> Result<Json<KnownFaceListResponse>, ApiError> {
    let known = state.store.fetch_known_faces().await?;
    Ok(Json(KnownFaceListResponse { results: known }))
}

// GET /photos - every capture with detected faces
async fn list_photos(State(state): State<AppState>) -> Result<Json<PhotoListResponse>, ApiError> {
    let photos = state.store.fetch_photos().await?;
    Ok(Json(PhotoListResponse { results: photos }))
}

// GET /photos/latest - most recent capture by timestamp
async fn latest_photo(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let latest = state
        .store
        .latest_photo()
        .await?
        .ok_or_else(|| ApiError::NotFound("no photos recorded".to_string()))?;
    Ok(Json(json!({ "result": latest })))
}

// Image object names under the store's `images/` prefix.
fn photo_image_key(photo_id: &str) -> String {
    format!("photos/{photo_id}.jpg")
}

fn face_crop_key(face_id: &str) -> String {
    format!("faces/{face_id}.jpg")
}

fn known_face_image_key(name: &str) -> String {
    format!("known_faces/{name}.jpg")
}

// GET /photos/:photo_id/image - raw capture bytes
async fn photo_image(
    State(state): State<AppState>,
    Path(photo_id): Path<String>,
) -> Result<Response, ApiError> {
    serve_image(&state, &photo_image_key(&photo_id)).await
}

// GET /faces/:face_id/image - raw detected-face crop bytes
async fn face_image(
    State(state): State<AppState>,
    Path(face_id): Path<String>,
) -> Result<Response, ApiError> {
    serve_image(&state, &face_crop_key(&face_id)).await
}

// GET /known_faces/:name/image - raw reference portrait bytes
async fn known_face_image(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    serve_image(&state, &known_face_image_key(&name)).await
}

async fn serve_image(state: &AppState, name: &str) -> Result<Response, ApiError> {
    let bytes = state
        .store
        .fetch_image(name)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("no image found for {name}")))?;
    Ok(([(header::CONTENT_TYPE, "image/jpeg")], bytes).into_response())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/faces/known", post(known_faces))
        .route("/faces/unknown", get(unknown_faces))
        .route("/faces/search", post(similarity_search))
        .route("/faces/:face_id/image", get(face_image))
        .route("/known_faces", get(list_known_faces))
        .route("/known_faces/:name/image", get(known_face_image))
        .route("/photos", get(list_photos))
        .route("/photos/latest", get(latest_photo))
        .route("/photos/:photo_id/image", get(photo_image))
        .with_state(state)
}

pub async fn run(store: DocStore, config: ServerConfig) -> anyhow::Result<()> {
    let bind_addr = config.bind_addr.clone();
    let app = router(AppState { store, config });

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("API listening on {bind_addr}");
    serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_image_object_keys() {
        assert_eq!(photo_image_key("p1"), "photos/p1.jpg");
        assert_eq!(face_crop_key("f7"), "faces/f7.jpg");
        assert_eq!(known_face_image_key("Danil"), "known_faces/Danil.jpg");
    }

    #[test]
    fn test_client_errors_map_to_4xx() {
        assert_eq!(
            status_of(ApiError::Core(FaceSearchError::Decode("bad magic".into()))),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(ApiError::Core(FaceSearchError::InvalidThreshold(1.5))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApiError::NotFound("no image".into())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_integrity_and_storage_errors_map_to_5xx() {
        assert_eq!(
            status_of(ApiError::Core(FaceSearchError::DimensionMismatch {
                expected: 192,
                actual: 193,
            })),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(ApiError::Storage(anyhow!("connection refused"))),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_unreachable_store_renders_health_as_503() {
        assert_eq!(
            status_of(ApiError::Unavailable(anyhow!("connection refused"))),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
