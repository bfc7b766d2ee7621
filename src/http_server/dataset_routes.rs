//! Dataset HTTP Routes
//!
//! Endpoints for dataset management and queries. Successful responses are
//! `{"result": ...}`, failures are `{"error": "..."}`.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::dataset::{DatasetInfo, DatasetKind};
use crate::facade::{InsightError, InsightFacade};

// ==================
// Shared State
// ==================

/// Dataset state shared across handlers; one facade call at a time
pub struct DatasetState {
    pub facade: Mutex<InsightFacade>,
}

impl DatasetState {
    pub fn new(facade: InsightFacade) -> Self {
        Self {
            facade: Mutex::new(facade),
        }
    }
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct ResultResponse<T: Serialize> {
    pub result: T,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error with the status it is reported under
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<InsightError> for ApiError {
    fn from(e: InsightError) -> Self {
        let status = match e {
            InsightError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

type ApiResult<T> = Result<Json<ResultResponse<T>>, ApiError>;

fn ok<T: Serialize>(result: T) -> ApiResult<T> {
    Ok(Json(ResultResponse { result }))
}

// ==================
// Dataset Routes
// ==================

/// Create dataset routes
pub fn dataset_routes(state: Arc<DatasetState>) -> Router {
    Router::new()
        .route("/datasets", get(list_datasets_handler))
        .route("/dataset/:id/:kind", put(add_dataset_handler))
        .route("/dataset/:id", delete(remove_dataset_handler))
        .route("/query", post(query_handler))
        .route("/echo/:msg", get(echo_handler))
        .with_state(state)
}

// ==================
// Handlers
// ==================

async fn list_datasets_handler(
    State(state): State<Arc<DatasetState>>,
) -> ApiResult<Vec<DatasetInfo>> {
    let facade = state.facade.lock().await;
    ok(facade.list_datasets())
}

async fn add_dataset_handler(
    State(state): State<Arc<DatasetState>>,
    Path((id, kind)): Path<(String, String)>,
    body: Bytes,
) -> ApiResult<Vec<String>> {
    let kind: DatasetKind = kind.parse().map_err(ApiError::bad_request)?;
    let mut facade = state.facade.lock().await;
    ok(facade.add_dataset(&id, &body, kind)?)
}

async fn remove_dataset_handler(
    State(state): State<Arc<DatasetState>>,
    Path(id): Path<String>,
) -> ApiResult<String> {
    let mut facade = state.facade.lock().await;
    ok(facade.remove_dataset(&id)?)
}

async fn query_handler(
    State(state): State<Arc<DatasetState>>,
    body: Bytes,
) -> ApiResult<Vec<Value>> {
    let query: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("Query is not valid JSON: {}", e)))?;
    let facade = state.facade.lock().await;
    ok(facade.perform_query(&query)?)
}

async fn echo_handler(Path(msg): Path<String>) -> ApiResult<String> {
    ok(format!("{}...{}", msg, msg))
}
