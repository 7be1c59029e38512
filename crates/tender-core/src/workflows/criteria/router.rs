use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::domain::TenderCriteriaRequest;
use super::identifier::IdGenerator;
use super::repository::{CriteriaRepository, RepositoryError};
use super::service::{CriteriaServiceError, TenderCriteriaService};

/// Router builder exposing HTTP endpoints for criteria validation, creation,
/// and retrieval.
pub fn criteria_router<R, G>(service: Arc<TenderCriteriaService<R, G>>) -> Router
where
    R: CriteriaRepository + 'static,
    G: IdGenerator + 'static,
{
    Router::new()
        .route(
            "/api/v1/tenders/criteria/validation",
            post(validate_handler::<R, G>),
        )
        .route(
            "/api/v1/tenders/:ocid/criteria",
            post(create_handler::<R, G>).get(fetch_handler::<R, G>),
        )
        .with_state(service)
}

pub(crate) async fn validate_handler<R, G>(
    State(service): State<Arc<TenderCriteriaService<R, G>>>,
    axum::Json(request): axum::Json<TenderCriteriaRequest>,
) -> Response
where
    R: CriteriaRepository + 'static,
    G: IdGenerator + 'static,
{
    match service.validate(&request) {
        Ok(()) => {
            let payload = json!({ "status": "valid" });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(CriteriaServiceError::Validation(violation)) => {
            let payload = json!({ "error": violation.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn create_handler<R, G>(
    State(service): State<Arc<TenderCriteriaService<R, G>>>,
    Path(ocid): Path<String>,
    axum::Json(request): axum::Json<TenderCriteriaRequest>,
) -> Response
where
    R: CriteriaRepository + 'static,
    G: IdGenerator + 'static,
{
    match service.create(ocid, request) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(CriteriaServiceError::Validation(violation)) => {
            let payload = json!({ "error": violation.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(CriteriaServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({ "error": "criteria already created for this tender" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn fetch_handler<R, G>(
    State(service): State<Arc<TenderCriteriaService<R, G>>>,
    Path(ocid): Path<String>,
) -> Response
where
    R: CriteriaRepository + 'static,
    G: IdGenerator + 'static,
{
    match service.get(&ocid) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(CriteriaServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({ "error": "tender criteria not found", "ocid": ocid });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
