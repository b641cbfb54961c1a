use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};

use crate::api::requests::{VisitFilter, VisitRequest};
use crate::api::{decode, parse_id};
use crate::database::models::{NewVisit, Treatment, Visit};
use crate::error::ApiError;
use crate::handlers::utils::store_error;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

const INVALID_ID: &str = "invalid visit ID";

/// GET /api/v1/visits
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Visit>> {
    let visits = state.visits.find_all().await.map_err(store_error("failed to fetch visits"))?;
    Ok(ApiResponse::success(visits))
}

/// GET /api/v1/visits/:id
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Visit> {
    let id = parse_id(&id, INVALID_ID)?;
    let visit = state.visits.find_by_id(id).await.map_err(store_error("failed to fetch visit"))?;
    Ok(ApiResponse::success(visit))
}

/// POST /api/v1/visits - Record a visit for a cat
///
/// Expected Input:
/// ```json
/// { "date": "2024-03-01T10:00:00Z", "motif": "vaccination", "veterinaire": "Dr. Vega", "cat_id": 1 }
/// ```
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<VisitRequest>, JsonRejection>,
) -> ApiResult<Visit> {
    let body = decode(payload)?;

    let visit = state
        .visits
        .create(NewVisit {
            date: body.date,
            motif: body.motif,
            veterinaire: body.veterinaire,
            cat_id: body.cat_id,
        })
        .await
        .map_err(store_error("unable to save visit"))?;

    Ok(ApiResponse::created(visit))
}

/// PUT /api/v1/visits/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<VisitRequest>, JsonRejection>,
) -> ApiResult<Visit> {
    let id = parse_id(&id, INVALID_ID)?;
    let body = decode(payload)?;

    let mut visit = state.visits.find_by_id(id).await.map_err(store_error("failed to update visit"))?;
    visit.date = body.date;
    visit.motif = body.motif;
    visit.veterinaire = body.veterinaire;
    visit.cat_id = Some(body.cat_id);

    let visit = state.visits.update(&visit).await.map_err(store_error("failed to update visit"))?;
    Ok(ApiResponse::success(visit))
}

/// DELETE /api/v1/visits/:id - Soft-delete; the visit's treatments are removed
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let id = parse_id(&id, INVALID_ID)?;
    state.visits.delete(id).await.map_err(store_error("failed to delete visit"))?;
    Ok(ApiResponse::no_content())
}

/// GET /api/v1/visits/filter?motif=&veterinaire= - Equality filters, both optional
pub async fn filter(
    State(state): State<AppState>,
    query: Result<Query<VisitFilter>, QueryRejection>,
) -> ApiResult<Vec<Visit>> {
    let Query(filter) = query.map_err(|rejection| {
        tracing::debug!("Rejected visit filter: {}", rejection.body_text());
        ApiError::bad_request("invalid query parameters")
    })?;
    let visits = state
        .visits
        .filter_by_motif_or_veterinaire(&filter.motif, &filter.veterinaire)
        .await
        .map_err(store_error("failed to filter visits"))?;
    Ok(ApiResponse::success(visits))
}

/// GET /api/v1/visits/:id/treatments
pub async fn treatments(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Vec<Treatment>> {
    let id = parse_id(&id, INVALID_ID)?;
    let treatments = state
        .treatments
        .find_by_visit_id(id)
        .await
        .map_err(store_error("failed to fetch treatments for the visit"))?;
    Ok(ApiResponse::success(treatments))
}
