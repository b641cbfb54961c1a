use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::api::requests::TreatmentRequest;
use crate::api::{decode, parse_id};
use crate::database::models::{NewTreatment, Treatment};
use crate::handlers::utils::store_error;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

const INVALID_ID: &str = "invalid treatment ID";

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Treatment>> {
    let treatments = state
        .treatments
        .find_all()
        .await
        .map_err(store_error("failed to fetch treatments"))?;
    Ok(ApiResponse::success(treatments))
}

pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Treatment> {
    let id = parse_id(&id, INVALID_ID)?;
    let treatment = state
        .treatments
        .find_by_id(id)
        .await
        .map_err(store_error("failed to fetch treatment"))?;
    Ok(ApiResponse::success(treatment))
}

/// POST /api/v1/treatments - `{ "name": "rabies shot", "visit_id": 3 }`
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<TreatmentRequest>, JsonRejection>,
) -> ApiResult<Treatment> {
    let body = decode(payload)?;

    let treatment = state
        .treatments
        .create(NewTreatment {
            name: body.name,
            visit_id: body.visit_id,
        })
        .await
        .map_err(store_error("unable to save treatment"))?;

    Ok(ApiResponse::created(treatment))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TreatmentRequest>, JsonRejection>,
) -> ApiResult<Treatment> {
    let id = parse_id(&id, INVALID_ID)?;
    let body = decode(payload)?;

    let mut treatment = state
        .treatments
        .find_by_id(id)
        .await
        .map_err(store_error("failed to update treatment"))?;
    treatment.name = body.name;
    treatment.visit_id = body.visit_id;

    let treatment = state
        .treatments
        .update(&treatment)
        .await
        .map_err(store_error("failed to update treatment"))?;
    Ok(ApiResponse::success(treatment))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let id = parse_id(&id, INVALID_ID)?;
    state
        .treatments
        .delete(id)
        .await
        .map_err(store_error("failed to delete treatment"))?;
    Ok(ApiResponse::no_content())
}
