use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::api::requests::CatRequest;
use crate::api::responses::CatHistory;
use crate::api::{decode, parse_id};
use crate::database::models::{Cat, NewCat, Visit};
use crate::handlers::utils::store_error;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

const INVALID_ID: &str = "invalid cat ID";

/// GET /api/v1/cats
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Cat>> {
    let cats = state.cats.find_all().await.map_err(store_error("failed to fetch cats"))?;
    Ok(ApiResponse::success(cats))
}

/// GET /api/v1/cats/:id
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Cat> {
    let id = parse_id(&id, INVALID_ID)?;
    let cat = state.cats.find_by_id(id).await.map_err(store_error("failed to fetch cat"))?;
    Ok(ApiResponse::success(cat))
}

/// POST /api/v1/cats - Register a cat
///
/// Expected Input:
/// ```json
/// { "name": "Milo", "age": 2, "breed": "Tabby", "weight": 4.0 }
/// ```
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CatRequest>, JsonRejection>,
) -> ApiResult<Cat> {
    let body = decode(payload)?;

    let cat = state
        .cats
        .create(NewCat {
            name: body.name,
            age: body.age,
            breed: body.breed,
            weight: body.weight,
        })
        .await
        .map_err(store_error("unable to save cat"))?;

    Ok(ApiResponse::created(cat))
}

/// PUT /api/v1/cats/:id - Overwrite name, age, breed and weight
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CatRequest>, JsonRejection>,
) -> ApiResult<Cat> {
    let id = parse_id(&id, INVALID_ID)?;
    let body = decode(payload)?;

    let mut cat = state.cats.find_by_id(id).await.map_err(store_error("failed to update cat"))?;
    cat.name = body.name;
    cat.age = body.age;
    cat.breed = body.breed;
    cat.weight = body.weight;

    let cat = state.cats.update(&cat).await.map_err(store_error("failed to update cat"))?;
    Ok(ApiResponse::success(cat))
}

/// DELETE /api/v1/cats/:id - Soft-delete; the cat's visits are kept but detached
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let id = parse_id(&id, INVALID_ID)?;
    state.cats.delete(id).await.map_err(store_error("failed to delete cat"))?;
    Ok(ApiResponse::no_content())
}

/// GET /api/v1/cats/:id/history - The cat with every visit and its treatments
///
/// Expected Output:
/// ```json
/// { "cat": { "id": 1, "name": "Milo", ... }, "visits": [ { "id": 3, ..., "treatments": [] } ] }
/// ```
pub async fn history(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<CatHistory> {
    let id = parse_id(&id, INVALID_ID)?;
    let cat = state.cats.find_by_id(id).await.map_err(store_error("failed to fetch cat history"))?;
    let visits = state
        .cats
        .cat_history(id)
        .await
        .map_err(store_error("failed to fetch cat history"))?;

    Ok(ApiResponse::success(CatHistory { cat, visits }))
}

/// GET /api/v1/cats/:id/visits
pub async fn visits(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Vec<Visit>> {
    let id = parse_id(&id, INVALID_ID)?;
    let visits = state
        .visits
        .find_by_cat_id(id)
        .await
        .map_err(store_error("failed to fetch visits for cat"))?;
    Ok(ApiResponse::success(visits))
}
