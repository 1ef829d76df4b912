use axum::{extract::State, Json};
use service_core::error::AppError;
use service_core::utils::ValidatedJson;

use crate::models::{FoodDetailsRequest, FoodDetailsResponse, FoodSearchResponse, SearchFoodRequest};
use crate::startup::AppState;

/// Results requested per search.
pub const SEARCH_PAGE_SIZE: u32 = 10;

#[tracing::instrument(skip(state, request))]
pub async fn search_food(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SearchFoodRequest>,
) -> Result<Json<FoodSearchResponse>, AppError> {
    tracing::info!(query = %request.query, "Searching foods");

    let result = state
        .foods
        .search_foods(&request.query, SEARCH_PAGE_SIZE)
        .await?;

    tracing::debug!(count = result.foods.len(), "Food search completed");

    Ok(Json(result))
}

#[tracing::instrument(skip(state, request))]
pub async fn food_details(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<FoodDetailsRequest>,
) -> Result<Json<FoodDetailsResponse>, AppError> {
    tracing::info!(fdc_id = request.fdc_id, "Fetching food details");

    let food = state.foods.food_details(request.fdc_id).await?;

    Ok(Json(FoodDetailsResponse { food }))
}
