//! Food lookup request/response shapes.
//!
//! Search results are a reshaped subset of the FoodData Central payload, not
//! a passthrough; field names follow the upstream camelCase convention.

use serde::{Deserialize, Serialize};
use service_core::utils::not_blank;
use validator::Validate;

/// Body of `POST /api/search-food`.
#[derive(Debug, Deserialize, Validate)]
pub struct SearchFoodRequest {
    #[validate(custom(function = "not_blank"))]
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodSearchResponse {
    pub foods: Vec<Food>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    pub fdc_id: u64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<String>,
    pub nutrients: Vec<Nutrient>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nutrient {
    pub nutrient_id: u64,
    pub nutrient_name: String,
    pub value: f64,
    pub unit_name: String,
}

/// Body of `POST /api/food-details`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FoodDetailsRequest {
    #[validate(range(min = 1, message = "fdcId must be a positive integer"))]
    pub fdc_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodDetailsResponse {
    pub food: FoodSummary,
}

/// Headline nutrients per 100 g serving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodSummary {
    pub description: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub sodium: f64,
    pub serving_size: String,
}
