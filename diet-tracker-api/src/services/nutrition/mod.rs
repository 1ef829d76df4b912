//! Nutrition database abstraction.

pub mod usda;

use async_trait::async_trait;
use service_core::upstream::UpstreamError;

use crate::models::{FoodSearchResponse, FoodSummary};

#[async_trait]
pub trait FoodDatabase: Send + Sync {
    /// Full-text food search, reshaped to [`FoodSearchResponse`].
    async fn search_foods(
        &self,
        query: &str,
        page_size: u32,
    ) -> Result<FoodSearchResponse, UpstreamError>;

    /// Headline nutrients for one food.
    async fn food_details(&self, fdc_id: u64) -> Result<FoodSummary, UpstreamError>;
}
