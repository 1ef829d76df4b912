pub mod chat;
pub mod food;

pub use chat::{ChatRequest, ChatResponse, TokenUsage};
pub use food::{
    Food, FoodDetailsRequest, FoodDetailsResponse, FoodSearchResponse, FoodSummary, Nutrient,
    SearchFoodRequest,
};
