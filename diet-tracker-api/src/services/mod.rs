pub mod nutrition;
pub mod providers;

pub use nutrition::{usda::UsdaClient, FoodDatabase};
pub use providers::{deepseek::DeepSeekProvider, ChatCompletion, ChatProvider};
