//! USDA FoodData Central client.
//!
//! The key travels as the `api_key` query parameter on every call.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;
use service_core::upstream::{UpstreamClient, UpstreamError};

use super::FoodDatabase;
use crate::config::UsdaConfig;
use crate::models::{Food, FoodSearchResponse, FoodSummary, Nutrient};

// FoodData Central nutrient numbers
const ENERGY_KCAL: u64 = 1008;
const PROTEIN: u64 = 1003;
const CARBOHYDRATE: u64 = 1005;
const TOTAL_FAT: u64 = 1004;
const FIBER: u64 = 1079;
const SODIUM: u64 = 1093;

/// FoodData Central reports nutrients per 100 g.
const SERVING_SIZE: &str = "100g";

pub struct UsdaClient {
    client: UpstreamClient,
    config: UsdaConfig,
}

impl UsdaClient {
    pub fn new(client: UpstreamClient, config: UsdaConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl FoodDatabase for UsdaClient {
    async fn search_foods(
        &self,
        query: &str,
        page_size: u32,
    ) -> Result<FoodSearchResponse, UpstreamError> {
        let url = format!("{}/foods/search", self.config.base_url);
        let page_size = page_size.to_string();

        tracing::debug!(query = %query, page_size = %page_size, "Searching FoodData Central");

        let response: SearchResponse = self
            .client
            .get_json(
                &url,
                &[
                    ("query", query),
                    ("pageSize", page_size.as_str()),
                    ("api_key", self.config.api_key.expose_secret().as_str()),
                ],
            )
            .await?;

        Ok(reshape_search(response))
    }

    async fn food_details(&self, fdc_id: u64) -> Result<FoodSummary, UpstreamError> {
        let url = format!("{}/food/{}", self.config.base_url, fdc_id);

        tracing::debug!(fdc_id, "Fetching food details from FoodData Central");

        let food: FoodDetail = self
            .client
            .get_json(
                &url,
                &[("api_key", self.config.api_key.expose_secret().as_str())],
            )
            .await?;

        Ok(summarize(food))
    }
}

fn reshape_search(response: SearchResponse) -> FoodSearchResponse {
    let foods = response
        .foods
        .into_iter()
        .map(|food| Food {
            fdc_id: food.fdc_id,
            description: food.description,
            brand_owner: food.brand_owner,
            ingredients: food.ingredients,
            nutrients: food
                .food_nutrients
                .into_iter()
                .filter_map(|n| {
                    Some(Nutrient {
                        nutrient_id: n.nutrient_id?,
                        nutrient_name: n.nutrient_name.unwrap_or_default(),
                        value: n.value.unwrap_or(0.0),
                        unit_name: n.unit_name.unwrap_or_default(),
                    })
                })
                .collect(),
        })
        .collect();

    FoodSearchResponse { foods }
}

fn summarize(food: FoodDetail) -> FoodSummary {
    let amount = |id: u64| {
        food.food_nutrients
            .iter()
            .find(|n| n.nutrient.as_ref().and_then(|d| d.id) == Some(id))
            .and_then(|n| n.amount)
            .unwrap_or(0.0)
    };

    FoodSummary {
        calories: amount(ENERGY_KCAL),
        protein: amount(PROTEIN),
        carbs: amount(CARBOHYDRATE),
        fat: amount(TOTAL_FAT),
        fiber: amount(FIBER),
        sodium: amount(SODIUM),
        serving_size: SERVING_SIZE.to_string(),
        description: food.description,
    }
}

// FoodData Central API types

#[derive(Debug, Deserialize)]
struct SearchResponse {
    foods: Vec<SearchFood>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchFood {
    fdc_id: u64,
    #[serde(default)]
    description: String,
    brand_owner: Option<String>,
    ingredients: Option<String>,
    #[serde(default)]
    food_nutrients: Vec<SearchNutrient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchNutrient {
    nutrient_id: Option<u64>,
    nutrient_name: Option<String>,
    unit_name: Option<String>,
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FoodDetail {
    #[serde(default)]
    description: String,
    #[serde(default)]
    food_nutrients: Vec<DetailNutrient>,
}

#[derive(Debug, Deserialize)]
struct DetailNutrient {
    nutrient: Option<NutrientDefinition>,
    amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct NutrientDefinition {
    id: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;
    use serde_json::json;
    use service_core::upstream::UpstreamClientConfig;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base_url: String) -> UsdaClient {
        UsdaClient::new(
            UpstreamClient::new(UpstreamClientConfig::default()).unwrap(),
            UsdaConfig {
                api_key: Secret::new("usda-key".to_string()),
                base_url,
            },
        )
    }

    #[test]
    fn search_reshape_defaults_missing_values() {
        let raw: SearchResponse = serde_json::from_value(json!({
            "totalHits": 2,
            "foods": [
                {
                    "fdcId": 1102653,
                    "description": "Banana, raw",
                    "dataType": "Survey (FNDDS)",
                    "foodNutrients": [
                        { "nutrientId": 1008, "nutrientName": "Energy", "unitName": "KCAL", "value": 89.0 },
                        { "nutrientId": 1003, "nutrientName": "Protein", "unitName": "G" },
                        { "nutrientName": "orphan without id", "value": 1.0 }
                    ]
                },
                {
                    "fdcId": 2,
                    "description": "Banana chips",
                    "brandOwner": "Snack Co",
                    "ingredients": "BANANAS, OIL"
                }
            ]
        }))
        .unwrap();

        let shaped = reshape_search(raw);

        assert_eq!(shaped.foods.len(), 2);
        let banana = &shaped.foods[0];
        assert_eq!(banana.fdc_id, 1102653);
        assert_eq!(banana.brand_owner, None);
        assert_eq!(banana.nutrients.len(), 2);
        assert_eq!(banana.nutrients[0].value, 89.0);
        assert_eq!(banana.nutrients[1].value, 0.0);

        let chips = &shaped.foods[1];
        assert_eq!(chips.brand_owner.as_deref(), Some("Snack Co"));
        assert!(chips.nutrients.is_empty());
    }

    #[test]
    fn search_without_foods_is_rejected() {
        let parsed = serde_json::from_value::<SearchResponse>(json!({ "totalHits": 0 }));
        assert!(parsed.is_err());
    }

    #[test]
    fn summary_picks_headline_nutrients() {
        let raw: FoodDetail = serde_json::from_value(json!({
            "description": "Apples, raw",
            "foodNutrients": [
                { "nutrient": { "id": 1008, "name": "Energy" }, "amount": 52.0 },
                { "nutrient": { "id": 1003, "name": "Protein" }, "amount": 0.26 },
                { "nutrient": { "id": 1005 }, "amount": 13.8 },
                { "nutrient": { "id": 1004 }, "amount": 0.17 },
                { "nutrient": { "id": 1079 }, "amount": 2.4 },
                { "nutrient": { "id": 9999 }, "amount": 123.0 }
            ]
        }))
        .unwrap();

        let summary = summarize(raw);

        assert_eq!(summary.description, "Apples, raw");
        assert_eq!(summary.calories, 52.0);
        assert_eq!(summary.protein, 0.26);
        assert_eq!(summary.carbs, 13.8);
        assert_eq!(summary.fat, 0.17);
        assert_eq!(summary.fiber, 2.4);
        assert_eq!(summary.sodium, 0.0);
        assert_eq!(summary.serving_size, "100g");
    }

    #[tokio::test]
    async fn search_sends_query_page_size_and_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/foods/search"))
            .and(query_param("query", "banana"))
            .and(query_param("pageSize", "10"))
            .and(query_param("api_key", "usda-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "foods": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let result = client(server.uri()).search_foods("banana", 10).await.unwrap();
        assert!(result.foods.is_empty());
    }

    #[tokio::test]
    async fn details_hits_food_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/food/171688"))
            .and(query_param("api_key", "usda-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "description": "Apples, raw, with skin",
                "foodNutrients": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let summary = client(server.uri()).food_details(171688).await.unwrap();
        assert_eq!(summary.description, "Apples, raw, with skin");
        assert_eq!(summary.calories, 0.0);
    }
}
