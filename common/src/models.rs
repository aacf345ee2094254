use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// A user-submitted tip attached to a city
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
pub struct Recipe {
    pub id: u64,
    pub content: String,
}

/// Recipe creation request, as documented. Handlers read the body as a raw
/// JSON value so shape problems are reported after the city lookup.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateRecipeRequest {
    #[serde(default)]
    pub content: Option<String>,
}

/// A single weather prediction, reduced to the fields this service exposes.
///
/// Values are passed through as the upstream sent them; a missing field
/// becomes `null`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
pub struct WeatherPrediction {
    #[serde(default)]
    #[schema(value_type = String)]
    pub when: Value,
    #[serde(default)]
    #[schema(value_type = f64)]
    pub min: Value,
    #[serde(default)]
    #[schema(value_type = f64)]
    pub max: Value,
}

/// Composite city information response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CityInfo {
    /// `[latitude, longitude]`
    #[schema(value_type = Vec<f64>)]
    pub coordinates: [Value; 2],
    #[schema(value_type = u64)]
    pub population: Value,
    #[schema(value_type = Vec<String>)]
    pub known_for: Value,
    pub weather_predictions: Vec<WeatherPrediction>,
    pub recipes: Vec<Recipe>,
}
