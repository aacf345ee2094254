use common::errors::AppError;
use common::http_client::HttpClient;
use common::models::WeatherPrediction;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

const WEATHER_CONTEXT: &str = "Failed to fetch weather predictions";

#[derive(Debug, Deserialize)]
pub struct Coordinates {
    #[serde(default)]
    pub latitude: Value,
    #[serde(default)]
    pub longitude: Value,
}

/// City details. Only `coordinates` is structurally required; the other
/// fields are forwarded untouched.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityInsights {
    #[serde(default)]
    pub population: Value,
    #[serde(default)]
    pub known_for: Value,
    pub coordinates: Coordinates,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityWeather {
    pub city_id: String,
    pub predictions: Vec<WeatherPrediction>,
}

fn string_field<'a>(entry: &'a Value, key: &str) -> Option<&'a str> {
    entry.get(key).and_then(Value::as_str)
}

/// Client for the upstream City Data API
pub struct CityDataClient {
    http_client: HttpClient,
    base_url: String,
    api_key: String,
}

impl CityDataClient {
    pub fn new(http_client: HttpClient, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    async fn get<T>(&self, path: &str) -> Result<T, AppError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        self.http_client
            .get_json(&url, &[("apiKey", self.api_key.as_str())])
            .await
    }

    #[instrument(skip(self))]
    pub async fn list_cities(&self) -> Result<Vec<Value>, AppError> {
        let cities: Vec<Value> = self
            .get("/cities")
            .await
            .map_err(|e| AppError::upstream("Failed to verify city existence", e))?;

        info!(count = cities.len(), "Fetched city list");
        Ok(cities)
    }

    /// Whether the upstream knows `city_id`. Errors when the list itself
    /// cannot be fetched.
    #[instrument(skip(self), fields(city_id = %city_id))]
    pub async fn city_exists(&self, city_id: &str) -> Result<bool, AppError> {
        let cities = self.list_cities().await?;
        let exists = cities
            .iter()
            .any(|city| string_field(city, "id") == Some(city_id));

        info!(city_id = %city_id, exists, "City existence checked");
        Ok(exists)
    }

    #[instrument(skip(self), fields(city_id = %city_id))]
    pub async fn get_insights(&self, city_id: &str) -> Result<CityInsights, AppError> {
        let path = format!("/cities/{}/insights", urlencoding::encode(city_id));

        self.get(&path)
            .await
            .map_err(|e| AppError::upstream("Failed to fetch city insights", e))
    }

    /// Weather for `city_id`, or `None` when the upstream has no entry for it.
    ///
    /// Entries for other cities are not decoded, so a malformed neighbour
    /// cannot fail this lookup.
    #[instrument(skip(self), fields(city_id = %city_id))]
    pub async fn get_city_weather(&self, city_id: &str) -> Result<Option<CityWeather>, AppError> {
        let entries: Vec<Value> = self
            .get("/weather-predictions")
            .await
            .map_err(|e| AppError::upstream(WEATHER_CONTEXT, e))?;

        let Some(entry) = entries
            .into_iter()
            .find(|entry| string_field(entry, "cityId") == Some(city_id))
        else {
            warn!(city_id = %city_id, "No weather entry for city");
            return Ok(None);
        };

        let weather: CityWeather = serde_json::from_value(entry)
            .map_err(|e| AppError::upstream(WEATHER_CONTEXT, e.into()))?;

        Ok(Some(weather))
    }
}
