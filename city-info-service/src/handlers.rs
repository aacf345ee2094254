use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use common::errors::AppError;
use common::extract::JsonBody;
use common::models::{CityInfo, CreateRecipeRequest, Recipe};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api_client::CityDataClient;
use crate::store::RecipeStore;

/// Content bounds, measured in UTF-16 code units like a browser `length`.
pub const MIN_CONTENT_CHARS: usize = 10;
pub const MAX_CONTENT_CHARS: usize = 2000;

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<CityDataClient>,
    pub store: Arc<dyn RecipeStore>,
}

async fn ensure_city_exists(client: &CityDataClient, city_id: &str) -> Result<(), AppError> {
    if client.city_exists(city_id).await? {
        Ok(())
    } else {
        info!(city_id = %city_id, "City not found");
        Err(AppError::not_found("City not found"))
    }
}

/// Checks the `content` of a creation body, returning it when it can be stored.
fn validate_content(body: &Value) -> Result<String, AppError> {
    let content = match body.get("content") {
        None | Some(Value::Null) => return Err(AppError::validation("Content is required")),
        Some(Value::String(content)) if content.is_empty() => {
            return Err(AppError::validation("Content is required"));
        }
        Some(Value::String(content)) => content.clone(),
        Some(_) => return Err(AppError::validation("Content must be a string")),
    };

    let length = content.encode_utf16().count();
    if length < MIN_CONTENT_CHARS {
        return Err(AppError::validation(format!(
            "Content is too short (minimum {} characters)",
            MIN_CONTENT_CHARS
        )));
    }
    if length > MAX_CONTENT_CHARS {
        return Err(AppError::validation(format!(
            "Content is too long (maximum {} characters)",
            MAX_CONTENT_CHARS
        )));
    }

    Ok(content)
}

/// Reads a recipe id the way `parseInt(raw, 10)` does: leading whitespace and
/// an optional sign, then the longest run of digits; trailing text is ignored.
/// Returns `None` when no id can match, i.e. there are no digits or the value
/// is negative or out of range.
fn parse_recipe_id(raw: &str) -> Option<u64> {
    let trimmed = raw.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let id = unsigned[..digits_end].parse::<u64>().ok()?;

    if negative { None } else { Some(id) }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health check")
    )
)]
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "service": "city-info-service" }))
}

#[utoipa::path(
    get,
    path = "/cities/{city_id}/infos",
    params(
        ("city_id" = String, Path, description = "Upstream city identifier")
    ),
    responses(
        (status = 200, description = "City details, weather and recipes", body = CityInfo),
        (status = 404, description = "City not found"),
        (status = 500, description = "Upstream or internal failure")
    ),
    tag = "cities"
)]
pub async fn get_city_infos(
    State(state): State<AppState>,
    Path(city_id): Path<String>,
) -> Result<Json<CityInfo>, AppError> {
    info!(city_id = %city_id, "City info request received");

    ensure_city_exists(&state.client, &city_id).await?;

    let (insights, weather) = tokio::try_join!(
        state.client.get_insights(&city_id),
        state.client.get_city_weather(&city_id)
    )?;

    let city_weather = weather.ok_or_else(|| {
        AppError::internal(format!("Weather predictions missing for city {}", city_id))
    })?;

    let recipes = state.store.list(&city_id).await;
    info!(
        city_id = %city_id,
        predictions = city_weather.predictions.len(),
        recipes = recipes.len(),
        "City info assembled"
    );

    Ok(Json(CityInfo {
        coordinates: [
            insights.coordinates.latitude,
            insights.coordinates.longitude,
        ],
        population: insights.population,
        known_for: insights.known_for,
        weather_predictions: city_weather.predictions,
        recipes,
    }))
}

#[utoipa::path(
    post,
    path = "/cities/{city_id}/recipes",
    params(
        ("city_id" = String, Path, description = "Upstream city identifier")
    ),
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = Recipe),
        (status = 400, description = "Missing, too short or too long content, or malformed body"),
        (status = 404, description = "City not found"),
        (status = 500, description = "Upstream or internal failure")
    ),
    tag = "recipes"
)]
pub async fn create_recipe(
    State(state): State<AppState>,
    Path(city_id): Path<String>,
    JsonBody(payload): JsonBody,
) -> Result<(StatusCode, Json<Recipe>), AppError> {
    info!(city_id = %city_id, "Recipe creation request received");

    ensure_city_exists(&state.client, &city_id).await?;

    let content = validate_content(&payload).inspect_err(|e| {
        warn!(city_id = %city_id, reason = %e, "Recipe rejected");
    })?;

    let recipe = state.store.add(&city_id, content).await;
    info!(city_id = %city_id, recipe_id = recipe.id, "Recipe created");

    Ok((StatusCode::CREATED, Json(recipe)))
}

#[utoipa::path(
    delete,
    path = "/cities/{city_id}/recipes/{recipe_id}",
    params(
        ("city_id" = String, Path, description = "Upstream city identifier"),
        ("recipe_id" = String, Path, description = "Recipe id; leading digits are used, values without digits match nothing")
    ),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 404, description = "City or recipe not found"),
        (status = 500, description = "Upstream or internal failure")
    ),
    tag = "recipes"
)]
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path((city_id, recipe_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    info!(city_id = %city_id, recipe_id = %recipe_id, "Recipe deletion request received");

    ensure_city_exists(&state.client, &city_id).await?;

    let removed = match parse_recipe_id(&recipe_id) {
        Some(id) => state.store.remove(&city_id, id).await,
        None => false,
    };

    if !removed {
        info!(city_id = %city_id, recipe_id = %recipe_id, "Recipe not found");
        return Err(AppError::not_found("Recipe not found"));
    }

    info!(city_id = %city_id, recipe_id = %recipe_id, "Recipe deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body_with(content: String) -> Value {
        json!({ "content": content })
    }

    #[test]
    fn content_is_required() {
        for body in [json!({}), json!({ "content": null }), json!({ "content": "" }), json!([1])] {
            assert!(matches!(
                validate_content(&body),
                Err(AppError::ValidationError(_))
            ));
        }
    }

    #[test]
    fn non_string_content_is_rejected() {
        for content in [json!(12345678901_u64), json!(true), json!(["a long enough text"])] {
            assert!(matches!(
                validate_content(&json!({ "content": content })),
                Err(AppError::ValidationError(_))
            ));
        }
    }

    #[test]
    fn content_length_boundaries() {
        assert!(validate_content(&body_with("a".repeat(9))).is_err());
        assert!(validate_content(&body_with("a".repeat(10))).is_ok());
        assert!(validate_content(&body_with("a".repeat(2000))).is_ok());
        assert!(validate_content(&body_with("a".repeat(2001))).is_err());
    }

    #[test]
    fn length_counts_utf16_units() {
        // 10 units, 20 bytes
        let accented = "éééééééééé".to_string();
        assert_eq!(validate_content(&body_with(accented.clone())).ok(), Some(accented));

        // Each emoji is a surrogate pair
        assert!(validate_content(&body_with("😀".repeat(4))).is_err());
        assert!(validate_content(&body_with("😀".repeat(5))).is_ok());
        assert!(validate_content(&body_with("😀".repeat(1000))).is_ok());
        assert!(validate_content(&body_with("😀".repeat(1001))).is_err());
    }

    #[test]
    fn recipe_id_uses_leading_digits() {
        assert_eq!(parse_recipe_id("1"), Some(1));
        assert_eq!(parse_recipe_id("1abc"), Some(1));
        assert_eq!(parse_recipe_id("1.5"), Some(1));
        assert_eq!(parse_recipe_id("  42"), Some(42));
        assert_eq!(parse_recipe_id("+7"), Some(7));
        assert_eq!(parse_recipe_id("007"), Some(7));
    }

    #[test]
    fn recipe_id_without_digits_matches_nothing() {
        assert_eq!(parse_recipe_id("abc"), None);
        assert_eq!(parse_recipe_id(""), None);
        assert_eq!(parse_recipe_id("-"), None);
        assert_eq!(parse_recipe_id("-1"), None);
        assert_eq!(parse_recipe_id("a1"), None);
        assert_eq!(parse_recipe_id("99999999999999999999999"), None);
    }
}
