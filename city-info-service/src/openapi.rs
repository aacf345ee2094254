use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use common::models::{CityInfo, CreateRecipeRequest, Recipe, WeatherPrediction};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::get_city_infos,
        handlers::create_recipe,
        handlers::delete_recipe,
    ),
    components(schemas(
        CityInfo,
        WeatherPrediction,
        Recipe,
        CreateRecipeRequest,
    )),
    tags(
        (name = "cities", description = "Aggregated city information"),
        (name = "recipes", description = "User-contributed recipes per city"),
    ),
)]
struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
