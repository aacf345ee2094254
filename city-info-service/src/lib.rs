pub mod api_client;
pub mod config;
pub mod handlers;
pub mod openapi;
pub mod store;

use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use handlers::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/cities/{city_id}/infos", get(handlers::get_city_infos))
        .route("/cities/{city_id}/recipes", post(handlers::create_recipe))
        .route(
            "/cities/{city_id}/recipes/{recipe_id}",
            delete(handlers::delete_recipe),
        )
        .merge(openapi::swagger_ui())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
