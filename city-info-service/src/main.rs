use city_info_service::api_client::CityDataClient;
use city_info_service::config::Config;
use city_info_service::store::{InMemoryRecipeStore, RecipeStore};
use city_info_service::{AppState, create_router};
use common::http_client::HttpClient;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; the process environment still applies
    let dotenv = dotenvy::dotenv();

    let config = Config::from_env();
    common::tracing::init(config.log_format);

    if let Err(e) = dotenv {
        info!(reason = %e, "No .env file loaded");
    }
    if config.api_key.is_empty() {
        warn!("API_KEY is not set; upstream requests will likely be rejected");
    }

    let http_client = HttpClient::new(config.upstream_timeout_secs, config.upstream_max_retries)?;
    let client = Arc::new(CityDataClient::new(
        http_client,
        config.city_api_url.clone(),
        config.api_key.clone(),
    ));
    let store: Arc<dyn RecipeStore> = Arc::new(InMemoryRecipeStore::new());

    let app = create_router(AppState { client, store });

    let addr = SocketAddr::new(config.host, config.port);
    info!(upstream = %config.city_api_url, "City info service starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("City info service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT, starting graceful shutdown...");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown...");
        },
    }

    warn!("Shutting down gracefully...");
}
