//! Application startup and lifecycle management.

use axum::{
    body::Body,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    catch_panic::catch_panic_layer,
    cors::cors_middleware,
    tracing::{http_request_span, request_id_middleware},
};
use service_core::upstream::{UpstreamClient, UpstreamClientConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

use crate::config::DietConfig;
use crate::handlers;
use crate::services::{ChatProvider, DeepSeekProvider, FoodDatabase, UsdaClient};

/// Shared application state.
///
/// Everything in here is immutable after startup; requests share nothing
/// mutable.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DietConfig>,
    pub chat: Arc<dyn ChatProvider>,
    pub foods: Arc<dyn FoodDatabase>,
}

impl AppState {
    /// Construct the outbound client and both upstream integrations.
    pub fn from_config(config: DietConfig) -> Result<Self, AppError> {
        let client = UpstreamClient::new(UpstreamClientConfig {
            timeout: config.upstream.timeout,
            user_agent: format!("diet-tracker-api/{}", env!("CARGO_PKG_VERSION")),
        })?;

        let chat: Arc<dyn ChatProvider> =
            Arc::new(DeepSeekProvider::new(client.clone(), config.deepseek.clone()));
        tracing::info!(
            model = %config.deepseek.model,
            base_url = %config.deepseek.base_url,
            "Initialized DeepSeek chat provider"
        );

        let foods: Arc<dyn FoodDatabase> = Arc::new(UsdaClient::new(client, config.usda.clone()));
        tracing::info!(base_url = %config.usda.base_url, "Initialized USDA food database");

        Ok(Self {
            config: Arc::new(config),
            chat,
            foods,
        })
    }
}

/// Build the request dispatcher.
///
/// `OPTIONS` is answered by the CORS layer before routing. Any method/path
/// pair without a handler, including the wrong method on a known path, gets
/// the plain-text default response.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/chat",
            post(handlers::chat::chat).fallback(handlers::default_response),
        )
        .route(
            "/api/search-food",
            post(handlers::food::search_food).fallback(handlers::default_response),
        )
        .route(
            "/api/food-details",
            post(handlers::food::food_details).fallback(handlers::default_response),
        )
        .route(
            "/health",
            get(handlers::health_check).fallback(handlers::default_response),
        )
        .fallback(handlers::default_response)
        .layer(catch_panic_layer())
        .layer(TraceLayer::new_for_http().make_span_with(http_request_span::<Body>))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(cors_middleware))
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: DietConfig) -> Result<Self, AppError> {
        let addr: SocketAddr = format!("{}:{}", config.common.host, config.common.port)
            .parse()
            .map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!(
                    "Invalid listen address {}:{}: {}",
                    config.common.host,
                    config.common.port,
                    e
                ))
            })?;

        let state = AppState::from_config(config)?;
        let router = build_router(state);

        // Port 0 = random port for testing
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Diet tracker API listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until Ctrl-C or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }
}
