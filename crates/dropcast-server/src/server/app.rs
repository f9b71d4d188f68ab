use crate::config::ServerConfig;
use crate::server::{routes, AppState};
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use dropcast_classifiers::Model;
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Build the Axum application
pub fn build_app(state: AppState) -> Router {
    // CORS defaults to local origins; override only when configured.
    let cors = if state.config.cors_any_origin {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list([
                HeaderValue::from_static("http://localhost:5173"),
                HeaderValue::from_static("http://127.0.0.1:5173"),
            ]))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let api_routes = Router::new()
        .route("/health", get(routes::health))
        .route("/model", get(routes::model_info))
        .route("/schema", get(routes::schema))
        .route("/predict", post(routes::predict));

    Router::new()
        .nest("/api", api_routes)
        .route("/metrics", get(routes::render_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the server until a shutdown signal arrives
pub async fn run_server(
    config: ServerConfig,
    model: Arc<dyn Model>,
    metrics: Option<PrometheusHandle>,
) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.listen, config.port).parse()?;

    let mut state = AppState::new(model, config);
    if let Some(handle) = metrics {
        state = state.with_metrics(handle);
    }
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Dropcast listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            warn!("Shutdown signal received, stopping server...");
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
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
                warn!("Failed to install SIGTERM handler: {}", e);
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
}
