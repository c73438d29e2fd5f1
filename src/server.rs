use crate::{gemini::Gemini, handlers};
use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub gemini: Arc<Gemini>,
}

impl AppState {
    pub fn new(gemini: Gemini) -> Self {
        AppState {
            gemini: Arc::new(gemini),
        }
    }
}

pub async fn health_handler() -> axum::Json<serde_json::Value> {
    axum::Json(json!({ "status": "ok" }))
}

async fn log_request(req: Request, next: Next) -> Response {
    info!("Request: {} {}", req.method(), req.uri().path());
    next.run(req).await
}

/// Build the main router: the chat relay plus /health, open to any origin.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/gpt/chat", post(handlers::chat))
        .with_state(state)
        .layer(cors)
        .layer(middleware::from_fn(log_request))
}

/// Resolves on SIGINT, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to listen for ctrl_c: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        let mut term_stream =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(err) => {
                    error!("Failed to register SIGTERM handler: {}", err);
                    ctrl.await;
                    return;
                }
            };

        tokio::select! {
            _ = ctrl => {},
            _ = term_stream.recv() => {},
        }
    }
    #[cfg(not(unix))]
    {
        ctrl.await;
    }
}
