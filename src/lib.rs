pub mod config;
pub mod error;
pub mod gemini;
pub mod handlers;
pub mod server;
pub mod trace;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

use config::AppConfig;
use gemini::Gemini;
use server::{AppState, build_router, shutdown_signal};
use std::net::SocketAddr;
use trace::init_tracing;
use tracing::{error, info, warn};

pub async fn run() -> Result<(), BoxError> {
    init_tracing();

    let cfg = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            return Err(Box::new(e) as BoxError);
        }
    };

    if cfg.gemini.api_key.is_none() {
        // Not fatal: chat requests answer 500 until a key is configured.
        warn!("GEMINI_API_KEY is not set");
    }
    if cfg.gemini.log_payloads {
        info!("Payload logging enabled, message contents will be written to logs");
    }

    let app = build_router(AppState::new(Gemini::new(&cfg.gemini)));

    let addr = SocketAddr::new(cfg.host, cfg.port);
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Could not bind {}: {}", addr, e);
            return Err(Box::new(e) as BoxError);
        }
    };

    info!("Relay listening on http://{}", addr);
    info!("Registered endpoints: GET /health, POST /gpt/chat");

    let server = axum::serve(listener, app).with_graceful_shutdown(async {
        shutdown_signal().await;
        info!("Shutdown signal received (SIGINT/SIGTERM). Stopping server.");
    });

    if let Err(e) = server.await {
        error!("Axum server error: {}", e);
        return Err(Box::new(e) as BoxError);
    }

    info!("Relay shutdown complete.");
    Ok(())
}
