//! Astro Oracle Gateway: sun-sign readings and one free question over HTTP/JSON.
//! Gemini when configured, templated fallback text otherwise.

mod error;
mod routes;

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;

use astro_oracle_core::{GeminiBridge, Oracle, OracleConfig, QuestionGate};
use routes::{build_app, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = OracleConfig::load();
    tracing::info!("[Startup] Astro Oracle v{}", astro_oracle_core::version());
    tracing::info!("[Startup] USE_GEMINI: {}", config.use_gemini);
    tracing::info!("[Startup] Gemini key present: {}", config.key_present());
    tracing::info!("[Startup] Gemini model: {}", config.gemini_model);
    tracing::info!("[Startup] .env path: {}", config.env_loaded_from.display());
    if config.use_gemini && !config.key_present() {
        tracing::warn!("[Startup] USE_GEMINI is on but GEMINI_API_KEY is empty; answers will use fallback text.");
    }

    let bridge = GeminiBridge::new(&config);
    let oracle = Oracle::new(Arc::new(bridge), QuestionGate::default());
    let port = config.port;
    let app = build_app(AppState {
        config: Arc::new(config),
        oracle: Arc::new(oracle),
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    tracing::info!("Astro Oracle listening on {}", addr);

    let server = axum::serve(listener, app).into_future();
    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown requested (Ctrl+C received)");
        }
    }
}
