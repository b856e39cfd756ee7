mod client;
mod config;
mod docs;
mod error;
mod handlers;
mod models;
#[cfg(test)]
mod test_support;

use std::process::ExitCode;
use std::sync::Arc;
use axum::{routing::{get, post, Router}};
use reqwest::Client;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use client::{ChatProvider, OpenAiClient};
use config::Config;

// shared with every handler; the provider wraps one pooled http client
// and the key is fixed for the life of the process
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn ChatProvider>,
    pub api_key: Option<String>,
}

pub fn app(state: AppState, config: &Config) -> Router {

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/query", post(handlers::query_handler))
        .route("/docs", get(docs::docs_page))
        .route("/openapi.json", get(docs::openapi_spec))
        .layer(TraceLayer::new_for_http())
        .layer(config.cors_layer())
        .with_state(state)

}

#[tokio::main]
async fn main() -> ExitCode {

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }

}

async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {

    let config = Config::from_env()?;

    if config.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY is not set, queries will fail until it is configured");
    }

    let provider = OpenAiClient::new(Client::new(), config.api_base.clone());

    let state = AppState {
        provider: Arc::new(provider),
        api_key: config.openai_api_key.clone(),
    };

    let app = app(state, &config);

    let addr = config.resolve_bind_addr().await?;
    let listener = TcpListener::bind(addr).await?;
    info!("listening on {}", listener.local_addr()?);
    info!("forwarding queries to {}", config.api_base);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())

}

async fn shutdown_signal() {

    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("failed to listen for SIGTERM: {}", e);
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

    info!("shutdown signal received");

}
