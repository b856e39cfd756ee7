use std::net::{IpAddr, SocketAddr};
use axum::http::HeaderValue;
use thiserror::Error;
use tokio::net::lookup_host;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
    #[error("cannot resolve bind address {host}:{port}: {reason}")]
    Unresolved { host: String, port: u16, reason: String },
}

/// Which browser origins may call the API.
#[derive(Debug, Clone, PartialEq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

/// Process-wide settings, read once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub api_base: String,
    // IP literal or hostname, resolved when the listener is bound
    pub host: String,
    pub port: u16,
    pub cors_origins: CorsOrigins,
}

impl Config {

    pub fn from_env() -> Result<Self, ConfigError> {

        // a missing .env file is fine, the real environment still applies
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())

    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {

        // blank values are treated the same as unset ones
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let openai_api_key = read("OPENAI_API_KEY");

        let api_base = read("OPENAI_API_BASE")
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let host = match read("HOST") {
            Some(value) if value.chars().any(char::is_whitespace) => {
                return Err(ConfigError::Invalid { key: "HOST", value });
            }
            Some(value) => value,
            None => DEFAULT_HOST.to_string(),
        };

        let port = match read("PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid { key: "PORT", value })?,
            None => DEFAULT_PORT,
        };

        let cors_origins = match read("CORS_ALLOWED_ORIGINS") {
            Some(value) => parse_origins(&value)?,
            None => CorsOrigins::Any,
        };

        Ok(Config {
            openai_api_key,
            api_base,
            host,
            port,
            cors_origins,
        })

    }

    /// Resolves `HOST` (an IP literal or a hostname such as `localhost`)
    /// to the first address the listener can bind.
    pub async fn resolve_bind_addr(&self) -> Result<SocketAddr, ConfigError> {

        let unresolved = |reason: String| ConfigError::Unresolved {
            host: self.host.clone(),
            port: self.port,
            reason,
        };

        if let Ok(ip) = self.host.parse::<IpAddr>() {
            return Ok(SocketAddr::new(ip, self.port));
        }

        lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(|e| unresolved(e.to_string()))?
            .next()
            .ok_or_else(|| unresolved("no addresses found".to_string()))

    }

    /// Builds the CORS layer. The wildcard is never mixed with explicit
    /// origins, and credentials are only allowed for an explicit list.
    pub fn cors_layer(&self) -> CorsLayer {

        match &self.cors_origins {
            CorsOrigins::Any => CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
            CorsOrigins::List(origins) => {
                let origins: Vec<HeaderValue> = origins
                    .iter()
                    .filter_map(|origin| HeaderValue::from_str(origin).ok())
                    .collect();

                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods(AllowMethods::mirror_request())
                    .allow_headers(AllowHeaders::mirror_request())
                    .allow_credentials(true)
            }
        }

    }

}

fn parse_origins(value: &str) -> Result<CorsOrigins, ConfigError> {

    let origins: Vec<String> = value
        .split(',')
        .map(|origin| origin.trim().trim_end_matches('/').to_string())
        .filter(|origin| !origin.is_empty())
        .collect();

    if origins.iter().any(|origin| origin == "*") {
        return Ok(CorsOrigins::Any);
    }

    for origin in &origins {
        if HeaderValue::from_str(origin).is_err() || !origin.contains("://") {
            return Err(ConfigError::Invalid {
                key: "CORS_ALLOWED_ORIGINS",
                value: origin.clone(),
            });
        }
    }

    if origins.is_empty() {
        return Ok(CorsOrigins::Any);
    }

    Ok(CorsOrigins::List(origins))

}
