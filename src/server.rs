use std::{net::SocketAddr, path::Path};

use anyhow::Context;
use axum::{middleware, Router};
use axum_extra::extract::cookie::Key;
use derivative::Derivative;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    decompression::RequestDecompressionLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use validator::Validate;

use crate::{
    error::ErrorVerbosity,
    middleware::{
        method_not_allowed::method_not_allowed, not_found::not_found,
        trace_headers::trace_headers, trace_response_body::trace_response_body,
    },
    password::PasswordHasher,
    route,
    state::ApiState,
    store::Store,
    utils::mask_fmt,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {err}")]
    Read {
        path: String,
        #[source]
        err: std::io::Error,
    },
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

#[derive(Derivative, Deserialize, Validate)]
#[derivative(Debug)]
pub struct ServerConfig {
    socket_address: SocketAddr,
    error_verbosity: ErrorVerbosity,
    /// E.g. `sqlite://db/library.sqlite`.
    #[validate(length(min = 1, message = "Must not be empty"))]
    database_url: String,
    /// Encrypts the session cookies.
    #[validate(length(min = 64, message = "Must be at least 64 bytes long"))]
    #[derivative(Debug(format_with = "mask_fmt"))]
    secret_key: String,
    /// Bcrypt cost factor of new password hashes.
    #[serde(default = "default_password_cost")]
    #[validate(range(min = 4, max = 31, message = "Must be between 4 and 31"))]
    password_cost: u32,
}

fn default_password_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl ServerConfig {
    pub async fn from_config_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|err| ConfigError::Read {
                path: path.display().to_string(),
                err,
            })?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = serde_yaml::from_str(content)?;

        config.validate()?;

        Ok(config)
    }

    pub fn with_socket_address(mut self, socket_address: SocketAddr) -> Self {
        self.socket_address = socket_address;
        self
    }
}

pub struct Server {
    config: ServerConfig,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let config = self.config;

        let store = Store::connect(&config.database_url)
            .await
            .context("Failed to open store")?;

        let cookie_key = Key::try_from(config.secret_key.as_bytes())
            .map_err(|err| anyhow::anyhow!("Invalid secret key: {err:?}"))?;

        let state = ApiState::new(
            config.error_verbosity,
            store,
            PasswordHasher::new(config.password_cost),
            cookie_key,
        );

        let app = app(state);

        tracing::info!(addr = %config.socket_address, "Starting server");

        let listener = TcpListener::bind(&config.socket_address)
            .await
            .context("Bind failed")?;

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

        Ok(())
    }
}

/// Builds the router with all routes and layers.
pub fn app(state: ApiState) -> Router {
    Router::new()
        .merge(route::catalog::app::app())
        .merge(route::auth::app::app())
        .merge(route::books::app::app())
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            method_not_allowed::<ApiState>,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            trace_response_body::<ApiState>,
        ))
        .layer(middleware::from_fn(trace_headers))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                        .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                        .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
                )
                .layer(RequestDecompressionLayer::new())
                .layer(CompressionLayer::new()),
        )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");

        tracing::info!("CTRL+C received");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM signal handler")
            .recv()
            .await;

        tracing::info!("SIGTERM received");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down");
}
