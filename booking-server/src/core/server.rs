//! Server Implementation
//!
//! HTTP server startup and lifecycle management.

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;

use crate::core::{BackgroundTasks, Config, ServerState, TaskKind};
use crate::reservations::expiry::HoldExpiryWorker;
use crate::utils::{AppError, AppResult};

/// HTTP request log middleware
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(crate::api::health::router())
        .merge(crate::api::events::router())
        .merge(crate::api::booth_slots::router())
        .merge(crate::api::bookings::router())
        .merge(crate::api::webhook::router())
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state (for sharing with tests)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> AppResult<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        // Background tasks
        let mut tasks = BackgroundTasks::new();
        let expiry_worker = HoldExpiryWorker::new(state.clone(), tasks.shutdown_token());
        tasks.spawn("hold_expiry_sweep", TaskKind::Periodic, async move {
            expiry_worker.run().await;
        });
        tasks.log_summary();

        let app = build_app()
            .with_state(state)
            .layer(CorsLayer::permissive())
            .layer(middleware::from_fn(log_request));

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("Booking server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
            })
            .await
            .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

        tasks.shutdown().await;

        Ok(())
    }
}
