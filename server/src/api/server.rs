//! API server initialization

use std::net::SocketAddr;

use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::routes::{health, otlp};
use crate::core::CoreApp;
use crate::core::constants::{APP_NAME, OTLP_BODY_LIMIT};
use crate::core::shutdown::shutdown_signal;

pub struct ApiServer {
    app: CoreApp,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        Self { app }
    }

    pub async fn start(self) -> Result<()> {
        let host = self.app.config.server.host.clone();
        let port = self.app.config.server.port;
        let addr = SocketAddr::new(host.parse()?, port);

        let otlp_routes = otlp::routes(self.app.collector.clone())
            .layer(DefaultBodyLimit::max(OTLP_BODY_LIMIT));

        let router = Router::new()
            .route("/health", get(health::health))
            .nest("/v1", otlp_routes)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive()),
            );

        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, "{APP_NAME} listening for trace exports");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}
