//! REST server for tasks and dependencies.

use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::domain::models::ServerConfig;
use crate::infrastructure::AppContext;

/// Configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Whether to enable CORS.
    pub enable_cors: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

impl From<&ServerConfig> for HttpConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            enable_cors: config.enable_cors,
        }
    }
}

impl HttpConfig {
    fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

pub struct HttpServer {
    config: HttpConfig,
    context: Arc<AppContext>,
}

impl HttpServer {
    pub fn new(context: AppContext, config: HttpConfig) -> Self {
        Self {
            config,
            context: Arc::new(context),
        }
    }

    /// Build the router.
    pub fn build_router(&self) -> Router {
        let app = router(self.context.clone());
        if self.config.enable_cors {
            app.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
                .layer(TraceLayer::new_for_http())
        } else {
            app.layer(TraceLayer::new_for_http())
        }
    }

    /// Start the server.
    pub async fn serve(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Start the server with a shutdown signal.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.socket_addr()?;
        let router = self.build_router();

        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, "tasktrack HTTP server listening");

        axum::serve(listener, router).with_graceful_shutdown(shutdown).await?;
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Routes without middleware.
pub fn router(context: Arc<AppContext>) -> Router {
    Router::new()
        .route("/api/v1/tasks", get(handlers::list_tasks).post(handlers::create_task))
        .route(
            "/api/v1/tasks/{id}",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route("/api/v1/tasks/{id}/dependencies", get(handlers::task_dependencies))
        .route(
            "/api/v1/dependencies",
            get(handlers::list_dependencies).post(handlers::create_dependency),
        )
        .route(
            "/api/v1/dependencies/{id}",
            get(handlers::get_dependency)
                .put(handlers::update_dependency)
                .delete(handlers::delete_dependency),
        )
        .route("/health", get(handlers::health_check))
        .with_state(context)
}
