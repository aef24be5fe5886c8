//! # HTTP Server
//!
//! Main HTTP server combining all endpoint routers.

use std::sync::Arc;

use axum::http::{header, HeaderName, Method};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::config::HttpServerConfig;
use super::form_routes::{form_routes, CALLER_HEADER};
use super::observability_routes::{health_routes, observability_routes};
use super::realtime_routes::realtime_routes;
use crate::core::FormService;
use crate::observability::{log_event_with_fields, Event};

/// HTTP server for the form service
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with default configuration
    pub fn new(service: Arc<FormService>) -> Self {
        Self::with_config(HttpServerConfig::default(), service)
    }

    /// Create a new HTTP server with custom configuration
    pub fn with_config(config: HttpServerConfig, service: Arc<FormService>) -> Self {
        let router = Self::build_router(&config, service);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, service: Arc<FormService>) -> Router {
        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
            .allow_headers([
                header::CONTENT_TYPE,
                header::ACCEPT,
                header::AUTHORIZATION,
                HeaderName::from_static(CALLER_HEADER),
            ]);
        // Unusable origins are rejected when the config is loaded
        let cors = if config.allows_any_origin() {
            cors.allow_origin(Any)
        } else {
            cors.allow_origin(AllowOrigin::list(
                config.origin_headers().unwrap_or_default(),
            ))
        };

        Router::new()
            .merge(health_routes())
            .nest("/api", form_routes(service.clone()))
            .nest("/observability", observability_routes(service.clone()))
            // /ws/forms/:id and /realtime/stats
            .merge(realtime_routes(service))
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr = self
            .config
            .parse_socket_addr()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        let listener = TcpListener::bind(addr).await?;
        log_event_with_fields(Event::Serving, &[("addr", &addr.to_string())]);

        axum::serve(listener, self.router).await?;

        log_event_with_fields(Event::ShutdownComplete, &[]);
        Ok(())
    }
}
