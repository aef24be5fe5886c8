//! Listener and CORS settings
//!
//! The browser builder runs as a Next.js app, by default on
//! `http://localhost:3000`; it calls the REST API and opens the live
//! channel cross-origin.

use std::net::{AddrParseError, SocketAddr};

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};

/// Origin value that admits every caller
pub const ANY_ORIGIN: &str = "*";

/// Listener and CORS settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Browser origins allowed to call the API; `"*"` or empty admits all
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl HttpServerConfig {
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// `host:port` as configured
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn parse_socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.socket_addr().parse()
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == ANY_ORIGIN)
    }

    /// Configured origins as header values; the first unusable one is the error
    pub fn origin_headers(&self) -> Result<Vec<HeaderValue>, String> {
        self.cors_origins
            .iter()
            .map(|origin| {
                let trimmed = origin.trim().trim_end_matches('/');
                if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                    return Err(origin.clone());
                }
                HeaderValue::from_str(trimmed).map_err(|_| origin.clone())
            })
            .collect()
    }
}
