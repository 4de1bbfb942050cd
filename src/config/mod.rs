/// Configuration management for the folio admin service
///
/// Handles server binding, the backend REST API location and the object storage endpoint.

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Backend REST API configuration
    pub api: ApiConfig,
    /// Object storage configuration for image uploads
    pub storage: StorageConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Server port number
    pub port: u16,
}

/// Backend REST API the gateway talks to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every resource path is resolved against (e.g., "http://localhost:8080/api/")
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// Object storage upload endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Multipart upload endpoint returning `{ "url": ... }`
    pub upload_url: String,
}

impl Default for Config {
    /// Default configuration with ENV_VAR support for container deployment
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: std::env::var("FOLIO_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("FOLIO_PORT")
                    .unwrap_or_else(|_| "3005".to_string())
                    .parse()
                    .unwrap_or(3005),
            },
            api: ApiConfig {
                base_url: std::env::var("FOLIO_API_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:8080/api/".to_string()),
                timeout_secs: std::env::var("FOLIO_API_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            },
            storage: StorageConfig {
                upload_url: std::env::var("FOLIO_UPLOAD_URL")
                    .unwrap_or_else(|_| "http://localhost:8080/uploads".to_string()),
            },
        }
    }
}
