/// API gateway client for the portfolio REST backend
///
/// Single entry point for every admin call. Dispatches through one shared reqwest client,
/// folds transport and HTTP failures into [`Outcome::Error`], and revalidates the matching
/// admin page after a successful mutation.

use crate::cache::CacheInvalidator;
use crate::gateway::outcome::{ApiRequest, GatewayError, Method, Outcome, DEFAULT_ERROR_STATUS};
use reqwest::Url;
use serde_json::Value;
use std::{sync::Arc, time::Duration};

/// Admin page path for a resource path: "projects/42" -> "/admin/projects/42"
pub fn admin_path(resource_path: &str) -> String {
    format!("/admin/{}", resource_path.trim_start_matches('/'))
}

/// Shared, stateless gateway to the REST API
#[derive(Clone)]
pub struct ApiGateway {
    client: reqwest::Client,
    base_url: Url,
    invalidator: Arc<dyn CacheInvalidator>,
}

impl std::fmt::Debug for ApiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiGateway").field("base_url", &self.base_url.as_str()).finish()
    }
}

impl ApiGateway {
    /// Create a gateway against `base_url` with a per-request timeout
    pub fn new(
        base_url: &str,
        timeout: Duration,
        invalidator: Arc<dyn CacheInvalidator>,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(client, base_url, invalidator)
    }

    /// Create a gateway reusing an existing HTTP client
    pub fn with_client(
        client: reqwest::Client,
        base_url: &str,
        invalidator: Arc<dyn CacheInvalidator>,
    ) -> Result<Self, GatewayError> {
        // Url::join drops the last segment unless the base ends with '/'.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized).map_err(|e| GatewayError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            invalidator,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Perform one best-effort call; never retries
    pub async fn call(&self, request: ApiRequest) -> Outcome {
        let ApiRequest { method, path, payload } = request;
        let resource = path.trim_start_matches('/');

        let url = match self.base_url.join(resource) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Invalid resource path '{}': {}", path, e);
                return Outcome::Error {
                    error: Value::String(e.to_string()),
                    status: DEFAULT_ERROR_STATUS,
                };
            }
        };

        tracing::debug!("🌍 API request: {} {}", method, url);

        let builder = match method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Patch => self.client.patch(url),
            Method::Delete => self.client.delete(url),
        };
        let builder = match (method, payload.as_ref()) {
            (Method::Post | Method::Patch, Some(body)) => builder.json(body),
            _ => builder,
        };

        let outcome = match builder.send().await {
            Ok(response) => {
                let status = response.status();
                match response.text().await {
                    Ok(text) => {
                        let body = parse_body(text);
                        if status.is_success() {
                            Outcome::Ok { data: body }
                        } else {
                            Outcome::Error {
                                error: body,
                                status: status.as_u16(),
                            }
                        }
                    }
                    Err(e) => transport_error(e),
                }
            }
            Err(e) => transport_error(e),
        };

        match &outcome {
            Outcome::Ok { .. } => {
                tracing::info!("✅ API {} {} succeeded", method, resource);
                if method.is_mutating() {
                    self.invalidator.invalidate(&admin_path(resource));
                }
            }
            Outcome::Error { status, .. } => {
                tracing::warn!("API {} {} failed with status {}", method, resource, status);
            }
        }

        outcome
    }

    pub async fn get(&self, path: impl Into<String>) -> Outcome {
        self.call(ApiRequest::get(path)).await
    }
}

/// JSON when the body parses as JSON, text otherwise, null when empty
fn parse_body(text: String) -> Value {
    if text.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

fn transport_error(e: reqwest::Error) -> Outcome {
    tracing::error!("HTTP request failed: {}", e);
    Outcome::Error {
        status: e.status().map(|s| s.as_u16()).unwrap_or(DEFAULT_ERROR_STATUS),
        error: Value::String(e.to_string()),
    }
}
