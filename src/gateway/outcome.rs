/// Tagged result of a gateway call and the verbs it accepts

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Status reported when a transport failure carries no HTTP status
pub const DEFAULT_ERROR_STATUS: u16 = 400;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Invalid method: {0}")]
    UnsupportedMethod(String),
    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// HTTP verbs the admin uses against the REST API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    /// Verbs whose success makes cached admin pages stale
    pub fn is_mutating(self) -> bool {
        !matches!(self, Method::Get)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Post => "post",
            Method::Patch => "patch",
            Method::Delete => "delete",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Method::Get),
            "post" => Ok(Method::Post),
            "patch" => Ok(Method::Patch),
            "delete" => Ok(Method::Delete),
            _ => Err(GatewayError::UnsupportedMethod(s.to_string())),
        }
    }
}

/// One gateway call: verb, resource path and optional JSON payload
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub payload: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self { method: Method::Get, path: path.into(), payload: None }
    }

    pub fn post(path: impl Into<String>, payload: Value) -> Self {
        Self { method: Method::Post, path: path.into(), payload: Some(payload) }
    }

    pub fn patch(path: impl Into<String>, payload: Value) -> Self {
        Self { method: Method::Patch, path: path.into(), payload: Some(payload) }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self { method: Method::Delete, path: path.into(), payload: None }
    }
}

/// Normalized result of a gateway call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Outcome {
    Ok { data: Value },
    Error { error: Value, status: u16 },
}

impl Outcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Outcome::Ok { .. } => None,
            Outcome::Error { status, .. } => Some(*status),
        }
    }

    /// Server-reported message for an error outcome
    ///
    /// Uses the body's `message` field when present, otherwise the body text itself.
    pub fn error_message(&self) -> Option<String> {
        match self {
            Outcome::Ok { .. } => None,
            Outcome::Error { error, .. } => Some(match error {
                Value::String(s) => s.clone(),
                Value::Object(map) => match map.get("message") {
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => error.to_string(),
                },
                Value::Null => String::new(),
                other => other.to_string(),
            }),
        }
    }

    /// Deserialize the data of an `ok` outcome
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T, Outcome> {
        match self {
            Outcome::Ok { data } => serde_json::from_value(data).map_err(|e| Outcome::Error {
                error: Value::String(format!("Unexpected response shape: {}", e)),
                status: 502,
            }),
            error => Err(error),
        }
    }
}
