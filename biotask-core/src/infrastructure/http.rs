//! Shared JSON-over-HTTP plumbing for provider and store clients

use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

/// Transport-level failures, classified by whether a retry can help.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("service '{service}' requires an API key")]
    MissingApiKey { service: String },
    #[error("network error calling '{service}': {source}")]
    Network {
        service: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("'{service}' rate limited the request: {message}")]
    RateLimited { service: String, message: String },
    #[error("'{service}' failed with status {status}: {message}")]
    Transient {
        service: String,
        status: u16,
        message: String,
    },
    #[error("'{service}' rejected the request with status {status}: {message}")]
    Rejected {
        service: String,
        status: u16,
        message: String,
    },
    #[error("'{service}' returned a body that could not be decoded: {source}")]
    Decode {
        service: String,
        #[source]
        source: reqwest::Error,
    },
}

impl HttpError {
    /// Rate limits and server-side failures are worth another attempt.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            HttpError::RateLimited { .. } | HttpError::Transient { .. }
        )
    }

    pub fn user_message(&self) -> String {
        match self {
            HttpError::MissingApiKey { service } => {
                format!("'{service}' needs an API key; check the configured environment variable.")
            }
            HttpError::Network { service, source } => {
                if source.is_connect() {
                    format!("Could not connect to '{service}'.")
                } else if source.is_timeout() {
                    format!("Request to '{service}' timed out.")
                } else {
                    format!("Network error talking to '{service}'.")
                }
            }
            HttpError::RateLimited { service, .. } => {
                format!("'{service}' is rate limiting requests; try again later.")
            }
            HttpError::Transient { service, status, .. } => {
                format!("'{service}' is unavailable right now (status {status}).")
            }
            HttpError::Rejected {
                service,
                status,
                message,
            } => format!("'{service}' rejected the request ({status}): {message}"),
            HttpError::Decode { service, .. } => {
                format!("Response from '{service}' could not be understood.")
            }
        }
    }
}

/// Map a non-success status to an error.
pub fn classify_status(service: &str, status: StatusCode, body: &str) -> HttpError {
    let message = extract_error_message(body);
    if status == StatusCode::TOO_MANY_REQUESTS {
        HttpError::RateLimited {
            service: service.to_string(),
            message,
        }
    } else if status.is_server_error() {
        HttpError::Transient {
            service: service.to_string(),
            status: status.as_u16(),
            message,
        }
    } else {
        HttpError::Rejected {
            service: service.to_string(),
            status: status.as_u16(),
            message,
        }
    }
}

/// Pull `error.message` out of an OpenAI-style error body, else the raw text.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .or_else(|| value.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

/// Base HTTP client with shared functionality
#[derive(Clone)]
pub struct HttpClientBase {
    pub id: String,
    pub endpoint: String,
    headers: Vec<(String, String)>,
    pub http: Client,
}

impl HttpClientBase {
    pub fn new(id: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            endpoint: endpoint.into(),
            headers: Vec::new(),
            http: Client::new(),
        }
    }

    /// Attach a header sent with every request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach `Authorization: Bearer <key>`, rejecting a blank key.
    pub fn with_bearer(self, api_key: &str) -> Result<Self, HttpError> {
        let key = require_key(&self.id, api_key)?;
        Ok(self.with_header("Authorization", format!("Bearer {key}")))
    }

    /// Build URL from endpoint and path
    pub fn build_url(&self, path: &str) -> String {
        let base = self.endpoint.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Post JSON and decode a JSON reply
    pub async fn post_json<Req, Res>(&self, path: &str, body: &Req) -> Result<Res, HttpError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let url = self.build_url(path);
        let mut request = self.http.post(&url).json(body);
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(|source| HttpError::Network {
            service: self.id.clone(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            debug!(service = self.id.as_str(), status = status.as_u16(), "Request failed");
            return Err(classify_status(&self.id, status, &text));
        }

        response.json().await.map_err(|source| HttpError::Decode {
            service: self.id.clone(),
            source,
        })
    }
}

#[cfg_attr(not(feature = "http-providers"), allow(dead_code))]
pub(crate) fn require_key<'a>(service: &str, key: &'a str) -> Result<&'a str, HttpError> {
    let key = key.trim();
    if key.is_empty() {
        Err(HttpError::MissingApiKey {
            service: service.to_string(),
        })
    } else {
        Ok(key)
    }
}
