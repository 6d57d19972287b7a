//! Authenticated HTTP access to the Sienge public API.
//!
//! One [`ApiClient`] is constructed per export run and holds the single
//! `reqwest::Client` (connection pool and auth context) for that run. The
//! traversal depends on the [`ProgressLogApi`] trait rather than the concrete
//! client so tests can substitute a mock.

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;

pub const BASE_HOST: &str = "https://api.sienge.com.br";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Upstream answered with a non-200 status.
    #[error("Sienge API returned status {status}: {body}")]
    Status { status: u16, body: String },
    /// A 200 response whose body was not valid JSON.
    #[error("Sienge API returned an undecodable JSON body")]
    InvalidJson { source: serde_json::Error },
    /// The request never produced a response.
    #[error("request to the Sienge API failed")]
    Transport { source: reqwest::Error },
}

impl ApiError {
    /// 404 marks expected absence below the project level, not a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }
}

/// Read-only view of the Sienge progress-log API consumed by the traversal.
/// Implemented by [`ApiClient`] and by generated mocks in tests.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ProgressLogApi: Send + Sync {
    /// Issues an authenticated GET for `path` relative to the API base and
    /// decodes the response body as JSON.
    async fn get(&self, path: &str, params: &[(String, String)]) -> Result<Value, ApiError>;
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    user: String,
    password: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|source| ApiError::Transport { source })?;
        Ok(ApiClient {
            http,
            base_url: base_url(&config.subdomain),
            user: config.user.clone(),
            password: config.password.clone(),
        })
    }
}

fn base_url(subdomain: &str) -> String {
    format!("{}/{}/public/api/v1", BASE_HOST, subdomain)
}

#[async_trait]
impl ProgressLogApi for ApiClient {
    async fn get(&self, path: &str, params: &[(String, String)]) -> Result<Value, ApiError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .basic_auth(&self.user, Some(&self.password))
            .query(params)
            .send()
            .await
            .map_err(|source| ApiError::Transport { source })?;

        let status = response.status();
        info!(status = %status, url = %url, "Sienge API response");

        let body = response
            .text()
            .await
            .map_err(|source| ApiError::Transport { source })?;
        debug!(url = %url, body = %body, "Sienge API response body");

        if status != StatusCode::OK {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| ApiError::InvalidJson { source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_includes_subdomain_and_api_version() {
        assert_eq!(
            base_url("acme"),
            "https://api.sienge.com.br/acme/public/api/v1"
        );
    }

    #[test]
    fn only_status_404_counts_as_not_found() {
        let not_found = ApiError::Status {
            status: 404,
            body: String::new(),
        };
        let server_error = ApiError::Status {
            status: 500,
            body: String::new(),
        };
        assert!(not_found.is_not_found());
        assert!(!server_error.is_not_found());
    }
}
