//! HTTP client for the redemption endpoint
//!
//! Server messages are surfaced verbatim; nothing is retried.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::local::{KeyValueStore, LicenseData, LicenseStorage, StorageError};
use crate::protocol::{ErrorBody, RedeemRequest, RedeemResponse, REDEEM_PATH};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Please enter an activation code")]
    EmptyCode,

    /// The server answered with an error status
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Network error, please check your connection: {0}")]
    Network(String),

    #[error("Unexpected response from activation server: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ClientError {
    /// HTTP status of a server rejection
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RedemptionClient {
    http: reqwest::Client,
    url: String,
}

impl RedemptionClient {
    /// Client for a server base URL such as `https://example.com`
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            url: format!("{}{}", base_url.trim_end_matches('/'), REDEEM_PATH),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Submit a code; the code is trimmed first
    pub async fn redeem(&self, code: &str) -> Result<RedeemResponse, ClientError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(ClientError::EmptyCode);
        }

        let response = self
            .http
            .post(&self.url)
            .json(&RedeemRequest {
                code: code.to_string(),
            })
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if status.is_success() {
            return serde_json::from_slice(&body)
                .map_err(|e| ClientError::InvalidResponse(e.to_string()));
        }

        let message = serde_json::from_slice::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or_else(|_| format!("Activation failed with status {}", status.as_u16()));
        tracing::debug!("redemption rejected with {}: {}", status, message);

        Err(ClientError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    /// Redeem a code and persist the resulting license locally
    pub async fn activate<S: KeyValueStore>(
        &self,
        storage: &LicenseStorage<S>,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<LicenseData, ClientError> {
        let response = self.redeem(code).await?;
        Ok(storage.activate(code.trim(), response.expires_at, now)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::MemoryKeyValueStore;

    #[test]
    fn test_url_joins_path() {
        assert_eq!(
            RedemptionClient::new("https://pdf.example.com/").url(),
            "https://pdf.example.com/api/redeem"
        );
        assert_eq!(
            RedemptionClient::new("http://127.0.0.1:3001").url(),
            "http://127.0.0.1:3001/api/redeem"
        );
    }

    #[tokio::test]
    async fn test_blank_code_is_rejected_locally() {
        let client = RedemptionClient::new("http://127.0.0.1:9");
        let err = client.redeem("   ").await.unwrap_err();
        assert!(matches!(err, ClientError::EmptyCode));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = RedemptionClient::new(&format!("http://{}", addr));
        let storage = LicenseStorage::new(MemoryKeyValueStore::new());
        let err = client
            .activate(&storage, "LP-1A2B-3C4D", Utc::now())
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Network(_)));
        assert!(storage.license().is_none());
    }
}
