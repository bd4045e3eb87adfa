use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use underwrite_core::{DealInput, DealMetrics};

use crate::config::ClientConfig;
use crate::credentials::{Anonymous, CredentialProvider, StaticToken};
use crate::error::{ServiceError, ServiceResult};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// Underwriting API client. All methods return Result, never panic.
#[derive(Clone)]
pub struct UnderwriteClient {
    client: Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl UnderwriteClient {
    pub fn new(base_url: &str, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Static token when `UNDERWRITE_API_TOKEN` is set, anonymous otherwise.
    pub fn from_config(cfg: &ClientConfig) -> Self {
        let credentials: Arc<dyn CredentialProvider> = match &cfg.api_token {
            Some(token) => Arc::new(StaticToken::new(token.clone())),
            None => Arc::new(Anonymous),
        };
        Self::new(&cfg.api_url, credentials)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> ServiceResult<HealthStatus> {
        let req = self.client.get(format!("{}/healthz", self.base_url));
        self.send("GET /healthz", req).await
    }

    pub async fn underwrite(&self, deal: &DealInput) -> ServiceResult<DealMetrics> {
        let req = self
            .client
            .post(format!("{}/ai/deals/underwrite", self.base_url))
            .json(deal);
        self.send("POST /ai/deals/underwrite", req).await
    }

    async fn send<T: DeserializeOwned>(&self, what: &str, req: RequestBuilder) -> ServiceResult<T> {
        let req = match self.credentials.bearer_token().await? {
            Some(token) => req.bearer_auth(token),
            None => req,
        };

        let resp = req.send().await?;
        tracing::debug!(request = what, status = %resp.status(), "underwrite API response");
        Self::decode(what, resp).await
    }

    async fn decode<T: DeserializeOwned>(what: &str, resp: Response) -> ServiceResult<T> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ServiceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| ServiceError::Parse(format!("{what}: {e}")))
    }
}
