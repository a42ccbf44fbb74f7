//! Typed client for the read-only metrics API.
//!
//! Every operation is one authenticated GET followed by a JSON decode. There
//! is no retry, caching, or request coalescing; two identical calls issue two
//! requests.

use frostsight_core::config::ClientConfig;
use frostsight_core::endpoint::{DEFAULT_QUERY_LIMIT, DEFAULT_WAREHOUSE_LIMIT, Endpoint};
use frostsight_core::model::{
    Anomaly, GovernanceFinding, Health, Overview, QueryHistory, QueryInsight, SnowflakeStatus,
    Warehouse, WarehouseMetering,
};
use frostsight_core::{FrostsightError, Result};
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;

const FALLBACK_MESSAGE: &str = "Request failed";

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| FrostsightError::Config(format!("failed building http client: {e}")))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// GET `{api_url}{path}` with the bearer token and decode the body as `T`.
    pub async fn request<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get(path, true).await
    }

    pub async fn fetch<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T> {
        tracing::debug!(endpoint = endpoint.name(), path = %endpoint, "fetching");
        let result = self.get(&endpoint.path(), endpoint.requires_auth()).await;
        if let Err(err) = &result {
            tracing::warn!(endpoint = endpoint.name(), error = %err, "fetch failed");
        }
        result
    }

    pub async fn health(&self) -> Result<Health> {
        self.fetch(Endpoint::Health).await
    }

    pub async fn overview(&self) -> Result<Overview> {
        self.fetch(Endpoint::Overview).await
    }

    pub async fn warehouses(&self, limit: Option<usize>) -> Result<Vec<Warehouse>> {
        let limit = limit.unwrap_or(DEFAULT_WAREHOUSE_LIMIT);
        self.fetch(Endpoint::Warehouses { limit }).await
    }

    pub async fn metering(&self) -> Result<Vec<WarehouseMetering>> {
        self.fetch(Endpoint::Metering).await
    }

    pub async fn queries(&self, limit: Option<usize>) -> Result<Vec<QueryHistory>> {
        let limit = limit.unwrap_or(DEFAULT_QUERY_LIMIT);
        self.fetch(Endpoint::Queries { limit }).await
    }

    pub async fn query_insights(&self) -> Result<QueryInsight> {
        self.fetch(Endpoint::QueryInsights).await
    }

    pub async fn anomalies(&self) -> Result<Vec<Anomaly>> {
        self.fetch(Endpoint::Anomalies).await
    }

    pub async fn governance(&self) -> Result<Vec<GovernanceFinding>> {
        self.fetch(Endpoint::GovernanceFindings).await
    }

    pub async fn snowflake_status(&self) -> Result<SnowflakeStatus> {
        self.fetch(Endpoint::SnowflakeStatus).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, with_auth: bool) -> Result<T> {
        if !path.starts_with('/') {
            return Err(FrostsightError::InvalidArgument(format!(
                "api path must start with '/': {path}"
            )));
        }

        let mut req = self.http.get(self.config.url_for(path));
        if with_auth {
            req = req.header(AUTHORIZATION, format!("Bearer {}", self.config.token));
        }
        let response = req
            .send()
            .await
            .map_err(|e| FrostsightError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FrostsightError::Network(format!("failed reading body: {e}")))?;

        if !status.is_success() {
            return Err(FrostsightError::Request {
                status: status.as_u16(),
                message: failure_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| FrostsightError::Decode(format!("{path}: {e}")))
    }
}

fn failure_message(body: &str) -> String {
    if body.is_empty() {
        FALLBACK_MESSAGE.to_string()
    } else {
        body.to_string()
    }
}
