//! Thin JSON client for the storefront's remote API.
//!
//! Only GET requests are needed: product metadata and stock levels are
//! read-only lookups.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::CoreError;

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client rooted at `base_url`. `timeout` of `None` means requests
    /// may wait indefinitely.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, CoreError> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let http = builder.build().map_err(|e| CoreError::Network(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `{base_url}{path}` and decode the JSON body. Non-2xx responses are errors.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CoreError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| CoreError::Network(e.to_string()))?;
        let status = resp.status();
        debug!(%url, status = status.as_u16(), "remote api responded");
        if !status.is_success() {
            return Err(CoreError::Status { status: status.as_u16(), url });
        }
        resp.json::<T>().await.map_err(|e| CoreError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Json, Router};
    use tokio::net::TcpListener;

    async fn spawn_stub() -> anyhow::Result<String> {
        let app = Router::new()
            .route("/ok", get(|| async { Json(serde_json::json!({"id": 1, "amount": 3})) }))
            .route("/garbage", get(|| async { "not json" }));
        let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Ok(format!("http://{}/", addr))
    }

    #[tokio::test]
    async fn decodes_json_and_trims_base_url() -> anyhow::Result<()> {
        let base = spawn_stub().await?;
        let client = ApiClient::new(base, Some(Duration::from_secs(5)))?;
        assert!(!client.base_url().ends_with('/'));
        let v: serde_json::Value = client.get_json("/ok").await?;
        assert_eq!(v["amount"], 3);
        Ok(())
    }

    #[tokio::test]
    async fn maps_status_and_parse_failures() -> anyhow::Result<()> {
        let base = spawn_stub().await?;
        let client = ApiClient::new(base, None)?;

        let missing = client.get_json::<serde_json::Value>("/missing").await;
        assert!(matches!(missing, Err(CoreError::Status { status: 404, .. })));

        let garbage = client.get_json::<serde_json::Value>("/garbage").await;
        assert!(matches!(garbage, Err(CoreError::Parse(_))));
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() -> anyhow::Result<()> {
        // bind then drop to get a port nobody listens on
        let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;
        drop(listener);
        let client = ApiClient::new(format!("http://{}", addr), Some(Duration::from_secs(2)))?;
        let res = client.get_json::<serde_json::Value>("/ok").await;
        assert!(matches!(res, Err(CoreError::Network(_))));
        Ok(())
    }
}
