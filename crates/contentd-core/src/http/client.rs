//! HTTP client — typed access to a running contentd server.
//!
//! Used by the CLI's `--server` mode and by integration tests.

use tracing::debug;

use super::types::*;
use crate::record::ContentRecord;

/// Errors from the HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned error: {0}")]
    Server(String),
}

/// Client for a contentd HTTP server.
pub struct ContentClient {
    base_url: String,
    http: reqwest::Client,
}

impl ContentClient {
    /// Create a client targeting the given base URL (e.g. `http://127.0.0.1:7700`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        match response.json::<ErrorResponse>().await {
            Ok(err) => Err(ClientError::Server(err.error)),
            Err(_) => Err(ClientError::Server(format!("unexpected status: {status}"))),
        }
    }

    /// Health check — is the server running and responsive?
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = format!("{}/health", self.base_url);
        debug!(%url, "GET health");
        let resp = Self::check(self.http.get(&url).send().await?).await?;
        Ok(resp.json().await?)
    }

    /// Run a search against the server.
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<ContentRecord>, ClientError> {
        let url = format!("{}/search", self.base_url);
        debug!(%url, "POST search");
        let resp = Self::check(self.http.post(&url).json(request).send().await?).await?;
        Ok(resp.json().await?)
    }

    /// List the server's registered tools.
    pub async fn tools(&self) -> Result<ToolsResponse, ClientError> {
        let url = format!("{}/tools", self.base_url);
        debug!(%url, "GET tools");
        let resp = Self::check(self.http.get(&url).send().await?).await?;
        Ok(resp.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_client_normalizes_base_url() {
        let client = ContentClient::new("http://127.0.0.1:7700/");
        assert_eq!(client.base_url, "http://127.0.0.1:7700");
    }

    #[tokio::test]
    async fn test_integration_server_client() {
        use std::sync::Arc;
        use tokio::sync::broadcast;

        contentd_test_utils::tracing_setup::init_test_tracing();

        use super::super::server;
        use crate::record::RecordStore;
        use crate::tools::ToolRegistry;

        let config = contentd_config::AppConfig::default();
        let state = Arc::new(server::ServerState::new(
            Arc::new(RecordStore::sample()),
            Arc::new(ToolRegistry::with_defaults()),
            &config,
        ));

        // Ephemeral port so parallel test runs don't collide
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let server_handle = tokio::spawn(async move {
            server::serve(listener, state, shutdown_rx).await.unwrap();
        });

        let client = ContentClient::new(format!("http://{addr}"));

        let health = client.health().await.unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.records, 5);

        let tools = client.tools().await.unwrap();
        assert_eq!(tools.tools.len(), 1);
        assert_eq!(tools.tools[0].name, "search_content");

        let request = SearchRequest {
            classes: vec!["autopayment".to_string()],
            filters: [("status".to_string(), vec!["active".to_string()])]
                .into_iter()
                .collect(),
            limit: None,
        };
        let results = client.search(&request).await.unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["ap-042", "ap-260"]);

        let _ = shutdown_tx.send(server::ShutdownSignal);
        let _ = tokio::time::timeout(std::time::Duration::from_secs(2), server_handle).await;
    }

    #[tokio::test]
    async fn test_client_connection_refused() {
        // Port 1 is never listening
        let client = ContentClient::new("http://127.0.0.1:1");
        let result = client.health().await;
        assert!(matches!(result, Err(ClientError::Http(_))));
    }
}
