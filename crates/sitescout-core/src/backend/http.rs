//! REST client for the session service

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{BackendError, SessionBackend};
use crate::config::BackendSettings;
use crate::models::{Page, ResultRow, SearchConfiguration, SearchUpsert, Session, SessionId};

/// [`SessionBackend`] over HTTP/JSON
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    /// Origin plus API base path, without trailing slash
    root: String,
}

impl HttpBackend {
    /// Create a client rooted at `root` (e.g. `http://127.0.0.1:8000/api`)
    pub fn new(root: impl Into<String>) -> Self {
        Self::with_client(Client::new(), root)
    }

    /// Create a client reusing an existing `reqwest::Client`
    pub fn with_client(client: Client, root: impl Into<String>) -> Self {
        let root = root.into().trim_end_matches('/').to_string();
        Self { client, root }
    }

    /// Create a client from backend settings
    pub fn from_settings(settings: &BackendSettings) -> Self {
        Self::new(settings.endpoint_root())
    }

    /// URL prefix every request is built from
    pub fn root(&self) -> &str {
        &self.root
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.root, path)
    }

    fn page_query(page: Page) -> [(&'static str, u32); 2] {
        [("offset", page.offset), ("limit", page.limit)]
    }

    /// Turn non-2xx responses into [`BackendError::Status`]
    async fn check(response: Response) -> Result<Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(BackendError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| BackendError::Decode(e.to_string()))
    }
}

impl SessionBackend for HttpBackend {
    async fn list_sessions(&self, page: Page) -> Result<Vec<Session>, BackendError> {
        let url = self.url("/sessions");
        debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .query(&Self::page_query(page))
            .send()
            .await?;
        Self::decode(Self::check(response).await?).await
    }

    async fn create_session(&self, body: SearchUpsert) -> Result<Session, BackendError> {
        let url = self.url("/sessions");
        debug!("POST {}", url);
        let response = self.client.post(&url).json(&body).send().await?;
        Self::decode(Self::check(response).await?).await
    }

    async fn get_search(
        &self,
        session_id: SessionId,
    ) -> Result<Option<SearchConfiguration>, BackendError> {
        let url = self.url(&format!("/sessions/{}/search", session_id));
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::decode(Self::check(response).await?).await.map(Some)
    }

    async fn put_search(
        &self,
        session_id: SessionId,
        body: SearchUpsert,
    ) -> Result<SearchConfiguration, BackendError> {
        let url = self.url(&format!("/sessions/{}/search", session_id));
        debug!("PUT {}", url);
        let response = self.client.put(&url).json(&body).send().await?;
        Self::decode(Self::check(response).await?).await
    }

    async fn list_results(
        &self,
        session_id: SessionId,
        page: Page,
    ) -> Result<Vec<ResultRow>, BackendError> {
        let url = self.url(&format!("/sessions/{}/results", session_id));
        debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .query(&Self::page_query(page))
            .send()
            .await?;
        Self::decode(Self::check(response).await?).await
    }
}
