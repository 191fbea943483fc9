use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::errors::internal::DirectoryError;
use crate::types::internal::{
    DirectoryAccessToken, DirectoryCredentials, DirectoryGroup, DirectoryIdentity,
};

const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Upper bound on followed `@odata.nextLink` pages per listing
const MAX_PAGES: usize = 50;

/// Protocol seam to the external directory
///
/// `GraphConnector` talks to the real service; tests substitute in-memory fakes.
#[async_trait]
pub trait DirectoryConnector: Send + Sync {
    /// Exchange client credentials for an access token
    async fn mint_access_token(
        &self,
        credentials: &DirectoryCredentials,
    ) -> Result<DirectoryAccessToken, DirectoryError>;

    async fn fetch_users(
        &self,
        token: &DirectoryAccessToken,
    ) -> Result<Vec<DirectoryIdentity>, DirectoryError>;

    async fn fetch_groups(
        &self,
        token: &DirectoryAccessToken,
    ) -> Result<Vec<DirectoryGroup>, DirectoryError>;

    /// Groups and directory roles the user is a direct member of
    async fn fetch_memberships(
        &self,
        token: &DirectoryAccessToken,
        external_id: &str,
    ) -> Result<Vec<DirectoryGroup>, DirectoryError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    value: Vec<T>,
    #[serde(rename = "@odata.nextLink", default)]
    next_link: Option<String>,
}

/// Client-credentials token flow plus Graph v1.0 listings over reqwest
pub struct GraphConnector {
    client: reqwest::Client,
    authority_url: String,
    graph_url: String,
}

impl GraphConnector {
    /// # Arguments
    /// * `authority_url` - Token authority, e.g. `https://login.microsoftonline.com`
    /// * `graph_url` - Graph root, e.g. `https://graph.microsoft.com`
    /// * `timeout` - Per-request timeout
    pub fn new(
        authority_url: impl Into<String>,
        graph_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DirectoryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DirectoryError::upstream("build_http_client", e.to_string()))?;

        Ok(Self {
            client,
            authority_url: authority_url.into().trim_end_matches('/').to_string(),
            graph_url: graph_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Graph v1.0 URL with each segment percent-encoded
    fn graph_endpoint(&self, segments: &[&str]) -> Result<Url, DirectoryError> {
        let mut url = Url::parse(&format!("{}/v1.0", self.graph_url))
            .map_err(|e| DirectoryError::upstream("build_graph_url", e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| DirectoryError::upstream("build_graph_url", "graph url cannot have a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn list<T: DeserializeOwned>(
        &self,
        operation: &str,
        token: &DirectoryAccessToken,
        mut url: Url,
    ) -> Result<Vec<T>, DirectoryError> {
        let mut items = Vec::new();

        for _ in 0..MAX_PAGES {
            let response = self
                .client
                .get(url.clone())
                .bearer_auth(token.as_str())
                .send()
                .await
                .map_err(|e| DirectoryError::upstream(operation, e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                tracing::warn!("Directory {} returned {}: {}", operation, status, body);
                return Err(DirectoryError::upstream(
                    operation,
                    format!("directory returned status {}", status),
                ));
            }

            let page: ListResponse<T> = response
                .json()
                .await
                .map_err(|e| DirectoryError::upstream(operation, e.to_string()))?;

            items.extend(page.value);

            match page.next_link {
                Some(next) => {
                    url = Url::parse(&next)
                        .map_err(|e| DirectoryError::upstream(operation, e.to_string()))?;
                }
                None => return Ok(items),
            }
        }

        tracing::warn!(
            "Directory {} stopped after {} pages, result truncated",
            operation,
            MAX_PAGES
        );
        Ok(items)
    }
}

#[async_trait]
impl DirectoryConnector for GraphConnector {
    async fn mint_access_token(
        &self,
        credentials: &DirectoryCredentials,
    ) -> Result<DirectoryAccessToken, DirectoryError> {
        let mut url = Url::parse(&self.authority_url)
            .map_err(|e| DirectoryError::TokenMint(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| DirectoryError::TokenMint("authority url cannot have a path".to_string()))?
            .pop_if_empty()
            .extend([credentials.tenant_id.as_str(), "oauth2", "v2.0", "token"]);

        let response = self
            .client
            .post(url)
            .form(&[
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
                ("scope", GRAPH_SCOPE),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await
            .map_err(|e| DirectoryError::TokenMint(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<TokenErrorResponse>()
                .await
                .ok()
                .and_then(|body| body.error_description.or(body.error))
                .unwrap_or_else(|| status.to_string());
            return Err(DirectoryError::TokenMint(detail));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| DirectoryError::TokenMint(e.to_string()))?;

        Ok(DirectoryAccessToken::new(token.access_token))
    }

    async fn fetch_users(
        &self,
        token: &DirectoryAccessToken,
    ) -> Result<Vec<DirectoryIdentity>, DirectoryError> {
        let url = self.graph_endpoint(&["users"])?;
        self.list("list_users", token, url).await
    }

    async fn fetch_groups(
        &self,
        token: &DirectoryAccessToken,
    ) -> Result<Vec<DirectoryGroup>, DirectoryError> {
        let url = self.graph_endpoint(&["groups"])?;
        self.list("list_groups", token, url).await
    }

    async fn fetch_memberships(
        &self,
        token: &DirectoryAccessToken,
        external_id: &str,
    ) -> Result<Vec<DirectoryGroup>, DirectoryError> {
        let url = self.graph_endpoint(&["users", external_id, "memberOf"])?;
        self.list("list_user_memberships", token, url).await
    }
}
