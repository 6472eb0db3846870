use std::sync::Arc;

use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use scaffold_logging::scaffold_warn;
use url::Url;

use crate::session::Session;
use crate::types::{expect_success, ApiError, SearchResults, SourceRepository};

const USER_AGENT_VALUE: &str = "scaffolder";

/// Client for the code host's search/read API.
pub struct CodeHostClient {
    client: reqwest::Client,
    base_url: Url,
    session: Arc<Session>,
}

impl CodeHostClient {
    pub fn new(base_url: Url, session: Arc<Session>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SourceRepository>, ApiError> {
        let mut url = self
            .base_url
            .join("search/repositories")
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        url.query_pairs_mut().append_pair("q", query);
        let response = self.get_with_reauth(url).await?;
        let response = expect_success(response, "failed to search the code host").await?;
        let results: SearchResults = response
            .json()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))?;
        Ok(results.items)
    }

    pub async fn get_repository(&self, id: &str) -> Result<SourceRepository, ApiError> {
        let url = self
            .base_url
            .join(&format!("repositories/{id}"))
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        let response = self.get_with_reauth(url).await?;
        let response =
            expect_success(response, "failed to get repository metadata from the code host")
                .await?;
        response
            .json()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    /// A 403 forces a sign-in and a single retry with the fresh token.
    async fn get_with_reauth(&self, url: Url) -> Result<reqwest::Response, ApiError> {
        let token = self.session.maybe_code_host_token().await;
        let response = self.get_once(url.clone(), token).await?;
        if response.status() != StatusCode::FORBIDDEN {
            return Ok(response);
        }
        scaffold_warn!("code host rejected credentials; forcing re-authentication");
        let user = self.session.user().await?;
        self.get_once(url, user.code_host_token().map(str::to_string))
            .await
    }

    async fn get_once(
        &self,
        url: Url,
        token: Option<String>,
    ) -> Result<reqwest::Response, ApiError> {
        let mut request = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, USER_AGENT_VALUE);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("token {token}"));
        }
        request
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))
    }
}
