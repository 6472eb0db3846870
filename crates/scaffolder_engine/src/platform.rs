use std::sync::Arc;

use reqwest::header::ACCEPT;
use reqwest::{Method, StatusCode};
use scaffold_logging::scaffold_warn;
use serde_json::json;
use url::Url;

use crate::payment::PaymentPrompt;
use crate::session::Session;
use crate::types::{expect_success, ApiError, PlatformRepository};

const SPONSOR_AMOUNT_CENTS: u32 = 500;
const SPONSOR_DESCRIPTION: &str =
    "Sponsor a repository so anyone can use it as a template!";

enum Auth {
    Required,
    Optional,
}

/// Client for the platform backend: feeds, favorites and sponsorship.
pub struct PlatformClient {
    client: reqwest::Client,
    base_url: Url,
    session: Arc<Session>,
    payment: Arc<dyn PaymentPrompt>,
}

impl PlatformClient {
    pub fn new(
        base_url: Url,
        session: Arc<Session>,
        payment: Arc<dyn PaymentPrompt>,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            base_url,
            session,
            payment,
        })
    }

    pub async fn get_popular(&self) -> Result<Vec<PlatformRepository>, ApiError> {
        self.fetch_list(
            Method::GET,
            "api/popular/",
            None,
            Auth::Optional,
            "failed to get popular repositories",
        )
        .await
    }

    pub async fn get_sponsored(&self) -> Result<Vec<PlatformRepository>, ApiError> {
        self.fetch_list(
            Method::GET,
            "api/sponsored/",
            None,
            Auth::Optional,
            "failed to get sponsored repositories",
        )
        .await
    }

    pub async fn get_favorites(&self) -> Result<Vec<PlatformRepository>, ApiError> {
        self.fetch_list(
            Method::GET,
            "api/favorites/",
            None,
            Auth::Required,
            "failed to get favorite repositories",
        )
        .await
    }

    pub async fn get_my_sponsored(&self) -> Result<Vec<PlatformRepository>, ApiError> {
        self.fetch_list(
            Method::GET,
            "api/sponsored/mine/",
            None,
            Auth::Required,
            "failed to get my sponsored repositories",
        )
        .await
    }

    /// Favorite a repository; returns the updated favorites set.
    pub async fn add_favorite(
        &self,
        provider: &str,
        id: &str,
    ) -> Result<Vec<PlatformRepository>, ApiError> {
        self.fetch_list(
            Method::PUT,
            &format!("api/favorites/{provider}/{id}/"),
            None,
            Auth::Required,
            "failed to favorite repository",
        )
        .await
    }

    pub async fn remove_favorite(
        &self,
        provider: &str,
        id: &str,
    ) -> Result<Vec<PlatformRepository>, ApiError> {
        self.fetch_list(
            Method::DELETE,
            &format!("api/favorites/{provider}/{id}/"),
            None,
            Auth::Required,
            "failed to un-favorite repository",
        )
        .await
    }

    /// Sponsor a repository. The payment prompt runs first; no network call
    /// is made unless it hands back a token.
    pub async fn sponsor(
        &self,
        provider: &str,
        id: &str,
    ) -> Result<Vec<PlatformRepository>, ApiError> {
        let email = self.session.email().await?;
        let token = self
            .payment
            .collect(&email, SPONSOR_DESCRIPTION, SPONSOR_AMOUNT_CENTS)
            .await?;
        let body = json!({ "payment_token": token.id });
        self.fetch_list(
            Method::PUT,
            &format!("api/sponsored/{provider}/{id}"),
            Some(body),
            Auth::Required,
            "failed to sponsor repository",
        )
        .await
    }

    pub async fn cancel_sponsorship(&self, provider: &str, id: &str) -> Result<(), ApiError> {
        let response = self
            .request(
                Method::DELETE,
                &format!("api/sponsored/{provider}/{id}"),
                None,
                Auth::Required,
            )
            .await?;
        expect_success(response, "failed to cancel sponsorship")
            .await
            .map(|_| ())
    }

    /// Platform metadata for one repository; absent is not an error.
    pub async fn get_repository_metadata(
        &self,
        provider: &str,
        id: &str,
    ) -> Result<Option<PlatformRepository>, ApiError> {
        let response = self
            .request(
                Method::GET,
                &format!("api/repository/{provider}/{id}"),
                None,
                Auth::Optional,
            )
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = expect_success(response, "failed to get repository metadata").await?;
        response
            .json()
            .await
            .map(Some)
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    async fn fetch_list(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        auth: Auth,
        context: &str,
    ) -> Result<Vec<PlatformRepository>, ApiError> {
        let response = self.request(method, path, body.as_ref(), auth).await?;
        let response = expect_success(response, context).await?;
        response
            .json()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    /// One request with the single 403 retry: a rejected credential signs
    /// the session out and the call is repeated once against a fresh one.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        auth: Auth,
    ) -> Result<reqwest::Response, ApiError> {
        let response = self.send_once(method.clone(), path, body, &auth).await?;
        if response.status() != StatusCode::FORBIDDEN {
            return Ok(response);
        }
        scaffold_warn!("platform rejected credentials for {path}; signing out and retrying once");
        self.session.invalidate().await;
        self.send_once(method, path, body, &auth).await
    }

    async fn send_once(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        auth: &Auth,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        let mut request = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json");
        match auth {
            Auth::Required => {
                let jwt = self.session.jwt().await?;
                request = request.bearer_auth(jwt);
            }
            Auth::Optional => {
                if let Some(jwt) = self.session.maybe_jwt().await {
                    request = request.bearer_auth(jwt);
                }
            }
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        request
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))
    }
}
