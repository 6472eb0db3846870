use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::types::SessionError;

/// Provider slug of the code host in the identity map.
pub const CODE_HOST_PROVIDER: &str = "github";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderIdentity {
    pub provider: String,
    #[serde(default)]
    pub access_token: Option<String>,
}

/// The signed-in user as the identity provider reports it. Held for the
/// lifetime of the session only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub nickname: String,
    pub email: String,
    pub jwt_token: String,
    pub photo_url: String,
    pub identities: HashMap<String, ProviderIdentity>,
}

impl AuthenticatedUser {
    /// The code-host login of this user.
    pub fn login(&self) -> &str {
        &self.nickname
    }

    pub fn code_host_token(&self) -> Option<&str> {
        self.identities
            .get(CODE_HOST_PROVIDER)
            .and_then(|identity| identity.access_token.as_deref())
    }
}

/// Host-controlled sign-in capability. The UI behind it (popup, device
/// flow, cached credentials) is not this crate's concern.
#[async_trait::async_trait]
pub trait IdentityPrompt: Send + Sync {
    async fn sign_in(&self) -> Result<AuthenticatedUser, SessionError>;

    /// Called on invalidation so implementations can drop anything cached.
    fn sign_out(&self) {}
}

/// Explicit session object passed to every client that issues
/// authenticated calls; there is no ambient global.
pub struct Session {
    prompt: Arc<dyn IdentityPrompt>,
    user: Mutex<Option<AuthenticatedUser>>,
}

impl Session {
    pub fn new(prompt: Arc<dyn IdentityPrompt>, initial_user: Option<AuthenticatedUser>) -> Self {
        Self {
            prompt,
            user: Mutex::new(initial_user),
        }
    }

    pub async fn is_active(&self) -> bool {
        self.user.lock().await.is_some()
    }

    /// The signed-in user, running the sign-in flow when there is none.
    /// The lock is held across the prompt, so concurrent callers share a
    /// single attempt instead of racing popups.
    pub async fn user(&self) -> Result<AuthenticatedUser, SessionError> {
        let mut guard = self.user.lock().await;
        if let Some(user) = guard.as_ref() {
            return Ok(user.clone());
        }
        let user = self.prompt.sign_in().await?;
        *guard = Some(user.clone());
        Ok(user)
    }

    pub async fn maybe_user(&self) -> Option<AuthenticatedUser> {
        self.user.lock().await.clone()
    }

    pub async fn jwt(&self) -> Result<String, SessionError> {
        Ok(self.user().await?.jwt_token)
    }

    pub async fn maybe_jwt(&self) -> Option<String> {
        self.maybe_user().await.map(|user| user.jwt_token)
    }

    pub async fn maybe_code_host_token(&self) -> Option<String> {
        self.maybe_user()
            .await
            .and_then(|user| user.code_host_token().map(str::to_string))
    }

    pub async fn login(&self) -> Result<String, SessionError> {
        Ok(self.user().await?.nickname)
    }

    pub async fn email(&self) -> Result<String, SessionError> {
        Ok(self.user().await?.email)
    }

    /// Drop the session. Idempotent; concurrent 403s may both land here.
    pub async fn invalidate(&self) {
        let mut guard = self.user.lock().await;
        *guard = None;
        self.prompt.sign_out();
    }
}
