#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use scaffolder_engine::{
    AuthenticatedUser, IdentityPrompt, PaymentError, PaymentPrompt, PaymentToken,
    ProviderIdentity, SessionError, CODE_HOST_PROVIDER,
};

pub fn user(jwt: &str, code_host_token: &str) -> AuthenticatedUser {
    let mut identities = HashMap::new();
    identities.insert(
        CODE_HOST_PROVIDER.to_string(),
        ProviderIdentity {
            provider: CODE_HOST_PROVIDER.to_string(),
            access_token: Some(code_host_token.to_string()),
        },
    );
    AuthenticatedUser {
        user_id: "auth0|123".to_string(),
        nickname: "octofan".to_string(),
        email: "octofan@example.com".to_string(),
        jwt_token: jwt.to_string(),
        photo_url: "https://avatars.example.com/octofan".to_string(),
        identities,
    }
}

/// Identity prompt stub: hands out a canned user and counts interactions.
#[derive(Default)]
pub struct StubPrompt {
    pub next_user: Option<AuthenticatedUser>,
    pub sign_ins: AtomicUsize,
    pub sign_outs: AtomicUsize,
}

impl StubPrompt {
    pub fn with_user(user: AuthenticatedUser) -> Self {
        Self {
            next_user: Some(user),
            ..Self::default()
        }
    }
}

#[async_trait::async_trait]
impl IdentityPrompt for StubPrompt {
    async fn sign_in(&self) -> Result<AuthenticatedUser, SessionError> {
        self.sign_ins.fetch_add(1, Ordering::SeqCst);
        self.next_user
            .clone()
            .ok_or_else(|| SessionError::SignIn("no interactive sign-in in tests".to_string()))
    }

    fn sign_out(&self) {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
    }
}

/// Payment prompt stub: optionally hands out one canned token.
#[derive(Default)]
pub struct StubPayment {
    pub token: Option<String>,
    pub collected: AtomicUsize,
    pub last_amount: AtomicUsize,
}

impl StubPayment {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
            ..Self::default()
        }
    }
}

#[async_trait::async_trait]
impl PaymentPrompt for StubPayment {
    async fn collect(
        &self,
        _email: &str,
        _description: &str,
        amount_cents: u32,
    ) -> Result<PaymentToken, PaymentError> {
        self.collected.fetch_add(1, Ordering::SeqCst);
        self.last_amount.store(amount_cents as usize, Ordering::SeqCst);
        match &self.token {
            Some(id) => Ok(PaymentToken { id: id.clone() }),
            None => Err(PaymentError::Dismissed),
        }
    }
}

/// Declined-by-default payment stub for flows that must not reach it.
pub fn no_payment() -> Arc<StubPayment> {
    Arc::new(StubPayment::default())
}
