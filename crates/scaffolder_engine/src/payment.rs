use crate::types::PaymentError;

/// Token handed back by a successful payment interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentToken {
    pub id: String,
}

/// Host-controlled payment capability. Sponsoring asks this for a token
/// before any network call is issued; a dismissal aborts the whole action.
#[async_trait::async_trait]
pub trait PaymentPrompt: Send + Sync {
    async fn collect(
        &self,
        email: &str,
        description: &str,
        amount_cents: u32,
    ) -> Result<PaymentToken, PaymentError>;
}
