use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Terminal and non-terminal steps reported by the job-progress endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum JobStep {
    Queued,
    Processing,
    Succeeded,
    Failed,
}

/// Opaque handle for one server-side job. Issued by submission, consumed
/// only by progress polls, discarded at a terminal step.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct JobToken(pub String);

impl fmt::Display for JobToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One progress response. `progress_token` is the token for the NEXT poll;
/// the server may rotate it mid-job.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "R: Deserialize<'de>"))]
pub struct JobProgress<R> {
    pub progress_token: JobToken,
    pub current_step: JobStep,
    #[serde(default)]
    pub success_result: Option<R>,
    #[serde(default)]
    pub failure_reason: Option<String>,
}

/// Repository record as the platform backend serves it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlatformRepository {
    pub provider: String,
    pub id: String,
    #[serde(default)]
    pub sponsored: bool,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub my_sponsored: bool,
    #[serde(default)]
    pub favorite_count: u32,
    #[serde(default)]
    pub expiration_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceOwner {
    pub login: String,
    #[serde(rename = "type")]
    pub owner_type: String,
    #[serde(default)]
    pub avatar_url: String,
}

/// Repository record as the code host serves it, trimmed to what we read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceRepository {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    pub owner: SourceOwner,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchResults {
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    pub items: Vec<SourceRepository>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("sign-in failed: {0}")]
    SignIn(String),
    #[error("signed-in account has no linked code-host identity")]
    MissingIdentity,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("payment collection was dismissed")]
    Dismissed,
    #[error("payment was declined: {0}")]
    Declined(String),
}

/// Failures of plain (non-job) API calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("unauthorized or authorization expired; you have been signed out")]
    AuthExpired,
    #[error("{context} ({status}): {message}")]
    Rejected {
        context: String,
        status: u16,
        message: String,
    },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Payment(#[from] PaymentError),
}

/// Failures of the long-poll job protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    #[error("unauthorized or authorization expired; you have been signed out")]
    AuthExpired,
    #[error("{0}")]
    Submission(String),
    #[error("{0}")]
    Job(String),
    #[error("job did not finish within the polling budget")]
    TimedOut,
    #[error("transport error: {0}")]
    Transport(String),
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Debug, Deserialize)]
struct BackendMessage {
    #[serde(rename = "Message")]
    message: String,
}

/// Best-effort human-readable failure text: the backend's `Message` body
/// field when present, the HTTP reason phrase otherwise.
pub(crate) async fn response_message(response: reqwest::Response) -> String {
    let status = response.status();
    match response.json::<BackendMessage>().await {
        Ok(body) => body.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    }
}

pub(crate) async fn expect_success(
    response: reqwest::Response,
    context: &str,
) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response_message(response).await;
    Err(ApiError::Rejected {
        context: context.to_string(),
        status: status.as_u16(),
        message,
    })
}
