use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use scaffold_logging::{scaffold_debug, scaffold_info, scaffold_warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::session::Session;
use crate::types::{response_message, JobError, JobProgress, JobStep, JobToken};

#[derive(Debug, Clone)]
pub struct PollerSettings {
    /// Delay between two progress polls for the same job.
    pub poll_interval: Duration,
    /// Optional cap on non-terminal progress responses before giving up.
    /// `None` trusts the server to terminate every job.
    pub max_attempts: Option<u32>,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(1000),
            max_attempts: None,
        }
    }
}

#[derive(Serialize)]
struct FindKeysRequest<'a> {
    repository_owner: &'a str,
    repository_name: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateRepositoryRequest {
    pub template_repository_owner: String,
    pub template_repository_name: String,
    pub destination_repository_owner: String,
    pub destination_repository_name: String,
    pub replacements: BTreeMap<String, String>,
}

/// Drives one server-side job from submission to a terminal outcome,
/// hiding the polling cadence behind a single future.
///
/// Each drive owns exactly one in-flight job and issues a poll only after
/// the previous response arrived; there are never two outstanding polls
/// for the same token.
pub struct JobPoller {
    client: reqwest::Client,
    base_url: Url,
    session: Arc<Session>,
    settings: PollerSettings,
}

impl JobPoller {
    pub fn new(
        base_url: Url,
        session: Arc<Session>,
        settings: PollerSettings,
    ) -> Result<Self, JobError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| JobError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            base_url,
            session,
            settings,
        })
    }

    /// Discover the replacement keys embedded in a template repository.
    /// Works without a session; the backend just sees less.
    pub async fn find_keys(
        &self,
        repository_owner: &str,
        repository_name: &str,
    ) -> Result<Vec<String>, JobError> {
        let jwt = self.session.maybe_jwt().await;
        let request = FindKeysRequest {
            repository_owner,
            repository_name,
        };
        self.run("api/find_keys_in_repo", "replacement discovery", &request, jwt)
            .await
    }

    /// Create the destination repository from a template. Requires a
    /// session; returns the destination URL reported by the backend.
    pub async fn create_repository(
        &self,
        request: &CreateRepositoryRequest,
    ) -> Result<String, JobError> {
        let jwt = self.session.jwt().await?;
        self.run("api/create_repository", "repository creation", request, Some(jwt))
            .await
    }

    async fn run<B, R>(
        &self,
        endpoint: &str,
        label: &str,
        body: &B,
        jwt: Option<String>,
    ) -> Result<R, JobError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let submit_url = self.join(endpoint)?;
        let mut request = self
            .client
            .post(submit_url)
            .json(body)
            .header(ACCEPT, "application/json");
        if let Some(jwt) = &jwt {
            request = request.bearer_auth(jwt);
        }
        let response = request
            .send()
            .await
            .map_err(|err| JobError::Transport(err.to_string()))?;
        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            scaffold_warn!("{label} submission rejected with 403; invalidating session");
            self.session.invalidate().await;
            return Err(JobError::AuthExpired);
        }
        if !status.is_success() {
            let message = response_message(response).await;
            return Err(JobError::Submission(format!(
                "failed to initiate {label} ({}): {message}",
                status.as_u16()
            )));
        }
        let mut token: JobToken = response
            .json()
            .await
            .map_err(|err| JobError::Transport(err.to_string()))?;
        scaffold_info!("{label} job submitted, token {token}");

        let mut pending_polls: u32 = 0;
        loop {
            let progress_url = self.join(&format!("{endpoint}/progress/{token}"))?;
            let mut request = self.client.get(progress_url).header(ACCEPT, "application/json");
            if let Some(jwt) = &jwt {
                request = request.bearer_auth(jwt);
            }
            let response = request
                .send()
                .await
                .map_err(|err| JobError::Transport(err.to_string()))?;
            let status = response.status();
            if status == StatusCode::FORBIDDEN {
                scaffold_warn!("{label} progress rejected with 403; invalidating session");
                self.session.invalidate().await;
                return Err(JobError::AuthExpired);
            }
            if !status.is_success() {
                let message = response_message(response).await;
                return Err(JobError::Submission(format!(
                    "failed to get a progress update for {label} ({}): {message}",
                    status.as_u16()
                )));
            }
            let progress: JobProgress<R> = response
                .json()
                .await
                .map_err(|err| JobError::Transport(err.to_string()))?;
            match progress.current_step {
                JobStep::Succeeded => {
                    scaffold_info!("{label} job succeeded");
                    return progress.success_result.ok_or_else(|| {
                        JobError::Transport(
                            "progress reported success without a result".to_string(),
                        )
                    });
                }
                JobStep::Failed => {
                    let reason = progress
                        .failure_reason
                        .unwrap_or_else(|| format!("{label} failed without a reason"));
                    return Err(JobError::Job(reason));
                }
                JobStep::Queued | JobStep::Processing => {
                    pending_polls += 1;
                    if let Some(max) = self.settings.max_attempts {
                        if pending_polls >= max {
                            scaffold_warn!("{label} exceeded {max} pending polls; giving up");
                            return Err(JobError::TimedOut);
                        }
                    }
                    scaffold_debug!("{label} still {:?}, polling again", progress.current_step);
                    // The server may hand out a fresh token on every poll.
                    token = progress.progress_token;
                    tokio::time::sleep(self.settings.poll_interval).await;
                }
            }
        }
    }

    fn join(&self, path: &str) -> Result<Url, JobError> {
        self.base_url
            .join(path)
            .map_err(|err| JobError::Transport(err.to_string()))
    }
}
