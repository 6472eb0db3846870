use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use scaffold_logging::{scaffold_info, scaffold_warn};
use scaffolder_engine::{
    AuthenticatedUser, IdentityPrompt, PaymentError, PaymentPrompt, PaymentToken, SessionError,
};
use tempfile::NamedTempFile;

pub const SESSION_FILENAME: &str = ".scaffolder_session.ron";

pub fn load_cached_user(path: &Path) -> Option<AuthenticatedUser> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
        Err(err) => {
            scaffold_warn!("Failed to read session cache from {:?}: {}", path, err);
            return None;
        }
    };
    match ron::from_str(&content) {
        Ok(user) => {
            scaffold_info!("Restored session from {:?}", path);
            Some(user)
        }
        Err(err) => {
            scaffold_warn!("Failed to parse session cache from {:?}: {}", path, err);
            // An unreadable cache counts as no session at all.
            let _ = fs::remove_file(path);
            None
        }
    }
}

pub fn save_cached_user(path: &Path, user: &AuthenticatedUser) {
    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(user, pretty) {
        Ok(text) => text,
        Err(err) => {
            scaffold_warn!("Failed to serialize session cache: {}", err);
            return;
        }
    };
    if let Err(err) = write_atomically(path, &content) {
        scaffold_warn!("Failed to write session cache to {:?}: {}", path, err);
    }
}

/// Write content to a temp file next to the target, then rename over it.
fn write_atomically(path: &Path, content: &str) -> io::Result<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = NamedTempFile::new_in(dir.unwrap_or(Path::new(".")))?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    if path.exists() {
        fs::remove_file(path)?;
    }
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

/// Headless identity source: hands out the session cached on disk and
/// never opens an interactive sign-in.
pub struct StoredSessionPrompt {
    path: PathBuf,
}

impl StoredSessionPrompt {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait::async_trait]
impl IdentityPrompt for StoredSessionPrompt {
    async fn sign_in(&self) -> Result<AuthenticatedUser, SessionError> {
        load_cached_user(&self.path).ok_or_else(|| {
            SessionError::SignIn(
                "no cached session and no interactive sign-in available".to_string(),
            )
        })
    }

    fn sign_out(&self) {
        let _ = fs::remove_file(&self.path);
    }
}

/// Headless payment source: sponsoring needs an interactive prompt, so
/// every collection attempt counts as dismissed.
pub struct UnattendedPaymentPrompt;

#[async_trait::async_trait]
impl PaymentPrompt for UnattendedPaymentPrompt {
    async fn collect(
        &self,
        _email: &str,
        _description: &str,
        _amount_cents: u32,
    ) -> Result<PaymentToken, PaymentError> {
        Err(PaymentError::Dismissed)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use scaffolder_engine::ProviderIdentity;

    use super::*;

    fn user() -> AuthenticatedUser {
        let mut identities = HashMap::new();
        identities.insert(
            "github".to_string(),
            ProviderIdentity {
                provider: "github".to_string(),
                access_token: Some("gh-token".to_string()),
            },
        );
        AuthenticatedUser {
            user_id: "auth0|123".to_string(),
            nickname: "octofan".to_string(),
            email: "octofan@example.com".to_string(),
            jwt_token: "jwt-1".to_string(),
            photo_url: String::new(),
            identities,
        }
    }

    #[test]
    fn session_cache_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(SESSION_FILENAME);

        save_cached_user(&path, &user());
        let restored = load_cached_user(&path).expect("restored");
        assert_eq!(restored, user());
    }

    #[test]
    fn unreadable_cache_is_dropped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(SESSION_FILENAME);
        fs::write(&path, "not ron at all {{{").expect("write");

        assert!(load_cached_user(&path).is_none());
        assert!(!path.exists(), "corrupt cache file should be removed");
    }
}
