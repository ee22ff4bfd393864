//! Credential providers

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use kube_eventbridge_core::CredentialProvider;
use kube_eventbridge_domain::{BridgeError, Credential, Result};
use tracing::{debug, instrument};

/// Token file mounted into addon pods.
pub const DEFAULT_TOKEN_PATH: &str = "/var/addon/token-config";

/// Expiry assigned to long-term keys that carry none.
const NON_EXPIRING: &str = "9999-12-31T23:59:59Z";

/// Reads a temporary credential from a JSON token document on disk.
///
/// The file is re-read on every fetch so rotated tokens are picked up without
/// restarting the sink.
#[derive(Debug, Clone)]
pub struct FileCredentialProvider {
    path: PathBuf,
}

impl FileCredentialProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileCredentialProvider {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_PATH)
    }
}

#[async_trait]
impl CredentialProvider for FileCredentialProvider {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch(&self) -> Result<Credential> {
        let raw = tokio::fs::read(&self.path).await.map_err(|err| {
            BridgeError::Credential(format!("failed to read {}: {err}", self.path.display()))
        })?;

        let credential: Credential = serde_json::from_slice(&raw).map_err(|err| {
            BridgeError::Credential(format!("malformed token file {}: {err}", self.path.display()))
        })?;

        if credential.access_key_id().is_empty() || credential.access_key_secret().is_empty() {
            return Err(BridgeError::Credential(format!(
                "token file {} has no access key",
                self.path.display()
            )));
        }

        debug!(
            access_key_id = credential.access_key_id(),
            expiration = credential.expiration(),
            "loaded credential"
        );
        Ok(credential)
    }
}

/// Always returns the same credential.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credential: Credential,
}

impl StaticCredentialProvider {
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }

    /// Keys from `KUBE_EVENTBRIDGE_ACCESS_KEY_ID` and
    /// `KUBE_EVENTBRIDGE_ACCESS_KEY_SECRET`, with optional
    /// `KUBE_EVENTBRIDGE_SECURITY_TOKEN` and `KUBE_EVENTBRIDGE_EXPIRATION`.
    ///
    /// Returns `None` when no access key id is set.
    ///
    /// # Errors
    /// Returns `BridgeError::Credential` if the key id is set without a secret.
    pub fn from_env() -> Result<Option<Self>> {
        let Ok(access_key_id) = std::env::var("KUBE_EVENTBRIDGE_ACCESS_KEY_ID") else {
            return Ok(None);
        };
        let access_key_secret = std::env::var("KUBE_EVENTBRIDGE_ACCESS_KEY_SECRET").map_err(|_| {
            BridgeError::Credential("KUBE_EVENTBRIDGE_ACCESS_KEY_SECRET is not set".to_string())
        })?;
        let security_token = std::env::var("KUBE_EVENTBRIDGE_SECURITY_TOKEN").unwrap_or_default();
        let expiration = std::env::var("KUBE_EVENTBRIDGE_EXPIRATION")
            .unwrap_or_else(|_| NON_EXPIRING.to_string());

        Ok(Some(Self::new(Credential::new(
            access_key_id,
            access_key_secret,
            security_token,
            expiration,
        ))))
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn fetch(&self) -> Result<Credential> {
        Ok(self.credential.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn token_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write");
        file
    }

    #[tokio::test]
    async fn reads_sts_token_document() {
        let file = token_file(
            r#"{
                "AccessKeyId": "STS.abc",
                "AccessKeySecret": "secret",
                "SecurityToken": "token",
                "Expiration": "2099-01-01T00:00:00Z"
            }"#,
        );

        let credential = FileCredentialProvider::new(file.path()).fetch().await.expect("credential");

        assert_eq!(credential.access_key_id(), "STS.abc");
        assert_eq!(credential.security_token(), "token");
        assert_eq!(credential.expiration(), "2099-01-01T00:00:00Z");
    }

    #[tokio::test]
    async fn missing_file_is_credential_error() {
        let provider = FileCredentialProvider::new("/nonexistent/token-config");

        let err = provider.fetch().await.unwrap_err();

        assert!(matches!(err, BridgeError::Credential(_)));
    }

    #[tokio::test]
    async fn malformed_document_is_credential_error() {
        let file = token_file("not json");

        let err = FileCredentialProvider::new(file.path()).fetch().await.unwrap_err();

        assert!(matches!(err, BridgeError::Credential(msg) if msg.contains("malformed")));
    }

    #[tokio::test]
    async fn blank_access_key_is_rejected() {
        let file = token_file(
            r#"{"AccessKeyId":"","AccessKeySecret":"s","SecurityToken":"t","Expiration":"2099-01-01T00:00:00Z"}"#,
        );

        let err = FileCredentialProvider::new(file.path()).fetch().await.unwrap_err();

        assert!(matches!(err, BridgeError::Credential(_)));
    }

    #[test]
    fn default_path_is_addon_token() {
        assert_eq!(FileCredentialProvider::default().path(), Path::new(DEFAULT_TOKEN_PATH));
    }

    #[tokio::test]
    async fn static_provider_returns_its_credential() {
        let credential = Credential::new("AK", "secret", "", NON_EXPIRING);
        let provider = StaticCredentialProvider::new(credential.clone());

        assert_eq!(provider.fetch().await.expect("credential"), credential);
    }
}
