//! Temporary access credentials and sink identity

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{CLOUD_DOMAIN, SUBJECT_SCHEME};
use crate::errors::{BridgeError, Result};

/// Temporary access key triple with its expiry.
///
/// Field names follow the STS token document (`AccessKeyId`, ...). The expiry
/// is kept as received and parsed on every freshness check so a malformed
/// value fails closed instead of failing at load time.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Credential {
    access_key_id: String,
    access_key_secret: String,
    security_token: String,
    expiration: String,
}

impl Credential {
    pub fn new(
        access_key_id: impl Into<String>,
        access_key_secret: impl Into<String>,
        security_token: impl Into<String>,
        expiration: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
            security_token: security_token.into(),
            expiration: expiration.into(),
        }
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn access_key_secret(&self) -> &str {
        &self.access_key_secret
    }

    pub fn security_token(&self) -> &str {
        &self.security_token
    }

    /// Raw expiry string (ISO8601, e.g. `2024-05-01T12:00:00Z`).
    pub fn expiration(&self) -> &str {
        &self.expiration
    }

    /// Parse the expiry.
    ///
    /// # Errors
    /// Returns the chrono parse error when the expiry is not RFC3339.
    pub fn expires_at(&self) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(&self.expiration).map(|t| t.with_timezone(&Utc))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"<redacted>")
            .field("security_token", &"<redacted>")
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// Cluster, region and account the sink reports for. Fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkIdentity {
    cluster_id: String,
    region: String,
    account_id: String,
}

impl SinkIdentity {
    /// # Errors
    /// Returns `BridgeError::Configuration` when any component is blank.
    pub fn new(
        cluster_id: impl Into<String>,
        region: impl Into<String>,
        account_id: impl Into<String>,
    ) -> Result<Self> {
        let identity = Self {
            cluster_id: cluster_id.into(),
            region: region.into(),
            account_id: account_id.into(),
        };

        for (field, value) in [
            ("cluster id", &identity.cluster_id),
            ("region", &identity.region),
            ("account id", &identity.account_id),
        ] {
            if value.trim().is_empty() {
                return Err(BridgeError::Configuration(format!("{field} must not be empty")));
            }
        }

        Ok(identity)
    }

    pub fn cluster_id(&self) -> &str {
        &self.cluster_id
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// VPC endpoint of the bus service: `{account}.eventbridge.{region}-vpc.aliyuncs.com`.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}.eventbridge.{}-vpc.{}", self.account_id, self.region, CLOUD_DOMAIN)
    }

    /// Leading part of every subject: `acs:cs:{region}:{account}:{cluster}`.
    #[must_use]
    pub fn subject_prefix(&self) -> String {
        format!("{SUBJECT_SCHEME}:{}:{}:{}", self.region, self.account_id, self.cluster_id)
    }
}
