//! Credential freshness policy
//!
//! Decides whether a cached credential can still be used for a new transport
//! operation. A credential is fresh only while more than the refresh margin
//! (10 minutes by default) of its lifetime remains:
//!
//! - expiry already passed → stale
//! - expiry within the margin → stale, refresh ahead of time
//! - expiry not parsable → stale (fails closed, logged)

use chrono::{DateTime, Duration, Utc};
use kube_eventbridge_domain::constants::CREDENTIAL_REFRESH_MARGIN_SECS;
use kube_eventbridge_domain::Credential;
use tracing::{error, warn};

/// Freshness check applied before reusing a cached client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessPolicy {
    margin: Duration,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self { margin: Duration::seconds(CREDENTIAL_REFRESH_MARGIN_SECS) }
    }
}

impl FreshnessPolicy {
    /// Policy with a custom refresh margin.
    #[must_use]
    pub const fn with_margin(margin: Duration) -> Self {
        Self { margin }
    }

    /// Check the credential against the current wall clock.
    #[must_use]
    pub fn is_valid(&self, credential: &Credential) -> bool {
        self.is_valid_at(credential, Utc::now())
    }

    /// Check the credential against `now`.
    ///
    /// Never errors: a malformed expiry is logged and treated as stale so the
    /// caller fetches a new credential.
    #[must_use]
    pub fn is_valid_at(&self, credential: &Credential, now: DateTime<Utc>) -> bool {
        let expires_at = match credential.expires_at() {
            Ok(expires_at) => expires_at,
            Err(err) => {
                error!(
                    expiration = credential.expiration(),
                    error = %err,
                    "failed to parse credential expiration"
                );
                return false;
            }
        };

        if expires_at <= now {
            error!(%expires_at, "credential has expired");
            return false;
        }

        let refresh_due = expires_at.checked_sub_signed(self.margin).map_or(true, |at| at <= now);
        if refresh_due {
            warn!(
                %expires_at,
                margin_secs = self.margin.num_seconds(),
                "credential expires within refresh margin, should refresh it"
            );
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use chrono::SecondsFormat;

    use super::*;

    fn credential_expiring_in(now: DateTime<Utc>, minutes: i64) -> Credential {
        let expiry = (now + Duration::minutes(minutes)).to_rfc3339_opts(SecondsFormat::Secs, true);
        Credential::new("akid", "secret", "token", expiry)
    }

    #[test]
    fn credential_with_twenty_minutes_left_is_valid() {
        let now = Utc::now();
        let policy = FreshnessPolicy::default();
        assert!(policy.is_valid_at(&credential_expiring_in(now, 20), now));
    }

    // The margin is enforced: a credential that has not yet expired is still
    // stale once fewer than ten minutes remain.
    #[test]
    fn credential_within_refresh_margin_is_stale() {
        let now = Utc::now();
        let policy = FreshnessPolicy::default();
        assert!(!policy.is_valid_at(&credential_expiring_in(now, 5), now));
    }

    #[test]
    fn expired_credential_is_stale() {
        let now = Utc::now();
        let policy = FreshnessPolicy::default();
        assert!(!policy.is_valid_at(&credential_expiring_in(now, -1), now));
    }

    #[test]
    fn unparsable_expiry_fails_closed() {
        let policy = FreshnessPolicy::default();
        let credential = Credential::new("akid", "secret", "token", "not-a-timestamp");
        assert!(!policy.is_valid(&credential));
    }

    #[test]
    fn go_style_layout_is_accepted() {
        let now = DateTime::parse_from_rfc3339("2024-05-01T11:00:00Z").unwrap().with_timezone(&Utc);
        let credential = Credential::new("akid", "secret", "token", "2024-05-01T12:00:00Z");
        assert!(FreshnessPolicy::default().is_valid_at(&credential, now));
    }

    #[test]
    fn custom_margin_is_applied() {
        let now = Utc::now();
        let policy = FreshnessPolicy::with_margin(Duration::minutes(30));
        assert!(!policy.is_valid_at(&credential_expiring_in(now, 20), now));
        assert!(policy.is_valid_at(&credential_expiring_in(now, 45), now));
    }

    #[test]
    fn margin_beyond_representable_range_is_stale() {
        let now = Utc::now();
        let policy = FreshnessPolicy::with_margin(Duration::MAX);
        assert!(!policy.is_valid_at(&credential_expiring_in(now, 60), now));
    }
}
