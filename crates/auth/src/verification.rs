use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How long an email verification link stays valid.
pub const VERIFICATION_TTL_HOURS: i64 = 24;

const TOKEN_BYTES: usize = 32;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("invalid or expired verification token")]
    Invalid,

    #[error("token has expired")]
    Expired,
}

/// Single-use email verification token bound to an email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationToken {
    pub identifier: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl VerificationToken {
    /// Fresh random token for `email`, valid for [`VERIFICATION_TTL_HOURS`].
    pub fn generate(email: &str, now: DateTime<Utc>) -> Self {
        let bytes: [u8; TOKEN_BYTES] = rand::random();
        Self {
            identifier: email.trim().to_lowercase(),
            token: hex::encode(bytes),
            expires_at: now + Duration::hours(VERIFICATION_TTL_HOURS),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Check a consumed token. Callers delete the token before calling this,
    /// so both outcomes leave it unusable.
    pub fn check(&self, now: DateTime<Utc>) -> Result<(), VerificationError> {
        if self.is_expired(now) {
            return Err(VerificationError::Expired);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn generates_64_hex_chars() {
        let t = VerificationToken::generate("New@Shop.test", now());
        assert_eq!(t.token.len(), 64);
        assert!(t.token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(t.identifier, "new@shop.test");
        assert_eq!(t.expires_at, now() + Duration::hours(24));
    }

    #[test]
    fn expires_after_a_day() {
        let t = VerificationToken::generate("a@b.test", now());
        assert!(t.check(now() + Duration::hours(24)).is_ok());
        assert_eq!(
            t.check(now() + Duration::hours(24) + Duration::seconds(1)),
            Err(VerificationError::Expired)
        );
    }

    #[test]
    fn tokens_are_unique() {
        let a = VerificationToken::generate("a@b.test", now());
        let b = VerificationToken::generate("a@b.test", now());
        assert_ne!(a.token, b.token);
    }
}
