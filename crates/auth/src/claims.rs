use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use partsapp_core::UserId;

use crate::Role;

/// JWT claims carried by bearer tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject / user identifier.
    pub sub: UserId,

    pub email: String,

    pub roles: Vec<Role>,

    pub issued_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,

    #[error("invalid token: {0}")]
    Malformed(String),
}

/// Deterministically validate JWT claims.
///
/// Validates the claims only; signature verification happens in
/// [`crate::Hs256JwtValidator`].
pub fn validate_claims(claims: &JwtClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn claims(issued: DateTime<Utc>, ttl_minutes: i64) -> JwtClaims {
        JwtClaims {
            sub: UserId::new(),
            email: "a@b.test".to_string(),
            roles: vec![Role::technician()],
            issued_at: issued,
            expires_at: issued + Duration::minutes(ttl_minutes),
        }
    }

    #[test]
    fn window_checks() {
        let t0 = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let c = claims(t0, 10);
        assert_eq!(validate_claims(&c, t0), Ok(()));
        assert_eq!(validate_claims(&c, t0 - Duration::seconds(1)), Err(TokenValidationError::NotYetValid));
        assert_eq!(validate_claims(&c, t0 + Duration::minutes(10)), Err(TokenValidationError::Expired));
        assert_eq!(validate_claims(&claims(t0, 0), t0), Err(TokenValidationError::InvalidTimeWindow));
    }
}
