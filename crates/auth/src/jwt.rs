use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::claims::{validate_claims, JwtClaims, TokenValidationError};
use crate::user::User;

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("failed to sign token: {0}")]
    Encode(#[from] jsonwebtoken::errors::Error),
}

/// Verifies bearer tokens and returns their claims.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenValidationError>;
}

/// HMAC-SHA256 token issuer and validator sharing one secret.
pub struct Hs256JwtValidator {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl Hs256JwtValidator {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();
        let mut validation = Validation::new(Algorithm::HS256);
        // Time claims are ours (issued_at / expires_at), checked by `validate_claims`.
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_aud = false;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn sign(&self, claims: &JwtClaims) -> Result<String, JwtError> {
        Ok(jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)?)
    }

    /// Issue a session token for a user.
    pub fn issue_for(&self, user: &User, ttl: Duration, now: DateTime<Utc>) -> Result<String, JwtError> {
        let claims = JwtClaims {
            sub: user.id,
            email: user.email.clone(),
            roles: vec![user.role.clone()],
            issued_at: now,
            expires_at: now + ttl,
        };
        self.sign(&claims)
    }
}

impl JwtValidator for Hs256JwtValidator {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenValidationError> {
        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| TokenValidationError::Malformed(e.to_string()))?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;
    use chrono::TimeZone;
    use partsapp_core::UserId;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()
    }

    fn claims() -> JwtClaims {
        JwtClaims {
            sub: UserId::new(),
            email: "rita@shop.test".to_string(),
            roles: vec![Role::estimator()],
            issued_at: now(),
            expires_at: now() + Duration::minutes(30),
        }
    }

    #[test]
    fn signed_token_validates() {
        let jwt = Hs256JwtValidator::new("secret");
        let c = claims();
        let token = jwt.sign(&c).unwrap();
        assert_eq!(jwt.validate(&token, now() + Duration::minutes(1)).unwrap(), c);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = Hs256JwtValidator::new("secret").sign(&claims()).unwrap();
        let other = Hs256JwtValidator::new("other");
        assert!(matches!(other.validate(&token, now()), Err(TokenValidationError::Malformed(_))));
    }

    #[test]
    fn expired_token_is_rejected() {
        let jwt = Hs256JwtValidator::new("secret");
        let token = jwt.sign(&claims()).unwrap();
        assert_eq!(
            jwt.validate(&token, now() + Duration::hours(1)),
            Err(TokenValidationError::Expired)
        );
    }

    #[test]
    fn garbage_is_rejected() {
        let jwt = Hs256JwtValidator::new("secret");
        assert!(jwt.validate("not-a-jwt", now()).is_err());
    }
}
