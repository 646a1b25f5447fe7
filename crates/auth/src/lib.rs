//! `partsapp-auth` — authentication and authorization boundary.
//!
//! Decoupled from HTTP and storage: callers hand in users, tokens, and clocks.

pub mod authorize;
pub mod claims;
pub mod jwt;
pub mod password;
pub mod permissions;
pub mod principal;
pub mod rate_limit;
pub mod roles;
pub mod user;
pub mod verification;

pub use authorize::{authorize, AuthzError};
pub use claims::{validate_claims, JwtClaims, TokenValidationError};
pub use jwt::{Hs256JwtValidator, JwtError, JwtValidator};
pub use password::{validate_password, PasswordError, PasswordHasher, MIN_PASSWORD_LEN};
pub use permissions::{permissions_for_roles, Permission};
pub use principal::Principal;
pub use rate_limit::{LoginRateLimiter, RateLimitDecision};
pub use roles::Role;
pub use user::{NewUser, User, UserPatch, UserView};
pub use verification::{VerificationError, VerificationToken, VERIFICATION_TTL_HOURS};
