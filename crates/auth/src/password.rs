use sha2::Sha256;
use thiserror::Error;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

const SALT_LEN: usize = 16;
const HASH_LEN: usize = 64;
const DEFAULT_ITERATIONS: u32 = 100_000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    TooShort,

    #[error("stored password hash is malformed")]
    MalformedHash,
}

/// Password policy check for user-chosen passwords.
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordError::TooShort);
    }
    Ok(())
}

/// PBKDF2-HMAC-SHA256 hasher producing `hex(salt):hex(hash)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHasher {
    iterations: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl PasswordHasher {
    /// Hasher with a custom work factor. Hashes are only comparable between
    /// hashers using the same iteration count.
    pub fn with_iterations(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    fn derive(&self, password: &str, salt: &[u8]) -> [u8; HASH_LEN] {
        let mut out = [0u8; HASH_LEN];
        pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, self.iterations, &mut out);
        out
    }

    pub fn hash(&self, password: &str) -> String {
        let salt: [u8; SALT_LEN] = rand::random();
        let hash = self.derive(password, &salt);
        format!("{}:{}", hex::encode(salt), hex::encode(hash))
    }

    /// Check a password against a stored `salt:hash` string.
    pub fn verify(&self, password: &str, stored: &str) -> Result<bool, PasswordError> {
        let (salt_hex, hash_hex) = stored.split_once(':').ok_or(PasswordError::MalformedHash)?;
        let salt = hex::decode(salt_hex).map_err(|_| PasswordError::MalformedHash)?;
        let expected = hex::decode(hash_hex).map_err(|_| PasswordError::MalformedHash)?;
        if salt.is_empty() || expected.len() != HASH_LEN {
            return Err(PasswordError::MalformedHash);
        }

        let computed = self.derive(password, &salt);
        let diff = computed
            .iter()
            .zip(expected.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b));
        Ok(diff == 0)
    }
}
