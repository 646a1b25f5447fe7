//! User accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use partsapp_core::{DomainError, DomainResult, UserId};

use crate::password::{validate_password, PasswordHasher};
use crate::Role;

/// A stored user account. Never serialize this to clients; use [`UserView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn view(&self) -> UserView {
        UserView {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role.clone(),
            email_verified_at: self.email_verified_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Apply an admin edit. Password changes are re-hashed.
    pub fn apply_patch(&mut self, patch: &UserPatch, hasher: &PasswordHasher, now: DateTime<Utc>) -> DomainResult<()> {
        let role = match patch.role.as_deref() {
            Some(r) => Some(Role::parse(r).ok_or_else(|| DomainError::validation(format!("unknown role '{r}'")))?),
            None => None,
        };
        if let Some(password) = patch.password.as_deref().filter(|p| !p.is_empty()) {
            validate_password(password).map_err(|e| DomainError::validation(e.to_string()))?;
            self.password_hash = hasher.hash(password);
        }
        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(role) = role {
            self.role = role;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Rename from the user's own profile page. Blank names are rejected.
    pub fn rename(&mut self, name: &str, now: DateTime<Utc>) -> DomainResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name is required"));
        }
        self.name = name.to_string();
        self.updated_at = now;
        Ok(())
    }
}

/// Client-facing projection of a user (no password hash).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Admin request to create an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl NewUser {
    /// Validate, hash the password, and build the account.
    ///
    /// Name defaults to the email; role defaults to technician.
    pub fn into_user(self, hasher: &PasswordHasher, now: DateTime<Utc>) -> DomainResult<User> {
        let email = self.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::validation("a valid email is required"));
        }
        validate_password(&self.password).map_err(|e| DomainError::validation(e.to_string()))?;
        let role = match self.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
            Some(r) => Role::parse(r).ok_or_else(|| DomainError::validation(format!("unknown role '{r}'")))?,
            None => Role::default(),
        };
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| email.clone());

        Ok(User {
            id: UserId::new(),
            password_hash: hasher.hash(&self.password),
            email,
            name,
            role,
            email_verified_at: None,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Admin edit of an account. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}
