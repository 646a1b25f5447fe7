use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier used for RBAC.
///
/// Stored and transported as an opaque upper-case string. The three shop roles
/// are exposed as constructors; anything else is rejected by [`Role::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const ADMIN: &'static str = "ADMIN";
    pub const ESTIMATOR: &'static str = "ESTIMATOR";
    pub const TECHNICIAN: &'static str = "TECHNICIAN";

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn admin() -> Self {
        Self::new(Self::ADMIN)
    }

    pub fn estimator() -> Self {
        Self::new(Self::ESTIMATOR)
    }

    pub fn technician() -> Self {
        Self::new(Self::TECHNICIAN)
    }

    /// Parse one of the known shop roles (case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            Self::ADMIN => Some(Self::admin()),
            Self::ESTIMATOR => Some(Self::estimator()),
            Self::TECHNICIAN => Some(Self::technician()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_admin(&self) -> bool {
        self.as_str() == Self::ADMIN
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::technician()
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_roles_only() {
        assert_eq!(Role::parse("admin"), Some(Role::admin()));
        assert_eq!(Role::parse(" Estimator "), Some(Role::estimator()));
        assert_eq!(Role::parse("janitor"), None);
    }

    #[test]
    fn default_is_technician() {
        assert_eq!(Role::default().as_str(), "TECHNICIAN");
        assert!(!Role::default().is_admin());
    }
}
