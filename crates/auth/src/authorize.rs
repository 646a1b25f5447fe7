use std::collections::HashSet;

use thiserror::Error;

use crate::{Permission, Principal};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Authorize a principal for one permission.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(principal: &Principal, required: &Permission) -> Result<(), AuthzError> {
    let perms: HashSet<&str> = principal.permissions.iter().map(|p| p.as_str()).collect();

    if perms.contains(Permission::WILDCARD) || perms.contains(required.as_str()) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{permissions_for_roles, Role};
    use partsapp_core::UserId;

    fn principal(roles: Vec<Role>) -> Principal {
        Principal {
            user_id: UserId::new(),
            email: "someone@shop.test".to_string(),
            permissions: permissions_for_roles(&roles),
            roles,
        }
    }

    #[test]
    fn wildcard_allows_anything() {
        let p = principal(vec![Role::admin()]);
        assert!(authorize(&p, &Permission::new(Permission::ADMIN_USERS)).is_ok());
        assert!(authorize(&p, &Permission::new("made.up")).is_ok());
    }

    #[test]
    fn technician_is_denied_admin_permissions() {
        let p = principal(vec![Role::technician()]);
        assert!(authorize(&p, &Permission::new(Permission::PARTS_READ)).is_ok());
        assert_eq!(
            authorize(&p, &Permission::new(Permission::ADMIN_IMPORT)),
            Err(AuthzError::Forbidden("admin.import".to_string()))
        );
    }

    #[test]
    fn no_roles_no_access() {
        let p = principal(Vec::new());
        assert!(authorize(&p, &Permission::new(Permission::PARTS_READ)).is_err());
    }
}
