//! API-side authorization guard.
//!
//! Handlers call [`require`] before touching the store, keeping the store and
//! domain crates auth-agnostic.

use partsapp_auth::{authorize, AuthzError, Permission};

use crate::context::PrincipalContext;

/// Check one permission for the current request's principal.
pub fn require(principal: &PrincipalContext, permission: &'static str) -> Result<(), AuthzError> {
    authorize(principal.principal(), &Permission::new(permission))
}

#[cfg(test)]
mod tests {
    use super::*;
    use partsapp_auth::{permissions_for_roles, Principal, Role};
    use partsapp_core::UserId;

    fn ctx(role: Role) -> PrincipalContext {
        let roles = vec![role];
        PrincipalContext::new(Principal {
            user_id: UserId::new(),
            email: "x@shop.test".to_string(),
            permissions: permissions_for_roles(&roles),
            roles,
        })
    }

    #[test]
    fn technicians_cannot_reach_admin_permissions() {
        let tech = ctx(Role::technician());
        assert!(require(&tech, Permission::PARTS_READ).is_ok());
        assert!(require(&tech, Permission::ADMIN_USERS).is_err());
        assert!(require(&ctx(Role::admin()), Permission::ADMIN_USERS).is_ok());
    }
}
