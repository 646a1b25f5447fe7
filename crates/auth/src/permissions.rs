use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::Role;

/// Permission identifier.
///
/// Permissions are opaque strings (e.g. "parts.read"). The wildcard `"*"`
/// grants everything and is held by administrators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const WILDCARD: &'static str = "*";

    pub const REPAIR_ORDERS_READ: &'static str = "repair_orders.read";
    pub const PARTS_READ: &'static str = "parts.read";
    pub const SCHEDULE_READ: &'static str = "schedule.read";
    pub const DELIVERIES_READ: &'static str = "deliveries.read";
    pub const VENDORS_READ: &'static str = "vendors.read";
    pub const MATERIALS_READ: &'static str = "materials.read";
    pub const MATERIALS_CREATE: &'static str = "materials.create";
    pub const WORK_QUEUE_READ: &'static str = "work_queue.read";
    pub const WORK_QUEUE_WRITE: &'static str = "work_queue.write";
    pub const PROFILE_UPDATE: &'static str = "profile.update";

    pub const ADMIN_USERS: &'static str = "admin.users";
    pub const ADMIN_MATERIALS: &'static str = "admin.materials";
    pub const ADMIN_IMPORT: &'static str = "admin.import";
    pub const ADMIN_DEBUG: &'static str = "admin.debug";

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == Self::WILDCARD
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything a shop-floor user (estimator or technician) may do.
const SHOP_FLOOR: &[&str] = &[
    Permission::REPAIR_ORDERS_READ,
    Permission::PARTS_READ,
    Permission::SCHEDULE_READ,
    Permission::DELIVERIES_READ,
    Permission::VENDORS_READ,
    Permission::MATERIALS_READ,
    Permission::MATERIALS_CREATE,
    Permission::WORK_QUEUE_READ,
    Permission::WORK_QUEUE_WRITE,
    Permission::PROFILE_UPDATE,
];

/// Role → permission policy.
///
/// Unknown roles grant nothing.
pub fn permissions_for_roles(roles: &[Role]) -> Vec<Permission> {
    if roles.iter().any(Role::is_admin) {
        return vec![Permission::new(Permission::WILDCARD)];
    }

    let shop_floor = roles
        .iter()
        .any(|r| matches!(r.as_str(), Role::ESTIMATOR | Role::TECHNICIAN));
    if shop_floor {
        return SHOP_FLOOR.iter().map(|p| Permission::new(*p)).collect();
    }

    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_gets_wildcard() {
        let perms = permissions_for_roles(&[Role::technician(), Role::admin()]);
        assert_eq!(perms.len(), 1);
        assert!(perms[0].is_wildcard());
    }

    #[test]
    fn shop_floor_roles_share_permissions() {
        let tech = permissions_for_roles(&[Role::technician()]);
        let est = permissions_for_roles(&[Role::estimator()]);
        assert_eq!(tech, est);
        assert!(tech.iter().any(|p| p.as_str() == Permission::WORK_QUEUE_WRITE));
        assert!(!tech.iter().any(|p| p.as_str().starts_with("admin.")));
    }

    #[test]
    fn unknown_roles_get_nothing() {
        assert!(permissions_for_roles(&[Role::new("viewer")]).is_empty());
        assert!(permissions_for_roles(&[]).is_empty());
    }
}
