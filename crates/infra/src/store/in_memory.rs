use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use partsapp_auth::{User, VerificationToken};
use partsapp_core::{MaterialId, RoNumber, UserId};
use partsapp_materials::Material;
use partsapp_parts::PartLine;
use partsapp_vehicles::{RepairOrder, WorkQueueEntry};
use partsapp_vendors::{sort_by_name, Vendor};

use super::{
    AuditStore, ExtractSet, ExtractStore, MaterialStore, PartLineStore, RepairOrderStore,
    StoreError, StoreResult, UserStore, VendorStore, VerificationTokenStore, WorkQueueStore,
};
use crate::audit::AuditEvent;

#[derive(Debug, Default)]
struct State {
    repair_orders: BTreeMap<RoNumber, RepairOrder>,
    part_lines: Vec<PartLine>,
    vendors: Vec<Vendor>,
    materials: HashMap<MaterialId, Material>,
    work_queue: BTreeMap<RoNumber, WorkQueueEntry>,
    users: HashMap<UserId, User>,
    tokens: Vec<VerificationToken>,
    audit: Vec<AuditEvent>,
}

/// In-memory shop store.
///
/// Intended for tests/dev. Every method takes the lock once and never holds it
/// across an await point.
#[derive(Debug, Default)]
pub struct InMemoryShopStore {
    state: RwLock<State>,
}

impl InMemoryShopStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| StoreError::Storage("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| StoreError::Storage("in-memory store lock poisoned".to_string()))
    }

    /// Audit events recorded so far, oldest first.
    pub fn audit_events(&self) -> Vec<AuditEvent> {
        self.read().map(|s| s.audit.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl RepairOrderStore for InMemoryShopStore {
    async fn list_repair_orders(&self) -> StoreResult<Vec<RepairOrder>> {
        let mut orders: Vec<RepairOrder> = self.read()?.repair_orders.values().cloned().collect();
        orders.sort_by(|a, b| {
            b.vehicle_in
                .cmp(&a.vehicle_in)
                .then_with(|| a.ro_number.cmp(&b.ro_number))
        });
        Ok(orders)
    }

    async fn get_repair_order(&self, ro_number: RoNumber) -> StoreResult<Option<RepairOrder>> {
        Ok(self.read()?.repair_orders.get(&ro_number).cloned())
    }
}

#[async_trait]
impl PartLineStore for InMemoryShopStore {
    async fn list_part_lines(&self) -> StoreResult<Vec<PartLine>> {
        let mut lines = self.read()?.part_lines.clone();
        lines.sort_by(|a, b| {
            a.ro_number
                .cmp(&b.ro_number)
                .then_with(|| a.vendor_name.cmp(&b.vendor_name))
                .then_with(|| a.part_number.cmp(&b.part_number))
                .then_with(|| a.line.cmp(&b.line))
        });
        Ok(lines)
    }

    async fn part_lines_for(&self, ro_number: RoNumber) -> StoreResult<Vec<PartLine>> {
        let mut lines: Vec<PartLine> = self
            .read()?
            .part_lines
            .iter()
            .filter(|l| l.ro_number == ro_number)
            .cloned()
            .collect();
        lines.sort_by_key(|l| l.line);
        Ok(lines)
    }
}

#[async_trait]
impl VendorStore for InMemoryShopStore {
    async fn list_vendors(&self) -> StoreResult<Vec<Vendor>> {
        let mut vendors = self.read()?.vendors.clone();
        sort_by_name(&mut vendors);
        Ok(vendors)
    }
}

#[async_trait]
impl ExtractStore for InMemoryShopStore {
    async fn replace_extracts(&self, extracts: ExtractSet) -> StoreResult<()> {
        let mut state = self.write()?;
        if let Some(orders) = extracts.repair_orders {
            state.repair_orders = orders.into_iter().map(|o| (o.ro_number, o)).collect();
        }
        if let Some(lines) = extracts.part_lines {
            state.part_lines = lines;
        }
        if let Some(vendors) = extracts.vendors {
            state.vendors = vendors;
        }
        Ok(())
    }
}

#[async_trait]
impl MaterialStore for InMemoryShopStore {
    async fn list_materials(&self) -> StoreResult<Vec<Material>> {
        let mut materials: Vec<Material> = self.read()?.materials.values().cloned().collect();
        materials.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_uuid().cmp(a.id.as_uuid()))
        });
        Ok(materials)
    }

    async fn get_material(&self, id: MaterialId) -> StoreResult<Option<Material>> {
        Ok(self.read()?.materials.get(&id).cloned())
    }

    async fn insert_material(&self, material: Material) -> StoreResult<()> {
        let mut state = self.write()?;
        if state.materials.contains_key(&material.id) {
            return Err(StoreError::Conflict(format!("material {} already exists", material.id)));
        }
        state.materials.insert(material.id, material);
        Ok(())
    }

    async fn update_material(&self, material: Material) -> StoreResult<()> {
        let mut state = self.write()?;
        match state.materials.get_mut(&material.id) {
            Some(existing) => {
                *existing = material;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete_material(&self, id: MaterialId) -> StoreResult<()> {
        match self.write()?.materials.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound),
        }
    }

    async fn count_materials(&self) -> StoreResult<usize> {
        Ok(self.read()?.materials.len())
    }
}

#[async_trait]
impl WorkQueueStore for InMemoryShopStore {
    async fn list_work_queue(&self, department_code: &str) -> StoreResult<Vec<WorkQueueEntry>> {
        Ok(self
            .read()?
            .work_queue
            .values()
            .filter(|e| e.department_code == department_code)
            .cloned()
            .collect())
    }

    async fn get_work_queue_entry(&self, ro_number: RoNumber) -> StoreResult<Option<WorkQueueEntry>> {
        Ok(self.read()?.work_queue.get(&ro_number).cloned())
    }

    async fn insert_work_queue_entry(&self, entry: WorkQueueEntry) -> StoreResult<()> {
        let mut state = self.write()?;
        if state.work_queue.contains_key(&entry.ro_number) {
            return Err(StoreError::Conflict(format!(
                "RO {} is already in the work queue",
                entry.ro_number
            )));
        }
        state.work_queue.insert(entry.ro_number, entry);
        Ok(())
    }

    async fn update_work_queue_entry(&self, entry: WorkQueueEntry) -> StoreResult<()> {
        let mut state = self.write()?;
        match state.work_queue.get_mut(&entry.ro_number) {
            Some(existing) => {
                *existing = entry;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete_work_queue_entry(&self, ro_number: RoNumber) -> StoreResult<()> {
        match self.write()?.work_queue.remove(&ro_number) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound),
        }
    }
}

#[async_trait]
impl UserStore for InMemoryShopStore {
    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let mut users: Vec<User> = self.read()?.users.values().cloned().collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }

    async fn get_user(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let email = email.trim().to_lowercase();
        Ok(self.read()?.users.values().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: User) -> StoreResult<()> {
        let mut state = self.write()?;
        if state.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(format!("user {} already exists", user.email)));
        }
        state.users.insert(user.id, user);
        Ok(())
    }

    async fn update_user(&self, user: User) -> StoreResult<()> {
        let mut state = self.write()?;
        if state.users.values().any(|u| u.email == user.email && u.id != user.id) {
            return Err(StoreError::Conflict(format!("user {} already exists", user.email)));
        }
        match state.users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete_user(&self, id: UserId) -> StoreResult<()> {
        match self.write()?.users.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound),
        }
    }
}

#[async_trait]
impl VerificationTokenStore for InMemoryShopStore {
    async fn insert_verification_token(&self, token: VerificationToken) -> StoreResult<()> {
        let mut state = self.write()?;
        if state
            .tokens
            .iter()
            .any(|t| t.identifier == token.identifier && t.token == token.token)
        {
            return Err(StoreError::Conflict("verification token already exists".to_string()));
        }
        state.tokens.push(token);
        Ok(())
    }

    async fn take_verification_token(
        &self,
        identifier: &str,
        token: &str,
    ) -> StoreResult<Option<VerificationToken>> {
        let identifier = identifier.trim().to_lowercase();
        let mut state = self.write()?;
        let pos = state
            .tokens
            .iter()
            .position(|t| t.identifier == identifier && t.token == token);
        Ok(pos.map(|i| state.tokens.remove(i)))
    }
}

#[async_trait]
impl AuditStore for InMemoryShopStore {
    async fn append_audit(&self, event: AuditEvent) -> StoreResult<()> {
        self.write()?.audit.push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use partsapp_auth::{NewUser, PasswordHasher};
    use partsapp_vehicles::WorkStatus;

    fn ro(n: i64) -> RoNumber {
        RoNumber::new(n).unwrap()
    }

    fn t0() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 1, 8, 0, 0).unwrap()
    }

    fn entry(n: i64) -> WorkQueueEntry {
        WorkQueueEntry {
            ro_number: ro(n),
            department_code: "P".to_string(),
            status: WorkStatus::NotStarted,
            priority: 0,
            created_at: t0(),
            updated_at: t0(),
        }
    }

    #[tokio::test]
    async fn repair_orders_are_replaced_and_listed_newest_first() {
        let store = InMemoryShopStore::new();
        store
            .replace_extracts(ExtractSet {
                repair_orders: Some(vec![
                    RepairOrder::new(ro(1), t0()),
                    RepairOrder::new(ro(2), t0() + Duration::days(1)),
                ]),
                ..ExtractSet::default()
            })
            .await
            .unwrap();
        let listed: Vec<i64> = store
            .list_repair_orders()
            .await
            .unwrap()
            .iter()
            .map(|o| o.ro_number.get())
            .collect();
        assert_eq!(listed, vec![2, 1]);

        store
            .replace_extracts(ExtractSet {
                repair_orders: Some(vec![RepairOrder::new(ro(3), t0())]),
                ..ExtractSet::default()
            })
            .await
            .unwrap();
        assert_eq!(store.list_repair_orders().await.unwrap().len(), 1);
        assert!(store.get_repair_order(ro(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn part_lines_for_one_order_are_sorted_by_line() {
        let store = InMemoryShopStore::new();
        store
            .replace_extracts(ExtractSet {
                part_lines: Some(vec![
                    PartLine::with_quantities(ro(7), 3, 1, 0, 0, 0),
                    PartLine::with_quantities(ro(8), 1, 1, 0, 0, 0),
                    PartLine::with_quantities(ro(7), 1, 1, 0, 0, 0),
                ]),
                ..ExtractSet::default()
            })
            .await
            .unwrap();
        let lines: Vec<i64> = store
            .part_lines_for(ro(7))
            .await
            .unwrap()
            .iter()
            .map(|l| l.line)
            .collect();
        assert_eq!(lines, vec![1, 3]);
    }

    #[tokio::test]
    async fn extracts_leave_tables_not_provided_untouched() {
        let store = InMemoryShopStore::new();
        store
            .replace_extracts(ExtractSet {
                repair_orders: Some(vec![RepairOrder::new(ro(1), t0())]),
                part_lines: Some(vec![PartLine::with_quantities(ro(1), 1, 1, 0, 0, 0)]),
                vendors: None,
            })
            .await
            .unwrap();
        store
            .replace_extracts(ExtractSet {
                part_lines: Some(Vec::new()),
                ..ExtractSet::default()
            })
            .await
            .unwrap();

        assert_eq!(store.list_repair_orders().await.unwrap().len(), 1);
        assert!(store.list_part_lines().await.unwrap().is_empty());
        assert!(store.list_vendors().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn work_queue_conflicts_and_missing_entries() {
        let store = InMemoryShopStore::new();
        store.insert_work_queue_entry(entry(5)).await.unwrap();
        assert!(matches!(
            store.insert_work_queue_entry(entry(5)).await,
            Err(StoreError::Conflict(_))
        ));
        store.delete_work_queue_entry(ro(5)).await.unwrap();
        assert_eq!(store.delete_work_queue_entry(ro(5)).await, Err(StoreError::NotFound));
        assert_eq!(store.update_work_queue_entry(entry(6)).await, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn duplicate_user_email_is_a_conflict() {
        let store = InMemoryShopStore::new();
        let hasher = PasswordHasher::with_iterations(1);
        let new = NewUser {
            email: "tech@shop.test".to_string(),
            password: "password1".to_string(),
            ..NewUser::default()
        };
        store
            .insert_user(new.clone().into_user(&hasher, t0()).unwrap())
            .await
            .unwrap();
        let dup = new.into_user(&hasher, t0()).unwrap();
        assert!(matches!(store.insert_user(dup).await, Err(StoreError::Conflict(_))));
        assert!(store.find_user_by_email(" TECH@shop.test").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn verification_tokens_are_single_use() {
        let store = InMemoryShopStore::new();
        let token = VerificationToken::generate("a@shop.test", t0());
        store.insert_verification_token(token.clone()).await.unwrap();
        let taken = store
            .take_verification_token("a@shop.test", &token.token)
            .await
            .unwrap();
        assert_eq!(taken, Some(token.clone()));
        assert!(store
            .take_verification_token("a@shop.test", &token.token)
            .await
            .unwrap()
            .is_none());
    }
}
