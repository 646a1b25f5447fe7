//! Persistence boundary for the shop data.
//!
//! Each area gets its own async trait so handlers can be written against the
//! narrowest capability they need. [`ShopStore`] bundles them for wiring.

use async_trait::async_trait;
use thiserror::Error;

use partsapp_auth::{User, VerificationToken};
use partsapp_core::{MaterialId, RoNumber, UserId};
use partsapp_materials::Material;
use partsapp_parts::PartLine;
use partsapp_vehicles::{RepairOrder, WorkQueueEntry};
use partsapp_vendors::Vendor;

use crate::audit::AuditEvent;

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryShopStore;
pub use postgres::PostgresShopStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(String),
}

#[async_trait]
pub trait RepairOrderStore: Send + Sync {
    /// All repair orders, newest `vehicle_in` first.
    async fn list_repair_orders(&self) -> StoreResult<Vec<RepairOrder>>;

    async fn get_repair_order(&self, ro_number: RoNumber) -> StoreResult<Option<RepairOrder>>;
}

#[async_trait]
pub trait PartLineStore: Send + Sync {
    /// All part lines ordered by RO number, vendor, part number, line.
    async fn list_part_lines(&self) -> StoreResult<Vec<PartLine>>;

    /// Lines of one repair order, ordered by line number.
    async fn part_lines_for(&self, ro_number: RoNumber) -> StoreResult<Vec<PartLine>>;
}

#[async_trait]
pub trait VendorStore: Send + Sync {
    /// Vendors ordered by name.
    async fn list_vendors(&self) -> StoreResult<Vec<Vendor>>;
}

/// Tables parsed from one extract upload. `None` leaves that table as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractSet {
    pub repair_orders: Option<Vec<RepairOrder>>,
    pub part_lines: Option<Vec<PartLine>>,
    pub vendors: Option<Vec<Vendor>>,
}

impl ExtractSet {
    pub fn is_empty(&self) -> bool {
        self.repair_orders.is_none() && self.part_lines.is_none() && self.vendors.is_none()
    }
}

#[async_trait]
pub trait ExtractStore: Send + Sync {
    /// Replace every provided table in one step. On error no table changes.
    async fn replace_extracts(&self, extracts: ExtractSet) -> StoreResult<()>;
}

#[async_trait]
pub trait MaterialStore: Send + Sync {
    /// Materials newest first.
    async fn list_materials(&self) -> StoreResult<Vec<Material>>;

    async fn get_material(&self, id: MaterialId) -> StoreResult<Option<Material>>;

    async fn insert_material(&self, material: Material) -> StoreResult<()>;

    /// Overwrite an existing material. Missing id is `NotFound`.
    async fn update_material(&self, material: Material) -> StoreResult<()>;

    async fn delete_material(&self, id: MaterialId) -> StoreResult<()>;

    async fn count_materials(&self) -> StoreResult<usize>;
}

#[async_trait]
pub trait WorkQueueStore: Send + Sync {
    /// Entries of one department, in no particular order.
    async fn list_work_queue(&self, department_code: &str) -> StoreResult<Vec<WorkQueueEntry>>;

    async fn get_work_queue_entry(&self, ro_number: RoNumber) -> StoreResult<Option<WorkQueueEntry>>;

    /// Insert a new entry. An RO already queued is a `Conflict`.
    async fn insert_work_queue_entry(&self, entry: WorkQueueEntry) -> StoreResult<()>;

    async fn update_work_queue_entry(&self, entry: WorkQueueEntry) -> StoreResult<()>;

    async fn delete_work_queue_entry(&self, ro_number: RoNumber) -> StoreResult<()>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Users ordered by email.
    async fn list_users(&self) -> StoreResult<Vec<User>>;

    async fn get_user(&self, id: UserId) -> StoreResult<Option<User>>;

    /// Lookup by (lower-cased) email.
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Insert a new user. A duplicate email is a `Conflict`.
    async fn insert_user(&self, user: User) -> StoreResult<()>;

    async fn update_user(&self, user: User) -> StoreResult<()>;

    async fn delete_user(&self, id: UserId) -> StoreResult<()>;
}

#[async_trait]
pub trait VerificationTokenStore: Send + Sync {
    async fn insert_verification_token(&self, token: VerificationToken) -> StoreResult<()>;

    /// Remove and return the matching token, if any.
    async fn take_verification_token(
        &self,
        identifier: &str,
        token: &str,
    ) -> StoreResult<Option<VerificationToken>>;
}

#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn append_audit(&self, event: AuditEvent) -> StoreResult<()>;
}

/// Everything the API needs from persistence.
pub trait ShopStore:
    RepairOrderStore
    + PartLineStore
    + VendorStore
    + ExtractStore
    + MaterialStore
    + WorkQueueStore
    + UserStore
    + VerificationTokenStore
    + AuditStore
{
}

impl<T> ShopStore for T where
    T: RepairOrderStore
        + PartLineStore
        + VendorStore
        + ExtractStore
        + MaterialStore
        + WorkQueueStore
        + UserStore
        + VerificationTokenStore
        + AuditStore
{
}
