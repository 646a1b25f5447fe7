//! Postgres-backed shop store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Conflict` |
//! | Database (other) | Any other | `Storage` |
//! | PoolClosed / Io / other | N/A | `Storage` |
//!
//! Bulk replacement of the CSV extracts deletes and re-inserts every uploaded
//! table inside one transaction: an upload lands whole or not at all.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgConnection, PgPool, Row};
use tracing::instrument;

use partsapp_auth::{Role, User, VerificationToken};
use partsapp_core::{MaterialId, RoNumber, UserId};
use partsapp_materials::Material;
use partsapp_parts::PartLine;
use partsapp_vehicles::{RepairOrder, WorkQueueEntry, WorkStatus};
use partsapp_vendors::{ContactInfo, Vendor};

use super::{
    AuditStore, ExtractSet, ExtractStore, MaterialStore, PartLineStore, RepairOrderStore,
    StoreError, StoreResult, UserStore, VendorStore, VerificationTokenStore, WorkQueueStore,
};
use crate::audit::AuditEvent;

const SCHEMA: &str = include_str!("../../migrations/schema.sql");
const MAX_CONNECTIONS: u32 = 10;

const REPAIR_ORDER_COLUMNS: &str = "ro_number, owner, vehicle, vehicle_color, license_plate_number, \
     parts_received_pct, vehicle_in, current_phase, scheduled_out, body_technician, estimator";

const PART_LINE_COLUMNS: &str = "ro_number, line, part_number, part_description, part_type, vendor_name, \
     requested_qty, ordered_qty, received_qty, returned_qty, ordered_date, expected_delivery, invoice_date";

const MATERIAL_COLUMNS: &str = "id, body_technician, part_number, description, ordered_qty, ordered_date, \
     unit_type, received_qty, received_date, created_at";

const USER_COLUMNS: &str =
    "id, email, name, password_hash, role, email_verified_at, created_at, updated_at";

const WORK_QUEUE_COLUMNS: &str = "ro_number, department_code, status, priority, created_at, updated_at";

/// Postgres shop store sharing one connection pool.
#[derive(Debug, Clone)]
pub struct PostgresShopStore {
    pool: Arc<PgPool>,
}

impl PostgresShopStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Apply the bundled schema. Safe to run on every start.
    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("migrate", e))?;
        Ok(())
    }
}

#[async_trait]
impl RepairOrderStore for PostgresShopStore {
    #[instrument(skip(self), err)]
    async fn list_repair_orders(&self) -> StoreResult<Vec<RepairOrder>> {
        let rows = sqlx::query(&format!(
            "SELECT {REPAIR_ORDER_COLUMNS} FROM repair_orders ORDER BY vehicle_in DESC, ro_number ASC"
        ))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_repair_orders", e))?;
        rows.iter().map(repair_order_from_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn get_repair_order(&self, ro_number: RoNumber) -> StoreResult<Option<RepairOrder>> {
        let row = sqlx::query(&format!(
            "SELECT {REPAIR_ORDER_COLUMNS} FROM repair_orders WHERE ro_number = $1"
        ))
        .bind(ro_number.get())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_repair_order", e))?;
        row.as_ref().map(repair_order_from_row).transpose()
    }
}

#[async_trait]
impl PartLineStore for PostgresShopStore {
    #[instrument(skip(self), err)]
    async fn list_part_lines(&self) -> StoreResult<Vec<PartLine>> {
        let rows = sqlx::query(&format!(
            "SELECT {PART_LINE_COLUMNS} FROM part_lines \
             ORDER BY ro_number ASC, vendor_name ASC, part_number ASC, line ASC"
        ))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_part_lines", e))?;
        rows.iter().map(part_line_from_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn part_lines_for(&self, ro_number: RoNumber) -> StoreResult<Vec<PartLine>> {
        let rows = sqlx::query(&format!(
            "SELECT {PART_LINE_COLUMNS} FROM part_lines WHERE ro_number = $1 ORDER BY line ASC"
        ))
        .bind(ro_number.get())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("part_lines_for", e))?;
        rows.iter().map(part_line_from_row).collect()
    }
}

#[async_trait]
impl VendorStore for PostgresShopStore {
    #[instrument(skip(self), err)]
    async fn list_vendors(&self) -> StoreResult<Vec<Vendor>> {
        let rows = sqlx::query(
            r#"
            SELECT vendor_name, primary_phone, fax, address, city, state, zip, preferred, electronic
            FROM vendors
            ORDER BY vendor_name ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_vendors", e))?;
        rows.iter().map(vendor_from_row).collect()
    }
}

#[async_trait]
impl ExtractStore for PostgresShopStore {
    #[instrument(
        skip(self, extracts),
        fields(
            repair_orders = extracts.repair_orders.as_ref().map(Vec::len),
            part_lines = extracts.part_lines.as_ref().map(Vec::len),
            vendors = extracts.vendors.as_ref().map(Vec::len),
        ),
        err
    )]
    async fn replace_extracts(&self, extracts: ExtractSet) -> StoreResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("replace_extracts.begin", e))?;

        if let Some(orders) = &extracts.repair_orders {
            write_repair_orders(&mut *tx, orders).await?;
        }
        if let Some(lines) = &extracts.part_lines {
            write_part_lines(&mut *tx, lines).await?;
        }
        if let Some(vendors) = &extracts.vendors {
            write_vendors(&mut *tx, vendors).await?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("replace_extracts.commit", e))
    }
}

async fn write_repair_orders(conn: &mut PgConnection, orders: &[RepairOrder]) -> StoreResult<()> {
    sqlx::query("DELETE FROM repair_orders")
        .execute(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error("replace_extracts.repair_orders.delete", e))?;

    for o in orders {
        sqlx::query(&format!(
            "INSERT INTO repair_orders ({REPAIR_ORDER_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"
        ))
        .bind(o.ro_number.get())
        .bind(&o.owner)
        .bind(&o.vehicle)
        .bind(&o.vehicle_color)
        .bind(&o.license_plate_number)
        .bind(o.parts_received_pct)
        .bind(o.vehicle_in)
        .bind(&o.current_phase)
        .bind(o.scheduled_out)
        .bind(&o.body_technician)
        .bind(&o.estimator)
        .execute(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error("replace_extracts.repair_orders.insert", e))?;
    }

    Ok(())
}

async fn write_part_lines(conn: &mut PgConnection, lines: &[PartLine]) -> StoreResult<()> {
    sqlx::query("DELETE FROM part_lines")
        .execute(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error("replace_extracts.part_lines.delete", e))?;

    for l in lines {
        sqlx::query(&format!(
            "INSERT INTO part_lines ({PART_LINE_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)"
        ))
        .bind(l.ro_number.get())
        .bind(l.line)
        .bind(&l.part_number)
        .bind(&l.part_description)
        .bind(&l.part_type)
        .bind(&l.vendor_name)
        .bind(l.requested_qty)
        .bind(l.ordered_qty)
        .bind(l.received_qty)
        .bind(l.returned_qty)
        .bind(l.ordered_date)
        .bind(l.expected_delivery)
        .bind(l.invoice_date)
        .execute(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error("replace_extracts.part_lines.insert", e))?;
    }

    Ok(())
}

async fn write_vendors(conn: &mut PgConnection, vendors: &[Vendor]) -> StoreResult<()> {
    sqlx::query("DELETE FROM vendors")
        .execute(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error("replace_extracts.vendors.delete", e))?;

    for v in vendors {
        let c = v.contact();
        sqlx::query(
            r#"
            INSERT INTO vendors (
                vendor_name, primary_phone, fax, address, city, state, zip, preferred, electronic
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(v.vendor_name())
        .bind(&c.primary_phone)
        .bind(&c.fax)
        .bind(&c.address)
        .bind(&c.city)
        .bind(&c.state)
        .bind(&c.zip)
        .bind(v.preferred())
        .bind(v.electronic())
        .execute(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error("replace_extracts.vendors.insert", e))?;
    }

    Ok(())
}

#[async_trait]
impl MaterialStore for PostgresShopStore {
    #[instrument(skip(self), err)]
    async fn list_materials(&self) -> StoreResult<Vec<Material>> {
        let rows = sqlx::query(&format!(
            "SELECT {MATERIAL_COLUMNS} FROM materials ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_materials", e))?;
        rows.iter().map(material_from_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn get_material(&self, id: MaterialId) -> StoreResult<Option<Material>> {
        let row = sqlx::query(&format!("SELECT {MATERIAL_COLUMNS} FROM materials WHERE id = $1"))
            .bind(*id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_material", e))?;
        row.as_ref().map(material_from_row).transpose()
    }

    #[instrument(skip(self, material), fields(material_id = %material.id), err)]
    async fn insert_material(&self, material: Material) -> StoreResult<()> {
        sqlx::query(&format!(
            "INSERT INTO materials ({MATERIAL_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"
        ))
        .bind(*material.id.as_uuid())
        .bind(&material.body_technician)
        .bind(&material.part_number)
        .bind(&material.description)
        .bind(material.ordered_qty)
        .bind(material.ordered_date)
        .bind(&material.unit_type)
        .bind(material.received_qty)
        .bind(material.received_date)
        .bind(material.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_material", e))?;
        Ok(())
    }

    #[instrument(skip(self, material), fields(material_id = %material.id), err)]
    async fn update_material(&self, material: Material) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE materials SET
                body_technician = $2,
                part_number = $3,
                description = $4,
                ordered_qty = $5,
                ordered_date = $6,
                unit_type = $7,
                received_qty = $8,
                received_date = $9
            WHERE id = $1
            "#,
        )
        .bind(*material.id.as_uuid())
        .bind(&material.body_technician)
        .bind(&material.part_number)
        .bind(&material.description)
        .bind(material.ordered_qty)
        .bind(material.ordered_date)
        .bind(&material.unit_type)
        .bind(material.received_qty)
        .bind(material.received_date)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_material", e))?;
        expect_one_row(result.rows_affected())
    }

    #[instrument(skip(self), err)]
    async fn delete_material(&self, id: MaterialId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM materials WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_material", e))?;
        expect_one_row(result.rows_affected())
    }

    #[instrument(skip(self), err)]
    async fn count_materials(&self) -> StoreResult<usize> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM materials")
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("count_materials", e))?;
        let n: i64 = row.try_get("n").map_err(|e| map_sqlx_error("count_materials", e))?;
        Ok(usize::try_from(n).unwrap_or(0))
    }
}

#[async_trait]
impl WorkQueueStore for PostgresShopStore {
    #[instrument(skip(self), err)]
    async fn list_work_queue(&self, department_code: &str) -> StoreResult<Vec<WorkQueueEntry>> {
        let rows = sqlx::query(&format!(
            "SELECT {WORK_QUEUE_COLUMNS} FROM work_queue WHERE department_code = $1"
        ))
        .bind(department_code)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_work_queue", e))?;
        rows.iter().map(work_queue_entry_from_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn get_work_queue_entry(&self, ro_number: RoNumber) -> StoreResult<Option<WorkQueueEntry>> {
        let row = sqlx::query(&format!(
            "SELECT {WORK_QUEUE_COLUMNS} FROM work_queue WHERE ro_number = $1"
        ))
        .bind(ro_number.get())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_work_queue_entry", e))?;
        row.as_ref().map(work_queue_entry_from_row).transpose()
    }

    #[instrument(skip(self, entry), fields(ro_number = %entry.ro_number), err)]
    async fn insert_work_queue_entry(&self, entry: WorkQueueEntry) -> StoreResult<()> {
        sqlx::query(&format!(
            "INSERT INTO work_queue ({WORK_QUEUE_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6)"
        ))
        .bind(entry.ro_number.get())
        .bind(&entry.department_code)
        .bind(entry.status.as_str())
        .bind(entry.priority)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_work_queue_entry", e))?;
        Ok(())
    }

    #[instrument(skip(self, entry), fields(ro_number = %entry.ro_number), err)]
    async fn update_work_queue_entry(&self, entry: WorkQueueEntry) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE work_queue SET
                department_code = $2,
                status = $3,
                priority = $4,
                updated_at = $5
            WHERE ro_number = $1
            "#,
        )
        .bind(entry.ro_number.get())
        .bind(&entry.department_code)
        .bind(entry.status.as_str())
        .bind(entry.priority)
        .bind(entry.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_work_queue_entry", e))?;
        expect_one_row(result.rows_affected())
    }

    #[instrument(skip(self), err)]
    async fn delete_work_queue_entry(&self, ro_number: RoNumber) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM work_queue WHERE ro_number = $1")
            .bind(ro_number.get())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_work_queue_entry", e))?;
        expect_one_row(result.rows_affected())
    }
}

#[async_trait]
impl UserStore for PostgresShopStore {
    #[instrument(skip(self), err)]
    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY email ASC"))
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_users", e))?;
        rows.iter().map(user_from_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn get_user(&self, id: UserId) -> StoreResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(*id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_user", e))?;
        row.as_ref().map(user_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email.trim().to_lowercase())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_user_by_email", e))?;
        row.as_ref().map(user_from_row).transpose()
    }

    #[instrument(skip(self, user), fields(user_id = %user.id), err)]
    async fn insert_user(&self, user: User) -> StoreResult<()> {
        sqlx::query(&format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
        ))
        .bind(*user.id.as_uuid())
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.email_verified_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_user", e))?;
        Ok(())
    }

    #[instrument(skip(self, user), fields(user_id = %user.id), err)]
    async fn update_user(&self, user: User) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                email = $2,
                name = $3,
                password_hash = $4,
                role = $5,
                email_verified_at = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(*user.id.as_uuid())
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.email_verified_at)
        .bind(user.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_user", e))?;
        expect_one_row(result.rows_affected())
    }

    #[instrument(skip(self), err)]
    async fn delete_user(&self, id: UserId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_user", e))?;
        expect_one_row(result.rows_affected())
    }
}

#[async_trait]
impl VerificationTokenStore for PostgresShopStore {
    #[instrument(skip(self, token), err)]
    async fn insert_verification_token(&self, token: VerificationToken) -> StoreResult<()> {
        sqlx::query("INSERT INTO verification_tokens (identifier, token, expires_at) VALUES ($1, $2, $3)")
            .bind(&token.identifier)
            .bind(&token.token)
            .bind(token.expires_at)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_verification_token", e))?;
        Ok(())
    }

    #[instrument(skip(self, token), err)]
    async fn take_verification_token(
        &self,
        identifier: &str,
        token: &str,
    ) -> StoreResult<Option<VerificationToken>> {
        let row = sqlx::query(
            r#"
            DELETE FROM verification_tokens
            WHERE identifier = $1 AND token = $2
            RETURNING identifier, token, expires_at
            "#,
        )
        .bind(identifier.trim().to_lowercase())
        .bind(token)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("take_verification_token", e))?;

        row.map(|r| -> StoreResult<VerificationToken> {
            Ok(VerificationToken {
                identifier: get(&r, "identifier")?,
                token: get(&r, "token")?,
                expires_at: get(&r, "expires_at")?,
            })
        })
        .transpose()
    }
}

#[async_trait]
impl AuditStore for PostgresShopStore {
    #[instrument(skip(self, event), fields(action = %event.action), err)]
    async fn append_audit(&self, event: AuditEvent) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_log (id, user_id, action, target_entity, target_id, details, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(event.id)
        .bind(*event.user_id.as_uuid())
        .bind(&event.action)
        .bind(&event.target_entity)
        .bind(&event.target_id)
        .bind(&event.details)
        .bind(event.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("append_audit", e))?;
        Ok(())
    }
}

fn expect_one_row(rows_affected: u64) -> StoreResult<()> {
    if rows_affected == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

fn get<'r, T>(row: &'r PgRow, column: &str) -> StoreResult<T>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column)
        .map_err(|e| StoreError::Storage(format!("failed to read column {column}: {e}")))
}

fn ro_number(row: &PgRow) -> StoreResult<RoNumber> {
    let raw: i64 = get(row, "ro_number")?;
    RoNumber::new(raw).map_err(|e| StoreError::Storage(format!("bad ro_number in row: {e}")))
}

fn repair_order_from_row(row: &PgRow) -> StoreResult<RepairOrder> {
    Ok(RepairOrder {
        ro_number: ro_number(row)?,
        owner: get(row, "owner")?,
        vehicle: get(row, "vehicle")?,
        vehicle_color: get(row, "vehicle_color")?,
        license_plate_number: get(row, "license_plate_number")?,
        parts_received_pct: get(row, "parts_received_pct")?,
        vehicle_in: get(row, "vehicle_in")?,
        current_phase: get(row, "current_phase")?,
        scheduled_out: get(row, "scheduled_out")?,
        body_technician: get(row, "body_technician")?,
        estimator: get(row, "estimator")?,
    })
}

fn part_line_from_row(row: &PgRow) -> StoreResult<PartLine> {
    Ok(PartLine {
        ro_number: ro_number(row)?,
        line: get(row, "line")?,
        part_number: get(row, "part_number")?,
        part_description: get(row, "part_description")?,
        part_type: get(row, "part_type")?,
        vendor_name: get(row, "vendor_name")?,
        requested_qty: get(row, "requested_qty")?,
        ordered_qty: get(row, "ordered_qty")?,
        received_qty: get(row, "received_qty")?,
        returned_qty: get(row, "returned_qty")?,
        ordered_date: get(row, "ordered_date")?,
        expected_delivery: get(row, "expected_delivery")?,
        invoice_date: get(row, "invoice_date")?,
    })
}

fn vendor_from_row(row: &PgRow) -> StoreResult<Vendor> {
    let name: String = get(row, "vendor_name")?;
    let contact = ContactInfo {
        primary_phone: get(row, "primary_phone")?,
        fax: get(row, "fax")?,
        address: get(row, "address")?,
        city: get(row, "city")?,
        state: get(row, "state")?,
        zip: get(row, "zip")?,
    };
    Vendor::new(&name, contact, get(row, "preferred")?, get(row, "electronic")?)
        .map_err(|e| StoreError::Storage(format!("bad vendor row: {e}")))
}

fn material_from_row(row: &PgRow) -> StoreResult<Material> {
    let id: uuid::Uuid = get(row, "id")?;
    Ok(Material {
        id: MaterialId::from_uuid(id),
        body_technician: get(row, "body_technician")?,
        part_number: get(row, "part_number")?,
        description: get(row, "description")?,
        ordered_qty: get(row, "ordered_qty")?,
        ordered_date: get(row, "ordered_date")?,
        unit_type: get(row, "unit_type")?,
        received_qty: get(row, "received_qty")?,
        received_date: get(row, "received_date")?,
        created_at: get(row, "created_at")?,
    })
}

fn work_queue_entry_from_row(row: &PgRow) -> StoreResult<WorkQueueEntry> {
    let status: String = get(row, "status")?;
    let status: WorkStatus = status
        .parse()
        .map_err(|e| StoreError::Storage(format!("bad work queue status: {e}")))?;
    Ok(WorkQueueEntry {
        ro_number: ro_number(row)?,
        department_code: get(row, "department_code")?,
        status,
        priority: get(row, "priority")?,
        created_at: get(row, "created_at")?,
        updated_at: get(row, "updated_at")?,
    })
}

fn user_from_row(row: &PgRow) -> StoreResult<User> {
    let id: uuid::Uuid = get(row, "id")?;
    let role: String = get(row, "role")?;
    let role = Role::parse(&role).ok_or_else(|| StoreError::Storage(format!("unknown role '{role}'")))?;
    let email_verified_at: Option<DateTime<Utc>> = get(row, "email_verified_at")?;
    Ok(User {
        id: UserId::from_uuid(id),
        email: get(row, "email")?,
        name: get(row, "name")?,
        password_hash: get(row, "password_hash")?,
        role,
        email_verified_at,
        created_at: get(row, "created_at")?,
        updated_at: get(row, "updated_at")?,
    })
}

/// Map SQLx errors to StoreError.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code() {
                Some(code) if code.as_ref() == "23505" => StoreError::Conflict(msg),
                _ => StoreError::Storage(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Storage(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::RowNotFound => StoreError::NotFound,
        _ => StoreError::Storage(format!("sqlx error in {}: {}", operation, err)),
    }
}
