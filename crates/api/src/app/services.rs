//! Application services: the use cases behind the HTTP handlers.
//!
//! Handlers authorize, parse, and call one method here. Each method loads what
//! it needs from the store, runs the pure domain functions, and persists.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use reqwest::Url;
use serde_json::json;

use partsapp_auth::{
    Hs256JwtValidator, LoginRateLimiter, NewUser, PasswordHasher, RateLimitDecision, UserPatch,
    UserView, VerificationToken,
};
use partsapp_core::{DomainError, MaterialId, RoNumber, UserId};
use partsapp_import::{import_part_lines, import_repair_orders, import_vendors, parse_csv};
use partsapp_infra::audit::{self, AuditEvent};
use partsapp_infra::mailer::{self, LogMailer, Mailer, ResendMailer};
use partsapp_infra::seed;
use partsapp_infra::{ExtractSet, InMemoryShopStore, PostgresShopStore, ShopStore};
use partsapp_materials::{Material, MaterialFilter, MaterialPatch, NewMaterial};
use partsapp_parts::{
    filter_displayable, is_unordered, matches_query, sort_lines, PartLine, PartSortField,
    SortDirection, StatusSummary, SEARCH_LIMIT,
};
use partsapp_vehicles::{
    build_board, build_deliveries, build_schedule, next_priority, Deliveries, NewWorkQueueEntry,
    ProductionSchedule, VehicleStatusFilter, WorkBoard, WorkQueueEntry, WorkQueuePatch,
    PAINT_DEPARTMENT,
};
use partsapp_vendors::{sort_by_name, Vendor};

use crate::app::dto::{
    DebugRoResponse, DebugRoSummary, ExtractUpload, ImportReport, LoginRequest, LoginResponse,
    PartRow, RepairOrderDetail, RepairOrderRow, VerifyEmailRequest,
};
use crate::app::errors::ServiceError;
use crate::config::ApiConfig;

const INVALID_CREDENTIALS: &str = "invalid email or password";

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Knobs the services need from configuration.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub password_iterations: u32,
    pub app_base_url: Url,
}

impl From<&ApiConfig> for ServiceSettings {
    fn from(config: &ApiConfig) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            token_ttl: config.token_ttl,
            password_iterations: config.password_iterations,
            app_base_url: config.app_base_url.clone(),
        }
    }
}

pub struct AppServices {
    store: Arc<dyn ShopStore>,
    mailer: Arc<dyn Mailer>,
    jwt: Arc<Hs256JwtValidator>,
    hasher: PasswordHasher,
    login_limiter: LoginRateLimiter,
    token_ttl: Duration,
    app_base_url: Url,
}

impl AppServices {
    pub fn new(store: Arc<dyn ShopStore>, mailer: Arc<dyn Mailer>, settings: ServiceSettings) -> Self {
        Self {
            store,
            mailer,
            jwt: Arc::new(Hs256JwtValidator::new(settings.jwt_secret.as_bytes())),
            hasher: PasswordHasher::with_iterations(settings.password_iterations),
            login_limiter: LoginRateLimiter::default(),
            token_ttl: settings.token_ttl,
            app_base_url: settings.app_base_url,
        }
    }

    pub fn jwt(&self) -> Arc<Hs256JwtValidator> {
        self.jwt.clone()
    }

    pub fn store(&self) -> &dyn ShopStore {
        self.store.as_ref()
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    // -------------------------
    // Authentication
    // -------------------------

    pub async fn login(&self, req: LoginRequest, now: DateTime<Utc>) -> ServiceResult<LoginResponse> {
        let email = req.email.trim().to_lowercase();
        if email.is_empty() || req.password.is_empty() {
            return Err(ServiceError::validation("email and password are required"));
        }

        if let RateLimitDecision::Limited { retry_after_secs } = self.login_limiter.check(&email, now) {
            tracing::warn!(%email, retry_after_secs, "login rate limited");
            return Err(ServiceError::RateLimited { retry_after_secs });
        }

        let user = match self.store.find_user_by_email(&email).await? {
            Some(u) => u,
            None => return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string())),
        };

        match self.hasher.verify(&req.password, &user.password_hash) {
            Ok(true) => {}
            Ok(false) => return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string())),
            Err(e) => {
                tracing::warn!(%email, error = %e, "stored password hash is unreadable");
                return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        }

        let token = self.jwt.issue_for(&user, self.token_ttl, now)?;
        tracing::info!(user_id = %user.id, "login succeeded");
        Ok(LoginResponse {
            token,
            token_type: "Bearer",
            expires_at: now + self.token_ttl,
            user: user.view(),
        })
    }

    /// Consume a verification token and mark the account verified.
    pub async fn verify_email(&self, req: VerifyEmailRequest, now: DateTime<Utc>) -> ServiceResult<()> {
        let email = req.email.trim().to_lowercase();
        let token = req.token.trim();
        if email.is_empty() || token.is_empty() {
            return Err(ServiceError::validation("email and token are required"));
        }

        let stored = match self.store.take_verification_token(&email, token).await? {
            Some(t) => t,
            None => return Err(ServiceError::validation("invalid or expired verification token")),
        };
        stored
            .check(now)
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        let mut user = match self.store.find_user_by_email(&email).await? {
            Some(u) => u,
            None => return Err(DomainError::not_found().into()),
        };
        user.email_verified_at = Some(now);
        user.updated_at = now;
        self.store.update_user(user.clone()).await?;

        mailer::deliver(self.mailer.as_ref(), mailer::welcome_email(&user.email, Some(&user.name))).await;
        Ok(())
    }

    pub async fn update_profile(&self, user_id: UserId, name: &str, now: DateTime<Utc>) -> ServiceResult<UserView> {
        let mut user = match self.store.get_user(user_id).await? {
            Some(u) => u,
            None => return Err(DomainError::not_found().into()),
        };
        user.rename(name, now)?;
        self.store.update_user(user.clone()).await?;
        Ok(user.view())
    }

    // -------------------------
    // Repair orders & parts
    // -------------------------

    pub async fn repair_orders(
        &self,
        filter: VehicleStatusFilter,
        now: DateTime<Utc>,
    ) -> ServiceResult<Vec<RepairOrderRow>> {
        let orders = filter.apply(self.store.list_repair_orders().await?, now);

        let mut by_ro: HashMap<RoNumber, Vec<PartLine>> = HashMap::new();
        for line in self.store.list_part_lines().await? {
            by_ro.entry(line.ro_number).or_default().push(line);
        }

        Ok(orders
            .into_iter()
            .map(|order| {
                let lines = by_ro.remove(&order.ro_number).unwrap_or_default();
                RepairOrderRow {
                    summary: StatusSummary::from_lines(&filter_displayable(lines)),
                    order,
                }
            })
            .collect())
    }

    pub async fn repair_order_detail(
        &self,
        ro_number: RoNumber,
        sort: PartSortField,
        direction: SortDirection,
    ) -> ServiceResult<RepairOrderDetail> {
        let repair_order = match self.store.get_repair_order(ro_number).await? {
            Some(o) => o,
            None => return Err(DomainError::not_found().into()),
        };

        let mut lines = filter_displayable(self.store.part_lines_for(ro_number).await?);
        let summary = StatusSummary::from_lines(&lines);
        sort_lines(&mut lines, sort, direction);

        Ok(RepairOrderDetail {
            repair_order,
            parts: lines.into_iter().map(PartRow::from).collect(),
            summary,
        })
    }

    pub async fn search_parts(&self, query: &str) -> ServiceResult<Vec<PartRow>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .store
            .list_part_lines()
            .await?
            .into_iter()
            .filter(|l| matches_query(l, query))
            .take(SEARCH_LIMIT)
            .map(PartRow::from)
            .collect())
    }

    /// Lines still waiting to be ordered, highest RO number first.
    pub async fn unordered_parts(&self) -> ServiceResult<Vec<PartRow>> {
        let mut lines: Vec<PartLine> = self
            .store
            .list_part_lines()
            .await?
            .into_iter()
            .filter(is_unordered)
            .collect();
        lines.sort_by(|a, b| b.ro_number.cmp(&a.ro_number).then(a.line.cmp(&b.line)));
        Ok(lines.into_iter().map(PartRow::from).collect())
    }

    pub async fn production_schedule(
        &self,
        filter: VehicleStatusFilter,
        now: DateTime<Utc>,
    ) -> ServiceResult<ProductionSchedule> {
        let orders = filter.apply(self.store.list_repair_orders().await?, now);
        let lines = self.store.list_part_lines().await?;
        Ok(build_schedule(&orders, &lines))
    }

    pub async fn deliveries(&self) -> ServiceResult<Deliveries> {
        let lines = self.store.list_part_lines().await?;
        let orders = self.store.list_repair_orders().await?;
        Ok(build_deliveries(&lines, &orders))
    }

    pub async fn vendors(&self) -> ServiceResult<Vec<Vendor>> {
        let mut vendors = self.store.list_vendors().await?;
        sort_by_name(&mut vendors);
        Ok(vendors)
    }

    // -------------------------
    // Materials
    // -------------------------

    pub async fn materials(&self, filter: MaterialFilter) -> ServiceResult<Vec<Material>> {
        Ok(filter.apply(self.store.list_materials().await?))
    }

    pub async fn create_material(&self, new: NewMaterial, now: DateTime<Utc>) -> ServiceResult<Material> {
        let material = new.into_material(MaterialId::new(), now)?;
        self.store.insert_material(material.clone()).await?;
        tracing::info!(material_id = %material.id, part_number = %material.part_number, "material logged");
        Ok(material)
    }

    pub async fn update_material(
        &self,
        actor: UserId,
        id: MaterialId,
        patch: MaterialPatch,
    ) -> ServiceResult<Material> {
        let mut material = match self.store.get_material(id).await? {
            Some(m) => m,
            None => return Err(DomainError::not_found().into()),
        };
        material.apply_patch(&patch)?;
        self.store.update_material(material.clone()).await?;

        audit::record(
            self.store.as_ref(),
            AuditEvent::new(actor, "material.update", "material", id).with_details(json!(patch)),
        )
        .await;
        Ok(material)
    }

    pub async fn delete_material(&self, actor: UserId, id: MaterialId) -> ServiceResult<()> {
        if self.store.get_material(id).await?.is_none() {
            return Err(DomainError::not_found().into());
        }
        self.store.delete_material(id).await?;
        audit::record(self.store.as_ref(), AuditEvent::new(actor, "material.delete", "material", id)).await;
        Ok(())
    }

    // -------------------------
    // Work queue
    // -------------------------

    pub async fn work_board(&self, department: Option<&str>) -> ServiceResult<WorkBoard> {
        let department = department
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(PAINT_DEPARTMENT);
        let entries = self.store.list_work_queue(department).await?;
        let orders = self.store.list_repair_orders().await?;
        Ok(build_board(department, &entries, &orders))
    }

    pub async fn enqueue(&self, req: NewWorkQueueEntry, now: DateTime<Utc>) -> ServiceResult<WorkQueueEntry> {
        let ro_number = RoNumber::new(req.ro_number)
            .map_err(|_| ServiceError::validation("ro_number must be a positive integer"))?;

        if self.store.get_repair_order(ro_number).await?.is_none() {
            return Err(DomainError::not_found().into());
        }
        if self.store.get_work_queue_entry(ro_number).await?.is_some() {
            return Err(DomainError::conflict(format!("RO {ro_number} is already in the work queue")).into());
        }

        let existing = self.store.list_work_queue(req.department()).await?;
        let default_priority = next_priority(&existing, req.department());
        let entry = req.into_entry(default_priority, now)?;
        self.store.insert_work_queue_entry(entry.clone()).await?;
        tracing::info!(ro_number = %entry.ro_number, department = %entry.department_code, "car queued");
        Ok(entry)
    }

    pub async fn update_work_queue(
        &self,
        ro_number: RoNumber,
        patch: WorkQueuePatch,
        now: DateTime<Utc>,
    ) -> ServiceResult<WorkQueueEntry> {
        if patch.is_empty() {
            return Err(ServiceError::validation("status or priority is required"));
        }
        let mut entry = match self.store.get_work_queue_entry(ro_number).await? {
            Some(e) => e,
            None => return Err(DomainError::not_found().into()),
        };
        entry.apply_patch(&patch, now);
        self.store.update_work_queue_entry(entry.clone()).await?;
        Ok(entry)
    }

    pub async fn remove_from_queue(&self, ro_number: RoNumber) -> ServiceResult<()> {
        self.store.delete_work_queue_entry(ro_number).await?;
        tracing::info!(%ro_number, "car removed from work queue");
        Ok(())
    }

    // -------------------------
    // User administration
    // -------------------------

    pub async fn list_users(&self) -> ServiceResult<Vec<UserView>> {
        Ok(self.store.list_users().await?.iter().map(|u| u.view()).collect())
    }

    /// Create an account and email its verification link.
    pub async fn create_user(&self, actor: UserId, new: NewUser, now: DateTime<Utc>) -> ServiceResult<UserView> {
        let user = new.into_user(&self.hasher, now)?;
        self.store.insert_user(user.clone()).await?;

        let token = VerificationToken::generate(&user.email, now);
        self.store.insert_verification_token(token.clone()).await?;
        let link = mailer::verification_link(&self.app_base_url, &user.email, &token.token);
        mailer::deliver(
            self.mailer.as_ref(),
            mailer::verification_email(&user.email, Some(&user.name), &link),
        )
        .await;

        audit::record(
            self.store.as_ref(),
            AuditEvent::new(actor, "user.create", "user", user.id)
                .with_details(json!({ "email": user.email, "role": user.role })),
        )
        .await;
        Ok(user.view())
    }

    pub async fn update_user(
        &self,
        actor: UserId,
        id: UserId,
        patch: UserPatch,
        now: DateTime<Utc>,
    ) -> ServiceResult<UserView> {
        let mut user = match self.store.get_user(id).await? {
            Some(u) => u,
            None => return Err(DomainError::not_found().into()),
        };
        user.apply_patch(&patch, &self.hasher, now)?;
        self.store.update_user(user.clone()).await?;

        audit::record(
            self.store.as_ref(),
            AuditEvent::new(actor, "user.update", "user", id).with_details(json!({
                "name": patch.name,
                "role": patch.role,
                "password_changed": patch.password.is_some(),
            })),
        )
        .await;
        Ok(user.view())
    }

    pub async fn delete_user(&self, actor: UserId, id: UserId) -> ServiceResult<()> {
        self.store.delete_user(id).await?;
        audit::record(self.store.as_ref(), AuditEvent::new(actor, "user.delete", "user", id)).await;
        Ok(())
    }

    // -------------------------
    // Extract upload & diagnostics
    // -------------------------

    /// Import the provided extracts. Every file is parsed before any table is
    /// replaced, so a file without a header row leaves all tables untouched.
    pub async fn import_extracts(
        &self,
        actor: UserId,
        upload: ExtractUpload,
        now: DateTime<Utc>,
    ) -> ServiceResult<ImportReport> {
        let parse = |extract: &'static str, content: Option<String>| {
            content
                .map(|c| parse_csv(&c).map_err(|source| ServiceError::Import { extract, source }))
                .transpose()
        };
        let daily_out = parse("daily_out", upload.daily_out)?;
        let parts_status = parse("parts_status", upload.parts_status)?;
        let vendors = parse("vendors", upload.vendors)?;

        if daily_out.is_none() && parts_status.is_none() && vendors.is_none() {
            return Err(ServiceError::validation(
                "at least one of daily_out, parts_status, vendors is required",
            ));
        }

        let mut report = ImportReport::default();
        let mut extracts = ExtractSet::default();

        if let Some(table) = daily_out {
            let batch = import_repair_orders(table, now);
            extracts.repair_orders = Some(batch.records);
            report.daily_out = Some(batch.summary);
        }
        if let Some(table) = parts_status {
            let batch = import_part_lines(table);
            extracts.part_lines = Some(batch.records);
            report.parts_status = Some(batch.summary);
        }
        if let Some(table) = vendors {
            let batch = import_vendors(table);
            extracts.vendors = Some(batch.records);
            report.vendors = Some(batch.summary);
        }
        self.store.replace_extracts(extracts).await?;

        tracing::info!(
            daily_out = report.daily_out.as_ref().map(|s| s.imported),
            parts_status = report.parts_status.as_ref().map(|s| s.imported),
            vendors = report.vendors.as_ref().map(|s| s.imported),
            "extracts imported"
        );
        audit::record(
            self.store.as_ref(),
            AuditEvent::new(actor, "extracts.upload", "import", now.to_rfc3339()).with_details(json!(report)),
        )
        .await;
        Ok(report)
    }

    pub async fn debug_ro(&self, ro_number: RoNumber) -> ServiceResult<DebugRoResponse> {
        let repair_order = self.store.get_repair_order(ro_number).await?;
        let parts = self.store.part_lines_for(ro_number).await?;
        let work_queue = self.store.get_work_queue_entry(ro_number).await?;

        let with_qty = parts.iter().filter(|l| l.requested_qty > 0).count();
        let summary = DebugRoSummary {
            total_parts: parts.len(),
            parts_with_ro_qty: with_qty,
            parts_without_ro_qty: parts.len() - with_qty,
        };
        Ok(DebugRoResponse {
            repair_order,
            parts,
            work_queue,
            summary,
        })
    }
}

/// Wire the store and mailer from configuration and run start-up seeding.
pub async fn build_services(config: &ApiConfig) -> anyhow::Result<AppServices> {
    let store: Arc<dyn ShopStore> = match config.database_url.as_deref() {
        Some(url) => {
            let pg = PostgresShopStore::connect(url)
                .await
                .context("failed to connect to postgres")?;
            pg.migrate().await.context("failed to apply schema")?;
            tracing::info!("using postgres store");
            Arc::new(pg)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory store (data is lost on restart)");
            Arc::new(InMemoryShopStore::new())
        }
    };

    let mailer: Arc<dyn Mailer> = match config.resend_api_key.as_deref() {
        Some(key) => Arc::new(ResendMailer::new(key, config.mail_from.clone())),
        None => {
            tracing::warn!("RESEND_API_KEY not set; emails are only logged");
            Arc::new(LogMailer)
        }
    };

    let services = AppServices::new(store, mailer, ServiceSettings::from(config));
    let now = Utc::now();

    seed::ensure_admin(
        services.store(),
        &config.admin_email,
        &config.admin_password,
        services.hasher(),
        now,
    )
    .await
    .context("failed to seed admin user")?;

    if let Some(path) = &config.seed_materials_csv {
        let csv = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        seed::seed_materials(services.store(), &csv, now)
            .await
            .context("failed to seed materials")?;
    }

    Ok(services)
}
