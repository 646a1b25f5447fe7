//! Start-up data seeding.

use chrono::{DateTime, Utc};
use thiserror::Error;

use partsapp_auth::{PasswordHasher, Role, User};
use partsapp_core::{MaterialId, UserId};
use partsapp_import::{parse_materials_csv, ImportError, ImportSummary};

use crate::store::{MaterialStore, StoreError, UserStore};

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@partsapp.local";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin";
const ADMIN_NAME: &str = "Administrator";

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Import(#[from] ImportError),
}

/// Create the admin account unless a user with `email` already exists.
///
/// The seeded password skips the length policy; it is meant to be changed
/// right after first login. Returns whether an account was created.
pub async fn ensure_admin<S>(
    store: &S,
    email: &str,
    password: &str,
    hasher: &PasswordHasher,
    now: DateTime<Utc>,
) -> Result<bool, SeedError>
where
    S: UserStore + ?Sized,
{
    let email = email.trim().to_lowercase();
    if store.find_user_by_email(&email).await?.is_some() {
        tracing::info!(%email, "admin user already exists");
        return Ok(false);
    }

    let admin = User {
        id: UserId::new(),
        email: email.clone(),
        name: ADMIN_NAME.to_string(),
        password_hash: hasher.hash(password),
        role: Role::admin(),
        email_verified_at: Some(now),
        created_at: now,
        updated_at: now,
    };
    store.insert_user(admin).await?;
    tracing::warn!(%email, "admin user created; change the password immediately");
    Ok(true)
}

/// Load materials from CSV content when the table is still empty.
pub async fn seed_materials<S>(store: &S, csv: &str, now: DateTime<Utc>) -> Result<ImportSummary, SeedError>
where
    S: MaterialStore + ?Sized,
{
    if store.count_materials().await? > 0 {
        tracing::info!("materials already present; skipping seed");
        return Ok(ImportSummary::default());
    }

    let batch = parse_materials_csv(csv)?;
    let mut summary = batch.summary;
    for new in batch.records {
        match new.into_material(MaterialId::new(), now) {
            Ok(material) => store.insert_material(material).await?,
            Err(err) => {
                summary.imported = summary.imported.saturating_sub(1);
                summary.errors += 1;
                tracing::debug!(error = %err, "skipping material row");
            }
        }
    }
    tracing::info!(imported = summary.imported, errors = summary.errors, "materials seeded");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryShopStore;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()
    }

    #[tokio::test]
    async fn admin_is_created_once() {
        let store = InMemoryShopStore::new();
        let hasher = PasswordHasher::with_iterations(1);
        assert!(ensure_admin(&store, "Admin@Shop.test", "admin", &hasher, now()).await.unwrap());
        assert!(!ensure_admin(&store, "admin@shop.test", "other", &hasher, now()).await.unwrap());

        let admin = store.find_user_by_email("admin@shop.test").await.unwrap().unwrap();
        assert!(admin.role.is_admin());
        assert!(hasher.verify("admin", &admin.password_hash).unwrap());
    }

    #[tokio::test]
    async fn materials_seed_only_into_an_empty_table() {
        let store = InMemoryShopStore::new();
        let csv = "bodyTechnician,partNumber,description,orderedQty,unitType,receivedQty\n\
                   Mike,3M-051131,Sanding discs,4,Box,4\n\
                   Ana,SEM-39393,Primer,2,Can,\n";
        let summary = seed_materials(&store, csv, now()).await.unwrap();
        assert_eq!(summary.imported, 2);
        assert_eq!(store.count_materials().await.unwrap(), 2);

        let again = seed_materials(&store, csv, now()).await.unwrap();
        assert_eq!(again.imported, 0);
        assert_eq!(store.count_materials().await.unwrap(), 2);
    }
}
