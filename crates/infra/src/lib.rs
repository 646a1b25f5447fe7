//! Infrastructure layer: persistence, outbound mail, audit, seeding.

pub mod audit;
pub mod mailer;
pub mod seed;
pub mod store;

pub use audit::AuditEvent;
pub use mailer::{Email, LogMailer, MailError, Mailer, OutboxMailer, ResendMailer};
pub use store::{
    ExtractSet, InMemoryShopStore, PostgresShopStore, ShopStore, StoreError, StoreResult,
};
