//! Admin audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use partsapp_core::UserId;

use crate::store::AuditStore;

/// One recorded admin action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: Uuid,
    pub user_id: UserId,
    pub action: String,
    pub target_entity: String,
    pub target_id: String,
    pub details: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(
        user_id: UserId,
        action: impl Into<String>,
        target_entity: impl Into<String>,
        target_id: impl ToString,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            action: action.into(),
            target_entity: target_entity.into(),
            target_id: target_id.to_string(),
            details: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Append an event; failures are logged and swallowed.
pub async fn record<S>(store: &S, event: AuditEvent)
where
    S: AuditStore + ?Sized,
{
    let action = event.action.clone();
    if let Err(err) = store.append_audit(event).await {
        tracing::warn!(%action, error = %err, "failed to write audit event");
    }
}
