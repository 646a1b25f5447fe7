use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use partsapp_auth::UserView;
use partsapp_import::ImportSummary;
use partsapp_parts::{PartLine, PartQuantities, PartState, StatusColor, StatusSummary};
use partsapp_vehicles::{RepairOrder, WorkQueueEntry};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct VehicleStatusQuery {
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PartSortQuery {
    pub sort: Option<String>,
    pub dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WorkQueueQuery {
    pub department: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DebugRoQuery {
    pub ro_number: Option<String>,
}

/// CSV contents of an extract upload; absent files leave their table alone.
#[derive(Debug, Default, Clone)]
pub struct ExtractUpload {
    pub daily_out: Option<String>,
    pub parts_status: Option<String>,
    pub vendors: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
    pub user: UserView,
}

/// A repair order row with its recomputed parts progress.
#[derive(Debug, Serialize)]
pub struct RepairOrderRow {
    #[serde(flatten)]
    pub order: RepairOrder,
    pub summary: StatusSummary,
}

/// A part line annotated with its status for display.
#[derive(Debug, Serialize)]
pub struct PartRow {
    #[serde(flatten)]
    pub line: PartLine,
    pub status: PartState,
    pub status_label: &'static str,
    pub status_color: StatusColor,
}

impl From<PartLine> for PartRow {
    fn from(line: PartLine) -> Self {
        let status = line.state();
        Self {
            line,
            status,
            status_label: status.label(),
            status_color: status.color(),
        }
    }
}

/// Car view: header, displayable parts, counts and percentage.
#[derive(Debug, Serialize)]
pub struct RepairOrderDetail {
    pub repair_order: RepairOrder,
    pub parts: Vec<PartRow>,
    pub summary: StatusSummary,
}

#[derive(Debug, Default, Serialize)]
pub struct ImportReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_out: Option<ImportSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parts_status: Option<ImportSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendors: Option<ImportSummary>,
}

#[derive(Debug, Serialize)]
pub struct DebugRoSummary {
    pub total_parts: usize,
    pub parts_with_ro_qty: usize,
    pub parts_without_ro_qty: usize,
}

#[derive(Debug, Serialize)]
pub struct DebugRoResponse {
    pub repair_order: Option<RepairOrder>,
    pub parts: Vec<PartLine>,
    pub work_queue: Option<WorkQueueEntry>,
    pub summary: DebugRoSummary,
}
