use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use partsapp_core::RoNumber;

/// Phase the shop system assigns to vehicles booked but not yet dropped off.
pub const SCHEDULED_PHASE: &str = "[Scheduled]";

/// A vehicle in the shop, one row of the "daily out" extract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairOrder {
    pub ro_number: RoNumber,
    pub owner: String,
    pub vehicle: String,
    pub vehicle_color: String,
    pub license_plate_number: String,
    /// Percentage as reported by the feed. Views recompute their own.
    pub parts_received_pct: f64,
    pub vehicle_in: DateTime<Utc>,
    pub current_phase: String,
    pub scheduled_out: Option<DateTime<Utc>>,
    pub body_technician: String,
    pub estimator: String,
}

impl RepairOrder {
    /// An order with blank descriptive fields; mostly useful in tests and seeding.
    pub fn new(ro_number: RoNumber, vehicle_in: DateTime<Utc>) -> Self {
        Self {
            ro_number,
            owner: String::new(),
            vehicle: String::new(),
            vehicle_color: String::new(),
            license_plate_number: String::new(),
            parts_received_pct: 0.0,
            vehicle_in,
            current_phase: String::new(),
            scheduled_out: None,
            body_technician: String::new(),
            estimator: String::new(),
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.current_phase == SCHEDULED_PHASE
    }
}
