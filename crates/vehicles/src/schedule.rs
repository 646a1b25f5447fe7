use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use partsapp_core::RoNumber;
use partsapp_parts::{is_displayable, PartLine, StatusCount, StatusSummary};

use crate::repair_order::RepairOrder;

/// Group name for cars without an estimator or technician.
pub const UNASSIGNED: &str = "Unassigned";

/// One car on the production schedule with its parts progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledCar {
    pub ro_number: RoNumber,
    pub owner: String,
    pub vehicle: String,
    pub vehicle_color: String,
    pub body_technician: String,
    pub estimator: String,
    pub scheduled_out: Option<DateTime<Utc>>,
    pub parts_received_pct: u8,
    #[serde(flatten)]
    pub counts: StatusCount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleGroup {
    pub name: String,
    pub cars: Vec<ScheduledCar>,
}

/// The same cars grouped two ways.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionSchedule {
    pub estimator: Vec<ScheduleGroup>,
    pub technician: Vec<ScheduleGroup>,
}

/// Build the schedule from repair orders and all known part lines.
///
/// Cars are listed newest `vehicle_in` first inside each group; groups are
/// ordered by name.
pub fn build_schedule(orders: &[RepairOrder], lines: &[PartLine]) -> ProductionSchedule {
    let mut by_ro: HashMap<RoNumber, Vec<&PartLine>> = HashMap::new();
    for line in lines.iter().filter(|l| is_displayable(l)) {
        by_ro.entry(line.ro_number).or_default().push(line);
    }

    let mut sorted: Vec<&RepairOrder> = orders.iter().collect();
    sorted.sort_by(|a, b| b.vehicle_in.cmp(&a.vehicle_in));

    let cars: Vec<ScheduledCar> = sorted
        .into_iter()
        .map(|order| {
            let parts = by_ro.get(&order.ro_number).map(Vec::as_slice).unwrap_or(&[]);
            let summary = StatusSummary::from_lines(parts);
            ScheduledCar {
                ro_number: order.ro_number,
                owner: order.owner.clone(),
                vehicle: order.vehicle.clone(),
                vehicle_color: order.vehicle_color.clone(),
                body_technician: order.body_technician.clone(),
                estimator: order.estimator.clone(),
                scheduled_out: order.scheduled_out,
                parts_received_pct: summary.completion_pct,
                counts: summary.counts,
            }
        })
        .collect();

    ProductionSchedule {
        estimator: group_by(&cars, |c| &c.estimator),
        technician: group_by(&cars, |c| &c.body_technician),
    }
}

fn group_by(cars: &[ScheduledCar], key: impl Fn(&ScheduledCar) -> &String) -> Vec<ScheduleGroup> {
    let mut groups: BTreeMap<String, Vec<ScheduledCar>> = BTreeMap::new();
    for car in cars {
        let name = key(car).trim();
        let name = if name.is_empty() { UNASSIGNED } else { name };
        groups.entry(name.to_string()).or_default().push(car.clone());
    }
    groups
        .into_iter()
        .map(|(name, cars)| ScheduleGroup { name, cars })
        .collect()
}
