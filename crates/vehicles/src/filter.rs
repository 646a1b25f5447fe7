use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use partsapp_core::DomainError;

use crate::repair_order::RepairOrder;

/// Which vehicles a list view shows.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VehicleStatusFilter {
    #[default]
    All,
    /// Dropped off and past the scheduling phase.
    InShop,
    /// Booked for a future drop-off.
    PreOrder,
}

impl VehicleStatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::InShop => "in-shop",
            Self::PreOrder => "pre-order",
        }
    }

    pub fn matches(&self, order: &RepairOrder, now: DateTime<Utc>) -> bool {
        match self {
            Self::All => true,
            Self::InShop => order.vehicle_in < now && !order.is_scheduled(),
            Self::PreOrder => order.vehicle_in >= now,
        }
    }

    /// Keep the matching orders, preserving order.
    pub fn apply(&self, orders: Vec<RepairOrder>, now: DateTime<Utc>) -> Vec<RepairOrder> {
        if *self == Self::All {
            return orders;
        }
        orders.into_iter().filter(|o| self.matches(o, now)).collect()
    }
}

impl FromStr for VehicleStatusFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "all" => Ok(Self::All),
            "in-shop" => Ok(Self::InShop),
            "pre-order" => Ok(Self::PreOrder),
            other => Err(DomainError::validation(format!(
                "unknown vehicle status '{other}' (expected all, in-shop, pre-order)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use partsapp_core::RoNumber;
    use crate::SCHEDULED_PHASE;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    fn order(ro: i64, offset_days: i64, phase: &str) -> RepairOrder {
        let mut o = RepairOrder::new(RoNumber::new(ro).unwrap(), now() + Duration::days(offset_days));
        o.current_phase = phase.to_string();
        o
    }

    fn ros(orders: &[RepairOrder]) -> Vec<i64> {
        orders.iter().map(|o| o.ro_number.get()).collect()
    }

    fn fleet() -> Vec<RepairOrder> {
        vec![
            order(1, -3, "Body"),
            order(2, -1, SCHEDULED_PHASE),
            order(3, 2, SCHEDULED_PHASE),
            order(4, 0, "Paint"),
        ]
    }

    #[test]
    fn all_keeps_everything() {
        assert_eq!(ros(&VehicleStatusFilter::All.apply(fleet(), now())), vec![1, 2, 3, 4]);
    }

    #[test]
    fn in_shop_excludes_future_and_scheduled() {
        assert_eq!(ros(&VehicleStatusFilter::InShop.apply(fleet(), now())), vec![1]);
    }

    #[test]
    fn pre_order_includes_vehicle_in_at_now() {
        assert_eq!(ros(&VehicleStatusFilter::PreOrder.apply(fleet(), now())), vec![3, 4]);
    }

    #[test]
    fn parses_wire_names() {
        assert_eq!("in-shop".parse::<VehicleStatusFilter>().unwrap(), VehicleStatusFilter::InShop);
        assert_eq!("".parse::<VehicleStatusFilter>().unwrap(), VehicleStatusFilter::All);
        assert!("parked".parse::<VehicleStatusFilter>().is_err());
        assert_eq!(
            serde_json::to_value(VehicleStatusFilter::PreOrder).unwrap(),
            serde_json::json!("pre-order")
        );
    }
}
