use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use partsapp_core::RoNumber;
use partsapp_parts::PartLine;

use crate::repair_order::RepairOrder;

/// A delivered (or pending) part as shown on the deliveries board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryPart {
    pub part_description: String,
    pub part_number: String,
    pub received_qty: i64,
    pub invoice_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorParts {
    pub vendor_name: String,
    pub parts: Vec<DeliveryPart>,
}

/// Car view: one car, its vendors, and their parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarDeliveries {
    pub ro_number: RoNumber,
    pub owner: String,
    pub vehicle: String,
    pub body_technician: String,
    pub estimator: String,
    pub vendors: Vec<VendorParts>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorCar {
    pub ro_number: RoNumber,
    pub owner: String,
    pub vehicle: String,
    pub body_technician: String,
    pub estimator: String,
    pub parts: Vec<DeliveryPart>,
}

/// Vendor view: one vendor, the cars it supplies, and their parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorDeliveries {
    pub vendor_name: String,
    pub cars: Vec<VendorCar>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deliveries {
    pub car_view: Vec<CarDeliveries>,
    pub vendor_view: Vec<VendorDeliveries>,
}

/// Car header fields copied onto every view entry.
#[derive(Default)]
struct CarHeader {
    owner: String,
    vehicle: String,
    body_technician: String,
    estimator: String,
}

impl CarHeader {
    fn lookup(orders: &HashMap<RoNumber, &RepairOrder>, ro: RoNumber) -> Self {
        orders
            .get(&ro)
            .map(|o| Self {
                owner: o.owner.clone(),
                vehicle: o.vehicle.clone(),
                body_technician: o.body_technician.clone(),
                estimator: o.estimator.clone(),
            })
            .unwrap_or_default()
    }
}

/// Build both delivery views.
///
/// Every part line is included, displayable or not. Parts within a group are
/// ordered by part number; RO and vendor keys ascend.
pub fn build_deliveries(lines: &[PartLine], orders: &[RepairOrder]) -> Deliveries {
    let orders: HashMap<RoNumber, &RepairOrder> = orders.iter().map(|o| (o.ro_number, o)).collect();

    let mut sorted: Vec<&PartLine> = lines.iter().collect();
    sorted.sort_by(|a, b| {
        a.ro_number
            .cmp(&b.ro_number)
            .then_with(|| a.vendor_name.cmp(&b.vendor_name))
            .then_with(|| a.part_number.cmp(&b.part_number))
    });

    let mut by_car: BTreeMap<RoNumber, BTreeMap<&str, Vec<DeliveryPart>>> = BTreeMap::new();
    let mut by_vendor: BTreeMap<&str, BTreeMap<RoNumber, Vec<DeliveryPart>>> = BTreeMap::new();

    for line in sorted {
        let part = DeliveryPart {
            part_description: line.part_description.clone(),
            part_number: line.part_number.clone(),
            received_qty: line.received_qty,
            invoice_date: line.invoice_date,
        };
        by_vendor
            .entry(line.vendor_name.as_str())
            .or_default()
            .entry(line.ro_number)
            .or_default()
            .push(part.clone());
        by_car
            .entry(line.ro_number)
            .or_default()
            .entry(line.vendor_name.as_str())
            .or_default()
            .push(part);
    }

    let car_view = by_car
        .into_iter()
        .map(|(ro, vendors)| {
            let header = CarHeader::lookup(&orders, ro);
            CarDeliveries {
                ro_number: ro,
                owner: header.owner,
                vehicle: header.vehicle,
                body_technician: header.body_technician,
                estimator: header.estimator,
                vendors: vendors
                    .into_iter()
                    .map(|(vendor_name, parts)| VendorParts {
                        vendor_name: vendor_name.to_string(),
                        parts,
                    })
                    .collect(),
            }
        })
        .collect();

    let vendor_view = by_vendor
        .into_iter()
        .map(|(vendor_name, cars)| VendorDeliveries {
            vendor_name: vendor_name.to_string(),
            cars: cars
                .into_iter()
                .map(|(ro, parts)| {
                    let header = CarHeader::lookup(&orders, ro);
                    VendorCar {
                        ro_number: ro,
                        owner: header.owner,
                        vehicle: header.vehicle,
                        body_technician: header.body_technician,
                        estimator: header.estimator,
                        parts,
                    }
                })
                .collect(),
        })
        .collect();

    Deliveries {
        car_view,
        vendor_view,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ro(n: i64) -> RoNumber {
        RoNumber::new(n).unwrap()
    }

    fn part(ro_number: i64, vendor: &str, number: &str) -> PartLine {
        let mut l = PartLine::with_quantities(ro(ro_number), 1, 1, 1, 1, 0);
        l.vendor_name = vendor.to_string();
        l.part_number = number.to_string();
        l
    }

    #[test]
    fn car_view_nests_vendors_under_ro() {
        let lines = vec![
            part(20, "Zed Auto", "B-2"),
            part(10, "LKQ", "A-9"),
            part(20, "LKQ", "C-1"),
            part(20, "Zed Auto", "A-1"),
        ];
        let d = build_deliveries(&lines, &[]);

        let ros: Vec<i64> = d.car_view.iter().map(|c| c.ro_number.get()).collect();
        assert_eq!(ros, vec![10, 20]);

        let car20 = &d.car_view[1];
        let vendors: Vec<&str> = car20.vendors.iter().map(|v| v.vendor_name.as_str()).collect();
        assert_eq!(vendors, vec!["LKQ", "Zed Auto"]);
        let zed: Vec<&str> = car20.vendors[1].parts.iter().map(|p| p.part_number.as_str()).collect();
        assert_eq!(zed, vec!["A-1", "B-2"]);
    }

    #[test]
    fn vendor_view_nests_ros_under_vendor() {
        let lines = vec![part(30, "LKQ", "X"), part(10, "LKQ", "Y"), part(20, "Acme", "Z")];
        let d = build_deliveries(&lines, &[]);

        let vendors: Vec<&str> = d.vendor_view.iter().map(|v| v.vendor_name.as_str()).collect();
        assert_eq!(vendors, vec!["Acme", "LKQ"]);
        let lkq: Vec<i64> = d.vendor_view[1].cars.iter().map(|c| c.ro_number.get()).collect();
        assert_eq!(lkq, vec![10, 30]);
    }

    #[test]
    fn header_fields_come_from_repair_order_or_blank() {
        let mut order = RepairOrder::new(ro(10), Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap());
        order.owner = "J. Doe".to_string();
        order.estimator = "Sam".to_string();
        let lines = vec![part(10, "LKQ", "A"), part(11, "LKQ", "B")];
        let d = build_deliveries(&lines, &[order]);

        assert_eq!(d.car_view[0].owner, "J. Doe");
        assert_eq!(d.car_view[0].estimator, "Sam");
        assert_eq!(d.car_view[1].owner, "");
        assert_eq!(d.vendor_view[0].cars[0].owner, "J. Doe");
    }

    #[test]
    fn empty_input_gives_empty_views() {
        assert_eq!(build_deliveries(&[], &[]), Deliveries::default());
    }
}
