use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use partsapp_core::RoNumber;
use partsapp_parts::PartLine;
use partsapp_vehicles::RepairOrder;
use partsapp_vendors::{ContactInfo, Vendor};

use crate::table::{RawRow, RawTable};
use crate::values::{parse_bool, parse_date, parse_number, parse_quantity};

/// Counts reported back for one uploaded extract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub errors: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parsing_errors: Vec<String>,
}

/// Records accepted from an extract, ready to replace the stored table.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportBatch<T> {
    pub records: Vec<T>,
    pub summary: ImportSummary,
}

impl<T> ImportBatch<T> {
    fn from_table<F>(table: RawTable, mut map: F) -> Self
    where
        F: FnMut(&RawRow) -> Result<T, String>,
    {
        let mut records = Vec::with_capacity(table.rows.len());
        let mut errors = 0;
        for (index, row) in table.rows.iter().enumerate() {
            match map(row) {
                Ok(record) => records.push(record),
                Err(reason) => {
                    errors += 1;
                    tracing::debug!(row = index + 1, %reason, "skipping row");
                }
            }
        }
        Self {
            summary: ImportSummary {
                imported: records.len(),
                errors,
                parsing_errors: table.parsing_errors,
            },
            records,
        }
    }
}

fn text(row: &RawRow, key: &str) -> String {
    row.get(key).cloned().unwrap_or_default()
}

fn cell<'a>(row: &'a RawRow, key: &str) -> &'a str {
    row.get(key).map(String::as_str).unwrap_or("")
}

fn ro_number(row: &RawRow) -> Result<RoNumber, String> {
    let raw = cell(row, "ro_number");
    match parse_number(raw) {
        Some(n) if n != 0.0 && n.fract() == 0.0 => {
            RoNumber::new(n as i64).map_err(|e| e.to_string())
        }
        _ => Err(format!("invalid ro_number '{raw}'")),
    }
}

fn quantity(row: &RawRow, key: &str) -> Result<i64, String> {
    parse_quantity(cell(row, key)).map_err(|e| format!("{key}: {e}"))
}

fn date(row: &RawRow, key: &str) -> Option<DateTime<Utc>> {
    parse_date(cell(row, key))
}

/// Map the daily-out extract. A missing `vehicle_in` defaults to `now`.
///
/// RO numbers are unique: a repeated RO is a row error and the first row wins.
pub fn import_repair_orders(table: RawTable, now: DateTime<Utc>) -> ImportBatch<RepairOrder> {
    let mut seen = HashSet::new();
    ImportBatch::from_table(table, |row| {
        let ro_number = ro_number(row)?;
        if !seen.insert(ro_number) {
            return Err(format!("duplicate ro_number {}", ro_number.get()));
        }
        Ok(RepairOrder {
            ro_number,
            owner: text(row, "owner"),
            vehicle: text(row, "vehicle"),
            vehicle_color: text(row, "vehicle_color"),
            license_plate_number: text(row, "license_plate_number"),
            parts_received_pct: parse_number(cell(row, "parts_received_pct")).unwrap_or(0.0),
            vehicle_in: date(row, "vehicle_in").unwrap_or(now),
            current_phase: text(row, "current_phase"),
            scheduled_out: date(row, "scheduled_out"),
            body_technician: text(row, "body_technician"),
            estimator: text(row, "estimator"),
        })
    })
}

/// Map the parts-status extract. Rows need a RO number and a non-zero line.
pub fn import_part_lines(table: RawTable) -> ImportBatch<PartLine> {
    ImportBatch::from_table(table, |row| {
        let ro_number = ro_number(row)?;
        let line = match parse_quantity(cell(row, "line")) {
            Ok(0) | Err(_) => return Err(format!("invalid line '{}'", cell(row, "line"))),
            Ok(n) => n,
        };
        Ok(PartLine {
            ro_number,
            line,
            part_number: text(row, "part_number"),
            part_description: text(row, "part_description"),
            part_type: text(row, "part_type"),
            vendor_name: text(row, "vendor_name"),
            requested_qty: quantity(row, "ro_qty")?,
            ordered_qty: quantity(row, "ordered_qty")?,
            received_qty: quantity(row, "received_qty")?,
            returned_qty: quantity(row, "returned_qty")?,
            ordered_date: date(row, "ordered_date"),
            expected_delivery: date(row, "expected_delivery"),
            invoice_date: date(row, "invoice_date"),
        })
    })
}

/// Map the vendor extract. Rows need a vendor name.
pub fn import_vendors(table: RawTable) -> ImportBatch<Vendor> {
    ImportBatch::from_table(table, |row| {
        let contact = ContactInfo {
            primary_phone: text(row, "primary_phone"),
            fax: text(row, "fax"),
            address: text(row, "address"),
            city: text(row, "city"),
            state: text(row, "state"),
            zip: text(row, "zip"),
        };
        Vendor::new(
            cell(row, "vendor_name"),
            contact,
            parse_bool(cell(row, "preferred")),
            parse_bool(cell(row, "electronic")),
        )
        .map_err(|e| e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::parse_csv;
    use chrono::TimeZone;
    use partsapp_parts::PartState;
    use partsapp_parts::PartQuantities;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn repair_orders_require_ro_number() {
        let csv = "\
RO Number,Owner,Vehicle,Vehicle In,Parts Received %,Current Phase
1001,Jane,Civic,03/01/2025,50%,Body
0,Nobody,Ghost,03/01/2025,0,
abc,Nobody,Ghost,,,
1002,Joe,F-150,,,[Scheduled]
";
        let batch = import_repair_orders(parse_csv(csv).unwrap(), now());
        assert_eq!(batch.summary.imported, 2);
        assert_eq!(batch.summary.errors, 2);

        let first = &batch.records[0];
        assert_eq!(first.ro_number.get(), 1001);
        assert_eq!(first.parts_received_pct, 50.0);
        assert_eq!(first.vehicle_in, Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(batch.records[1].vehicle_in, now());
        assert!(batch.records[1].is_scheduled());
    }

    #[test]
    fn repeated_ro_number_keeps_first_row_and_counts_error() {
        let csv = "\
RO Number,Owner,Vehicle,Vehicle Color
1001,Avery,Civic,Blue
1001,Blake,Accord,Red
1002,Casey,F-150,White
";
        let batch = import_repair_orders(parse_csv(csv).unwrap(), now());
        assert_eq!(batch.summary.imported, 2);
        assert_eq!(batch.summary.errors, 1);
        assert_eq!(batch.summary.imported, batch.records.len());
        assert_eq!(batch.records[0].owner, "Avery");
        assert_eq!(batch.records[1].ro_number.get(), 1002);
    }

    #[test]
    fn part_lines_map_quantities_and_classify() {
        let csv = "\
RO Number,Line,Part Number,Part Description,Part Type,Vendor Name,RO Qty,Ordered Qty,Received Qty,Returned Qty,Invoice Date
1001,1,52119,Bumper Cover,OEM,LKQ,1,1,1,0,03/05/2025
1001,2,A-1,Clip,OEM,LKQ,4,4,,,
1001,0,X,Bad line,OEM,LKQ,1,0,0,0,
1001,3,Y,Half,OEM,LKQ,1.5,0,0,0,
";
        let batch = import_part_lines(parse_csv(csv).unwrap());
        assert_eq!(batch.summary.imported, 2);
        assert_eq!(batch.summary.errors, 2);

        let bumper = &batch.records[0];
        assert_eq!(bumper.state(), PartState::Received);
        assert!(bumper.invoice_date.is_some());
        let clip = &batch.records[1];
        assert_eq!(clip.received_qty, 0);
        assert_eq!(clip.state(), PartState::OnOrder);
    }

    #[test]
    fn vendors_require_name_and_normalize_fields() {
        let csv = "\
Vendor Name,Primary Phone,City,State,Zip,Preferred,Electronic
LKQ Akron,330-555-0101,Akron,Ohio,44301,true,Electronic
,555,Nowhere,OH,00000,,
";
        let batch = import_vendors(parse_csv(csv).unwrap());
        assert_eq!(batch.summary.imported, 1);
        assert_eq!(batch.summary.errors, 1);
        let v = &batch.records[0];
        assert_eq!(v.contact().state, "Oh");
        assert!(v.preferred());
        assert!(v.electronic());
    }

    #[test]
    fn parsing_errors_are_carried_into_summary() {
        let csv = "Vendor Name,City,State\nLKQ,Akron,OH\nbad\n";
        let batch = import_vendors(parse_csv(csv).unwrap());
        assert_eq!(batch.summary.imported, 1);
        assert_eq!(batch.summary.parsing_errors.len(), 1);
    }
}
