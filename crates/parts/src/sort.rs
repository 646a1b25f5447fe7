use core::cmp::Ordering;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::line::{PartLine, PartQuantities};

/// Column a parts table can be sorted by.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartSortField {
    #[default]
    Line,
    Status,
    PartNumber,
    PartDescription,
    PartType,
    VendorName,
    RequestedQty,
    OrderedQty,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for PartSortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "line" => Ok(Self::Line),
            "status" => Ok(Self::Status),
            "part_number" => Ok(Self::PartNumber),
            "part_description" => Ok(Self::PartDescription),
            "part_type" => Ok(Self::PartType),
            "vendor_name" => Ok(Self::VendorName),
            "requested_qty" | "ro_qty" => Ok(Self::RequestedQty),
            "ordered_qty" => Ok(Self::OrderedQty),
            other => Err(format!("unknown sort field '{other}'")),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown sort direction '{other}'")),
        }
    }
}

fn compare(a: &PartLine, b: &PartLine, field: PartSortField) -> Ordering {
    match field {
        PartSortField::Line => a.line.cmp(&b.line),
        PartSortField::Status => a.state().sort_order().cmp(&b.state().sort_order()),
        PartSortField::PartNumber => a.part_number.cmp(&b.part_number),
        PartSortField::PartDescription => a.part_description.cmp(&b.part_description),
        PartSortField::PartType => a.part_type.cmp(&b.part_type),
        PartSortField::VendorName => a.vendor_name.cmp(&b.vendor_name),
        PartSortField::RequestedQty => a.requested_qty.cmp(&b.requested_qty),
        PartSortField::OrderedQty => a.ordered_qty.cmp(&b.ordered_qty),
    }
}

/// Sort lines in place; equal keys fall back to line number (always ascending).
pub fn sort_lines(lines: &mut [PartLine], field: PartSortField, direction: SortDirection) {
    lines.sort_by(|a, b| {
        let primary = match direction {
            SortDirection::Asc => compare(a, b, field),
            SortDirection::Desc => compare(a, b, field).reverse(),
        };
        primary.then_with(|| a.line.cmp(&b.line))
    });
}
