use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use partsapp_core::RoNumber;

use crate::status::{classify, PartState};

/// One part line of a repair order, as delivered by the parts-status extract.
///
/// The four quantities are independent counters from the shop system. Nothing
/// here checks that they are consistent with each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartLine {
    pub ro_number: RoNumber,
    pub line: i64,
    pub part_number: String,
    pub part_description: String,
    /// Free-text part classification ("OEM", "Aftermarket", "Sublet", ...).
    pub part_type: String,
    pub vendor_name: String,
    /// Quantity the repair order calls for ("RO qty").
    pub requested_qty: i64,
    pub ordered_qty: i64,
    pub received_qty: i64,
    pub returned_qty: i64,
    pub ordered_date: Option<DateTime<Utc>>,
    pub expected_delivery: Option<DateTime<Utc>>,
    pub invoice_date: Option<DateTime<Utc>>,
}

impl PartLine {
    /// A line with the given quantities and empty descriptive fields.
    pub fn with_quantities(
        ro_number: RoNumber,
        line: i64,
        requested_qty: i64,
        ordered_qty: i64,
        received_qty: i64,
        returned_qty: i64,
    ) -> Self {
        Self {
            ro_number,
            line,
            part_number: String::new(),
            part_description: String::new(),
            part_type: String::new(),
            vendor_name: String::new(),
            requested_qty,
            ordered_qty,
            received_qty,
            returned_qty,
            ordered_date: None,
            expected_delivery: None,
            invoice_date: None,
        }
    }
}

/// Anything that carries the four part quantities.
pub trait PartQuantities {
    fn requested_qty(&self) -> i64;
    fn ordered_qty(&self) -> i64;
    fn received_qty(&self) -> i64;
    fn returned_qty(&self) -> i64;

    fn state(&self) -> PartState {
        classify(
            self.requested_qty(),
            self.ordered_qty(),
            self.received_qty(),
            self.returned_qty(),
        )
    }
}

impl PartQuantities for PartLine {
    fn requested_qty(&self) -> i64 {
        self.requested_qty
    }

    fn ordered_qty(&self) -> i64 {
        self.ordered_qty
    }

    fn received_qty(&self) -> i64 {
        self.received_qty
    }

    fn returned_qty(&self) -> i64 {
        self.returned_qty
    }
}

impl<T: PartQuantities + ?Sized> PartQuantities for &T {
    fn requested_qty(&self) -> i64 {
        (**self).requested_qty()
    }

    fn ordered_qty(&self) -> i64 {
        (**self).ordered_qty()
    }

    fn received_qty(&self) -> i64 {
        (**self).received_qty()
    }

    fn returned_qty(&self) -> i64 {
        (**self).returned_qty()
    }
}

/// `(requested, ordered, received, returned)`
impl PartQuantities for (i64, i64, i64, i64) {
    fn requested_qty(&self) -> i64 {
        self.0
    }

    fn ordered_qty(&self) -> i64 {
        self.1
    }

    fn received_qty(&self) -> i64 {
        self.2
    }

    fn returned_qty(&self) -> i64 {
        self.3
    }
}
