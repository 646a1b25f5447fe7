//! Vendor directory.

pub mod vendor;

pub use vendor::{sort_by_name, ContactInfo, Vendor, STATE_CODE_LEN};
