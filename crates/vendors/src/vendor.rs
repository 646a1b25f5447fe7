use serde::{Deserialize, Serialize};

use partsapp_core::{DomainError, DomainResult};

/// US state codes are two letters; longer input is cut down.
pub const STATE_CODE_LEN: usize = 2;

/// Phone and mailing details of a vendor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub primary_phone: String,
    pub fax: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// A parts supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    vendor_name: String,
    #[serde(flatten)]
    contact: ContactInfo,
    preferred: bool,
    electronic: bool,
}

impl Vendor {
    /// Build a vendor, trimming the name and normalizing the state code.
    ///
    /// Fails when the name is blank.
    pub fn new(
        vendor_name: &str,
        contact: ContactInfo,
        preferred: bool,
        electronic: bool,
    ) -> DomainResult<Self> {
        let vendor_name = vendor_name.trim();
        if vendor_name.is_empty() {
            return Err(DomainError::validation("vendor_name cannot be empty"));
        }
        let mut contact = contact;
        contact.state = contact.state.trim().chars().take(STATE_CODE_LEN).collect();
        Ok(Self {
            vendor_name: vendor_name.to_string(),
            contact,
            preferred,
            electronic,
        })
    }

    pub fn vendor_name(&self) -> &str {
        &self.vendor_name
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    /// Shop prefers ordering from this vendor.
    pub fn preferred(&self) -> bool {
        self.preferred
    }

    /// Vendor accepts electronic orders.
    pub fn electronic(&self) -> bool {
        self.electronic
    }
}

/// Directory order: by name, ascending.
pub fn sort_by_name(vendors: &mut [Vendor]) {
    vendors.sort_by(|a, b| a.vendor_name.cmp(&b.vendor_name));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(state: &str) -> ContactInfo {
        ContactInfo {
            state: state.to_string(),
            ..ContactInfo::default()
        }
    }

    #[test]
    fn name_is_trimmed_and_required() {
        let v = Vendor::new("  LKQ Corp ", ContactInfo::default(), true, false).unwrap();
        assert_eq!(v.vendor_name(), "LKQ Corp");
        assert!(v.preferred());
        assert!(matches!(
            Vendor::new("   ", ContactInfo::default(), false, false),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn state_is_truncated_to_two_characters() {
        let v = Vendor::new("Acme", contact("Texas"), false, true).unwrap();
        assert_eq!(v.contact().state, "Te");
        let v = Vendor::new("Acme", contact("T"), false, true).unwrap();
        assert_eq!(v.contact().state, "T");
    }

    #[test]
    fn sorts_by_name() {
        let mut vs = vec![
            Vendor::new("Zed", ContactInfo::default(), false, false).unwrap(),
            Vendor::new("Acme", ContactInfo::default(), false, false).unwrap(),
        ];
        sort_by_name(&mut vs);
        assert_eq!(vs[0].vendor_name(), "Acme");
    }

    #[test]
    fn serializes_flat() {
        let v = Vendor::new("Acme", contact("OH"), true, false).unwrap();
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["vendor_name"], "Acme");
        assert_eq!(json["state"], "OH");
        assert_eq!(json["preferred"], true);
    }
}
