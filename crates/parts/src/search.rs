use crate::line::PartLine;

/// Maximum number of lines a part search returns.
pub const SEARCH_LIMIT: usize = 100;

/// Whether a line matches a free-text parts search.
///
/// A numeric query matches the RO number exactly. Any query also matches a
/// case-insensitive substring of the part number, description, or vendor.
/// A blank query matches nothing.
pub fn matches_query(line: &PartLine, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return false;
    }

    if let Ok(ro) = query.parse::<i64>() {
        if line.ro_number.get() == ro {
            return true;
        }
    }

    let needle = query.to_lowercase();
    [&line.part_number, &line.part_description, &line.vendor_name]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Required by the repair order but not placed on order yet.
pub fn is_unordered(line: &PartLine) -> bool {
    line.ordered_qty == 0 && line.requested_qty > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use partsapp_core::RoNumber;

    fn line() -> PartLine {
        let mut l = PartLine::with_quantities(RoNumber::new(4410).unwrap(), 1, 1, 0, 0, 0);
        l.part_number = "52119-0X913".to_string();
        l.part_description = "Front Bumper Cover".to_string();
        l.vendor_name = "Toyota of Springfield".to_string();
        l
    }

    #[test]
    fn matches_ro_number_exactly() {
        assert!(matches_query(&line(), "4410"));
        assert!(!matches_query(&line(), "441"));
    }

    #[test]
    fn matches_text_fields_case_insensitively() {
        assert!(matches_query(&line(), "bumper"));
        assert!(matches_query(&line(), "0x913"));
        assert!(matches_query(&line(), "TOYOTA"));
        assert!(!matches_query(&line(), "fender"));
    }

    #[test]
    fn blank_query_matches_nothing() {
        assert!(!matches_query(&line(), ""));
        assert!(!matches_query(&line(), "   "));
    }

    #[test]
    fn unordered_requires_requested_quantity() {
        let mut l = line();
        assert!(is_unordered(&l));
        l.requested_qty = 0;
        assert!(!is_unordered(&l));
        l.requested_qty = 2;
        l.ordered_qty = 1;
        assert!(!is_unordered(&l));
    }
}
