/// Column names used to recognize the header row of an extract.
pub const KNOWN_HEADERS: &[&str] = &[
    "ro number",
    "owner",
    "vehicle",
    "vehicle color",
    "license plate number",
    "parts received %",
    "vendor name",
    "primary phone",
    "part number",
    "part description",
    "fax",
    "address",
    "city",
    "state",
    "zip",
    "preferred",
    "electronic",
];

/// Display header → field key, across the daily-out, parts-status, and vendor extracts.
const HEADER_MAP: &[(&str, &str)] = &[
    // daily out
    ("ro number", "ro_number"),
    ("owner", "owner"),
    ("vehicle", "vehicle"),
    ("vehicle color", "vehicle_color"),
    ("license plate number", "license_plate_number"),
    ("parts received %", "parts_received_pct"),
    ("vehicle in", "vehicle_in"),
    ("current phase", "current_phase"),
    ("scheduled out", "scheduled_out"),
    ("body technician", "body_technician"),
    ("estimator", "estimator"),
    // parts status
    ("line", "line"),
    ("part number", "part_number"),
    ("part description", "part_description"),
    ("part type", "part_type"),
    ("vendor name", "vendor_name"),
    ("ro qty", "ro_qty"),
    ("ordered qty", "ordered_qty"),
    ("ordered date", "ordered_date"),
    ("expected delivery", "expected_delivery"),
    ("received qty", "received_qty"),
    ("invoice date", "invoice_date"),
    ("returned qty", "returned_qty"),
    // vendors
    ("primary phone", "primary_phone"),
    ("fax", "fax"),
    ("address", "address"),
    ("city", "city"),
    ("state", "state"),
    ("zip", "zip"),
    ("preferred", "preferred"),
    ("electronic", "electronic"),
];

/// Map a raw header cell to a field key.
///
/// Returns `None` for blank headers; unknown headers come back lower-cased.
pub fn map_header(header: &str) -> Option<String> {
    let key = header.trim().trim_start_matches('\u{feff}').trim().to_lowercase();
    if key.is_empty() {
        return None;
    }
    let mapped = HEADER_MAP
        .iter()
        .find(|(display, _)| *display == key)
        .map(|(_, field)| (*field).to_string());
    Some(mapped.unwrap_or(key))
}

/// How many known headers a line mentions (case-insensitive substring match).
pub(crate) fn known_header_matches(line: &str) -> usize {
    let line = line.to_lowercase();
    KNOWN_HEADERS.iter().filter(|h| line.contains(*h)).count()
}

/// Trim a cell and fold Windows-1252 punctuation and common accents to ASCII.
pub fn clean_field(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            'é' | 'è' | 'ê' => 'e',
            'à' | 'á' | 'â' => 'a',
            'ñ' => 'n',
            'ü' => 'u',
            'ó' => 'o',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_display_headers() {
        assert_eq!(map_header(" RO Number ").as_deref(), Some("ro_number"));
        assert_eq!(map_header("Parts Received %").as_deref(), Some("parts_received_pct"));
        assert_eq!(map_header("RO Qty").as_deref(), Some("ro_qty"));
        assert_eq!(map_header("\u{feff}Vendor Name").as_deref(), Some("vendor_name"));
    }

    #[test]
    fn unknown_headers_are_lowercased_and_blank_dropped() {
        assert_eq!(map_header("  Insurance Co ").as_deref(), Some("insurance co"));
        assert_eq!(map_header("   "), None);
    }

    #[test]
    fn counts_known_header_mentions() {
        assert_eq!(known_header_matches("RO Number,Owner,Vehicle,Vehicle Color"), 4);
        assert_eq!(known_header_matches("Shop Report - March"), 0);
    }

    #[test]
    fn cleans_typographic_characters() {
        assert_eq!(clean_field("  O\u{2019}Brien \u{2013} Jos\u{00E9} "), "O'Brien - Jose");
        assert_eq!(clean_field("\u{201C}Peña\u{201D}"), "\"Pena\"");
        assert_eq!(clean_field("plain"), "plain");
    }
}
