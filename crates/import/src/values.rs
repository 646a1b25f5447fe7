use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a decimal cell. Blank or unparseable cells are absent.
///
/// Thousands separators and a trailing `%` are tolerated.
pub fn parse_number(value: &str) -> Option<f64> {
    let cleaned: String = value.trim().trim_end_matches('%').chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse a whole-number quantity. Blank and unparseable cells count as zero;
/// a fractional value is an error.
pub fn parse_quantity(value: &str) -> Result<i64, String> {
    match parse_number(value) {
        None => Ok(0),
        Some(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => Ok(n as i64),
        Some(n) => Err(format!("'{n}' is not a whole number")),
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"];

/// Parse a date cell. Accepts RFC 3339, ISO dates, and US `m/d/Y` with an
/// optional time. Naive values are taken as UTC.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.and_utc());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }
    None
}

/// `true`, `1`, or `electronic` (case-insensitive); anything else is false.
pub fn parse_bool(value: &str) -> bool {
    let v = value.trim();
    v.eq_ignore_ascii_case("true") || v == "1" || v.eq_ignore_ascii_case("electronic")
}
