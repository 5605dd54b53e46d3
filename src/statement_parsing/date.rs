use chrono::{NaiveDate, NaiveDateTime};

// two digit years come first, "%Y" would happily read "24" as year 24
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%d.%m.%y", "%d.%m.%Y", "%d/%m/%y", "%d/%m/%Y", "%Y/%m/%d",
];

/// Reads the calendar date out of a statement date cell.
///
/// Returns `None` when the cell is in a format we do not know, the raw string
/// is still stored in that case.
pub fn parse_booking_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(datetime.date());
    }

    let date_part = raw.split_whitespace().next().unwrap_or(raw);

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}
