use chrono::format::strftime::StrftimeItems;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

// Zone-less layouts are read as UTC.
const DATETIME_LAYOUTS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
const DATE_LAYOUTS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d"];

pub fn format_rfc822(datetime: DateTime<Utc>) -> String {
    let format = StrftimeItems::new("%a, %d %b %Y %H:%M:%S %z");
    datetime.format_with_items(format).to_string()
}

/// Tries each known layout in order. A string no layout matches reads as
/// the current time, never as an error.
pub fn parse_date(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return dt.with_timezone(&Utc);
    }
    for layout in DATETIME_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, layout) {
            return dt.and_utc();
        }
    }
    for layout in DATE_LAYOUTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, layout) {
            return d.and_time(NaiveTime::MIN).and_utc();
        }
    }
    Utc::now()
}
