use chrono::{NaiveDate, NaiveDateTime};

/// Canonical absolute path for `name` inside the given directory segments.
///
/// Only the first doubled slash is collapsed, which is what the server-side
/// handler relies on for root-level entries (`[] + "x"` becomes `/x`, not
/// `//x`). Deeper empty segments are left alone; see the tests before
/// changing this.
pub fn full_path(segments: &[String], name: &str) -> String {
    format!("/{}/{}", segments.join("/"), name).replacen("//", "/", 1)
}

/// Parse a listing timestamp of the form `YYYY-MM-DD HH:MM:SS`.
///
/// Any missing or malformed component yields `None` rather than an error;
/// listings routinely carry empty date fields.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let mut parts = text.split(|c| c == '-' || c == ' ' || c == ':');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    let hour: u32 = parts.next()?.parse().ok()?;
    let minute: u32 = parts.next()?.parse().ok()?;
    let second: u32 = parts.next()?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}
