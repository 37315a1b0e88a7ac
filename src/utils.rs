use chrono::{DateTime, TimeZone};
use std::path::Path;
use url::Url;

/// Timestamp format of the Date column
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp format used in output file names
pub const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// First `max_chars` characters of `text`
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Convert a string to a sanitized filename
pub fn sanitize_filename(url: &str) -> String {
    // Remove protocol and replace invalid filename characters
    let name = url.replace("http://", "").replace("https://", "");
    let name = name
        .trim_end_matches('/')
        .replace(['/', ':', '?', '&', '=', '#', '%', '\\', ' '], "_");

    truncate_chars(&name, 100)
}

/// What a run's files are named after: the page URL, or the saved
/// document's file stem when auditing offline without one
pub fn report_subject(page_url: &str, html: Option<&Path>) -> String {
    match html.and_then(Path::file_stem) {
        Some(stem) if page_url.is_empty() => stem.to_string_lossy().into_owned(),
        _ => page_url.to_string(),
    }
}

/// Stem shared by the report and screenshot of one run,
/// e.g. `products_store.renault.com.ar_20261019_101500`
pub fn output_stem<Tz: TimeZone>(mode: &str, page_url: &str, started: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let host = Url::parse(page_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| page_url.to_string());

    format!(
        "{}_{}_{}",
        mode,
        sanitize_filename(&host),
        started.format(FILE_STAMP_FORMAT)
    )
}
