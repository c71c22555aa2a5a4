//! Local export of conversion results

use crate::errors::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use composable_core::ConversionResult;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use url::Url;

/// Name used when a route cannot be derived from the location
pub const FALLBACK_ROUTE: &str = "page-conversion";

/// File-name-safe route of a page, e.g. `localhost_5173_packages_bali`
///
/// Empty paths become `root`; a route starting with a digit gets a `page_`
/// prefix.
pub fn page_route(location: &Url) -> String {
    let Some(host) = location.host_str().filter(|h| !h.is_empty()) else {
        warn!(location = %location, "page has no host, using fallback route");
        return FALLBACK_ROUTE.to_string();
    };
    let host = match location.port() {
        Some(port) => format!("{host}_{port}"),
        None => host.to_string(),
    };
    let path = location.path().trim_matches('/');
    let path = if path.is_empty() { "root" } else { path };

    let mut collapsed = String::new();
    let mut in_separator_run = false;
    for c in format!("{host}_{path}").chars() {
        if c == '_' || c.is_whitespace() {
            if !in_separator_run {
                collapsed.push('_');
            }
            in_separator_run = true;
        } else {
            collapsed.push(c);
            in_separator_run = false;
        }
    }
    let mut route: String = collapsed
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();

    if route.starts_with(|c: char| c.is_ascii_digit()) {
        route.insert_str(0, "page_");
    }
    route
}

/// `{route}-{timestamp}-with-stylesheet.json`
///
/// The timestamp is ISO 8601 with `:` and `.` replaced by `-`.
pub fn export_file_name(location: &Url, now: DateTime<Utc>) -> String {
    let timestamp = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{}-{}-with-stylesheet.json", page_route(location), timestamp)
}

/// Writes a result as pretty JSON into `directory`
///
/// # Errors
///
/// Returns error if the directory cannot be created or the file written
pub fn export_result(
    result: &ConversionResult,
    directory: &Path,
    location: &Url,
    now: DateTime<Utc>,
) -> Result<PathBuf> {
    std::fs::create_dir_all(directory)?;
    let path = directory.join(export_file_name(location, now));
    let json = serde_json::to_string_pretty(result)?;
    std::fs::write(&path, json)?;
    info!("exported {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_page_route() {
        assert_eq!(page_route(&url("http://localhost:5173/")), "localhost_5173_root");
        assert_eq!(
            page_route(&url("http://localhost:5173/packages/bali-escape/")),
            "localhost_5173_packagesbali-escape"
        );
        assert_eq!(page_route(&url("https://example.com/about")), "examplecom_about");
        assert_eq!(page_route(&url("http://127.0.0.1:8080/x")), "page_127001_8080_x");
        assert_eq!(page_route(&url("file:///tmp/page.html")), FALLBACK_ROUTE);
    }

    #[test]
    fn test_export_file_name() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 9, 5, 3).unwrap();
        assert_eq!(
            export_file_name(&url("http://localhost:5173/contact"), now),
            "localhost_5173_contact-2026-10-17T09-05-03-000Z-with-stylesheet.json"
        );
    }
}
