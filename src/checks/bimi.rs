use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::RecordResult;
use super::txt::{BIMI_MARKER, filter_marker};
use crate::resolver::{DnsLookup, QueryType, fqdn};

/// Reported in place of the logo URL when the record has no usable `l=` tag.
pub const NO_SVG_URL: &str = "No SVG URL found";

// `l=` at the start of a tag; the value stops at the next quote or semicolon.
static LOGO_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|[;\s"])l=([^";]+)"#).expect("valid BIMI logo regex")
});

/// Extracts the logo location from a BIMI record, or [`NO_SVG_URL`].
pub fn extract_svg_url(record: &str) -> &str {
    LOGO_TAG
        .captures(record)
        .and_then(|captures| captures.get(1))
        .map(|value| value.as_str().trim())
        .filter(|value| !value.is_empty())
        .unwrap_or(NO_SVG_URL)
}

/// The marker alone earns the point; the URL only feeds the detail text.
pub(crate) fn check<R>(resolver: &R, domain: &str, weight: u32) -> RecordResult
where
    R: DnsLookup + ?Sized,
{
    let name = fqdn("default._bimi", domain);
    match resolver.resolve(&name, QueryType::Txt) {
        Ok(records) => {
            let matching = filter_marker(records, BIMI_MARKER);
            let Some(first) = matching.first() else {
                return RecordResult::not_found("No BIMI record found");
            };
            let svg_url = extract_svg_url(first).to_string();
            RecordResult::found(
                matching,
                format!("BIMI record found: <img src=\"{svg_url}\">"),
                weight,
            )
        }
        Err(failure) => {
            debug!(%failure, "bimi lookup failed");
            RecordResult::not_found("Failed to fetch BIMI record")
        }
    }
}
