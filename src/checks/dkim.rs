use tracing::debug;

use super::RecordResult;
use super::txt::{DKIM_MARKER, filter_marker};
use crate::resolver::{DnsLookup, QueryType, fqdn};

/// Selectors guessed when the caller does not provide its own.
pub const DEFAULT_DKIM_SELECTORS: [&str; 5] = ["default", "google", "mail", "k1", "smtp"];

/// Tries `selectors` in order and stops at the first one publishing a
/// `v=DKIM1` record. Later selectors are never queried.
pub(crate) fn check<R, S>(resolver: &R, domain: &str, selectors: &[S], weight: u32) -> RecordResult
where
    R: DnsLookup + ?Sized,
    S: AsRef<str>,
{
    for selector in selectors {
        let selector = selector.as_ref();
        let name = fqdn(&format!("{selector}._domainkey"), domain);
        let records = match resolver.resolve(&name, QueryType::Txt) {
            Ok(records) => records,
            Err(failure) => {
                debug!(selector, %failure, "dkim selector lookup failed");
                continue;
            }
        };
        let matching = filter_marker(records, DKIM_MARKER);
        if !matching.is_empty() {
            return RecordResult::found(
                matching,
                format!("Found DKIM record with selector '{selector}'"),
                weight,
            );
        }
        debug!(selector, "TXT records present, no v=DKIM1");
    }
    RecordResult::not_found("No DKIM record found with common selectors")
}
