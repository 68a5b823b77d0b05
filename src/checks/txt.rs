use tracing::debug;

use super::RecordResult;
use crate::resolver::{DnsLookup, QueryType, fqdn};

pub(crate) const SPF_MARKER: &str = "v=spf1";
pub(crate) const DMARC_MARKER: &str = "v=DMARC1";
pub(crate) const DKIM_MARKER: &str = "v=DKIM1";
pub(crate) const BIMI_MARKER: &str = "v=BIMI1";

/// Keeps the records containing `marker`, case-sensitive, anywhere in the
/// string.
pub fn filter_marker(records: Vec<String>, marker: &str) -> Vec<String> {
    records
        .into_iter()
        .filter(|record| record.contains(marker))
        .collect()
}

pub(crate) fn check_spf<R>(resolver: &R, domain: &str, weight: u32) -> RecordResult
where
    R: DnsLookup + ?Sized,
{
    check_marked(resolver, domain, "SPF", SPF_MARKER, weight)
}

pub(crate) fn check_dmarc<R>(resolver: &R, domain: &str, weight: u32) -> RecordResult
where
    R: DnsLookup + ?Sized,
{
    check_marked(resolver, &fqdn("_dmarc", domain), "DMARC", DMARC_MARKER, weight)
}

fn check_marked<R>(resolver: &R, name: &str, label: &str, marker: &str, weight: u32) -> RecordResult
where
    R: DnsLookup + ?Sized,
{
    match resolver.resolve(name, QueryType::Txt) {
        Ok(records) => {
            let matching = filter_marker(records, marker);
            if matching.is_empty() {
                debug!(name, marker, "TXT records present, marker missing");
                RecordResult::unmatched(format!("No {label} record found"))
            } else {
                RecordResult::found(matching, format!("Found {label} record"), weight)
            }
        }
        Err(failure) => {
            debug!(%failure, "no {label} record");
            RecordResult::not_found(format!("No {label} record found"))
        }
    }
}
