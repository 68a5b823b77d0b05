use tracing::debug;

use super::RecordResult;
use crate::resolver::{DnsLookup, QueryType};

/// MX, A and AAAA: any answer counts, kept verbatim.
pub(crate) fn check<R>(resolver: &R, domain: &str, query: QueryType, weight: u32) -> RecordResult
where
    R: DnsLookup + ?Sized,
{
    match resolver.resolve(domain, query) {
        Ok(records) if !records.is_empty() => {
            RecordResult::found(records, format!("Found {query} record"), weight)
        }
        Ok(_) => RecordResult::not_found(format!("No {query} record found")),
        Err(failure) => {
            debug!(%failure, "no {query} record");
            RecordResult::not_found(format!("No {query} record found"))
        }
    }
}
