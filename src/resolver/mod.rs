//! DNS lookups behind a two-outcome contract.
//!
//! [`DnsLookup::resolve`] either returns the answer strings or a
//! [`LookupFailure`]. The trust-dns [`Resolver`](trust_dns_resolver::Resolver)
//! implements it, [`LookupPool`] spreads concurrent lookups over several
//! resolvers, and tests swap in stubs.

mod error;
mod pool;
mod system;

pub use error::LookupFailure;
pub use pool::LookupPool;
pub use system::system_resolver;

use std::fmt;

use tracing::warn;

use crate::deadline::Deadline;

/// The record types the checkers ask for.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryType {
    Mx,
    A,
    Aaaa,
    Txt,
}

impl QueryType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mx => "MX",
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Txt => "TXT",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name + type in, answers or failure out.
///
/// Answers are rendered as text: `"<preference> <exchange>"` for MX, the
/// address for A/AAAA, the concatenated character-strings for TXT.
pub trait DnsLookup {
    fn resolve(&self, name: &str, query: QueryType) -> Result<Vec<String>, LookupFailure>;
}

impl<T: DnsLookup + ?Sized> DnsLookup for &T {
    fn resolve(&self, name: &str, query: QueryType) -> Result<Vec<String>, LookupFailure> {
        (**self).resolve(name, query)
    }
}

/// Refuses new lookups once the scan deadline has passed.
#[derive(Debug)]
pub struct DeadlineLookup<'a, R: ?Sized> {
    inner: &'a R,
    deadline: Deadline,
}

impl<'a, R: ?Sized> DeadlineLookup<'a, R> {
    pub fn new(inner: &'a R, deadline: Deadline) -> Self {
        Self { inner, deadline }
    }
}

impl<R: DnsLookup + ?Sized> DnsLookup for DeadlineLookup<'_, R> {
    fn resolve(&self, name: &str, query: QueryType) -> Result<Vec<String>, LookupFailure> {
        if self.deadline.expired() {
            warn!(name, %query, "scan deadline exceeded, skipping lookup");
            return Err(LookupFailure::deadline(name, query));
        }
        self.inner.resolve(name, query)
    }
}

/// Prefixes `domain` with `label` (`_dmarc`, `k1._domainkey`, ...).
pub(crate) fn fqdn(label: &str, domain: &str) -> String {
    let trimmed = label.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        domain.to_string()
    } else {
        format!("{trimmed}.{domain}")
    }
}
