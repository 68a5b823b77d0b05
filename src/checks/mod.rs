//! Per-record-type checkers.
//!
//! The record kinds are closed, so dispatch is a plain `match` in
//! [`RecordKind::check`].

mod address;
mod bimi;
mod dkim;
mod result;
mod txt;

pub use bimi::{NO_SVG_URL, extract_svg_url};
pub use dkim::DEFAULT_DKIM_SELECTORS;
pub use result::RecordResult;
pub use txt::filter_marker;

use std::fmt;

use crate::resolver::{DnsLookup, QueryType};

#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
    Mx,
    A,
    Aaaa,
    Spf,
    Dmarc,
    Dkim,
    Bimi,
}

impl RecordKind {
    pub const ALL: [RecordKind; 7] = [
        Self::Mx,
        Self::A,
        Self::Aaaa,
        Self::Spf,
        Self::Dmarc,
        Self::Dkim,
        Self::Bimi,
    ];

    /// Score granted when the check passes. DMARC counts double.
    pub fn weight(self) -> u32 {
        match self {
            Self::Dmarc => 2,
            Self::Mx | Self::A | Self::Aaaa | Self::Spf | Self::Dkim | Self::Bimi => 1,
        }
    }

    /// Key used in serialized output.
    pub fn key(self) -> &'static str {
        match self {
            Self::Mx => "mx",
            Self::A => "a",
            Self::Aaaa => "aaaa",
            Self::Spf => "spf",
            Self::Dmarc => "dmarc",
            Self::Dkim => "dkim",
            Self::Bimi => "bimi",
        }
    }

    pub fn check<R, S>(self, resolver: &R, domain: &str, dkim_selectors: &[S]) -> RecordResult
    where
        R: DnsLookup + ?Sized,
        S: AsRef<str>,
    {
        let weight = self.weight();
        match self {
            Self::Mx => address::check(resolver, domain, QueryType::Mx, weight),
            Self::A => address::check(resolver, domain, QueryType::A, weight),
            Self::Aaaa => address::check(resolver, domain, QueryType::Aaaa, weight),
            Self::Spf => txt::check_spf(resolver, domain, weight),
            Self::Dmarc => txt::check_dmarc(resolver, domain, weight),
            Self::Dkim => dkim::check(resolver, domain, dkim_selectors, weight),
            Self::Bimi => bimi::check(resolver, domain, weight),
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests;
