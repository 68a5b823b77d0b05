#![forbid(unsafe_code)]
//! mailscore_lib: scores a domain's mail-authentication posture.
//!
//! MX, A, AAAA, SPF, DMARC, DKIM and BIMI lookups plus an SMTP liveness
//! probe, folded into a [`ScanResult`] with a weighted total.

pub mod checks;
pub mod deadline;
pub mod resolver;
pub mod scan;
pub mod smtp;

pub use checks::{DEFAULT_DKIM_SELECTORS, RecordKind, RecordResult, extract_svg_url};
pub use deadline::Deadline;
pub use resolver::{DnsLookup, LookupFailure, LookupPool, QueryType, system_resolver};
pub use scan::{
    MAX_SCORE, Records, ScanError, ScanOptions, ScanResult, ServiceKind, Services, scan_domain,
    scan_domain_with_options, scan_with,
};
pub use smtp::{ProbeBudget, ProbeError, ProbeOptions, SmtpProbe, TcpProbe, probe_mx};
