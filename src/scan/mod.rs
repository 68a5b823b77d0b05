//! Scan orchestration: every record check plus the SMTP probe, folded into
//! one [`ScanResult`].

mod error;
mod options;
mod types;

pub use error::ScanError;
pub use options::ScanOptions;
pub use types::{MAX_SCORE, Records, ScanResult, ServiceKind, Services};

use std::collections::HashMap;
use std::thread;

use tracing::{debug, info, warn};

use crate::checks::{RecordKind, RecordResult};
use crate::deadline::Deadline;
use crate::resolver::{DeadlineLookup, DnsLookup, system_resolver};
use crate::smtp::{self, SmtpProbe, TcpProbe};

pub fn scan_domain(domain: &str) -> Result<ScanResult, ScanError> {
    scan_domain_with_options(domain, &ScanOptions::default())
}

/// Scans `domain` with the system resolver and real TCP probes.
///
/// Only setup can fail; lookup and probe failures end up as zero scores in
/// the result.
pub fn scan_domain_with_options(
    domain: &str,
    options: &ScanOptions,
) -> Result<ScanResult, ScanError> {
    let resolver = system_resolver(options.dns_timeout()).map_err(ScanError::resolver_init)?;
    let prober = TcpProbe::new(options.probe()).map_err(ScanError::prober_init)?;
    Ok(scan_with(&resolver, &prober, domain, options))
}

/// Runs the scan against any resolver and prober.
///
/// The record checks run concurrently; the SMTP probe then consumes the MX
/// answers. Every check always yields a result.
pub fn scan_with<R, P>(resolver: &R, prober: &P, domain: &str, options: &ScanOptions) -> ScanResult
where
    R: DnsLookup + Sync + ?Sized,
    P: SmtpProbe + Sync + ?Sized,
{
    let deadline = Deadline::after(options.deadline());
    let bounded = DeadlineLookup::new(resolver, deadline);

    let records = run_checks(&bounded, domain, options.dkim_selectors());

    let smtp = if options.smtp_probe() {
        smtp::probe_mx(
            prober,
            records.get(RecordKind::Mx).data(),
            options.probe(),
            &deadline,
        )
    } else {
        RecordResult::not_found("SMTP probe disabled")
    };

    let result = ScanResult::new(domain, records, Services::new(smtp));
    if deadline.expired() {
        warn!(domain, "scan finished after its deadline; pending work counted as not found");
    }
    info!(
        domain,
        total_score = result.total_score(),
        max = MAX_SCORE,
        "scan complete"
    );
    result
}

fn run_checks<R>(resolver: &R, domain: &str, selectors: &[String]) -> Records
where
    R: DnsLookup + Sync + ?Sized,
{
    thread::scope(|scope| {
        let mut handles: HashMap<_, _> = RecordKind::ALL
            .into_iter()
            .map(|kind| {
                let handle = scope.spawn(move || kind.check(resolver, domain, selectors));
                (kind, handle)
            })
            .collect();

        Records::collect(|kind| {
            let result = handles
                .remove(&kind)
                .and_then(|handle| handle.join().ok())
                .unwrap_or_else(|| RecordResult::not_found(format!("{kind} check aborted")));
            debug!(%kind, %result, "record check done");
            result
        })
    })
}

#[cfg(test)]
mod tests;
