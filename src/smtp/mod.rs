//! SMTP liveness probing of the MX hosts.
//!
//! The public entry point is [`probe_mx`]. Hosts are tried in MX-answer
//! order; the ports of one host are probed concurrently and the first port
//! (in configured order) that answers `NOOP` with `250` wins. Later hosts
//! are never contacted once a host succeeds.
//!
//! Every attempt runs under a [`ProbeBudget`]: the earlier of the scan
//! deadline and the per-candidate timeout. Ports behind an earlier port that
//! already answered are cancelled instead of waited for.

mod error;
mod options;
mod probe;
mod session;
mod types;

pub use error::ProbeError;
pub use options::ProbeOptions;
pub use probe::{SmtpProbe, TcpProbe};
pub use types::{Candidate, ProbeBudget, SmtpReply};

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use tracing::{debug, info, warn};

use crate::checks::RecordResult;
use crate::deadline::Deadline;

/// Weight of a confirmed SMTP server in the total score.
pub const SMTP_WEIGHT: u32 = 1;

pub const SMTP_FOUND_DETAIL: &str = "SMTP server found";

pub const NO_SMTP_DETAIL: &str = "No SMTP server confirmed. A missing response does not prove \
     the domain has no mail server: security appliances and non-standard configurations can \
     suppress it.";

/// Probes the hosts named in `mx_records` (`"<preference> <host>"`).
///
/// `None` (the MX lookup failed) short-circuits without any connection.
/// Connection and protocol errors are never fatal; they only move the search
/// to the next candidate.
pub fn probe_mx<P>(
    prober: &P,
    mx_records: Option<&[String]>,
    options: &ProbeOptions,
    deadline: &Deadline,
) -> RecordResult
where
    P: SmtpProbe + Sync + ?Sized,
{
    let Some(records) = mx_records else {
        debug!("no MX data, skipping SMTP probe");
        return RecordResult::not_found(NO_SMTP_DETAIL);
    };

    for host in mx_hosts(records) {
        if deadline.expired() {
            warn!(%host, "scan deadline exceeded, abandoning SMTP probe");
            break;
        }
        if let Some(candidate) = probe_host(prober, &host, options, deadline) {
            info!(%candidate, "SMTP server confirmed");
            return RecordResult::found(
                vec![format!("SMTP server running on {candidate}")],
                SMTP_FOUND_DETAIL,
                SMTP_WEIGHT,
            );
        }
    }

    RecordResult::not_found(NO_SMTP_DETAIL)
}

/// Host names from MX answers: the last whitespace-separated token, without
/// the trailing root dot.
pub fn mx_hosts(records: &[String]) -> Vec<String> {
    records
        .iter()
        .filter_map(|record| record.split_whitespace().last())
        .map(|host| host.trim_end_matches('.').to_string())
        .filter(|host| !host.is_empty())
        .collect()
}

fn probe_host<P>(
    prober: &P,
    host: &str,
    options: &ProbeOptions,
    deadline: &Deadline,
) -> Option<Candidate>
where
    P: SmtpProbe + Sync + ?Sized,
{
    let attempt = Deadline::after(Some(options.timeout)).earliest(*deadline);
    let candidates: Vec<Candidate> = options
        .ports
        .iter()
        .map(|&port| Candidate {
            host: host.to_string(),
            port,
        })
        .collect();
    let superseded: Vec<AtomicBool> = candidates.iter().map(|_| AtomicBool::new(false)).collect();

    let outcomes: Vec<bool> = thread::scope(|scope| {
        let handles: Vec<_> = candidates
            .iter()
            .enumerate()
            .map(|(index, candidate)| {
                let superseded = &superseded;
                let budget = ProbeBudget::new(attempt).with_cancel(&superseded[index]);
                scope.spawn(move || match prober.probe(candidate, &budget) {
                    Ok(reply) => {
                        debug!(%candidate, %reply, "NOOP accepted");
                        // later ports can no longer win
                        for flag in &superseded[index + 1..] {
                            flag.store(true, Ordering::Release);
                        }
                        true
                    }
                    Err(err) => {
                        debug!(%candidate, error = %err, "probe failed");
                        false
                    }
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or(false))
            .collect()
    });

    candidates
        .into_iter()
        .zip(outcomes)
        .find_map(|(candidate, ok)| ok.then_some(candidate))
}
