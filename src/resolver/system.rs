use std::borrow::Cow;
use std::io;
use std::time::Duration;

use tracing::debug;
use trust_dns_resolver::{
    Resolver,
    error::{ResolveError, ResolveErrorKind},
    lookup::TxtLookup,
    proto::op::ResponseCode,
    system_conf::read_system_conf,
};

use super::{DnsLookup, LookupFailure, LookupPool, QueryType};

/// Resolvers from the system configuration with a per-query `timeout` and a
/// single attempt per name server: failed queries are final.
pub fn system_resolver(
    timeout: Duration,
) -> io::Result<LookupPool<Resolver, impl Fn() -> io::Result<Resolver> + Send + Sync>> {
    let (config, mut opts) = read_system_conf()?;
    opts.timeout = timeout;
    opts.attempts = 1;
    LookupPool::new(move || Resolver::new(config.clone(), opts.clone()))
}

impl DnsLookup for Resolver {
    fn resolve(&self, name: &str, query: QueryType) -> Result<Vec<String>, LookupFailure> {
        debug!(name, %query, "dns lookup");
        let answers = match query {
            QueryType::Mx => self.mx_lookup(name).map(|lookup| {
                lookup
                    .iter()
                    .map(|mx| format!("{} {}", mx.preference(), mx.exchange()))
                    .collect()
            }),
            QueryType::A => self
                .ipv4_lookup(name)
                .map(|lookup| lookup.iter().map(|addr| addr.to_string()).collect()),
            QueryType::Aaaa => self
                .ipv6_lookup(name)
                .map(|lookup| lookup.iter().map(|addr| addr.to_string()).collect()),
            QueryType::Txt => self
                .txt_lookup(name)
                .map(|lookup| collect_txt_records(name, &lookup)),
        };
        answers.map_err(|err| classify(name, query, &err))
    }
}

/// Joins the character-strings of every TXT record. Bytes that are not UTF-8
/// become U+FFFD so one odd record never hides the others.
pub(super) fn collect_txt_records(name: &str, lookup: &TxtLookup) -> Vec<String> {
    lookup
        .iter()
        .map(|txt| {
            let mut record = String::new();
            for piece in txt.txt_data().iter() {
                let segment = String::from_utf8_lossy(piece);
                if let Cow::Owned(_) = segment {
                    debug!(name, "TXT data is not valid UTF-8");
                }
                record.push_str(&segment);
            }
            record
        })
        .collect()
}

pub(super) fn classify(name: &str, query: QueryType, err: &ResolveError) -> LookupFailure {
    let failure = match err.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. }
            if *response_code == ResponseCode::NXDomain =>
        {
            LookupFailure::nx_domain(name)
        }
        ResolveErrorKind::NoRecordsFound { .. } => LookupFailure::no_records(name, query),
        ResolveErrorKind::Timeout => LookupFailure::timeout(name, query),
        _ => LookupFailure::resolver(name, query, err.to_string()),
    };
    debug!(%failure, "dns lookup failed");
    failure
}
