use std::time::Duration;

use proptest::prelude::*;

use super::*;
use crate::resolver::{LookupFailure, QueryType, tests::StubResolver};
use crate::smtp::{Candidate, NO_SMTP_DETAIL, ProbeBudget, ProbeError, SmtpReply};

struct NoServer;

impl SmtpProbe for NoServer {
    fn probe(
        &self,
        candidate: &Candidate,
        _budget: &ProbeBudget<'_>,
    ) -> Result<SmtpReply, ProbeError> {
        Err(ProbeError::Protocol(format!("{candidate} unreachable")))
    }
}

struct AlwaysUp;

impl SmtpProbe for AlwaysUp {
    fn probe(
        &self,
        _candidate: &Candidate,
        _budget: &ProbeBudget<'_>,
    ) -> Result<SmtpReply, ProbeError> {
        Ok(SmtpReply::new(250, "OK"))
    }
}

fn fully_configured() -> StubResolver {
    let mut stub = StubResolver::new();
    stub.insert_records("example.com", QueryType::Mx, ["10 mx.example.com."]);
    stub.insert_records("example.com", QueryType::A, ["192.0.2.1"]);
    stub.insert_records("example.com", QueryType::Aaaa, ["2001:db8::1"]);
    stub.insert_records(
        "example.com",
        QueryType::Txt,
        ["v=spf1 include:_spf.example.com ~all"],
    );
    stub.insert_records("_dmarc.example.com", QueryType::Txt, ["v=DMARC1; p=reject"]);
    stub.insert_records("google._domainkey.example.com", QueryType::Txt, ["v=DKIM1; p=KEY"]);
    stub.insert_records(
        "default._bimi.example.com",
        QueryType::Txt,
        ["v=BIMI1; l=https://example.com/logo.svg; a="],
    );
    stub
}

#[test]
fn dmarc_only_domain_scores_two() {
    let mut stub = StubResolver::new();
    stub.insert_records("_dmarc.example.com", QueryType::Txt, ["v=DMARC1; p=reject"]);

    let result = scan_with(&stub, &AlwaysUp, "example.com", &ScanOptions::default());
    assert_eq!(result.total_score(), 2);
    assert_eq!(result.services().smtp().score(), 0);
}

#[test]
fn fully_configured_domain_reaches_max_score() {
    let stub = fully_configured();
    let result = scan_with(&stub, &AlwaysUp, "example.com", &ScanOptions::default());

    assert_eq!(result.total_score(), MAX_SCORE);
    assert_eq!(result.domain(), "example.com");
    assert_eq!(
        result.services().smtp().data(),
        Some(&["SMTP server running on mx.example.com 25".to_string()][..])
    );
}

#[test]
fn mx_failure_is_isolated() {
    let mut stub = fully_configured();
    stub.insert_failure(
        "example.com",
        QueryType::Mx,
        LookupFailure::resolver("example.com", QueryType::Mx, "SERVFAIL"),
    );

    let result = scan_with(&stub, &AlwaysUp, "example.com", &ScanOptions::default());
    let mx = result.records().get(RecordKind::Mx);
    assert_eq!(mx.score(), 0);
    assert_eq!(mx.data(), None);

    let smtp = result.services().smtp();
    assert_eq!(smtp.score(), 0);
    assert_eq!(smtp.detail(), NO_SMTP_DETAIL);

    for kind in [
        RecordKind::A,
        RecordKind::Aaaa,
        RecordKind::Spf,
        RecordKind::Dmarc,
        RecordKind::Dkim,
        RecordKind::Bimi,
    ] {
        assert_eq!(result.records().get(kind).score(), kind.weight(), "{kind}");
    }
    assert_eq!(result.total_score(), 7);
}

#[test]
fn unreachable_smtp_keeps_record_scores() {
    let stub = fully_configured();
    let result = scan_with(&stub, &NoServer, "example.com", &ScanOptions::default());
    assert_eq!(result.total_score(), MAX_SCORE - 1);
    assert_eq!(result.services().smtp().detail(), NO_SMTP_DETAIL);
}

#[test]
fn disabled_smtp_probe_scores_zero() {
    let stub = fully_configured();
    let options = ScanOptions::new().with_smtp_probe(false);
    let result = scan_with(&stub, &AlwaysUp, "example.com", &options);
    assert_eq!(result.services().smtp().score(), 0);
    assert_eq!(result.services().smtp().detail(), "SMTP probe disabled");
}

#[test]
fn expired_deadline_yields_complete_zero_result() {
    let stub = fully_configured();
    let options = ScanOptions::new().with_deadline(Some(Duration::ZERO));
    let result = scan_with(&stub, &AlwaysUp, "example.com", &options);

    assert_eq!(result.total_score(), 0);
    assert_eq!(result.records().iter().count(), 7);
    assert!(stub.queried_names().is_empty());
}

#[test]
fn custom_selectors_replace_defaults() {
    let mut stub = StubResolver::new();
    stub.insert_records("s1._domainkey.example.com", QueryType::Txt, ["v=DKIM1; p=KEY"]);
    let options = ScanOptions::new()
        .with_smtp_probe(false)
        .with_dkim_selectors([" S1. ", "s1", ""]);

    assert_eq!(options.dkim_selectors(), &["s1".to_string()]);
    let result = scan_with(&stub, &NoServer, "example.com", &options);
    assert_eq!(result.records().get(RecordKind::Dkim).score(), 1);
}

#[test]
fn repeated_scans_are_identical() {
    let stub = fully_configured();
    let options = ScanOptions::default();
    let first = scan_with(&stub, &AlwaysUp, "example.com", &options);
    let second = scan_with(&stub, &AlwaysUp, "example.com", &options);
    assert_eq!(first, second);

    #[cfg(feature = "with-serde")]
    assert_eq!(
        serde_json::to_vec(&first).expect("serialize"),
        serde_json::to_vec(&second).expect("serialize")
    );
}

#[cfg(feature = "with-serde")]
#[test]
fn serialized_shape_matches_presentation_contract() {
    let mut stub = StubResolver::new();
    stub.insert_records("_dmarc.example.com", QueryType::Txt, ["v=DMARC1; p=reject"]);
    let result = scan_with(&stub, &NoServer, "example.com", &ScanOptions::default());

    let value = serde_json::to_value(&result).expect("serialize");
    assert_eq!(value["total_score"], 2);
    assert_eq!(value["domain"], "example.com");
    assert_eq!(value["records"]["dmarc"]["score"], 2);
    assert_eq!(value["records"]["dmarc"]["record_data"][0], "v=DMARC1; p=reject");
    assert_eq!(value["records"]["dmarc"]["detail"], "Found DMARC record");
    assert!(value["records"]["mx"]["record_data"].is_null());
    assert_eq!(value["services"]["smtp"]["score"], 0);

    let records = value["records"].as_object().expect("records object");
    let keys: Vec<&str> = records.keys().map(String::as_str).collect();
    for key in ["mx", "a", "aaaa", "spf", "dmarc", "dkim", "bimi"] {
        assert!(keys.contains(&key), "missing {key}");
    }
}

proptest! {
    #[test]
    fn total_is_sum_of_components(
        mx in any::<bool>(),
        a in any::<bool>(),
        spf in any::<bool>(),
        dmarc in any::<bool>(),
        dkim in any::<bool>(),
        bimi in any::<bool>(),
        smtp_up in any::<bool>(),
    ) {
        let mut stub = StubResolver::new();
        if mx {
            stub.insert_records("example.com", QueryType::Mx, ["10 mx.example.com."]);
        }
        if a {
            stub.insert_records("example.com", QueryType::A, ["192.0.2.1"]);
        }
        if spf {
            stub.insert_records("example.com", QueryType::Txt, ["v=spf1 -all"]);
        }
        if dmarc {
            stub.insert_records("_dmarc.example.com", QueryType::Txt, ["v=DMARC1; p=none"]);
        }
        if dkim {
            stub.insert_records("k1._domainkey.example.com", QueryType::Txt, ["v=DKIM1; p=K"]);
        }
        if bimi {
            stub.insert_records("default._bimi.example.com", QueryType::Txt, ["v=BIMI1;"]);
        }

        let result = if smtp_up {
            scan_with(&stub, &AlwaysUp, "example.com", &ScanOptions::default())
        } else {
            scan_with(&stub, &NoServer, "example.com", &ScanOptions::default())
        };

        let components: u32 = result.records().iter().map(|(_, r)| r.score()).sum::<u32>()
            + result.services().smtp().score();
        prop_assert_eq!(result.total_score(), components);

        let expected = u32::from(mx) + u32::from(a) + u32::from(spf)
            + 2 * u32::from(dmarc) + u32::from(dkim) + u32::from(bimi)
            + u32::from(mx && smtp_up);
        prop_assert_eq!(result.total_score(), expected);
        prop_assert!(result.total_score() <= MAX_SCORE);
    }
}
