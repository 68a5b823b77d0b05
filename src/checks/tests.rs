use proptest::prelude::*;

use super::{DEFAULT_DKIM_SELECTORS, NO_SVG_URL, RecordKind, extract_svg_url, filter_marker};
use crate::resolver::{LookupFailure, QueryType, tests::StubResolver};

fn check(stub: &StubResolver, kind: RecordKind) -> super::RecordResult {
    kind.check(stub, "example.com", &DEFAULT_DKIM_SELECTORS)
}

#[test]
fn mx_keeps_answers_verbatim() {
    let mut stub = StubResolver::new();
    stub.insert_records(
        "example.com",
        QueryType::Mx,
        ["10 mx1.example.com.", "20 mx2.example.com."],
    );

    let result = check(&stub, RecordKind::Mx);
    assert_eq!(result.score(), 1);
    assert_eq!(result.detail(), "Found MX record");
    assert_eq!(
        result.data(),
        Some(&["10 mx1.example.com.".to_string(), "20 mx2.example.com.".to_string()][..])
    );
}

#[test]
fn aaaa_failure_is_scored_zero_without_data() {
    let mut stub = StubResolver::new();
    stub.insert_failure(
        "example.com",
        QueryType::Aaaa,
        LookupFailure::timeout("example.com", QueryType::Aaaa),
    );

    let result = check(&stub, RecordKind::Aaaa);
    assert_eq!(result.score(), 0);
    assert_eq!(result.data(), None);
    assert_eq!(result.detail(), "No AAAA record found");
}

#[test]
fn a_record_found() {
    let mut stub = StubResolver::new();
    stub.insert_records("example.com", QueryType::A, ["192.0.2.10"]);
    let result = check(&stub, RecordKind::A);
    assert_eq!(result.detail(), "Found A record");
    assert!(result.is_found());
}

#[test]
fn spf_filters_other_txt_records() {
    let mut stub = StubResolver::new();
    stub.insert_records(
        "example.com",
        QueryType::Txt,
        [
            "google-site-verification=abc",
            "v=spf1 include:_spf.example.com ~all",
        ],
    );

    let result = check(&stub, RecordKind::Spf);
    assert_eq!(result.score(), 1);
    assert_eq!(
        result.data(),
        Some(&["v=spf1 include:_spf.example.com ~all".to_string()][..])
    );
}

#[test]
fn spf_marker_is_case_sensitive() {
    let mut stub = StubResolver::new();
    stub.insert_records("example.com", QueryType::Txt, ["V=SPF1 -all"]);

    let result = check(&stub, RecordKind::Spf);
    assert_eq!(result.score(), 0);
    assert_eq!(result.data(), Some(&[][..]));
}

#[test]
fn dmarc_counts_double() {
    let mut stub = StubResolver::new();
    stub.insert_records("_dmarc.example.com", QueryType::Txt, ["v=DMARC1; p=reject"]);

    let result = check(&stub, RecordKind::Dmarc);
    assert_eq!(result.score(), 2);
    assert_eq!(result.detail(), "Found DMARC record");
}

#[test]
fn dmarc_absent_and_unmatched_differ_only_in_data() {
    let missing = check(&StubResolver::new(), RecordKind::Dmarc);

    let mut stub = StubResolver::new();
    stub.insert_records("_dmarc.example.com", QueryType::Txt, ["p=reject"]);
    let unmatched = check(&stub, RecordKind::Dmarc);

    assert_eq!(missing.score(), 0);
    assert_eq!(unmatched.score(), 0);
    assert_eq!(missing.detail(), unmatched.detail());
    assert_eq!(missing.data(), None);
    assert_eq!(unmatched.data(), Some(&[][..]));
}

#[test]
fn dkim_stops_at_first_matching_selector() {
    let mut stub = StubResolver::new();
    stub.insert_records("mail._domainkey.example.com", QueryType::Txt, ["v=DKIM1; p=MIIB"]);
    stub.insert_records("smtp._domainkey.example.com", QueryType::Txt, ["v=DKIM1; p=OTHER"]);

    let result = check(&stub, RecordKind::Dkim);
    assert_eq!(result.score(), 1);
    assert_eq!(result.detail(), "Found DKIM record with selector 'mail'");
    assert_eq!(result.data(), Some(&["v=DKIM1; p=MIIB".to_string()][..]));
    assert_eq!(
        stub.queried_names(),
        vec![
            "default._domainkey.example.com",
            "google._domainkey.example.com",
            "mail._domainkey.example.com",
        ]
    );
}

#[test]
fn dkim_skips_selectors_without_marker() {
    let mut stub = StubResolver::new();
    stub.insert_records("default._domainkey.example.com", QueryType::Txt, ["p=nope"]);
    stub.insert_records("k1._domainkey.example.com", QueryType::Txt, ["v=DKIM1; k=rsa; p=KEY"]);

    let result = check(&stub, RecordKind::Dkim);
    assert_eq!(result.detail(), "Found DKIM record with selector 'k1'");
}

#[test]
fn dkim_exhausted_reports_common_selectors() {
    let stub = StubResolver::new();
    let result = check(&stub, RecordKind::Dkim);
    assert_eq!(result.score(), 0);
    assert_eq!(result.data(), None);
    assert_eq!(result.detail(), "No DKIM record found with common selectors");
    assert_eq!(stub.queried_names().len(), DEFAULT_DKIM_SELECTORS.len());
}

#[test]
fn dkim_uses_caller_selectors() {
    let mut stub = StubResolver::new();
    stub.insert_records("s2024._domainkey.example.com", QueryType::Txt, ["v=DKIM1; p=KEY"]);

    let result = RecordKind::Dkim.check(&stub, "example.com", &["s2024".to_string()]);
    assert_eq!(result.detail(), "Found DKIM record with selector 's2024'");
}

#[test]
fn bimi_extracts_logo_url() {
    assert_eq!(
        extract_svg_url("v=BIMI1; l=https://example.com/logo.svg; a="),
        "https://example.com/logo.svg"
    );
}

#[test]
fn bimi_logo_tag_without_space_after_separator() {
    assert_eq!(
        extract_svg_url("v=BIMI1;l=https://example.com/logo.svg;a=self"),
        "https://example.com/logo.svg"
    );
    assert_eq!(
        extract_svg_url("\"v=BIMI1;l=https://example.com/logo.svg\""),
        "https://example.com/logo.svg"
    );
    assert_eq!(extract_svg_url("l=https://example.com/first.svg"), "https://example.com/first.svg");
}

#[test]
fn bimi_without_logo_tag_uses_fallback() {
    assert_eq!(extract_svg_url("v=BIMI1; a=https://example.com/vmc.pem"), NO_SVG_URL);
    assert_eq!(extract_svg_url("v=BIMI1; l="), NO_SVG_URL);
}

#[test]
fn bimi_does_not_match_inside_other_tag_values() {
    assert_eq!(extract_svg_url("v=BIMI1; url=https://x/a.svg"), NO_SVG_URL);
}

#[test]
fn bimi_marker_alone_scores() {
    let mut stub = StubResolver::new();
    stub.insert_records("default._bimi.example.com", QueryType::Txt, ["v=BIMI1; a=;"]);

    let result = check(&stub, RecordKind::Bimi);
    assert_eq!(result.score(), 1);
    assert_eq!(
        result.detail(),
        "BIMI record found: <img src=\"No SVG URL found\">"
    );
}

#[test]
fn bimi_detail_embeds_logo() {
    let mut stub = StubResolver::new();
    stub.insert_records(
        "default._bimi.example.com",
        QueryType::Txt,
        ["v=BIMI1; l=https://example.com/logo.svg; a="],
    );

    let result = check(&stub, RecordKind::Bimi);
    assert_eq!(
        result.detail(),
        "BIMI record found: <img src=\"https://example.com/logo.svg\">"
    );
}

#[test]
fn bimi_missing_marker_and_failure_have_distinct_details() {
    let mut stub = StubResolver::new();
    stub.insert_records("default._bimi.example.com", QueryType::Txt, ["l=https://x/y.svg"]);
    let unmatched = check(&stub, RecordKind::Bimi);
    assert_eq!(unmatched.score(), 0);
    assert_eq!(unmatched.detail(), "No BIMI record found");

    let failed = check(&StubResolver::new(), RecordKind::Bimi);
    assert_eq!(failed.score(), 0);
    assert_eq!(failed.detail(), "Failed to fetch BIMI record");
}

#[test]
fn weights_sum_to_eight_for_records() {
    let total: u32 = RecordKind::ALL.iter().map(|kind| kind.weight()).sum();
    assert_eq!(total, 8);
}

proptest! {
    #[test]
    fn marker_matches_anywhere(prefix in "[a-z ;=]{0,12}", suffix in "[a-z0-9 :._~-]{0,24}") {
        let record = format!("{prefix}v=spf1{suffix}");
        prop_assert_eq!(filter_marker(vec![record.clone()], "v=spf1"), vec![record]);
    }

    #[test]
    fn records_without_marker_are_dropped(record in "[a-zA-Z0-9 ;=]{0,40}") {
        prop_assume!(!record.contains("v=spf1"));
        prop_assert!(filter_marker(vec![record], "v=spf1").is_empty());
    }

    #[test]
    fn positive_score_implies_data(records in proptest::collection::vec("[a-zA-Z0-9 ;=]{0,20}", 0..4)) {
        let mut stub = StubResolver::new();
        stub.insert_records("example.com", QueryType::Txt, records);
        let result = check(&stub, RecordKind::Spf);
        if result.score() > 0 {
            prop_assert!(result.data().is_some_and(|data| !data.is_empty()));
        }
    }
}
