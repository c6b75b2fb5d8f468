use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use proptest::prelude::*;
use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};
use trust_dns_resolver::lookup::{Lookup, TxtLookup};
use trust_dns_resolver::proto::op::{Query, ResponseCode};
use trust_dns_resolver::proto::rr::rdata::TXT;
use trust_dns_resolver::proto::rr::{Name, RData, Record, RecordType};

use super::resolver::{classify_error, collect_txt_records};
use super::{
    AuthError, DEFAULT_SELECTOR, DomainAuthQuery, DomainAuthResolver, LookupError, LookupOutcome,
    LookupTxt, SPF_PREFIX, TxtRecord, TxtRecordSet, outcome,
};

type Answer = Result<TxtRecordSet, LookupError>;

struct StubResolver {
    answers: HashMap<String, Answer>,
}

impl StubResolver {
    fn new() -> Self {
        Self {
            answers: HashMap::new(),
        }
    }

    fn insert_records<I, R>(&mut self, name: &str, records: I)
    where
        I: IntoIterator<Item = R>,
        R: Into<TxtRecord>,
    {
        let values = records.into_iter().map(Into::into).collect();
        self.answers.insert(normalize_name(name), Ok(values));
    }

    fn insert_error(&mut self, name: &str, error: LookupError) {
        self.answers.insert(normalize_name(name), Err(error));
    }
}

impl LookupTxt for StubResolver {
    async fn lookup_txt(&self, name: &str) -> Answer {
        let key = normalize_name(name);
        self.answers.get(&key).cloned().unwrap_or_else(|| {
            Err(LookupError::no_records(
                name,
                format!("no record found for Query {{ name: {name}, TXT }}, response code NXDomain"),
            ))
        })
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}

fn query(domain: &str) -> DomainAuthQuery {
    DomainAuthQuery::new(domain, None).expect("valid domain")
}

#[tokio::test]
async fn spf_keeps_only_prefixed_records() {
    let mut stub = StubResolver::new();
    stub.insert_records(
        "example.com",
        vec![
            "google-site-verification=abc",
            "v=spf1 include:_spf.example.net ~all",
            "v=DMARC1; p=none",
        ],
    );
    let resolver = DomainAuthResolver::new(stub);

    let outcome = resolver.resolve_spf("example.com").await;
    assert_eq!(
        outcome,
        LookupOutcome::Found {
            records: vec![TxtRecord::from("v=spf1 include:_spf.example.net ~all")],
        }
    );
}

#[tokio::test]
async fn spf_prefix_is_tested_on_joined_segments() {
    let mut stub = StubResolver::new();
    stub.insert_records(
        "example.com",
        vec![TxtRecord::new(["v=sp", "f1 ip4:192.0.2.0/24", " -all"])],
    );
    let resolver = DomainAuthResolver::new(stub);

    let outcome = resolver.resolve_spf("example.com").await;
    let records = outcome.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].segments().len(), 3);
    assert_eq!(records[0].content(), "v=spf1 ip4:192.0.2.0/24 -all");
}

#[tokio::test]
async fn spf_prefix_is_case_sensitive() {
    let mut stub = StubResolver::new();
    stub.insert_records("example.com", vec!["V=SPF1 -all"]);
    let resolver = DomainAuthResolver::new(stub);

    let outcome = resolver.resolve_spf("example.com").await;
    match outcome {
        LookupOutcome::Absent { reason, .. } => {
            assert!(reason.contains("v=spf1"), "{reason}");
            assert!(reason.contains("1 record(s)"), "{reason}");
        }
        other => panic!("expected absent SPF, got {:?}", other),
    }
}

#[tokio::test]
async fn spf_without_txt_records_is_absent_with_reason() {
    let resolver = DomainAuthResolver::new(StubResolver::new());

    let outcome = resolver.resolve_spf("example.org").await;
    match outcome {
        LookupOutcome::Absent { reason, .. } => {
            assert!(!reason.is_empty());
            assert!(reason.contains("example.org"), "{reason}");
        }
        other => panic!("expected absent SPF, got {:?}", other),
    }
}

#[tokio::test]
async fn dmarc_queries_underscore_dmarc_name() {
    let mut stub = StubResolver::new();
    stub.insert_records("example.com", vec!["v=DMARC1; p=reject"]);
    stub.insert_records(
        "_dmarc.example.com",
        vec!["v=DMARC1; p=quarantine; rua=mailto:d@example.com", "unrelated"],
    );
    let resolver = DomainAuthResolver::new(stub);

    let outcome = resolver.resolve_dmarc("example.com").await;
    assert_eq!(
        outcome.records(),
        &[TxtRecord::from(
            "v=DMARC1; p=quarantine; rua=mailto:d@example.com"
        )]
    );
}

#[tokio::test]
async fn dmarc_without_record_is_absent() {
    let mut stub = StubResolver::new();
    stub.insert_records("example.com", vec!["v=spf1 -all"]);
    let resolver = DomainAuthResolver::new(stub);

    let outcome = resolver.resolve_dmarc("example.com").await;
    let reason = outcome.message().expect("non-found outcome carries text");
    assert!(reason.contains("_dmarc.example.com"), "{reason}");
}

#[tokio::test]
async fn dkim_returns_every_record_unfiltered() {
    let mut stub = StubResolver::new();
    stub.insert_records(
        "s1._domainkey.example.com",
        vec!["k=rsa; p=MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8A", "something else entirely"],
    );
    let resolver = DomainAuthResolver::new(stub);

    let outcome = resolver.resolve_dkim("example.com", "s1").await;
    assert_eq!(outcome.records().len(), 2);
    assert_eq!(outcome.records()[1].content(), "something else entirely");
}

#[tokio::test]
async fn dkim_empty_answer_and_error_differ_only_by_text() {
    let mut stub = StubResolver::new();
    stub.insert_records("empty._domainkey.example.com", Vec::<&str>::new());
    let resolver = DomainAuthResolver::new(stub);

    let empty = resolver.resolve_dkim("example.com", "empty").await;
    let missing = resolver.resolve_dkim("example.com", "missing").await;

    assert!(matches!(empty, LookupOutcome::Absent { .. }));
    assert!(matches!(missing, LookupOutcome::Absent { .. }));
    assert_ne!(empty.message(), missing.message());
}

#[tokio::test]
async fn query_failure_is_reported_as_query_error() {
    let mut stub = StubResolver::new();
    stub.insert_error(
        "example.com",
        LookupError::query("example.com", "request timed out"),
    );
    let resolver = DomainAuthResolver::new(stub);

    let outcome = resolver.resolve_spf("example.com").await;
    match outcome {
        LookupOutcome::QueryError { detail } => {
            assert!(detail.contains("request timed out"), "{detail}");
        }
        other => panic!("expected query error, got {:?}", other),
    }
}

#[test]
fn omitted_or_blank_selector_means_default() {
    let omitted = DomainAuthQuery::new("example.com", None).expect("valid");
    let explicit = DomainAuthQuery::new("example.com", Some("default")).expect("valid");
    let blank = DomainAuthQuery::new("example.com", Some("  ")).expect("valid");

    assert_eq!(omitted, explicit);
    assert_eq!(omitted, blank);
    assert_eq!(omitted.selector(), DEFAULT_SELECTOR);
}

#[test]
fn query_normalizes_domain_and_selector() {
    let query = DomainAuthQuery::new("  Bücher.Example ", Some("Google.")).expect("valid");
    assert_eq!(query.domain(), "xn--bcher-kva.example");
    assert_eq!(query.selector(), "google");
}

#[test]
fn query_rejects_empty_domain() {
    let err = DomainAuthQuery::new("   ", None).expect_err("blank domain must fail");
    assert!(matches!(err, AuthError::EmptyDomain));
}

#[cfg(feature = "with-serde")]
#[test]
fn deserialized_query_is_normalized() {
    let query: DomainAuthQuery =
        serde_json::from_str(r#"{"domain":" Bücher.Example ","selector":"Google."}"#)
            .expect("valid query");
    assert_eq!(query, DomainAuthQuery::new("bücher.example", Some("google")).unwrap());
    assert_eq!(query.domain(), "xn--bcher-kva.example");

    let defaulted: DomainAuthQuery =
        serde_json::from_str(r#"{"domain":"example.com"}"#).expect("selector is optional");
    assert_eq!(defaulted.selector(), DEFAULT_SELECTOR);

    let err = serde_json::from_str::<DomainAuthQuery>(r#"{"domain":"  "}"#)
        .expect_err("blank domain must fail");
    assert!(err.to_string().contains("domain is empty"), "{err}");
}

#[tokio::test]
async fn check_domain_reports_published_spf() {
    let mut stub = StubResolver::new();
    stub.insert_records("example.com", vec!["v=spf1 -all"]);
    let resolver = DomainAuthResolver::new(stub);

    let result = resolver.check_domain(&query("example.com")).await;

    assert_eq!(
        result.spf,
        LookupOutcome::Found {
            records: vec![TxtRecord::new(["v=spf1 -all"])],
        }
    );
    assert!(!result.dmarc.is_found());
    assert!(!result.dkim.is_found());
    assert_eq!(result.selector, "default");
}

#[tokio::test]
async fn check_domain_on_missing_domain_reports_all_three() {
    let resolver = DomainAuthResolver::new(StubResolver::new());

    let result = resolver
        .check_domain(&query("nx-domain-example.invalid"))
        .await;

    for (outcome, name) in [
        (&result.spf, "nx-domain-example.invalid"),
        (&result.dmarc, "_dmarc.nx-domain-example.invalid"),
        (&result.dkim, "default._domainkey.nx-domain-example.invalid"),
    ] {
        let reason = outcome.message().expect("non-found outcome");
        assert!(reason.contains(name), "{reason}");
        assert!(reason.contains("NXDomain"), "{reason}");
    }
    assert!(!result.all_found());
}

#[tokio::test]
async fn check_domain_is_repeatable() {
    let mut stub = StubResolver::new();
    stub.insert_records("example.com", vec!["v=spf1 mx -all"]);
    stub.insert_records("_dmarc.example.com", vec!["v=DMARC1; p=reject"]);
    stub.insert_records("default._domainkey.example.com", vec!["v=DKIM1; p=abc"]);
    let resolver = DomainAuthResolver::new(stub);

    let first = resolver.check_domain(&query("example.com")).await;
    let second = resolver.check_domain(&query("example.com")).await;

    assert_eq!(first, second);
    assert!(first.all_found());
}

struct SlowResolver {
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl LookupTxt for SlowResolver {
    async fn lookup_txt(&self, _name: &str) -> Answer {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(vec![TxtRecord::from("v=spf1 -all")])
    }
}

#[tokio::test(start_paused = true)]
async fn check_domain_runs_lookups_concurrently() {
    let peak = Arc::new(AtomicUsize::new(0));
    let resolver = DomainAuthResolver::new(SlowResolver {
        in_flight: Arc::new(AtomicUsize::new(0)),
        peak: Arc::clone(&peak),
    });

    let started = tokio::time::Instant::now();
    let result = resolver.check_domain(&query("example.com")).await;

    assert_eq!(peak.load(Ordering::SeqCst), 3);
    assert!(started.elapsed() < Duration::from_millis(100));
    assert!(result.spf.is_found());
    assert!(result.dkim.is_found());
}

fn txt_query(name: &str) -> Query {
    let name = Name::from_ascii(name).expect("valid name");
    Query::query(name, RecordType::TXT)
}

fn txt_lookup(name: &str, answers: Vec<TXT>) -> TxtLookup {
    let query = txt_query(name);
    let records: Vec<Record> = answers
        .into_iter()
        .map(|txt| Record::from_rdata(query.name().clone(), 300, RData::TXT(txt)))
        .collect();
    TxtLookup::from(Lookup::new_with_max_ttl(query, Arc::from(records)))
}

#[test]
fn collected_records_keep_segment_order() {
    let lookup = txt_lookup(
        "example.com.",
        vec![
            TXT::new(vec!["v=sp".to_string(), "f1 ".to_string(), "-all".to_string()]),
            TXT::new(vec!["google-site-verification=xyz".to_string()]),
        ],
    );

    let records = collect_txt_records("example.com", &lookup).expect("utf-8 data");

    assert_eq!(
        records,
        vec![
            TxtRecord::new(["v=sp", "f1 ", "-all"]),
            TxtRecord::from("google-site-verification=xyz"),
        ]
    );
    assert_eq!(records[0].content(), "v=spf1 -all");
}

#[test]
fn non_utf8_txt_data_is_rejected() {
    let lookup = txt_lookup(
        "example.com.",
        vec![TXT::from_bytes(vec![b"v=spf1 ".as_ref(), b"\xff\xfe".as_ref()])],
    );

    let err = collect_txt_records("example.com", &lookup).expect_err("invalid utf-8");
    assert!(
        matches!(&err, LookupError::TxtDataUtf8 { name, .. } if name == "example.com"),
        "{err:?}"
    );
    assert!(!err.is_absence());
}

#[test]
fn nxdomain_is_classified_as_absence() {
    let err = ResolveError::from(ResolveErrorKind::NoRecordsFound {
        query: Box::new(txt_query("missing.example.com.")),
        soa: None,
        negative_ttl: None,
        response_code: ResponseCode::NXDomain,
        trusted: true,
    });

    let classified = classify_error("missing.example.com", &err);
    match &classified {
        LookupError::NoRecords { name, detail } => {
            assert_eq!(name, "missing.example.com");
            assert!(!detail.is_empty());
        }
        other => panic!("expected no-records error, got {:?}", other),
    }
    assert!(classified.is_absence());
}

#[test]
fn other_resolver_failures_are_query_errors() {
    for err in [
        ResolveError::from(ResolveErrorKind::Message("request timed out")),
        ResolveError::from(ResolveErrorKind::Timeout),
    ] {
        let classified = classify_error("example.com", &err);
        assert!(
            matches!(&classified, LookupError::Query { name, .. } if name == "example.com"),
            "{classified:?}"
        );
        assert!(!classified.is_absence());
    }
}

fn txt_record() -> impl Strategy<Value = TxtRecord> {
    let segment = "[a-zA-Z0-9=:;. ~-]{0,10}";
    (
        any::<bool>(),
        proptest::collection::vec(segment, 1..4),
    )
        .prop_map(|(spf, mut segments)| {
            if spf {
                segments[0] = format!("{SPF_PREFIX}{}", segments[0]);
            }
            TxtRecord::new(segments)
        })
}

proptest! {
    #[test]
    fn prefix_filter_keeps_exactly_the_prefixed_records(
        records in proptest::collection::vec(txt_record(), 0..6)
    ) {
        let expected: Vec<TxtRecord> = records
            .iter()
            .filter(|record| record.content().starts_with(SPF_PREFIX))
            .cloned()
            .collect();

        match outcome::filter_prefixed("example.com", SPF_PREFIX, records) {
            LookupOutcome::Found { records } => {
                prop_assert!(!records.is_empty());
                prop_assert_eq!(records, expected);
            }
            LookupOutcome::Absent { reason, .. } => {
                prop_assert!(expected.is_empty());
                prop_assert!(!reason.is_empty());
            }
            LookupOutcome::QueryError { .. } => prop_assert!(false, "filter never errors"),
        }
    }
}
