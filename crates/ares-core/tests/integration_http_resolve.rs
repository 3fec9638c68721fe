//! Integration test: HTTP resolver against local servers through the real curl transport.
//!
//! Backoff sleeps are recorded instead of slept so retry scenarios run instantly.

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use ares_core::client::RetryingClient;
use ares_core::logging::MemorySink;
use ares_core::retry::{AttemptError, DeliveryFailure, Sleeper};
use ares_core::{
    AlertDeliveryError, HttpResolver, ResolveError, Resolver, ResolverKind, RuleConfig,
};

#[derive(Default)]
struct RecordedWaits(Mutex<Vec<Duration>>);

impl Sleeper for RecordedWaits {
    fn sleep(&self, delay: Duration) {
        self.0.lock().unwrap().push(delay);
    }
}

fn client(waits: Arc<RecordedWaits>) -> RetryingClient {
    RetryingClient::default().with_sleeper(waits)
}

fn rule(src: String) -> RuleConfig {
    src.parse().expect("valid rule toml")
}

#[test]
fn posts_json_body_and_headers() {
    let server = common::post_server::start(vec![200]);
    let r = rule(format!(
        r#"
        name = "latency"
        resolve_http_post_url = "{}hooks/resolve"
        [resolve_http_post_static_payload]
        state = "ok"
        since = 2024-01-02T03:04:05
        [resolve_http_post_headers]
        X-Token = "abc"
        "#,
        server.url
    ));
    let sink = Arc::new(MemorySink::default());
    let resolver = HttpResolver::new(&r, sink.clone())
        .unwrap()
        .with_client(client(Arc::default()));

    resolver.resolve().expect("delivery should succeed");

    let reqs = server.requests();
    assert_eq!(reqs.len(), 1);
    let req = &reqs[0];
    assert_eq!(req.method, "POST");
    assert_eq!(req.path, "/hooks/resolve");
    assert_eq!(
        String::from_utf8(req.body.clone()).unwrap(),
        r#"{"since": "2024-01-02T03:04:05", "state": "ok"}"#
    );
    assert_eq!(req.header("Content-Type"), Some("application/json"));
    assert_eq!(req.header("Accept"), Some("application/json;charset=utf-8"));
    assert_eq!(req.header("X-Token"), Some("abc"));
    assert_eq!(sink.lines(), vec!["HTTP POST resolution sent for rule 'latency'"]);
}

#[test]
fn transient_502_is_retried_then_succeeds() {
    let server = common::post_server::start(vec![502, 200]);
    let r = rule(format!(
        "resolve_http_post_url = \"{}\"\nresolve_http_post_static_payload = {{}}",
        server.url
    ));
    let waits = Arc::new(RecordedWaits::default());
    let resolver = HttpResolver::new(&r, Arc::new(MemorySink::default()))
        .unwrap()
        .with_client(client(waits.clone()));

    resolver.resolve().unwrap();

    assert_eq!(server.hits(), 2);
    assert_eq!(*waits.0.lock().unwrap(), vec![Duration::from_secs(3)]);
}

#[test]
fn always_502_gives_up_after_six_attempts() {
    let server = common::post_server::start(vec![502]);
    let r = rule(format!(
        "resolve_http_post_url = \"{}\"\nresolve_http_post_static_payload = {{}}",
        server.url
    ));
    let waits = Arc::new(RecordedWaits::default());
    let resolver = HttpResolver::new(&r, Arc::new(MemorySink::default()))
        .unwrap()
        .with_client(client(waits.clone()));

    let err = resolver.resolve().unwrap_err();

    assert!(matches!(
        err,
        ResolveError::Delivery(AlertDeliveryError {
            cause: DeliveryFailure::RetriesExhausted {
                attempts: 6,
                last: AttemptError::Http(502)
            },
            ..
        })
    ));
    assert_eq!(server.hits(), 6);
    let waits = waits.0.lock().unwrap();
    assert_eq!(waits.len(), 5);
    assert!(waits.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn failing_first_url_skips_the_rest() {
    let bad = common::post_server::start(vec![404]);
    let good = common::post_server::start(vec![200]);
    let r = rule(format!(
        "resolve_http_post_url = [\"{}\", \"{}\"]\nresolve_http_post_static_payload = {{}}",
        bad.url, good.url
    ));
    let resolver = HttpResolver::new(&r, Arc::new(MemorySink::default()))
        .unwrap()
        .with_client(client(Arc::default()));

    let err = resolver.resolve().unwrap_err();

    match err {
        ResolveError::Delivery(e) => assert_eq!(e.url, bad.url),
        other => panic!("expected delivery error, got {other:?}"),
    }
    assert_eq!(bad.hits(), 1);
    assert_eq!(good.hits(), 0);
}

#[test]
fn http_destination_bypasses_configured_proxy() {
    // Nothing listens on port 9; if the proxy were used the request would fail.
    let server = common::post_server::start(vec![200]);
    let r = rule(format!(
        "resolve_http_post_url = \"{}\"\nresolve_http_post_proxy = \"http://127.0.0.1:9\"\nresolve_http_post_static_payload = {{}}",
        server.url
    ));
    let resolver = HttpResolver::new(&r, Arc::new(MemorySink::default()))
        .unwrap()
        .with_client(client(Arc::default()));

    resolver.resolve().unwrap();
    assert_eq!(server.hits(), 1);
}

#[test]
fn kind_builder_delivers_through_curl() {
    let server = common::post_server::start(vec![204]);
    let r = rule(format!(
        "resolver = \"http_post\"\nresolve_http_post_url = \"{}\"\n[resolve_http_post_static_payload]\nok = true",
        server.url
    ));
    let kinds = ResolverKind::from_rule(&r, ResolverKind::Log).unwrap();
    assert_eq!(kinds, vec![ResolverKind::HttpPost]);

    let resolver = kinds[0]
        .build(&r, Arc::new(MemorySink::default()), client(Arc::default()))
        .unwrap();
    resolver.resolve().unwrap();

    assert_eq!(server.requests()[0].body, br#"{"ok": true}"#.to_vec());
}
