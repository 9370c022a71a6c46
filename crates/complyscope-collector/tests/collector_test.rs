//! Integration tests for signal collection and orchestration
//!
//! Uses in-memory page and HTTP sources so no browser or network is needed.

use complyscope_audit::{Checklist, ComplianceLevel, ModuleId, ResponseHeaders, Signal, Status};
use complyscope_browser::{BrowserError, CapturedCookie, PageCapture, PageSource};
use complyscope_collector::{Auditor, BatchAuditor, CollectError, HttpSource, SignalCollector};
use complyscope_core::TargetUrl;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const LANDING: &str = r#"<html><body>
    <nav><a href="/shop">Shop</a></nav>
    <footer><a href="/privacy">Privacy Policy</a></footer>
</body></html>"#;

const POLICY: &str = "Contact our Grievance Officer at grievance@example.com. \
    We report any breach within 72 hours. We never collect data of a child. \
    Data is deleted under our retention policy.";

#[derive(Default)]
struct FakePages {
    html: HashMap<String, String>,
    cookies: Vec<CapturedCookie>,
    texts: HashMap<String, String>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl FakePages {
    fn landing(url: &str, html: &str) -> Self {
        Self {
            html: HashMap::from([(url.to_string(), html.to_string())]),
            ..Self::default()
        }
    }
}

#[async_trait::async_trait]
impl PageSource for FakePages {
    async fn capture(&self, url: &str) -> complyscope_browser::Result<PageCapture> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.html.get(url) {
            Some(html) => Ok(PageCapture {
                html: html.clone(),
                cookies: self.cookies.clone(),
            }),
            None => Err(BrowserError::Timeout(format!("{url} did not load within 30s"))),
        }
    }

    async fn fetch_text(&self, url: &str) -> complyscope_browser::Result<String> {
        self.texts
            .get(url)
            .cloned()
            .ok_or_else(|| BrowserError::NavigationError(format!("cannot open {url}")))
    }
}

#[derive(Default)]
struct FakeHttp {
    headers: Vec<(String, String)>,
    bodies: HashMap<String, String>,
    headers_down: bool,
}

#[async_trait::async_trait]
impl HttpSource for FakeHttp {
    async fn fetch_headers(&self, url: &str) -> complyscope_collector::Result<ResponseHeaders> {
        if self.headers_down {
            return Err(CollectError::HttpStatus {
                url: url.to_string(),
                status: 502,
            });
        }
        Ok(self.headers.iter().cloned().collect())
    }

    async fn fetch_body(&self, url: &str) -> complyscope_collector::Result<String> {
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| CollectError::HttpStatus {
                url: url.to_string(),
                status: 404,
            })
    }
}

fn secure_headers() -> Vec<(String, String)> {
    vec![
        ("strict-transport-security".into(), "max-age=63072000".into()),
        ("x-frame-options".into(), "DENY".into()),
        ("x-content-type-options".into(), "nosniff".into()),
    ]
}

fn target(url: &str) -> TargetUrl {
    TargetUrl::parse(url).expect("valid target")
}

#[tokio::test]
async fn test_collect_all_signals() {
    let mut pages = FakePages::landing("https://example.com/", LANDING);
    pages.cookies = vec![CapturedCookie {
        name: "_ga".into(),
        domain: ".doubleclick.net".into(),
        value: "GA1.2".into(),
    }];
    pages
        .texts
        .insert("https://example.com/privacy".into(), POLICY.into());
    let http = FakeHttp {
        headers: secure_headers(),
        ..FakeHttp::default()
    };

    let collector = SignalCollector::new(pages, http);
    let bundle = collector
        .collect(&target("example.com"), None)
        .await
        .expect("collect signals");

    assert!(bundle.failures().is_empty());
    assert_eq!(bundle.cookies().len(), 1);
    assert!(bundle.response_headers().contains("X-Frame-Options"));
    assert_eq!(bundle.policy_text(), Some(POLICY));
    assert!(bundle.policy_url().is_none());

    let report = complyscope_audit::evaluate(&bundle);
    assert_eq!(
        report.policy_url().map(url::Url::as_str),
        Some("https://example.com/privacy")
    );
    assert_eq!(
        report.finding(ModuleId::Consent).map(|f| f.status),
        Some(Status::Violation)
    );
    for module in [
        ModuleId::Notice,
        ModuleId::SecurityHeaders,
        ModuleId::Grievance,
        ModuleId::Breach,
        ModuleId::ChildrenData,
        ModuleId::Retention,
    ] {
        assert_eq!(report.finding(module).map(|f| f.status), Some(Status::Pass));
    }
}

#[tokio::test]
async fn test_policy_falls_back_to_http() {
    let pages = FakePages::landing("https://example.com/", LANDING);
    let http = FakeHttp {
        bodies: HashMap::from([(
            "https://example.com/privacy".to_string(),
            format!("<html><script>track()</script><body><p>{POLICY}</p></body></html>"),
        )]),
        ..FakeHttp::default()
    };

    let collector = SignalCollector::new(pages, http);
    let bundle = collector
        .collect(&target("https://example.com"), None)
        .await
        .expect("collect signals");

    let text = bundle.policy_text().expect("policy text");
    assert!(text.starts_with("Contact our Grievance Officer"));
    assert!(!text.contains("track()"));
}

#[tokio::test]
async fn test_unreachable_policy_is_recorded() {
    let pages = FakePages::landing("https://example.com/", LANDING);
    let collector = SignalCollector::new(pages, FakeHttp::default());

    let bundle = collector
        .collect(&target("https://example.com"), None)
        .await
        .expect("collect signals");
    assert!(bundle.failure(Signal::Policy).is_some());

    let report = complyscope_audit::evaluate(&bundle);
    for module in [
        ModuleId::Grievance,
        ModuleId::Breach,
        ModuleId::ChildrenData,
        ModuleId::Retention,
    ] {
        assert_eq!(report.finding(module).map(|f| f.status), Some(Status::Error));
    }
}

#[tokio::test]
async fn test_page_and_header_failures_are_recorded() {
    let http = FakeHttp {
        headers_down: true,
        ..FakeHttp::default()
    };
    let collector = SignalCollector::new(FakePages::default(), http);

    let bundle = collector
        .collect(&target("https://example.com"), None)
        .await
        .expect("collect signals");
    assert!(bundle.failure(Signal::Page).is_some());
    assert!(bundle.failure(Signal::Headers).is_some());

    let report = complyscope_audit::evaluate(&bundle);
    let statuses: Vec<Status> = report.findings().iter().map(|f| f.status).collect();
    assert_eq!(
        statuses,
        vec![
            Status::Error,
            Status::Error,
            Status::Error,
            Status::Skip,
            Status::Skip,
            Status::Skip,
            Status::Skip,
        ]
    );
    assert_eq!(report.compliance_level(), ComplianceLevel::High);
}

#[tokio::test]
async fn test_policy_override() {
    let mut pages = FakePages::landing("https://example.com/", LANDING);
    pages
        .texts
        .insert("https://legal.example.com/dpdp".into(), POLICY.into());
    let collector = SignalCollector::new(pages, FakeHttp::default());

    let bundle = collector
        .collect(&target("example.com"), Some("legal.example.com/dpdp"))
        .await
        .expect("collect signals");
    assert_eq!(
        bundle.policy_url().map(url::Url::as_str),
        Some("https://legal.example.com/dpdp")
    );
    assert_eq!(bundle.policy_text(), Some(POLICY));

    let result = collector
        .collect(&target("example.com"), Some("not a url"))
        .await;
    assert!(matches!(result, Err(CollectError::Core(_))));
}

#[tokio::test]
async fn test_auditor_uses_checklist_keywords() {
    let html = r#"<a href="/datenschutz">Datenschutz</a>"#;
    let mut pages = FakePages::landing("https://example.de/", html);
    pages
        .texts
        .insert("https://example.de/datenschutz".into(), POLICY.into());

    let mut checklist = Checklist::dpdp();
    checklist.notice_keywords = vec!["datenschutz".to_string()];
    let auditor = Auditor::new(pages, FakeHttp::default(), checklist);

    let report = auditor
        .audit(&target("example.de"))
        .await
        .expect("audit runs");
    assert_eq!(
        report.finding(ModuleId::Notice).map(|f| f.status),
        Some(Status::Pass)
    );
    assert_eq!(
        report.finding(ModuleId::Breach).map(|f| f.status),
        Some(Status::Pass)
    );
}

#[tokio::test]
async fn test_batch_keeps_order_and_limit() {
    let mut pages = FakePages::default();
    for site in ["a.example.com", "b.example.com", "c.example.com", "d.example.com"] {
        pages
            .html
            .insert(format!("https://{site}/"), "<p>hello</p>".to_string());
    }
    let max_in_flight = Arc::clone(&pages.max_in_flight);

    let auditor = Auditor::new(pages, FakeHttp::default(), Checklist::dpdp());
    let batch = BatchAuditor::new(auditor).with_max_concurrent_audits(2);

    let entries = batch
        .run(vec![
            "a.example.com".into(),
            "b.example.com".into(),
            "not a url".into(),
            "c.example.com".into(),
            "d.example.com".into(),
        ])
        .await;

    let targets: Vec<&str> = entries.iter().map(|e| e.target.as_str()).collect();
    assert_eq!(
        targets,
        vec![
            "a.example.com",
            "b.example.com",
            "not a url",
            "c.example.com",
            "d.example.com"
        ]
    );
    assert!(entries[2].error.is_some());
    assert!(entries[2].summary().is_none());

    let summary = entries[0].summary().expect("audit ran");
    assert_eq!(summary.modules.len(), 7);
    assert_eq!(summary.violations, 1);
    assert!(max_in_flight.load(Ordering::SeqCst) <= 2);
}
