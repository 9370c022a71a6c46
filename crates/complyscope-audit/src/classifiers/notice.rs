//! Privacy notice link location.
//!
//! The locator walks `<a href>` anchors in document order and returns the
//! first whose text or href mentions a notice keyword. Its result is also the
//! pipeline's `policy_url` side channel.

use crate::finding::{Finding, ModuleId};
use complyscope_core::TargetUrl;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

/// Find the privacy notice link on a landing page.
///
/// Relative hrefs are resolved against the target's origin. Hrefs that do
/// not resolve to an http(s) URL are ignored.
#[must_use]
pub fn locate_policy_link(html: &str, target: &TargetUrl, keywords: &[String]) -> Option<Url> {
    if html.trim().is_empty() {
        return None;
    }

    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").expect("valid selector");
    let origin = target.origin();
    let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    for anchor in document.select(&selector) {
        let Some(href) = anchor.value().attr("href").map(str::trim) else {
            continue;
        };
        if href.is_empty() || href.starts_with('#') {
            continue;
        }

        // Rendered link text: whitespace runs collapse to one space
        let text = anchor
            .text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        let href_lower = href.to_lowercase();
        if !keywords
            .iter()
            .any(|k| text.contains(k.as_str()) || href_lower.contains(k.as_str()))
        {
            continue;
        }

        match origin.join(href) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                debug!(href = %href, resolved = %url, "privacy notice link found");
                return Some(url);
            }
            Ok(url) => debug!(href = %href, scheme = url.scheme(), "skipping non-web link"),
            Err(e) => debug!(href = %href, error = %e, "skipping unresolvable link"),
        }
    }

    None
}

/// Classify the result of [`locate_policy_link`].
#[must_use]
pub fn classify(page_text: &str, located: Option<&Url>, citation: &str) -> Finding {
    match located {
        Some(url) => Finding::pass(
            ModuleId::Notice,
            format!("{citation}: Privacy Policy link found"),
            vec![url.to_string()],
        ),
        None if page_text.trim().is_empty() => Finding::violation(
            ModuleId::Notice,
            format!("{citation}: Landing page has no content to carry a privacy notice"),
            Vec::new(),
        ),
        None => Finding::violation(
            ModuleId::Notice,
            format!("{citation}: No Privacy Policy link found on homepage"),
            Vec::new(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::NOTICE_KEYWORDS;
    use crate::finding::Status;

    fn target() -> TargetUrl {
        TargetUrl::parse("https://www.example.com/shop/index.html").expect("valid target")
    }

    fn keywords() -> Vec<String> {
        NOTICE_KEYWORDS.iter().map(|k| (*k).to_string()).collect()
    }

    #[test]
    fn test_relative_link_resolved_against_origin() {
        let html = r#"<html><body>
            <a href="/about">About us</a>
            <a href="legal/privacy.html">Privacy</a>
        </body></html>"#;

        let url = locate_policy_link(html, &target(), &keywords()).expect("link found");
        assert_eq!(url.as_str(), "https://www.example.com/legal/privacy.html");
    }

    #[test]
    fn test_first_match_in_document_order() {
        let html = r#"
            <a href="https://example.com/notice">Our notice</a>
            <a href="/privacy">Privacy Policy</a>
        "#;
        let url = locate_policy_link(html, &target(), &keywords()).expect("link found");
        assert_eq!(url.as_str(), "https://example.com/notice");
    }

    #[test]
    fn test_href_keyword_matches() {
        let html = r#"<a href="/data-protection/privacy-policy"><img src="x.png"></a>"#;
        let url = locate_policy_link(html, &target(), &keywords()).expect("link found");
        assert_eq!(url.path(), "/data-protection/privacy-policy");
    }

    #[test]
    fn test_wrapped_link_text_matches_phrase() {
        let html = "<footer><a href=\"/legal/dp\">Data\n          Protection</a></footer>";
        let url = locate_policy_link(html, &target(), &keywords()).expect("link found");
        assert_eq!(url.as_str(), "https://www.example.com/legal/dp");
    }

    #[test]
    fn test_non_web_links_ignored() {
        let html = r##"
            <a href="mailto:privacy@example.com">Privacy team</a>
            <a href="javascript:openPolicy()">Policy</a>
            <a href="#privacy">Privacy</a>
            <a href="/home">Home</a>
        "##;
        assert!(locate_policy_link(html, &target(), &keywords()).is_none());
    }

    #[test]
    fn test_locator_is_deterministic() {
        let html = r#"<a href="/terms">Terms</a><a href="/privacy">Privacy</a>"#;
        let first = locate_policy_link(html, &target(), &keywords());
        let second = locate_policy_link(html, &target(), &keywords());
        assert_eq!(first, second);
    }

    #[test]
    fn test_classify() {
        let url = Url::parse("https://example.com/privacy").expect("valid url");
        let finding = classify("<a>", Some(&url), "Sec 5(1)");
        assert_eq!(finding.status, Status::Pass);
        assert_eq!(finding.evidence, vec!["https://example.com/privacy".to_string()]);

        let finding = classify("", None, "Sec 5(1)");
        assert_eq!(finding.status, Status::Violation);
        assert!(finding.message.starts_with("Sec 5(1):"));
    }
}
