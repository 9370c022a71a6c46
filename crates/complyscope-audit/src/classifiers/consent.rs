//! Pre-consent cookie classification.
//!
//! Cookies are judged by name and domain only. A cookie is first-party when
//! its domain equals or is a subdomain of the target's registrable domain.
//! Strictly necessary cookies (by name fragment) never count against the
//! site. An empty jar passes, which only proves nothing was set by the time
//! the page settled.

use crate::checklist::ConsentRules;
use crate::finding::{Finding, ModuleId};
use crate::signals::Cookie;
use complyscope_core::TargetUrl;
use tracing::warn;

/// Why a cookie was flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrackerKind {
    ThirdParty,
    FirstPartyTracker,
}

/// Whether `cookie_domain` belongs to `site` (a registrable domain).
#[must_use]
pub fn is_first_party(cookie_domain: &str, site: &str) -> bool {
    let domain = cookie_domain.trim_start_matches('.').to_ascii_lowercase();
    domain.is_empty() || domain == site || domain.ends_with(&format!(".{site}"))
}

/// Whether the cookie name marks a strictly necessary cookie.
#[must_use]
pub fn is_essential(name: &str, essential_keywords: &[String]) -> bool {
    let name = name.to_lowercase();
    essential_keywords
        .iter()
        .any(|k| name.contains(&k.to_lowercase()))
}

fn matches_tracker(name: &str, signatures: &[String]) -> bool {
    let name = name.to_lowercase();
    signatures.iter().any(|s| name.contains(&s.to_lowercase()))
}

/// Classify the cookie jar captured before consent.
#[must_use]
pub fn classify(
    target: &TargetUrl,
    cookies: &[Cookie],
    rules: &ConsentRules,
    citation: &str,
) -> Finding {
    if cookies.is_empty() {
        return Finding::pass(
            ModuleId::Consent,
            format!("{citation}: No tracking cookies found on initial load"),
            Vec::new(),
        );
    }

    let site = target.registrable_domain();
    let mut offenders = Vec::new();

    for cookie in cookies {
        if is_essential(&cookie.name, &rules.essential_keywords) {
            continue;
        }

        let kind = if !is_first_party(&cookie.domain, &site) {
            Some(TrackerKind::ThirdParty)
        } else if rules.flag_first_party_trackers
            && matches_tracker(&cookie.name, &rules.tracker_signatures)
        {
            Some(TrackerKind::FirstPartyTracker)
        } else {
            None
        };

        if let Some(kind) = kind {
            warn!(
                cookie = %cookie.name,
                domain = %cookie.domain,
                kind = ?kind,
                "tracker set before consent"
            );
            offenders.push(format!("{} ({})", cookie.name, cookie.domain));
        }
    }

    if offenders.is_empty() {
        Finding::pass(
            ModuleId::Consent,
            format!("{citation}: No unauthorized tracking cookies found before consent"),
            Vec::new(),
        )
    } else {
        Finding::violation(
            ModuleId::Consent,
            format!(
                "{citation}: Data processed without consent - {} unauthorized trackers found",
                offenders.len()
            ),
            offenders,
        )
    }
}
