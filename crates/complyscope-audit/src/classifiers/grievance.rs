//! Grievance officer contact detection.
//!
//! Every `local@domain` shape in the policy text is a candidate. A candidate
//! is a grievance contact when a context keyword appears in the window of
//! text centered on one of its occurrences. The window includes the address
//! itself, so `dpo@...` is contextualized on its own.

use crate::checklist::GrievanceRules;
use crate::finding::{Finding, ModuleId};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"[\w.+-]+@[\w.-]+").expect("valid regex"))
}

/// Slice of `text` with `width / 2` characters on each side of `start..end`.
fn context_window(text: &str, start: usize, end: usize, width: usize) -> &str {
    let half = width / 2;
    let lo = text[..start]
        .char_indices()
        .rev()
        .take(half)
        .last()
        .map_or(start, |(i, _)| i);
    let hi = text[end..]
        .char_indices()
        .nth(half)
        .map_or(text.len(), |(i, _)| end + i);
    &text[lo..hi]
}

/// Emails in document order, deduplicated ignoring case, each paired with
/// whether any occurrence sits near a context keyword.
fn scan_emails(policy_text: &str, rules: &GrievanceRules) -> Vec<(String, bool)> {
    let keywords: Vec<String> = rules
        .context_keywords
        .iter()
        .map(|k| k.to_lowercase())
        .collect();
    let mut found: Vec<(String, bool)> = Vec::new();

    for m in email_pattern().find_iter(policy_text) {
        let email = m.as_str().trim_end_matches(['.', '-']);
        let Some((local, domain)) = email.split_once('@') else {
            continue;
        };
        if local.is_empty() || domain.is_empty() {
            continue;
        }

        let end = m.start() + email.len();
        let window = context_window(policy_text, m.start(), end, rules.window).to_lowercase();
        let contextualized = keywords.iter().any(|k| window.contains(k.as_str()));

        match found
            .iter_mut()
            .find(|(seen, _)| seen.eq_ignore_ascii_case(email))
        {
            Some((_, ctx)) => *ctx |= contextualized,
            None => found.push((email.to_string(), contextualized)),
        }
    }

    found
}

/// Classify grievance contact details in the policy text.
#[must_use]
pub fn classify(policy_text: &str, rules: &GrievanceRules, citation: &str) -> Finding {
    let emails = scan_emails(policy_text, rules);
    debug!(count = emails.len(), "email addresses found in policy");

    if emails.is_empty() {
        return Finding::violation(
            ModuleId::Grievance,
            format!("{citation}: No Grievance Officer details found"),
            Vec::new(),
        );
    }

    let contacts: Vec<String> = emails
        .iter()
        .filter(|(_, ctx)| *ctx)
        .map(|(email, _)| email.clone())
        .collect();

    if contacts.is_empty() {
        Finding::risk(
            ModuleId::Grievance,
            format!("{citation}: Email addresses found but grievance context unclear"),
            emails.into_iter().map(|(email, _)| email).collect(),
        )
    } else {
        Finding::pass(
            ModuleId::Grievance,
            format!("{citation}: Grievance Officer contact details found"),
            contacts,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::Status;

    #[test]
    fn test_contextualized_email_passes() {
        let finding = classify(
            "contact: dpo@example.com for grievance redressal",
            &GrievanceRules::default(),
            "Sec 8(9)",
        );
        assert_eq!(finding.status, Status::Pass);
        assert_eq!(finding.evidence, vec!["dpo@example.com".to_string()]);
    }

    #[test]
    fn test_bare_email_is_risk() {
        let finding = classify("info@example.com", &GrievanceRules::default(), "Sec 8(9)");
        assert_eq!(finding.status, Status::Risk);
        assert_eq!(finding.evidence, vec!["info@example.com".to_string()]);
    }

    #[test]
    fn test_no_email_is_violation() {
        let finding = classify(
            "Write to our grievance officer by post.",
            &GrievanceRules::default(),
            "Sec 8(9)",
        );
        assert_eq!(finding.status, Status::Violation);
        assert!(finding.evidence.is_empty());
    }

    #[test]
    fn test_distant_keyword_does_not_contextualize() {
        let padding = "lorem ipsum ".repeat(30);
        let text = format!("Grievance Officer details below. {padding} sales@example.com");
        let finding = classify(&text, &GrievanceRules::default(), "Sec 8(9)");
        assert_eq!(finding.status, Status::Risk);
    }

    #[test]
    fn test_duplicates_and_trailing_punctuation() {
        let padding = "lorem ipsum ".repeat(20);
        let text = format!(
            "Mail Sales@Example.com. Or sales@example.com. {padding} \
             Our Grievance Officer is reachable at officer@example.in."
        );
        let finding = classify(&text, &GrievanceRules::default(), "Sec 8(9)");
        assert_eq!(finding.status, Status::Pass);
        assert_eq!(finding.evidence, vec!["officer@example.in".to_string()]);

        let emails = scan_emails(&text, &GrievanceRules::default());
        assert_eq!(emails.len(), 2);
        assert_eq!(emails[0].0, "Sales@Example.com");
    }

    #[test]
    fn test_context_window_is_char_safe() {
        let text = "é".repeat(150) + "a@b.co" + &"ü".repeat(150);
        let start = text.find("a@b.co").expect("email present");
        let window = context_window(&text, start, start + 6, 200);
        assert_eq!(window.chars().count(), 206);
    }
}
