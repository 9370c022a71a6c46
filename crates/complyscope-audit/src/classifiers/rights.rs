//! Data subject rights coverage.

use super::contains_any;
use crate::checklist::RightRule;
use crate::finding::{Finding, ModuleId};

/// Check each right's keyword group against the policy text.
///
/// All rights present is a `Pass` listing them. Missing rights are a `Risk`
/// below `violation_threshold` and a `Violation` at or above it, with the
/// missing rights as evidence.
#[must_use]
pub fn classify(
    policy_text: &str,
    rights: &[RightRule],
    violation_threshold: usize,
    citation: &str,
) -> Finding {
    let text = policy_text.to_lowercase();
    let (found, missing): (Vec<&RightRule>, Vec<&RightRule>) =
        rights.iter().partition(|r| contains_any(&text, &r.keywords));

    let names = |list: Vec<&RightRule>| -> Vec<String> {
        list.into_iter().map(|r| r.name.clone()).collect()
    };

    if missing.is_empty() {
        Finding::pass(
            ModuleId::RightsBundle,
            format!("{citation}: All {} data subject rights documented", found.len()),
            names(found),
        )
    } else if missing.len() >= violation_threshold {
        Finding::violation(
            ModuleId::RightsBundle,
            format!(
                "{citation}: {} of {} data subject rights not documented",
                missing.len(),
                rights.len()
            ),
            names(missing),
        )
    } else {
        Finding::risk(
            ModuleId::RightsBundle,
            format!(
                "{citation}: {} of {} data subject rights not documented",
                missing.len(),
                rights.len()
            ),
            names(missing),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::{Checklist, RIGHTS_VIOLATION_THRESHOLD};
    use crate::finding::Status;

    fn rights() -> Vec<RightRule> {
        Checklist::gdpr().rights
    }

    #[test]
    fn test_all_rights_pass() {
        let text = "You have the right of access, may correct your data, request erasure, \
                    restrict processing, receive data in a portable format and the right to object.";
        let finding = classify(text, &rights(), RIGHTS_VIOLATION_THRESHOLD, "Articles 15-21");
        assert_eq!(finding.status, Status::Pass);
        assert_eq!(finding.evidence.len(), 6);
    }

    #[test]
    fn test_two_missing_is_risk() {
        let text = "You have the right of access, may correct your data, request erasure \
                    and restrict processing.";
        let finding = classify(text, &rights(), RIGHTS_VIOLATION_THRESHOLD, "Articles 15-21");
        assert_eq!(finding.status, Status::Risk);
        assert_eq!(
            finding.evidence,
            vec!["Portability".to_string(), "Objection".to_string()]
        );
    }

    #[test]
    fn test_three_missing_is_violation() {
        let text = "You may correct your data, request erasure and restrict processing.";
        let finding = classify(text, &rights(), RIGHTS_VIOLATION_THRESHOLD, "Articles 15-21");
        assert_eq!(finding.status, Status::Violation);
        assert_eq!(
            finding.evidence,
            vec![
                "Access".to_string(),
                "Portability".to_string(),
                "Objection".to_string()
            ]
        );
    }
}
