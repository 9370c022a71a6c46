//! International transfer safeguards.

use super::matched_keywords;
use crate::checklist::TransferRules;
use crate::finding::{Finding, ModuleId};

/// A policy that never mentions transfers passes. One that does must also
/// name a safeguard mechanism, otherwise it is a `Risk`.
#[must_use]
pub fn classify(policy_text: &str, rules: &TransferRules, citation: &str) -> Finding {
    let text = policy_text.to_lowercase();
    let transfers = matched_keywords(&text, &rules.transfer_keywords);

    if transfers.is_empty() {
        return Finding::pass(
            ModuleId::Transfers,
            format!("{citation}: No international data transfers disclosed"),
            Vec::new(),
        );
    }

    let safeguards = matched_keywords(&text, &rules.safeguard_keywords);
    if safeguards.is_empty() {
        Finding::risk(
            ModuleId::Transfers,
            format!("{citation}: International transfers disclosed without safeguards"),
            transfers,
        )
    } else {
        Finding::pass(
            ModuleId::Transfers,
            format!("{citation}: International transfers covered by safeguards"),
            safeguards,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::Checklist;
    use crate::finding::Status;

    fn rules() -> TransferRules {
        Checklist::gdpr().transfers.expect("gdpr transfer rules")
    }

    #[test]
    fn test_no_transfers_pass() {
        let finding = classify("We keep your data in Frankfurt.", &rules(), "Articles 44-46");
        assert_eq!(finding.status, Status::Pass);
        assert!(finding.evidence.is_empty());
    }

    #[test]
    fn test_transfers_with_safeguards_pass() {
        let finding = classify(
            "Data may be sent to a third country under Standard Contractual Clauses.",
            &rules(),
            "Articles 44-46",
        );
        assert_eq!(finding.status, Status::Pass);
        assert!(finding
            .evidence
            .contains(&"standard contractual clause".to_string()));
    }

    #[test]
    fn test_transfers_without_safeguards_risk() {
        let finding = classify(
            "Your data may be processed outside the EEA by international partners.",
            &rules(),
            "Articles 44-46",
        );
        assert_eq!(finding.status, Status::Risk);
        assert_eq!(finding.evidence, vec!["international".to_string()]);
    }
}
