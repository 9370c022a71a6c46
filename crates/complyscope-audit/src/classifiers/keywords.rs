//! Keyword-presence classification shared by the breach, children's data,
//! retention, governance and complaints modules.

use super::matched_keywords;
use crate::checklist::KeywordRule;
use crate::finding::{Finding, ModuleId, Status};

fn subject(module: ModuleId) -> &'static str {
    match module {
        ModuleId::Breach => "breach notification policy",
        ModuleId::ChildrenData => "children's data safeguards",
        ModuleId::Retention => "data retention policy",
        ModuleId::Governance => "Data Protection Officer",
        ModuleId::Complaints => "right to lodge a complaint",
        _ => "required disclosure",
    }
}

/// `Pass` with the matched keywords when any keyword of `rule` appears in
/// the policy text, otherwise the rule's `on_missing` status.
#[must_use]
pub fn classify(policy_text: &str, rule: &KeywordRule, citation: &str) -> Finding {
    let text = policy_text.to_lowercase();
    let found = matched_keywords(&text, &rule.keywords);
    let subject = subject(rule.module);

    if found.is_empty() {
        Finding::new(
            rule.module,
            rule.on_missing,
            format!("{citation}: No {subject} mentioned"),
            Vec::new(),
        )
    } else {
        Finding::new(
            rule.module,
            Status::Pass,
            format!("{citation}: {} found", capitalize(subject)),
            found,
        )
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
