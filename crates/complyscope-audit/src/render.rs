//! Plain-text rendering of an [`AuditReport`].

use crate::report::AuditReport;
use std::fmt::{self, Write};

const RULE_HEAVY: &str =
    "======================================================================";
const RULE_LIGHT: &str =
    "----------------------------------------------------------------------";

/// Render the report as a terminal summary block.
#[must_use]
pub fn render_text(report: &AuditReport) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_report(&mut out, report);
    out
}

fn write_report(out: &mut impl Write, report: &AuditReport) -> fmt::Result {
    writeln!(out, "{RULE_HEAVY}")?;
    writeln!(out, "COMPLIANCE AUDIT REPORT - {}", report.checklist())?;
    writeln!(out, "{RULE_HEAVY}")?;
    writeln!(out, "Target:      {}", report.target_url())?;
    writeln!(out, "Regulation:  {}", report.regulation().display_name())?;
    match report.policy_url() {
        Some(url) => writeln!(out, "Policy URL:  {url}")?,
        None => writeln!(out, "Policy URL:  not found")?,
    }
    writeln!(out, "Audit ID:    {}", report.audit_id())?;
    writeln!(
        out,
        "Generated:   {}",
        report.generated_at().format("%Y-%m-%d %H:%M:%S UTC")
    )?;

    for (index, finding) in report.findings().iter().enumerate() {
        writeln!(out)?;
        writeln!(out, "Module {}: {}", index + 1, finding.module_id.title())?;
        writeln!(out, "  [{}] {}", finding.status, finding.message)?;
        for item in &finding.evidence {
            writeln!(out, "     - {item}")?;
        }
    }

    let counts = report.counts();
    writeln!(out)?;
    writeln!(out, "{RULE_LIGHT}")?;
    writeln!(out, "OVERALL COMPLIANCE SCORE:")?;
    writeln!(out, "{RULE_LIGHT}")?;
    writeln!(out, "Compliance Level: {}", report.compliance_level())?;
    writeln!(out, "Violations: {}", counts.violations())?;
    writeln!(out, "Risks: {}", counts.risks())?;
    writeln!(out, "Passed: {}", counts.passed())?;
    writeln!(out, "Skipped: {}", counts.get(crate::Status::Skip))?;
    writeln!(out, "Errors: {}", counts.get(crate::Status::Error))?;
    writeln!(out, "{RULE_HEAVY}")
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_report(f, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::{Finding, ModuleId};
    use complyscope_core::{Regulation, TargetUrl};
    use uuid::Uuid;

    #[test]
    fn test_render_text() {
        let report = AuditReport::new(
            Uuid::new_v4(),
            TargetUrl::parse("example.com").expect("valid target"),
            Regulation::Dpdp,
            "DPDP Act 2025",
            None,
            vec![
                Finding::violation(
                    ModuleId::Consent,
                    "Sec 6(1): Data processed without consent - 1 unauthorized trackers found",
                    vec!["_ga (.doubleclick.net)".to_string()],
                ),
                Finding::skip(ModuleId::Breach, "Rule 7: Skipped - Could not fetch Policy text"),
            ],
        );

        let text = render_text(&report);
        assert!(text.contains("COMPLIANCE AUDIT REPORT - DPDP Act 2025"));
        assert!(text.contains("Module 1: Consent Audit"));
        assert!(text.contains("[VIOLATION] Sec 6(1)"));
        assert!(text.contains("- _ga (.doubleclick.net)"));
        assert!(text.contains("Module 2: Breach Notification"));
        assert!(text.contains("Policy URL:  not found"));
        assert!(text.contains("Compliance Level: LOW"));
        assert!(text.contains("Skipped: 1"));
        assert_eq!(text, report.to_string());
    }
}
