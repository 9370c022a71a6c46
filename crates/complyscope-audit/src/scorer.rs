//! Aggregation of findings into counts and a compliance level.

use crate::finding::{Finding, Status};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Overall compliance level of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ComplianceLevel {
    /// No violations and no risks
    High,
    /// Risks but no violations
    Medium,
    /// At least one violation
    Low,
}

impl fmt::Display for ComplianceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        };
        write!(f, "{label}")
    }
}

/// Derive the compliance level of a set of findings.
///
/// Any `Violation` makes it `Low`; otherwise any `Risk` makes it `Medium`;
/// otherwise `High`. `Skip` and `Error` findings are ignored, so a subset of
/// findings can be scored on its own.
#[must_use]
pub fn compliance_level(findings: &[Finding]) -> ComplianceLevel {
    if findings.iter().any(|f| f.status == Status::Violation) {
        ComplianceLevel::Low
    } else if findings.iter().any(|f| f.status == Status::Risk) {
        ComplianceLevel::Medium
    } else {
        ComplianceLevel::High
    }
}

/// Number of findings per status. Every status is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCounts(BTreeMap<Status, usize>);

impl StatusCounts {
    /// Count the statuses of `findings`.
    #[must_use]
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut counts: BTreeMap<Status, usize> = Status::ALL.iter().map(|s| (*s, 0)).collect();
        for finding in findings {
            *counts.entry(finding.status).or_insert(0) += 1;
        }
        Self(counts)
    }

    /// Count for one status.
    #[must_use]
    pub fn get(&self, status: Status) -> usize {
        self.0.get(&status).copied().unwrap_or(0)
    }

    /// Number of violations.
    #[must_use]
    pub fn violations(&self) -> usize {
        self.get(Status::Violation)
    }

    /// Number of risks.
    #[must_use]
    pub fn risks(&self) -> usize {
        self.get(Status::Risk)
    }

    /// Number of passed modules.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.get(Status::Pass)
    }

    /// `(status, count)` pairs in status order.
    pub fn iter(&self) -> impl Iterator<Item = (Status, usize)> + '_ {
        self.0.iter().map(|(s, c)| (*s, *c))
    }

    /// Total number of findings counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }
}

impl Default for StatusCounts {
    fn default() -> Self {
        Self::from_findings(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::ModuleId;

    fn finding(status: Status) -> Finding {
        Finding::new(ModuleId::Breach, status, "msg", Vec::new())
    }

    #[test]
    fn test_one_violation_any_order_is_low() {
        for position in 0..6 {
            let mut findings = vec![finding(Status::Pass); 5];
            findings.insert(position, finding(Status::Violation));
            assert_eq!(compliance_level(&findings), ComplianceLevel::Low);
        }
    }

    #[test]
    fn test_risk_without_violation_is_medium() {
        let findings = vec![finding(Status::Pass), finding(Status::Risk)];
        assert_eq!(compliance_level(&findings), ComplianceLevel::Medium);
    }

    #[test]
    fn test_skip_and_error_are_ignored() {
        let findings = vec![
            finding(Status::Pass),
            finding(Status::Skip),
            finding(Status::Error),
        ];
        assert_eq!(compliance_level(&findings), ComplianceLevel::High);
        assert_eq!(compliance_level(&[]), ComplianceLevel::High);
    }

    #[test]
    fn test_counts_include_every_status() {
        let counts = StatusCounts::from_findings(&[finding(Status::Risk), finding(Status::Risk)]);
        assert_eq!(counts.risks(), 2);
        assert_eq!(counts.violations(), 0);
        assert_eq!(counts.iter().count(), Status::ALL.len());
        assert_eq!(counts.total(), 2);
    }

    #[test]
    fn test_counts_serialize_as_map() {
        let counts = StatusCounts::from_findings(&[finding(Status::Pass)]);
        let json = serde_json::to_string(&counts).expect("serialize counts");
        assert_eq!(
            json,
            r#"{"PASS":1,"RISK":0,"VIOLATION":0,"SKIP":0,"ERROR":0}"#
        );
    }
}
