//! The immutable result of one audit run.

use crate::finding::{Finding, ModuleId};
use crate::scorer::{compliance_level, ComplianceLevel, StatusCounts};
use chrono::{DateTime, Utc};
use complyscope_core::{Regulation, TargetUrl};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// Findings of every checklist module plus their aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    audit_id: Uuid,
    target_url: TargetUrl,
    regulation: Regulation,
    checklist: String,
    policy_url: Option<Url>,
    findings: Vec<Finding>,
    counts: StatusCounts,
    compliance_level: ComplianceLevel,
    generated_at: DateTime<Utc>,
}

impl AuditReport {
    /// Assemble a report, deriving counts and level from `findings`.
    #[must_use]
    pub fn new(
        audit_id: Uuid,
        target_url: TargetUrl,
        regulation: Regulation,
        checklist: impl Into<String>,
        policy_url: Option<Url>,
        findings: Vec<Finding>,
    ) -> Self {
        let counts = StatusCounts::from_findings(&findings);
        let compliance_level = compliance_level(&findings);
        Self {
            audit_id,
            target_url,
            regulation,
            checklist: checklist.into(),
            policy_url,
            findings,
            counts,
            compliance_level,
            generated_at: Utc::now(),
        }
    }

    /// Identifier shared by every log line of this run.
    #[must_use]
    pub fn audit_id(&self) -> Uuid {
        self.audit_id
    }

    /// The audited site.
    #[must_use]
    pub fn target_url(&self) -> &TargetUrl {
        &self.target_url
    }

    /// Regulation whose checklist was applied.
    #[must_use]
    pub fn regulation(&self) -> Regulation {
        self.regulation
    }

    /// Name of the checklist applied.
    #[must_use]
    pub fn checklist(&self) -> &str {
        &self.checklist
    }

    /// Privacy policy URL, caller-supplied or located on the landing page.
    #[must_use]
    pub fn policy_url(&self) -> Option<&Url> {
        self.policy_url.as_ref()
    }

    /// Findings in module execution order, one per module.
    #[must_use]
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// The finding of `module`, if the checklist ran it.
    #[must_use]
    pub fn finding(&self, module: ModuleId) -> Option<&Finding> {
        self.findings.iter().find(|f| f.module_id == module)
    }

    /// Findings per status.
    #[must_use]
    pub fn counts(&self) -> &StatusCounts {
        &self.counts
    }

    /// Overall compliance level.
    #[must_use]
    pub fn compliance_level(&self) -> ComplianceLevel {
        self.compliance_level
    }

    /// When the report was assembled.
    #[must_use]
    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Derive counts and level from the findings again.
    ///
    /// Used after deserializing a report from an untrusted source. Applying it
    /// to a report built by [`AuditReport::new`] changes nothing.
    #[must_use]
    pub fn recomputed(mut self) -> Self {
        self.counts = StatusCounts::from_findings(&self.findings);
        self.compliance_level = compliance_level(&self.findings);
        self
    }
}
