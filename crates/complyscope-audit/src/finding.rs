//! Findings: what each check module concluded and why.

use complyscope_core::Regulation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Check modules, one per requirement area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleId {
    /// Pre-consent tracking cookies
    Consent,
    /// Privacy notice link on the landing page
    Notice,
    /// HTTP security headers
    SecurityHeaders,
    /// Grievance officer contact in the policy
    Grievance,
    /// Breach notification commitments
    Breach,
    /// Children's data and parental consent
    ChildrenData,
    /// Data retention and erasure
    Retention,
    /// Data protection officer appointment
    Governance,
    /// Data subject rights coverage
    RightsBundle,
    /// Complaint route to a supervisory authority
    Complaints,
    /// International transfer safeguards
    Transfers,
}

impl ModuleId {
    /// Module order of the DPDP checklist.
    pub const DPDP: [ModuleId; 7] = [
        Self::Consent,
        Self::Notice,
        Self::SecurityHeaders,
        Self::Grievance,
        Self::Breach,
        Self::ChildrenData,
        Self::Retention,
    ];

    /// Module order of the GDPR checklist.
    pub const GDPR: [ModuleId; 5] = [
        Self::Consent,
        Self::Governance,
        Self::RightsBundle,
        Self::Complaints,
        Self::Transfers,
    ];

    /// Human-readable module title.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Consent => "Consent Audit",
            Self::Notice => "Notice Audit",
            Self::SecurityHeaders => "Security Safeguards",
            Self::Grievance => "Grievance Redressal",
            Self::Breach => "Breach Notification",
            Self::ChildrenData => "Children's Data",
            Self::Retention => "Data Retention",
            Self::Governance => "Governance",
            Self::RightsBundle => "Rights Bundle",
            Self::Complaints => "Transparency & Complaints",
            Self::Transfers => "International Transfers",
        }
    }

    /// The provision of `regulation` this module is a proxy for.
    #[must_use]
    pub fn citation(&self, regulation: Regulation) -> &'static str {
        match regulation {
            Regulation::Dpdp => match self {
                Self::Consent => "Sec 6(1)",
                Self::Notice => "Sec 5(1)",
                Self::SecurityHeaders => "Sec 8(5)",
                Self::Grievance => "Sec 8(9)",
                Self::Breach => "Rule 7",
                Self::ChildrenData => "Section 9 & Rule 10",
                Self::Retention => "Rule 8",
                Self::Governance => "Sec 10(2)",
                Self::RightsBundle => "Sec 11-14",
                Self::Complaints => "Sec 13",
                Self::Transfers => "Sec 16",
            },
            Regulation::Gdpr => match self {
                Self::Consent => "Article 6",
                Self::Notice => "Articles 12-13",
                Self::SecurityHeaders => "Article 32",
                Self::Grievance => "Article 38(4)",
                Self::Breach => "Article 33",
                Self::ChildrenData => "Article 8",
                Self::Retention => "Article 5(1)(e)",
                Self::Governance => "Article 37",
                Self::RightsBundle => "Articles 15-21",
                Self::Complaints => "Article 77",
                Self::Transfers => "Articles 44-46",
            },
        }
    }

    /// Whether the module reads the privacy policy text.
    #[must_use]
    pub fn requires_policy_text(&self) -> bool {
        !matches!(self, Self::Consent | Self::Notice | Self::SecurityHeaders)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Outcome of one module.
///
/// `Skip` and `Error` describe the inputs, the other three the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    /// Requirement met
    Pass,
    /// Weak signal of non-compliance
    Risk,
    /// Requirement not met
    Violation,
    /// A required signal was never provided
    Skip,
    /// A signal could not be acquired or parsed
    Error,
}

impl Status {
    /// All statuses in report order.
    pub const ALL: [Status; 5] = [
        Self::Pass,
        Self::Risk,
        Self::Violation,
        Self::Skip,
        Self::Error,
    ];

    /// Upper-case label used in rendered reports.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Risk => "RISK",
            Self::Violation => "VIOLATION",
            Self::Skip => "SKIP",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Classification outcome of one module plus the evidence behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Module that produced the finding
    pub module_id: ModuleId,
    /// Outcome
    pub status: Status,
    /// One-line explanation prefixed with the cited provision
    pub message: String,
    /// Matched keywords, missing header names, offending cookies, emails
    #[serde(default)]
    pub evidence: Vec<String>,
}

impl Finding {
    /// Create a finding.
    #[must_use]
    pub fn new(
        module_id: ModuleId,
        status: Status,
        message: impl Into<String>,
        evidence: Vec<String>,
    ) -> Self {
        Self {
            module_id,
            status,
            message: message.into(),
            evidence,
        }
    }

    /// Requirement met.
    #[must_use]
    pub fn pass(module_id: ModuleId, message: impl Into<String>, evidence: Vec<String>) -> Self {
        Self::new(module_id, Status::Pass, message, evidence)
    }

    /// Weak signal of non-compliance.
    #[must_use]
    pub fn risk(module_id: ModuleId, message: impl Into<String>, evidence: Vec<String>) -> Self {
        Self::new(module_id, Status::Risk, message, evidence)
    }

    /// Requirement not met.
    #[must_use]
    pub fn violation(
        module_id: ModuleId,
        message: impl Into<String>,
        evidence: Vec<String>,
    ) -> Self {
        Self::new(module_id, Status::Violation, message, evidence)
    }

    /// Required signal absent. Carries no evidence.
    #[must_use]
    pub fn skip(module_id: ModuleId, message: impl Into<String>) -> Self {
        Self::new(module_id, Status::Skip, message, Vec::new())
    }

    /// Module could not complete.
    #[must_use]
    pub fn error(module_id: ModuleId, message: impl Into<String>) -> Self {
        Self::new(module_id, Status::Error, message, Vec::new())
    }
}
