//! Regulation checklists.
//!
//! A [`Checklist`] gathers every keyword set, header list and cookie rule the
//! classifiers use, plus the order modules run in. Two checklists are built
//! in ([`Checklist::dpdp`] and [`Checklist::gdpr`]); others can be loaded
//! from TOML.

use crate::error::{AuditError, Result};
use crate::finding::{ModuleId, Status};
use complyscope_core::Regulation;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Cookie name fragments that mark a cookie as strictly necessary.
pub const ESSENTIAL_COOKIE_KEYWORDS: &[&str] = &["session", "id", "csrf", "auth", "token"];

/// Extra necessary-cookie fragments accepted under GDPR.
pub const GDPR_EXTRA_ESSENTIAL_KEYWORDS: &[&str] = &["language", "preference"];

/// Cookie name fragments of well-known ad-tech and analytics trackers.
pub const TRACKER_SIGNATURES: &[&str] = &[
    "_ga", "_gid", "_fbp", "_fbc", "_uetsid", "_uetvid", "adsid", "doubleclick", "rubicon",
    "criteo", "amazon_aid", "ttd_uuid", "dpm", "mage", "c3", "kenshoo", "affectv", "bluekai",
];

/// Anchor text or href fragments that identify a privacy notice link.
pub const NOTICE_KEYWORDS: &[&str] = &["privacy", "policy", "notice", "data protection"];

/// Security headers every response should carry.
pub const REQUIRED_HEADERS: &[&str] = &[
    "Strict-Transport-Security",
    "X-Frame-Options",
    "X-Content-Type-Options",
];

/// Words near an email that make it a grievance contact.
pub const GRIEVANCE_CONTEXT_KEYWORDS: &[&str] = &[
    "grievance",
    "officer",
    "dpo",
    "contact",
    "support",
    "complaint",
    "redressal",
];

/// Width of the text window centered on each email.
pub const GRIEVANCE_WINDOW: usize = 200;

/// Breach notification vocabulary.
pub const BREACH_KEYWORDS: &[&str] = &[
    "breach",
    "notification",
    "72 hours",
    "incident",
    "unauthorized access",
    "disclosure",
];

/// Children's data and parental consent vocabulary.
pub const CHILDREN_KEYWORDS: &[&str] = &[
    "child",
    "minor",
    "parent",
    "guardian",
    "parental consent",
    "age verification",
    "under 18",
];

/// Retention and erasure vocabulary.
pub const RETENTION_KEYWORDS: &[&str] = &[
    "retention",
    "delete",
    "erase",
    "removal",
    "1 year",
    "log retention",
    "purge",
    "destroy",
];

/// Data protection officer vocabulary.
pub const GOVERNANCE_KEYWORDS: &[&str] = &[
    "data protection officer",
    "dpo",
    "appointed dpo",
    "designate",
    "responsible",
];

/// Supervisory authority complaint vocabulary.
pub const COMPLAINT_KEYWORDS: &[&str] = &[
    "supervisory authority",
    "lodge a complaint",
    "ico",
    "cnil",
    "data protection authority",
    "complaint",
    "authorities",
];

/// Phrases that indicate data leaves the EU/EEA.
pub const TRANSFER_KEYWORDS: &[&str] = &[
    "transfer",
    "transfer outside",
    "international",
    "outside eu",
    "outside eea",
    "third country",
    "outside europe",
];

/// Recognized transfer mechanisms.
pub const SAFEGUARD_KEYWORDS: &[&str] = &[
    "standard contractual clause",
    "scc",
    "adequacy decision",
    "binding corporate rule",
    "bcr",
    "approved mechanism",
    "model clause",
    "standard clause",
];

/// Missing rights at or above which the rights bundle is a violation.
pub const RIGHTS_VIOLATION_THRESHOLD: usize = 3;

/// Cookie rules for the consent module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentRules {
    /// Lowercase name fragments of strictly necessary cookies
    pub essential_keywords: Vec<String>,
    /// Name fragments of known trackers
    #[serde(default)]
    pub tracker_signatures: Vec<String>,
    /// Also flag first-party cookies whose name matches a tracker signature
    #[serde(default)]
    pub flag_first_party_trackers: bool,
}

/// Context rules for the grievance module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrievanceRules {
    /// Words that mark an email as a grievance contact
    pub context_keywords: Vec<String>,
    /// Width of the window centered on each email, in characters
    pub window: usize,
}

impl Default for GrievanceRules {
    fn default() -> Self {
        Self {
            context_keywords: to_strings(GRIEVANCE_CONTEXT_KEYWORDS),
            window: GRIEVANCE_WINDOW,
        }
    }
}

/// Keyword-presence rule for one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    /// Module the rule belongs to
    pub module: ModuleId,
    /// Any of these in the policy text passes the module
    pub keywords: Vec<String>,
    /// Outcome when none match
    #[serde(default = "default_on_missing")]
    pub on_missing: Status,
}

fn default_on_missing() -> Status {
    Status::Violation
}

/// One data subject right and the phrases that evidence it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RightRule {
    /// Right name used in evidence
    pub name: String,
    /// Any of these evidences the right
    pub keywords: Vec<String>,
}

/// Rules for the international transfers module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRules {
    /// Phrases that indicate data leaves the jurisdiction
    pub transfer_keywords: Vec<String>,
    /// Recognized transfer mechanisms
    pub safeguard_keywords: Vec<String>,
}

/// A complete set of rules for one regulation.
///
/// Plain values come before tables so the struct serializes to valid TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checklist {
    /// Display name
    pub name: String,
    /// Regulation whose citations appear in messages
    pub regulation: Regulation,
    /// Modules in execution order
    pub modules: Vec<ModuleId>,
    /// Anchor keywords for the notice locator
    #[serde(default)]
    pub notice_keywords: Vec<String>,
    /// Header names that must be present
    #[serde(default)]
    pub required_headers: Vec<String>,
    /// Missing rights at or above which the rights bundle is a violation
    #[serde(default = "default_rights_threshold")]
    pub rights_violation_threshold: usize,
    /// Consent cookie rules
    pub consent: ConsentRules,
    /// Grievance contact rules
    #[serde(default)]
    pub grievance: GrievanceRules,
    /// International transfer rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfers: Option<TransferRules>,
    /// Keyword-presence rules
    #[serde(default)]
    pub keyword_rules: Vec<KeywordRule>,
    /// Data subject rights
    #[serde(default)]
    pub rights: Vec<RightRule>,
}

fn default_rights_threshold() -> usize {
    RIGHTS_VIOLATION_THRESHOLD
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}

fn keyword_rule(module: ModuleId, keywords: &[&str], on_missing: Status) -> KeywordRule {
    KeywordRule {
        module,
        keywords: to_strings(keywords),
        on_missing,
    }
}

fn right(name: &str, keywords: &[&str]) -> RightRule {
    RightRule {
        name: name.to_string(),
        keywords: to_strings(keywords),
    }
}

impl Checklist {
    /// India's DPDP Act checklist.
    #[must_use]
    pub fn dpdp() -> Self {
        Self {
            name: "DPDP Act 2025".to_string(),
            regulation: Regulation::Dpdp,
            modules: ModuleId::DPDP.to_vec(),
            notice_keywords: to_strings(NOTICE_KEYWORDS),
            required_headers: to_strings(REQUIRED_HEADERS),
            rights_violation_threshold: RIGHTS_VIOLATION_THRESHOLD,
            consent: ConsentRules {
                essential_keywords: to_strings(ESSENTIAL_COOKIE_KEYWORDS),
                tracker_signatures: to_strings(TRACKER_SIGNATURES),
                flag_first_party_trackers: false,
            },
            grievance: GrievanceRules::default(),
            transfers: None,
            keyword_rules: vec![
                keyword_rule(ModuleId::Breach, BREACH_KEYWORDS, Status::Violation),
                keyword_rule(ModuleId::ChildrenData, CHILDREN_KEYWORDS, Status::Violation),
                keyword_rule(ModuleId::Retention, RETENTION_KEYWORDS, Status::Violation),
            ],
            rights: Vec::new(),
        }
    }

    /// EU GDPR checklist.
    #[must_use]
    pub fn gdpr() -> Self {
        let mut essential = to_strings(ESSENTIAL_COOKIE_KEYWORDS);
        essential.extend(to_strings(GDPR_EXTRA_ESSENTIAL_KEYWORDS));

        Self {
            name: "GDPR".to_string(),
            regulation: Regulation::Gdpr,
            modules: ModuleId::GDPR.to_vec(),
            notice_keywords: to_strings(NOTICE_KEYWORDS),
            required_headers: to_strings(REQUIRED_HEADERS),
            rights_violation_threshold: RIGHTS_VIOLATION_THRESHOLD,
            consent: ConsentRules {
                essential_keywords: essential,
                tracker_signatures: to_strings(TRACKER_SIGNATURES),
                flag_first_party_trackers: false,
            },
            grievance: GrievanceRules::default(),
            transfers: Some(TransferRules {
                transfer_keywords: to_strings(TRANSFER_KEYWORDS),
                safeguard_keywords: to_strings(SAFEGUARD_KEYWORDS),
            }),
            keyword_rules: vec![
                keyword_rule(ModuleId::Governance, GOVERNANCE_KEYWORDS, Status::Risk),
                keyword_rule(ModuleId::Complaints, COMPLAINT_KEYWORDS, Status::Violation),
            ],
            rights: vec![
                right("Access", &["access", "right of access", "access to data"]),
                right(
                    "Rectification",
                    &["rectif", "correct", "amend", "update information"],
                ),
                right(
                    "Erasure",
                    &["right to be forgotten", "erasure", "delete", "erase", "removal"],
                ),
                right(
                    "Restriction",
                    &["restrict", "restriction of processing", "suspend"],
                ),
                right(
                    "Portability",
                    &["data portab", "portable", "receive data", "machine-readable"],
                ),
                right(
                    "Objection",
                    &["right to object", "objection", "reject processing"],
                ),
            ],
        }
    }

    /// The built-in checklist for `regulation`.
    #[must_use]
    pub fn for_regulation(regulation: Regulation) -> Self {
        match regulation {
            Regulation::Dpdp => Self::dpdp(),
            Regulation::Gdpr => Self::gdpr(),
        }
    }

    /// Parse and validate a checklist from TOML.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let checklist: Self = toml::from_str(contents)?;
        checklist.validate()?;
        Ok(checklist)
    }

    /// Load and validate a checklist file.
    ///
    /// # Errors
    /// Returns error if the file is missing, unreadable, not valid TOML, or
    /// fails [`Checklist::validate`].
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AuditError::ChecklistNotFound {
                path: path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        let checklist = Self::from_toml_str(&contents)?;

        debug!(
            name = %checklist.name,
            regulation = %checklist.regulation,
            modules = checklist.modules.len(),
            path = %path.display(),
            "loaded checklist"
        );

        Ok(checklist)
    }

    /// Serialize to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The keyword rule for `module`, if any.
    #[must_use]
    pub fn keyword_rule(&self, module: ModuleId) -> Option<&KeywordRule> {
        self.keyword_rules.iter().find(|r| r.module == module)
    }

    /// Check that every listed module has a usable rule.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| AuditError::InvalidChecklist {
            name: self.name.clone(),
            reason,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("checklist name cannot be empty".to_string()));
        }
        if self.modules.is_empty() {
            return Err(invalid("checklist must list at least one module".to_string()));
        }

        let mut seen = HashSet::new();
        for module in &self.modules {
            if !seen.insert(*module) {
                return Err(invalid(format!("module {module:?} listed twice")));
            }
        }

        for rule in &self.keyword_rules {
            if rule.keywords.is_empty() {
                return Err(invalid(format!(
                    "keyword rule for {:?} has no keywords",
                    rule.module
                )));
            }
            if matches!(rule.on_missing, Status::Skip | Status::Error) {
                return Err(invalid(format!(
                    "keyword rule for {:?} must resolve to PASS, RISK or VIOLATION",
                    rule.module
                )));
            }
        }

        for module in &self.modules {
            match module {
                ModuleId::Consent => {}
                ModuleId::Notice if self.notice_keywords.is_empty() => {
                    return Err(invalid("notice_keywords cannot be empty".to_string()));
                }
                ModuleId::SecurityHeaders if self.required_headers.is_empty() => {
                    return Err(invalid("required_headers cannot be empty".to_string()));
                }
                ModuleId::Grievance => {
                    if self.grievance.window == 0 {
                        return Err(invalid("grievance.window must be > 0".to_string()));
                    }
                    if self.grievance.context_keywords.is_empty() {
                        return Err(invalid(
                            "grievance.context_keywords cannot be empty".to_string(),
                        ));
                    }
                }
                ModuleId::Breach
                | ModuleId::ChildrenData
                | ModuleId::Retention
                | ModuleId::Governance
                | ModuleId::Complaints
                    if self.keyword_rule(*module).is_none() =>
                {
                    return Err(invalid(format!("no keyword rule for {module:?}")));
                }
                ModuleId::RightsBundle => {
                    if self.rights.is_empty() {
                        return Err(invalid("rights cannot be empty".to_string()));
                    }
                    if let Some(r) = self.rights.iter().find(|r| r.keywords.is_empty()) {
                        return Err(invalid(format!("right '{}' has no keywords", r.name)));
                    }
                    if self.rights_violation_threshold == 0 {
                        return Err(invalid(
                            "rights_violation_threshold must be > 0".to_string(),
                        ));
                    }
                }
                ModuleId::Transfers => match &self.transfers {
                    Some(t) if !t.transfer_keywords.is_empty() => {}
                    _ => {
                        return Err(invalid(
                            "transfers.transfer_keywords cannot be empty".to_string(),
                        ));
                    }
                },
                _ => {}
            }
        }

        Ok(())
    }
}

impl Default for Checklist {
    fn default() -> Self {
        Self::dpdp()
    }
}
