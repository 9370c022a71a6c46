//! Ordered execution of a checklist's modules against one signal bundle.

use crate::checklist::Checklist;
use crate::classifiers::{consent, grievance, headers, keywords, notice, rights, transfers};
use crate::error::ClassifyError;
use crate::finding::{Finding, ModuleId};
use crate::report::AuditReport;
use crate::signals::{Signal, SignalBundle};
use complyscope_core::Regulation;
use tracing::{info, info_span, warn};
use url::Url;
use uuid::Uuid;

/// Runs every module of a checklist in order.
///
/// Evaluation is synchronous and never fails: a module that cannot finish
/// yields an `Error` finding and the remaining modules still run.
#[derive(Debug, Clone, Default)]
pub struct AuditPipeline {
    checklist: Checklist,
}

impl AuditPipeline {
    /// Create a pipeline for `checklist`.
    #[must_use]
    pub fn new(checklist: Checklist) -> Self {
        Self { checklist }
    }

    /// Create a pipeline for a built-in checklist.
    #[must_use]
    pub fn for_regulation(regulation: Regulation) -> Self {
        Self::new(Checklist::for_regulation(regulation))
    }

    /// The checklist this pipeline applies.
    #[must_use]
    pub fn checklist(&self) -> &Checklist {
        &self.checklist
    }

    /// Evaluate `bundle` and assemble the report.
    #[must_use]
    pub fn evaluate(&self, bundle: &SignalBundle) -> AuditReport {
        let audit_id = Uuid::new_v4();
        let span = info_span!(
            "audit",
            %audit_id,
            target = %bundle.target(),
            regulation = %self.checklist.regulation
        );
        let _enter = span.enter();

        let located = if bundle.failure(Signal::Page).is_some() {
            None
        } else {
            notice::locate_policy_link(
                bundle.page_text(),
                bundle.target(),
                &self.checklist.notice_keywords,
            )
        };
        let policy_url = bundle.policy_url().cloned().or_else(|| located.clone());

        let mut findings = Vec::with_capacity(self.checklist.modules.len());
        for &module in &self.checklist.modules {
            let citation = module.citation(self.checklist.regulation);
            let finding = match self.run_module(module, bundle, located.as_ref()) {
                Ok(finding) => finding,
                Err(e) => {
                    warn!(module = ?module, error = %e, "module could not complete");
                    Finding::error(module, format!("{citation}: {e}"))
                }
            };

            info!(
                module = ?module,
                status = %finding.status,
                evidence = finding.evidence.len(),
                "module evaluated"
            );
            findings.push(finding);
        }

        let report = AuditReport::new(
            audit_id,
            bundle.target().clone(),
            self.checklist.regulation,
            self.checklist.name.clone(),
            policy_url,
            findings,
        );

        info!(
            level = %report.compliance_level(),
            violations = report.counts().violations(),
            risks = report.counts().risks(),
            "audit complete"
        );

        report
    }

    fn run_module(
        &self,
        module: ModuleId,
        bundle: &SignalBundle,
        located: Option<&Url>,
    ) -> Result<Finding, ClassifyError> {
        let checklist = &self.checklist;
        let citation = module.citation(checklist.regulation);

        let required_signal = match module {
            ModuleId::Consent | ModuleId::Notice => Signal::Page,
            ModuleId::SecurityHeaders => Signal::Headers,
            _ => Signal::Policy,
        };
        if let Some(failure) = bundle.failure(required_signal) {
            return Err(ClassifyError::SignalUnavailable {
                signal: failure.signal,
                reason: failure.reason.clone(),
            });
        }

        let policy_text = match bundle.policy_text() {
            Some(text) if !text.trim().is_empty() => Some(text),
            _ => None,
        };
        if module.requires_policy_text() && policy_text.is_none() {
            return Ok(Finding::skip(
                module,
                format!("{citation}: Skipped - Could not fetch Policy text"),
            ));
        }
        let policy_text = policy_text.unwrap_or_default();

        let finding = match module {
            ModuleId::Consent => consent::classify(
                bundle.target(),
                bundle.cookies(),
                &checklist.consent,
                citation,
            ),
            ModuleId::Notice => notice::classify(bundle.page_text(), located, citation),
            ModuleId::SecurityHeaders => headers::classify(
                bundle.response_headers(),
                &checklist.required_headers,
                citation,
            )?,
            ModuleId::Grievance => grievance::classify(policy_text, &checklist.grievance, citation),
            ModuleId::Breach
            | ModuleId::ChildrenData
            | ModuleId::Retention
            | ModuleId::Governance
            | ModuleId::Complaints => {
                let rule = checklist
                    .keyword_rule(module)
                    .ok_or(ClassifyError::MissingRule(module))?;
                keywords::classify(policy_text, rule, citation)
            }
            ModuleId::RightsBundle => rights::classify(
                policy_text,
                &checklist.rights,
                checklist.rights_violation_threshold,
                citation,
            ),
            ModuleId::Transfers => {
                let rules = checklist
                    .transfers
                    .as_ref()
                    .ok_or(ClassifyError::MissingRule(module))?;
                transfers::classify(policy_text, rules, citation)
            }
        };

        Ok(finding)
    }
}

/// Evaluate `bundle` against the DPDP checklist.
#[must_use]
pub fn evaluate(bundle: &SignalBundle) -> AuditReport {
    AuditPipeline::default().evaluate(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::Status;
    use crate::signals::Cookie;

    #[test]
    fn test_page_failure_errors_page_modules() {
        let bundle = SignalBundle::builder("https://example.com")
            .failure(Signal::Page, "navigation timed out")
            .header("Strict-Transport-Security", "max-age=1")
            .build()
            .expect("valid bundle");

        let report = evaluate(&bundle);
        assert_eq!(report.finding(ModuleId::Consent).map(|f| f.status), Some(Status::Error));
        assert_eq!(report.finding(ModuleId::Notice).map(|f| f.status), Some(Status::Error));
        assert_eq!(
            report.finding(ModuleId::SecurityHeaders).map(|f| f.status),
            Some(Status::Risk)
        );
        let message = &report.finding(ModuleId::Consent).expect("consent").message;
        assert_eq!(message, "Sec 6(1): page signal unavailable: navigation timed out");
    }

    #[test]
    fn test_policy_failure_errors_policy_modules() {
        let bundle = SignalBundle::builder("https://example.com")
            .failure(Signal::Policy, "HTTP 503")
            .build()
            .expect("valid bundle");

        let report = evaluate(&bundle);
        for module in [
            ModuleId::Grievance,
            ModuleId::Breach,
            ModuleId::ChildrenData,
            ModuleId::Retention,
        ] {
            assert_eq!(report.finding(module).map(|f| f.status), Some(Status::Error));
        }
    }

    #[test]
    fn test_missing_rule_becomes_error() {
        let mut checklist = Checklist::dpdp();
        checklist.keyword_rules.clear();
        let bundle = SignalBundle::builder("https://example.com")
            .policy_text("breach")
            .build()
            .expect("valid bundle");

        let report = AuditPipeline::new(checklist).evaluate(&bundle);
        assert_eq!(report.findings().len(), 7);
        assert_eq!(report.finding(ModuleId::Breach).map(|f| f.status), Some(Status::Error));
        assert_eq!(report.finding(ModuleId::Grievance).map(|f| f.status), Some(Status::Violation));
    }

    #[test]
    fn test_override_policy_url_wins() {
        let bundle = SignalBundle::builder("https://example.com")
            .page_text(r#"<a href="/privacy">Privacy</a>"#)
            .policy_url("https://legal.example.com/dpdp")
            .cookie(Cookie::new("sessionid", "example.com", "x"))
            .build()
            .expect("valid bundle");

        let report = evaluate(&bundle);
        assert_eq!(
            report.policy_url().map(Url::as_str),
            Some("https://legal.example.com/dpdp")
        );
        let notice = report.finding(ModuleId::Notice).expect("notice finding");
        assert_eq!(notice.evidence, vec!["https://example.com/privacy".to_string()]);
    }

    #[test]
    fn test_gdpr_has_no_notice_finding() {
        let bundle = SignalBundle::builder("https://example.eu")
            .page_text(r#"<a href="/privacy">Privacy</a>"#)
            .build()
            .expect("valid bundle");

        let report = AuditPipeline::for_regulation(Regulation::Gdpr).evaluate(&bundle);
        assert!(report.finding(ModuleId::Notice).is_none());
        assert_eq!(
            report.policy_url().map(Url::as_str),
            Some("https://example.eu/privacy")
        );
        assert_eq!(
            report.finding(ModuleId::Governance).map(|f| f.status),
            Some(Status::Skip)
        );
    }
}
