//! Single-target audits: collect, then evaluate.

use crate::collector::SignalCollector;
use crate::error::Result;
use crate::http::{HttpProbe, HttpSource};
use complyscope_audit::{AuditPipeline, AuditReport, Checklist};
use complyscope_browser::{BrowserEngine, PageSource};
use complyscope_core::{AppConfig, AuditConfig, TargetUrl};
use tracing::info;

/// Resolve the checklist named by the audit configuration.
///
/// A configured checklist file wins over the built-in regulation.
pub fn load_checklist(config: &AuditConfig) -> Result<Checklist> {
    match &config.checklist_path {
        Some(path) => Ok(Checklist::load_from_path(path)?),
        None => Ok(Checklist::for_regulation(config.regulation)),
    }
}

/// Audits one target at a time.
pub struct Auditor<P, H> {
    collector: SignalCollector<P, H>,
    pipeline: AuditPipeline,
}

impl Auditor<BrowserEngine, HttpProbe> {
    /// Launch the browser and HTTP probe described by `config`.
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let checklist = load_checklist(&config.audit)?;
        let pages = BrowserEngine::with_config(&config.browser).await?;
        let http = HttpProbe::new(&config.http)?;
        Ok(Self::new(pages, http, checklist))
    }
}

impl<P: PageSource, H: HttpSource> Auditor<P, H> {
    /// Create an auditor from its parts.
    pub fn new(pages: P, http: H, checklist: Checklist) -> Self {
        let collector = SignalCollector::new(pages, http)
            .with_notice_keywords(checklist.notice_keywords.clone());
        Self {
            collector,
            pipeline: AuditPipeline::new(checklist),
        }
    }

    /// The checklist applied to every target.
    pub fn checklist(&self) -> &Checklist {
        self.pipeline.checklist()
    }

    /// Audit `target`, locating its privacy policy on the landing page.
    pub async fn audit(&self, target: &TargetUrl) -> Result<AuditReport> {
        self.audit_with_policy(target, None).await
    }

    /// Audit `target` with an explicit privacy policy URL.
    pub async fn audit_with_policy(
        &self,
        target: &TargetUrl,
        policy_url: Option<&str>,
    ) -> Result<AuditReport> {
        info!(
            target = %target,
            checklist = %self.checklist().name,
            "starting audit"
        );
        let bundle = self.collector.collect(target, policy_url).await?;
        Ok(self.pipeline.evaluate(&bundle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use complyscope_audit::AuditError;
    use complyscope_core::Regulation;
    use tempfile::TempDir;

    #[test]
    fn test_load_builtin_checklist() {
        let config = AuditConfig {
            regulation: Regulation::Gdpr,
            checklist_path: None,
        };
        let checklist = load_checklist(&config).expect("built-in checklist");
        assert_eq!(checklist.regulation, Regulation::Gdpr);
    }

    #[test]
    fn test_checklist_file_wins() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = tmp.path().join("checklist.toml");
        let mut custom = Checklist::dpdp();
        custom.name = "In-house".to_string();
        std::fs::write(&path, custom.to_toml_string().expect("serialize")).expect("write");

        let config = AuditConfig {
            regulation: Regulation::Gdpr,
            checklist_path: Some(path),
        };
        let checklist = load_checklist(&config).expect("custom checklist");
        assert_eq!(checklist.name, "In-house");
    }

    #[test]
    fn test_missing_checklist_file() {
        let config = AuditConfig {
            regulation: Regulation::Dpdp,
            checklist_path: Some("/nonexistent/checklist.toml".into()),
        };
        let err = load_checklist(&config).expect_err("missing file");
        assert!(matches!(
            err,
            crate::CollectError::Audit(AuditError::ChecklistNotFound { .. })
        ));
    }
}
