//! Concurrent audits of many targets.

use crate::auditor::Auditor;
use crate::http::HttpSource;
use complyscope_audit::{AuditReport, ComplianceLevel, ModuleId, Status};
use complyscope_browser::PageSource;
use complyscope_core::TargetUrl;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use tracing::{error, info};

/// Outcome of auditing one target in a batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    /// Target as given by the caller
    pub target: String,
    /// Report, when the audit ran
    pub report: Option<AuditReport>,
    /// Error message if the audit could not run
    pub error: Option<String>,
}

/// Per-target line of a batch summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditSummary {
    /// Overall level
    pub compliance_level: ComplianceLevel,
    /// Violations found
    pub violations: usize,
    /// Risks found
    pub risks: usize,
    /// Modules passed
    pub passed: usize,
    /// Status of every module in execution order
    pub modules: Vec<(ModuleId, Status)>,
}

impl From<&AuditReport> for AuditSummary {
    fn from(report: &AuditReport) -> Self {
        Self {
            compliance_level: report.compliance_level(),
            violations: report.counts().violations(),
            risks: report.counts().risks(),
            passed: report.counts().passed(),
            modules: report
                .findings()
                .iter()
                .map(|f| (f.module_id, f.status))
                .collect(),
        }
    }
}

impl BatchEntry {
    /// Summary of the report, if the audit ran.
    #[must_use]
    pub fn summary(&self) -> Option<AuditSummary> {
        self.report.as_ref().map(AuditSummary::from)
    }
}

/// Audits several targets with a bounded number in flight.
pub struct BatchAuditor<P, H> {
    auditor: Auditor<P, H>,
    max_concurrent_audits: usize,
}

impl<P: PageSource, H: HttpSource> BatchAuditor<P, H> {
    /// Create a batch auditor that runs three audits at a time.
    pub fn new(auditor: Auditor<P, H>) -> Self {
        Self {
            auditor,
            max_concurrent_audits: 3,
        }
    }

    /// Set the maximum number of concurrent audits.
    #[must_use]
    pub fn with_max_concurrent_audits(mut self, max: usize) -> Self {
        self.max_concurrent_audits = max.max(1);
        self
    }

    /// Audit every target. Entries come back in input order.
    pub async fn run(&self, targets: Vec<String>) -> Vec<BatchEntry> {
        let total = targets.len();
        let mut futures = FuturesUnordered::new();
        let mut entries: Vec<(usize, BatchEntry)> = Vec::with_capacity(total);

        for (index, raw) in targets.into_iter().enumerate() {
            let target = match TargetUrl::parse(&raw) {
                Ok(target) => target,
                Err(e) => {
                    error!(target = %raw, error = %e, "skipping invalid target");
                    entries.push((
                        index,
                        BatchEntry {
                            target: raw,
                            report: None,
                            error: Some(e.to_string()),
                        },
                    ));
                    continue;
                }
            };

            let auditor = &self.auditor;
            futures.push(async move {
                let result = auditor.audit(&target).await;
                (index, raw, result)
            });

            // Respect concurrency limit
            while futures.len() >= self.max_concurrent_audits {
                if let Some(done) = futures.next().await {
                    entries.push(Self::entry(done));
                }
            }
        }

        // Collect remaining results
        while let Some(done) = futures.next().await {
            entries.push(Self::entry(done));
        }

        entries.sort_by_key(|(index, _)| *index);
        let failed = entries.iter().filter(|(_, e)| e.error.is_some()).count();
        info!(total, failed, "batch audit complete");

        entries.into_iter().map(|(_, entry)| entry).collect()
    }

    fn entry(
        (index, target, result): (usize, String, crate::Result<AuditReport>),
    ) -> (usize, BatchEntry) {
        let entry = match result {
            Ok(report) => BatchEntry {
                target,
                report: Some(report),
                error: None,
            },
            Err(e) => {
                error!(target = %target, error = %e, "audit failed");
                BatchEntry {
                    target,
                    report: None,
                    error: Some(e.to_string()),
                }
            }
        };
        (index, entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_entry_json() {
        let entry = BatchEntry {
            target: "not a url".to_string(),
            report: None,
            error: Some("invalid target".to_string()),
        };
        let json = serde_json::to_value(&entry).expect("serialize entry");
        assert_eq!(json["target"], "not a url");
        assert!(json["report"].is_null());
        assert_eq!(json["error"], "invalid target");
        assert!(entry.summary().is_none());
    }
}
