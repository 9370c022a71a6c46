//! Complyscope Audit - Compliance classification engine.
//!
//! This crate turns already-acquired website signals (pre-consent cookies,
//! landing page HTML, response headers and privacy policy text) into a
//! structured compliance report. It never drives a browser or touches the
//! network; see `complyscope-collector` for acquisition.
//!
//! # Features
//!
//! - Built-in DPDP and GDPR checklists, or custom ones loaded from TOML
//! - One pure classifier per requirement area
//! - Per-module failure isolation: a broken signal yields an `Error` finding,
//!   never an aborted audit
//! - Deterministic scoring into a `High`/`Medium`/`Low` compliance level
//!
//! # Example
//!
//! ```rust
//! use complyscope_audit::{evaluate, ComplianceLevel, Cookie, ModuleId, SignalBundle, Status};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bundle = SignalBundle::builder("https://example.com")
//!     .cookie(Cookie::new("_ga", ".doubleclick.net", "GA1.2.3"))
//!     .build()?;
//!
//! let report = evaluate(&bundle);
//! assert_eq!(report.finding(ModuleId::Consent).map(|f| f.status), Some(Status::Violation));
//! assert_eq!(report.compliance_level(), ComplianceLevel::Low);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod checklist;
pub mod classifiers;
pub mod error;
pub mod finding;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod scorer;
pub mod signals;

// Re-export commonly used types
pub use checklist::Checklist;
pub use classifiers::notice::locate_policy_link;
pub use error::{AuditError, ClassifyError, Result};
pub use finding::{Finding, ModuleId, Status};
pub use pipeline::{evaluate, AuditPipeline};
pub use render::render_text;
pub use report::AuditReport;
pub use scorer::{compliance_level, ComplianceLevel, StatusCounts};
pub use signals::{Cookie, ResponseHeaders, Signal, SignalBundle, SignalBundleBuilder, SignalFailure};
