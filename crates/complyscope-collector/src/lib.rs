//! Complyscope Collector - Signal acquisition and audit orchestration.
//!
//! This crate drives the browser and the HTTP probe to fill a
//! [`SignalBundle`](complyscope_audit::SignalBundle), then hands it to the
//! audit pipeline. Acquisition failures never abort an audit: they are
//! recorded in the bundle and surface as `Error` findings.
//!
//! # Features
//!
//! - Landing page capture and header probe run concurrently
//! - Privacy policy text fetched by the browser with a plain HTTP fallback
//! - Retry with backoff for transient HTTP failures
//! - Batch audits with a bounded number of targets in flight
//!
//! # Example
//!
//! ```rust,ignore
//! use complyscope_collector::{Auditor, BatchAuditor};
//! use complyscope_core::{AppConfig, TargetUrl};
//!
//! let config = AppConfig::load_with_env()?;
//! let auditor = Auditor::from_config(&config).await?;
//!
//! let report = auditor.audit(&TargetUrl::parse("example.com")?).await?;
//! println!("{report}");
//!
//! let batch = BatchAuditor::new(auditor)
//!     .with_max_concurrent_audits(config.batch.concurrent_audits);
//! let entries = batch.run(vec!["example.com".into(), "example.org".into()]).await;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod auditor;
pub mod batch;
pub mod collector;
pub mod error;
pub mod http;
pub mod text;

// Re-export commonly used types
pub use auditor::{load_checklist, Auditor};
pub use batch::{AuditSummary, BatchAuditor, BatchEntry};
pub use collector::SignalCollector;
pub use error::{CollectError, Result};
pub use http::{build_http_client, HttpProbe, HttpSource};
pub use text::html_to_text;
