//! Complyscope Core - Foundation crate for the Complyscope website auditor.
//!
//! This crate provides the shared types, error handling and configuration
//! management that the audit engine, the browser layer and the collector
//! depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared newtypes and enums (`TargetUrl`, `Regulation`)
//!
//! # Example
//!
//! ```rust
//! use complyscope_core::{AppConfig, Regulation, TargetUrl};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert_eq!(config.audit.regulation, Regulation::Dpdp);
//!
//! let target = TargetUrl::parse("example.com")?;
//! assert_eq!(target.as_str(), "https://example.com/");
//! assert_eq!(target.registrable_domain(), "example.com");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, AuditConfig, BatchConfig, BrowserConfig, HttpConfig};
pub use error::{ConfigError, ConfigResult, CoreError, Result};
pub use types::{registrable_domain, Regulation, TargetUrl};
