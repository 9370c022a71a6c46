//! Browser automation for compliance audits.
//!
//! Loads landing pages in headless Chrome, waits for deferred tag managers,
//! and captures the rendered HTML together with the cookie jar before any
//! consent interaction. Navigations to the same domain are spaced out.

pub mod actions;
pub mod engine;
pub mod error;

pub use actions::{extract_domain, CapturedCookie, PageCapture, PageSource};
pub use engine::BrowserEngine;
pub use error::{BrowserError, Result};
