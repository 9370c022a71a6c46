use crate::error::{BrowserError, Result};
use serde::{Deserialize, Serialize};

/// A cookie read from the browser jar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedCookie {
    pub name: String,
    pub domain: String,
    pub value: String,
}

/// Landing page state after the settle delay, before any interaction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCapture {
    /// Rendered HTML
    pub html: String,
    /// Cookies set by the page and its third-party scripts
    pub cookies: Vec<CapturedCookie>,
}

/// Source of rendered pages
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    /// Load a URL, wait for deferred scripts, and capture HTML and cookies
    async fn capture(&self, url: &str) -> Result<PageCapture>;

    /// Load a URL and return its visible body text
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// Helper to extract domain from URL
pub fn extract_domain(url: &str) -> Result<String> {
    let url = url::Url::parse(url)
        .map_err(|e| BrowserError::NavigationError(format!("Invalid URL: {e}")))?;

    url.host_str()
        .ok_or_else(|| BrowserError::NavigationError("No host in URL".to_string()))
        .map(str::to_ascii_lowercase)
}
