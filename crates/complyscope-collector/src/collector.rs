//! Signal acquisition for one target.
//!
//! Each signal is acquired independently. A failure is recorded in the
//! bundle and the remaining signals are still collected, so the audit can
//! report `Error` for exactly the modules that depended on it.

use crate::error::{CollectError, Result};
use crate::http::HttpSource;
use crate::text::html_to_text;
use complyscope_audit::checklist::NOTICE_KEYWORDS;
use complyscope_audit::{locate_policy_link, Cookie, Signal, SignalBundle};
use complyscope_browser::PageSource;
use complyscope_core::TargetUrl;
use tracing::{debug, info, warn};
use url::Url;

/// Gathers a [`SignalBundle`] from a page source and an HTTP source.
pub struct SignalCollector<P, H> {
    pages: P,
    http: H,
    notice_keywords: Vec<String>,
}

impl<P: PageSource, H: HttpSource> SignalCollector<P, H> {
    /// Create a collector using the default notice keywords.
    pub fn new(pages: P, http: H) -> Self {
        Self {
            pages,
            http,
            notice_keywords: NOTICE_KEYWORDS.iter().map(|k| (*k).to_string()).collect(),
        }
    }

    /// Use the notice keywords of a specific checklist to find the policy.
    #[must_use]
    pub fn with_notice_keywords(mut self, keywords: Vec<String>) -> Self {
        self.notice_keywords = keywords;
        self
    }

    /// Collect every signal for `target`.
    ///
    /// `policy_override` replaces the policy link found on the landing page.
    ///
    /// # Errors
    /// Only an invalid `policy_override` is fatal; acquisition failures are
    /// recorded in the returned bundle.
    pub async fn collect(
        &self,
        target: &TargetUrl,
        policy_override: Option<&str>,
    ) -> Result<SignalBundle> {
        let override_url = policy_override
            .map(|u| TargetUrl::parse(u).map(|t| t.url().clone()))
            .transpose()?;

        let mut builder = SignalBundle::builder(target.as_str());

        let (capture, headers) = tokio::join!(
            self.pages.capture(target.as_str()),
            self.http.fetch_headers(target.as_str())
        );

        let html = match capture {
            Ok(capture) => {
                builder = builder.cookies(
                    capture
                        .cookies
                        .into_iter()
                        .map(|c| Cookie::new(c.name, c.domain, c.value)),
                );
                Some(capture.html)
            }
            Err(e) => {
                warn!(target = %target, error = %e, "landing page capture failed");
                builder = builder.failure(Signal::Page, e.to_string());
                None
            }
        };

        builder = match headers {
            Ok(headers) => builder.response_headers(headers),
            Err(e) => {
                warn!(target = %target, error = %e, "header probe failed");
                builder.failure(Signal::Headers, e.to_string())
            }
        };

        let policy_url = match override_url {
            Some(url) => {
                builder = builder.policy_url(url.as_str());
                Some(url)
            }
            None => html
                .as_deref()
                .and_then(|h| locate_policy_link(h, target, &self.notice_keywords)),
        };

        if let Some(url) = &policy_url {
            match self.fetch_policy_text(url).await {
                Ok(text) => builder = builder.policy_text(text),
                Err(e) => {
                    warn!(policy_url = %url, error = %e, "policy text unavailable");
                    builder = builder.failure(Signal::Policy, e.to_string());
                }
            }
        } else {
            info!(target = %target, "no privacy policy link to follow");
        }

        if let Some(html) = html {
            builder = builder.page_text(html);
        }

        Ok(builder.build()?)
    }

    /// Browser first, then a plain GET with the HTML stripped.
    async fn fetch_policy_text(&self, url: &Url) -> Result<String> {
        match self.pages.fetch_text(url.as_str()).await {
            Ok(text) if !text.trim().is_empty() => {
                debug!(policy_url = %url, chars = text.len(), "policy text fetched by browser");
                return Ok(text);
            }
            Ok(_) => debug!(policy_url = %url, "browser returned empty policy text"),
            Err(e) => debug!(policy_url = %url, error = %e, "browser policy fetch failed"),
        }

        let body = self.http.fetch_body(url.as_str()).await?;
        let text = html_to_text(&body);
        if text.is_empty() {
            return Err(CollectError::EmptyBody {
                url: url.to_string(),
            });
        }
        debug!(policy_url = %url, chars = text.len(), "policy text fetched over HTTP");
        Ok(text)
    }
}
