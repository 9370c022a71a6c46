//! Frozen inputs of one audit.
//!
//! A [`SignalBundle`] is assembled by the collector (or by hand in tests)
//! through [`SignalBundle::builder`] and never changes afterwards.

use crate::error::{ClassifyError, Result};
use complyscope_core::TargetUrl;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// A cookie observed on the landing page before any consent interaction.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Domain attribute as reported by the browser, possibly with a leading dot
    pub domain: String,
    /// Opaque value, never decoded
    pub value: String,
}

impl Cookie {
    /// Create a cookie.
    #[must_use]
    pub fn new(name: impl Into<String>, domain: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
            value: value.into(),
        }
    }
}

impl fmt::Debug for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cookie")
            .field("name", &self.name)
            .field("domain", &self.domain)
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Signals the collector acquires independently of each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    /// Landing page HTML and its cookie jar
    Page,
    /// Response headers of the target URL
    Headers,
    /// Privacy policy body
    Policy,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Page => "page",
            Self::Headers => "headers",
            Self::Policy => "policy",
        };
        write!(f, "{name}")
    }
}

/// A signal the collector tried and failed to acquire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalFailure {
    /// Which signal failed
    pub signal: Signal,
    /// Human-readable cause
    pub reason: String,
}

impl SignalFailure {
    /// Record a failed signal.
    #[must_use]
    pub fn new(signal: Signal, reason: impl Into<String>) -> Self {
        Self {
            signal,
            reason: reason.into(),
        }
    }
}

/// Raw HTTP response headers with case-insensitive lookup.
///
/// Names are kept as received so malformed ones can be reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders(Vec<(String, String)>);

impl ResponseHeaders {
    /// Create an empty header map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header. Repeated names are kept.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// First value of `name`, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether `name` is present, ignoring case.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no headers were received.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs in received order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Check that every name is an HTTP token (RFC 9110 §5.6.2).
    pub fn validate(&self) -> std::result::Result<(), ClassifyError> {
        match self.0.iter().find(|(n, _)| !is_token(n)) {
            Some((name, _)) => Err(ClassifyError::MalformedHeader { name: name.clone() }),
            None => Ok(()),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ResponseHeaders
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

fn is_token(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

/// Everything one audit run looks at.
#[derive(Debug, Clone)]
pub struct SignalBundle {
    target: TargetUrl,
    cookies: Vec<Cookie>,
    response_headers: ResponseHeaders,
    page_text: String,
    policy_url: Option<Url>,
    policy_text: Option<String>,
    failures: Vec<SignalFailure>,
}

impl SignalBundle {
    /// Start building a bundle for `target_url`.
    ///
    /// The URL is validated in [`SignalBundleBuilder::build`].
    #[must_use]
    pub fn builder(target_url: impl Into<String>) -> SignalBundleBuilder {
        SignalBundleBuilder {
            target_url: target_url.into(),
            cookies: Vec::new(),
            response_headers: ResponseHeaders::new(),
            page_text: String::new(),
            policy_url: None,
            policy_text: None,
            failures: Vec::new(),
        }
    }

    /// The normalized target.
    #[must_use]
    pub fn target(&self) -> &TargetUrl {
        &self.target
    }

    /// Cookies present before consent.
    #[must_use]
    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    /// Response headers of the target URL.
    #[must_use]
    pub fn response_headers(&self) -> &ResponseHeaders {
        &self.response_headers
    }

    /// Landing page HTML. Empty when the page was not captured.
    #[must_use]
    pub fn page_text(&self) -> &str {
        &self.page_text
    }

    /// Caller-supplied privacy policy URL.
    #[must_use]
    pub fn policy_url(&self) -> Option<&Url> {
        self.policy_url.as_ref()
    }

    /// Privacy policy text.
    #[must_use]
    pub fn policy_text(&self) -> Option<&str> {
        self.policy_text.as_deref()
    }

    /// Acquisition failures reported by the collector.
    #[must_use]
    pub fn failures(&self) -> &[SignalFailure] {
        &self.failures
    }

    /// First recorded failure of `signal`.
    #[must_use]
    pub fn failure(&self, signal: Signal) -> Option<&SignalFailure> {
        self.failures.iter().find(|f| f.signal == signal)
    }
}

/// Builder for [`SignalBundle`].
#[derive(Debug, Clone)]
#[must_use]
pub struct SignalBundleBuilder {
    target_url: String,
    cookies: Vec<Cookie>,
    response_headers: ResponseHeaders,
    page_text: String,
    policy_url: Option<String>,
    policy_text: Option<String>,
    failures: Vec<SignalFailure>,
}

impl SignalBundleBuilder {
    /// Add one cookie.
    pub fn cookie(mut self, cookie: Cookie) -> Self {
        self.cookies.push(cookie);
        self
    }

    /// Add cookies.
    pub fn cookies(mut self, cookies: impl IntoIterator<Item = Cookie>) -> Self {
        self.cookies.extend(cookies);
        self
    }

    /// Add one response header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.response_headers.insert(name, value);
        self
    }

    /// Replace the response headers.
    pub fn response_headers(mut self, headers: ResponseHeaders) -> Self {
        self.response_headers = headers;
        self
    }

    /// Set the landing page HTML.
    pub fn page_text(mut self, html: impl Into<String>) -> Self {
        self.page_text = html.into();
        self
    }

    /// Set the privacy policy URL, overriding the notice locator.
    pub fn policy_url(mut self, url: impl Into<String>) -> Self {
        self.policy_url = Some(url.into());
        self
    }

    /// Set the privacy policy text.
    pub fn policy_text(mut self, text: impl Into<String>) -> Self {
        self.policy_text = Some(text.into());
        self
    }

    /// Record a failed signal.
    pub fn failure(mut self, signal: Signal, reason: impl Into<String>) -> Self {
        self.failures.push(SignalFailure::new(signal, reason));
        self
    }

    /// Validate the target and policy URLs and freeze the bundle.
    ///
    /// # Errors
    /// Returns [`crate::AuditError::Core`] if either URL is not auditable.
    pub fn build(self) -> Result<SignalBundle> {
        let target = TargetUrl::parse(&self.target_url)?;
        let policy_url = self
            .policy_url
            .map(|u| TargetUrl::parse(&u).map(|t| t.url().clone()))
            .transpose()?;

        Ok(SignalBundle {
            target,
            cookies: self.cookies,
            response_headers: self.response_headers,
            page_text: self.page_text,
            policy_url,
            policy_text: self.policy_text,
            failures: self.failures,
        })
    }
}
