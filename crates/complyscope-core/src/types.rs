//! Shared types used across Complyscope.
//!
//! This module defines the newtypes and enums that every crate agrees on:
//! the validated audit target and the regulation a checklist proxies.

use crate::error::CoreError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::OnceLock;
use url::Url;

/// Public suffixes that span two labels. Hosts ending in one of these keep
/// three labels in their registrable domain (`shop.example.co.uk` →
/// `example.co.uk`).
const MULTI_LABEL_SUFFIXES: &[&str] = &[
    "co.uk", "org.uk", "ac.uk", "gov.uk", "me.uk", "co.in", "org.in", "net.in", "gov.in",
    "ac.in", "com.au", "net.au", "org.au", "co.nz", "co.jp", "com.br", "com.cn", "com.sg",
    "com.mx", "co.za",
];

/// Newtype for the website under audit.
///
/// Inputs are normalized the way a user types them: surrounding whitespace
/// is trimmed and `https://` is assumed when no scheme is given. The host
/// must be a dotted domain name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TargetUrl(Url);

impl TargetUrl {
    /// Normalize and validate a target URL.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidTarget`] if the input is empty, contains
    /// whitespace or `..`, or does not name a dotted host.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let invalid = |reason: &str| CoreError::InvalidTarget {
            url: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid("URL cannot be empty"));
        }
        if trimmed.contains(char::is_whitespace) {
            return Err(invalid("URL cannot contain spaces"));
        }
        if trimmed.contains("..") {
            return Err(invalid("invalid URL path"));
        }

        let lower = trimmed.to_ascii_lowercase();
        let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };

        static URL_SHAPE: OnceLock<Regex> = OnceLock::new();
        let shape = URL_SHAPE.get_or_init(|| {
            Regex::new(r"(?i)^https?://[a-z0-9.-]+\.[a-z]{2,}(:\d{1,5})?([/?#]\S*)?$")
                .expect("valid regex")
        });
        if !shape.is_match(&candidate) {
            return Err(invalid(
                "invalid URL format, expected example.com or https://example.com/path",
            ));
        }

        let url = Url::parse(&candidate).map_err(|e| invalid(&e.to_string()))?;
        match url.host_str() {
            Some(host) if host.contains('.') => Ok(Self(url)),
            Some(_) => Err(invalid("domain must be in format 'example.com'")),
            None => Err(invalid("missing domain")),
        }
    }

    /// Get the normalized URL as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Get the parsed URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.0
    }

    /// Get the lowercased host name.
    #[must_use]
    pub fn host(&self) -> &str {
        // Parsing guarantees a host
        self.0.host_str().unwrap_or_default()
    }

    /// The scheme, host and port of the target with an empty path.
    #[must_use]
    pub fn origin(&self) -> Url {
        let mut origin = self.0.clone();
        origin.set_path("/");
        origin.set_query(None);
        origin.set_fragment(None);
        origin
    }

    /// The registrable domain of the target host.
    #[must_use]
    pub fn registrable_domain(&self) -> String {
        registrable_domain(self.host())
    }
}

impl fmt::Display for TargetUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TargetUrl {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TargetUrl {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TargetUrl> for String {
    fn from(target: TargetUrl) -> Self {
        target.0.into()
    }
}

/// Reduce a host name to its registrable domain.
///
/// Keeps the last two labels, or three when the host ends in one of the
/// known two-label public suffixes. IP addresses and single-label hosts are
/// returned unchanged. Leading and trailing dots are ignored.
#[must_use]
pub fn registrable_domain(host: &str) -> String {
    let host = host.trim_matches('.').to_ascii_lowercase();
    if host.parse::<IpAddr>().is_ok() {
        return host;
    }

    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    if labels.len() <= 2 {
        return labels.join(".");
    }

    let last_two = labels[labels.len() - 2..].join(".");
    let keep = if MULTI_LABEL_SUFFIXES.contains(&last_two.as_str()) {
        3
    } else {
        2
    };
    labels[labels.len() - keep..].join(".")
}

/// Data protection regulations with a built-in checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regulation {
    /// India's Digital Personal Data Protection Act 2025
    #[default]
    Dpdp,
    /// EU General Data Protection Regulation 2016/679
    Gdpr,
}

impl Regulation {
    /// Short code used in logs and report headers.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Dpdp => "DPDP",
            Self::Gdpr => "GDPR",
        }
    }

    /// Human-readable name of the regulation.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Dpdp => "DPDP Act 2025 (India)",
            Self::Gdpr => "GDPR (EU 2016/679)",
        }
    }
}

impl fmt::Display for Regulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Regulation {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dpdp" => Ok(Self::Dpdp),
            "gdpr" => Ok(Self::Gdpr),
            other => Err(CoreError::Validation(format!(
                "unknown regulation '{other}', expected 'dpdp' or 'gdpr'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_url_adds_scheme() {
        let target = TargetUrl::parse("  example.com ").expect("valid target");
        assert_eq!(target.as_str(), "https://example.com/");
        assert_eq!(target.host(), "example.com");
    }

    #[test]
    fn test_target_url_keeps_http() {
        let target = TargetUrl::parse("http://shop.example.com/path?q=1").expect("valid target");
        assert_eq!(target.url().scheme(), "http");
        assert_eq!(target.origin().as_str(), "http://shop.example.com/");
    }

    #[test]
    fn test_target_url_invalid() {
        let invalid = vec![
            "",
            "   ",
            "exa mple.com",
            "localhost",
            "https://example.com/../etc",
            "ftp://example.com",
            "https://127.0.0.1",
        ];

        for input in invalid {
            assert!(TargetUrl::parse(input).is_err(), "Should fail for: {input:?}");
        }
    }

    #[test]
    fn test_target_url_serde() {
        let target = TargetUrl::parse("example.com").expect("valid target");
        let json = serde_json::to_string(&target).expect("serialize target");
        assert_eq!(json, "\"https://example.com/\"");

        let parsed: TargetUrl = serde_json::from_str(&json).expect("deserialize target");
        assert_eq!(parsed, target);
        assert!(serde_json::from_str::<TargetUrl>("\"not a url\"").is_err());
    }

    #[test]
    fn test_registrable_domain() {
        assert_eq!(registrable_domain("example.com"), "example.com");
        assert_eq!(registrable_domain("www.example.com"), "example.com");
        assert_eq!(registrable_domain(".ads.doubleclick.net"), "doubleclick.net");
        assert_eq!(registrable_domain("shop.example.co.uk"), "example.co.uk");
        assert_eq!(registrable_domain("WWW.Example.COM."), "example.com");
        assert_eq!(registrable_domain("10.0.0.1"), "10.0.0.1");
        assert_eq!(registrable_domain("localhost"), "localhost");
    }

    #[test]
    fn test_regulation_parse() {
        assert_eq!("dpdp".parse::<Regulation>().ok(), Some(Regulation::Dpdp));
        assert_eq!(" GDPR ".parse::<Regulation>().ok(), Some(Regulation::Gdpr));
        assert!("ccpa".parse::<Regulation>().is_err());
    }

    #[test]
    fn test_regulation_serialization() {
        let json = serde_json::to_string(&Regulation::Gdpr).expect("serialize regulation");
        assert_eq!(json, "\"gdpr\"");
        assert_eq!(Regulation::default(), Regulation::Dpdp);
        assert_eq!(Regulation::Gdpr.to_string(), "GDPR");
    }
}
