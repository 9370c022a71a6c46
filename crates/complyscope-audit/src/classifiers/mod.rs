//! One classifier per requirement area.
//!
//! Classifiers are pure: they read a slice of the signal bundle plus their
//! rules from the checklist and return a [`Finding`](crate::Finding). The
//! citation prefix of every message is passed in by the pipeline.

pub mod consent;
pub mod grievance;
pub mod headers;
pub mod keywords;
pub mod notice;
pub mod rights;
pub mod transfers;

/// Keywords from `keywords` that occur in `haystack_lower`, in checklist order.
///
/// `haystack_lower` must already be lowercased; keywords are lowercased here.
pub(crate) fn matched_keywords(haystack_lower: &str, keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .filter(|k| haystack_lower.contains(&k.to_lowercase()))
        .cloned()
        .collect()
}

/// Whether any of `keywords` occurs in `haystack_lower`.
pub(crate) fn contains_any(haystack_lower: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .any(|k| haystack_lower.contains(&k.to_lowercase()))
}
