//! Media type patterns for upload accept filters.

use std::fmt;
use std::str::FromStr;

/// A `type/subtype` pattern where either part may be `*`.
///
/// Matching is case-insensitive and ignores media type parameters
/// (`video/mp4; codecs=avc1` matches `video/mp4`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPattern {
    top: Option<String>,
    sub: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid media type pattern '{0}': expected type/subtype")]
pub struct MediaPatternError(pub String);

impl MediaPattern {
    pub fn any() -> Self {
        Self {
            top: None,
            sub: None,
        }
    }

    pub fn matches(&self, media_type: &str) -> bool {
        let essence = media_type.split(';').next().unwrap_or_default().trim();
        let Some((top, sub)) = essence.split_once('/') else {
            return false;
        };
        let part_matches = |pattern: &Option<String>, value: &str| match pattern {
            None => true,
            Some(expected) => expected.eq_ignore_ascii_case(value),
        };
        !top.is_empty()
            && !sub.is_empty()
            && part_matches(&self.top, top)
            && part_matches(&self.sub, sub)
    }
}

impl FromStr for MediaPattern {
    type Err = MediaPatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (top, sub) = trimmed
            .split_once('/')
            .ok_or_else(|| MediaPatternError(s.to_string()))?;
        let valid_part = |part: &str| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || "*+-.".contains(c))
        };
        if !valid_part(top) || !valid_part(sub) || (top == "*" && sub != "*") {
            return Err(MediaPatternError(s.to_string()));
        }
        let wildcard = |part: &str| (part != "*").then(|| part.to_ascii_lowercase());
        Ok(Self {
            top: wildcard(top),
            sub: wildcard(sub),
        })
    }
}

impl fmt::Display for MediaPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}",
            self.top.as_deref().unwrap_or("*"),
            self.sub.as_deref().unwrap_or("*")
        )
    }
}
