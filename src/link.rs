// src/link.rs
// =============================================================================
// Link normalization and crawl scoping.
//
// Resolution policy (deliberately simple, changing it changes which links get checked):
// - An href starting with "http" is taken as-is
// - Anything else is appended to the *seed* URL by plain string
//   concatenation, not RFC 3986 joining against the current page
//
// Scope policy:
// - With external links included, every link is in scope
// - Otherwise a link is in scope when its string contains the seed host as
//   typed (substring check, not hostname equality)
// =============================================================================

use crate::error::{CrawlError, Result};
use serde::Serialize;
use std::fmt;
use url::Url;

/// A normalized absolute URL string; the unit of crawl and verify work.
///
/// Two links are the same link exactly when their strings are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Link(String);

impl Link {
    /// Resolves a raw anchor href against the seed URL.
    ///
    /// Examples with seed "http://example.com":
    ///   "/a"                  -> "http://example.com/a"
    ///   "https://other.com/x" -> "https://other.com/x"
    ///   "about"               -> "http://example.comabout"
    pub fn resolve(href: &str, seed: &str) -> Link {
        if href.starts_with("http") {
            Link(href.to_string())
        } else {
            Link(format!("{}{}", seed, href))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Link {
    fn from(s: &str) -> Self {
        Link(s.to_string())
    }
}

/// Decides which discovered links are eligible for verification.
///
/// Built once at startup and never changed during the run.
#[derive(Debug, Clone)]
pub struct CrawlScope {
    seed_url: String,
    /// Normalized host (lowercase, punycode), what the fetcher compares against
    host: String,
    /// Host exactly as typed in the seed, what links are matched against
    filter_host: String,
    include_external: bool,
}

impl CrawlScope {
    /// Parses the seed and extracts its host.
    ///
    /// Fails on a malformed seed or one without a host (e.g. "mailto:x").
    pub fn new(seed_url: &str, include_external: bool) -> Result<Self> {
        let parsed = Url::parse(seed_url).map_err(|source| CrawlError::InvalidSeed {
            url: seed_url.to_string(),
            source,
        })?;

        let host = parsed
            .host_str()
            .ok_or_else(|| CrawlError::MissingHost(seed_url.to_string()))?
            .to_string();

        // Resolved links are built from the raw seed text, so the substring
        // check must use the host as written there
        let filter_host = raw_host(seed_url)
            .filter(|h| !h.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| host.clone());

        Ok(Self {
            seed_url: seed_url.to_string(),
            host,
            filter_host,
            include_external,
        })
    }

    pub fn seed_url(&self) -> &str {
        &self.seed_url
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn filter_host(&self) -> &str {
        &self.filter_host
    }

    pub fn include_external(&self) -> bool {
        self.include_external
    }

    /// The fetch layer's domain allow-list: host-only unless external links are allowed.
    pub fn allowed_domains(&self) -> Option<Vec<String>> {
        if self.include_external {
            None
        } else {
            Some(vec![self.host.clone()])
        }
    }

    /// Normalizes an href and returns it only if it is in scope.
    pub fn admit(&self, href: &str) -> Option<Link> {
        let link = Link::resolve(href, &self.seed_url);
        self.accepts(&link).then_some(link)
    }

    pub fn accepts(&self, link: &Link) -> bool {
        self.include_external || link.as_str().contains(&self.filter_host)
    }
}

// The host slice of "scheme://user@host:port/path", unmodified.
// Brackets around an IPv6 literal are dropped, the port only if it is numeric.
fn raw_host(seed: &str) -> Option<&str> {
    let (_, rest) = seed.split_once("://")?;
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, h)| h);

    if let Some(bracketed) = host_port.strip_prefix('[') {
        return bracketed.split_once(']').map(|(h, _)| h);
    }

    match host_port.rsplit_once(':') {
        Some((host, port)) if port.bytes().all(|b| b.is_ascii_digit()) => Some(host),
        _ => Some(host_port),
    }
}
