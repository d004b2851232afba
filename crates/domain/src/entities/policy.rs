//! Keyword/domain safety policy and the filter that applies it

use std::collections::BTreeSet;

use aho_corasick::AhoCorasick;
use serde::{Deserialize, Serialize};
use url::Url;

use super::search_result::RawResult;
use crate::value_objects::FilterMode;

/// Keyword block-list and domain allow-list
///
/// Both sets may be empty, meaning no restriction of that kind. Entries are
/// normalized on construction: keywords are trimmed and lowercased, domains
/// additionally lose a leading `*.` or `.`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyConfig {
    blocked_keywords: BTreeSet<String>,
    allowed_domains: BTreeSet<String>,
}

/// Result of running the policy over a page of results
///
/// `blocked_count + passed.len()` always equals the input length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome {
    pub passed: Vec<RawResult>,
    pub blocked_count: usize,
}

impl PolicyConfig {
    /// Build a policy from keyword and domain collections
    #[must_use]
    pub fn new<K, D>(blocked_keywords: K, allowed_domains: D) -> Self
    where
        K: IntoIterator,
        K::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        Self {
            blocked_keywords: blocked_keywords
                .into_iter()
                .filter_map(|k| normalize_keyword(k.as_ref()))
                .collect(),
            allowed_domains: allowed_domains
                .into_iter()
                .filter_map(|d| normalize_domain(d.as_ref()))
                .collect(),
        }
    }

    /// Build a policy from comma-separated lists, as settings stores keep them
    #[must_use]
    pub fn from_lists(blocked_keywords: &str, allowed_domains: &str) -> Self {
        Self::new(blocked_keywords.split(','), allowed_domains.split(','))
    }

    /// A policy with no restrictions
    #[must_use]
    pub fn unrestricted() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn blocked_keywords(&self) -> &BTreeSet<String> {
        &self.blocked_keywords
    }

    #[must_use]
    pub const fn allowed_domains(&self) -> &BTreeSet<String> {
        &self.allowed_domains
    }

    /// Filter results under the given mode
    ///
    /// Relaxed mode skips every rule. Moderate and strict apply the same
    /// keyword and domain rules; they differ only in image moderation.
    /// Passed results keep their input order.
    #[must_use]
    pub fn apply(&self, results: Vec<RawResult>, mode: FilterMode) -> FilterOutcome {
        if !mode.enforces_policy() {
            return FilterOutcome {
                passed: results,
                blocked_count: 0,
            };
        }

        let matcher = KeywordMatcher::new(&self.blocked_keywords);
        let total = results.len();
        let passed: Vec<RawResult> = results
            .into_iter()
            .filter(|r| !matcher.matches(r) && self.domain_allowed(&r.url))
            .collect();

        FilterOutcome {
            blocked_count: total - passed.len(),
            passed,
        }
    }

    /// Whether a URL passes the domain allow-list
    ///
    /// An empty allow-list admits everything. Otherwise the host must equal
    /// an allowed domain or be a subdomain of one; URLs without a host fail.
    #[must_use]
    pub fn domain_allowed(&self, url: &str) -> bool {
        if self.allowed_domains.is_empty() {
            return true;
        }

        let Some(host) = Url::parse(url.trim())
            .ok()
            .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
        else {
            return false;
        };

        self.allowed_domains.iter().any(|domain| {
            host == *domain
                || host
                    .strip_suffix(domain.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }
}

enum KeywordMatcher<'a> {
    Empty,
    Automaton(AhoCorasick),
    Linear(&'a BTreeSet<String>),
}

impl<'a> KeywordMatcher<'a> {
    fn new(keywords: &'a BTreeSet<String>) -> Self {
        if keywords.is_empty() {
            return Self::Empty;
        }
        AhoCorasick::new(keywords).map_or(Self::Linear(keywords), Self::Automaton)
    }

    fn matches(&self, result: &RawResult) -> bool {
        let haystack =
            || format!("{} {} {}", result.title, result.snippet, result.url).to_lowercase();
        match self {
            Self::Empty => false,
            Self::Automaton(ac) => ac.is_match(&haystack()),
            Self::Linear(keywords) => {
                let haystack = haystack();
                keywords.iter().any(|k| haystack.contains(k.as_str()))
            },
        }
    }
}

fn normalize_keyword(raw: &str) -> Option<String> {
    let keyword = raw.trim().to_lowercase();
    (!keyword.is_empty()).then_some(keyword)
}

fn normalize_domain(raw: &str) -> Option<String> {
    let lowered = raw.trim().to_ascii_lowercase();
    let domain = lowered
        .strip_prefix("*.")
        .or_else(|| lowered.strip_prefix('.'))
        .unwrap_or(&lowered)
        .trim_end_matches('.');
    (!domain.is_empty()).then(|| domain.to_string())
}

/// Global safe-search settings as supplied by the settings collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeSearchSettings {
    /// Mode applied when a request carries no override
    pub default_mode: FilterMode,

    /// Keyword and domain rules
    pub policy: PolicyConfig,

    /// Whether completed searches are recorded by the history collaborator
    pub save_search_history: bool,
}
