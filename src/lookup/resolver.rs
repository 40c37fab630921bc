//! Resolution orchestrator.
//!
//! The [`Resolver`] ties the pipeline together: normalize the query, consult
//! the [`ResultCache`], generate candidates, walk the [`ProviderChain`] for
//! the query's asset kind, record the outcome, and fall back to the
//! configured placeholder. It never returns an error.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use coverhound_common::{AssetKind, Query};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::cache::ResultCache;
use super::candidates::{self, CandidateRules};
use super::chain::ProviderChain;
use super::providers::build_provider;
use crate::config::{AssetConfig, Config};

/// Where a resolved URL came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResolutionSource {
    /// A provider answered during this call.
    Provider { id: String },
    /// A previously resolved URL was served from the cache.
    Cache,
    /// Nothing resolved; the placeholder was substituted.
    Placeholder,
}

/// Detailed outcome of one resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Displayable URL (real asset or placeholder).
    pub url: String,
    /// Who produced the URL: a provider, the cache, or the placeholder fallback.
    pub source: ResolutionSource,
    /// Whether the outcome was read from the cache without network work.
    pub from_cache: bool,
}

/// Resolves queries to displayable asset URLs.
///
/// # Example
///
/// ```rust,ignore
/// let resolver = Resolver::from_config(&config);
/// let url = resolver
///     .resolve("Interstellar", None, None, AssetKind::Poster)
///     .await;
/// ```
pub struct Resolver {
    chains: HashMap<AssetKind, ProviderChain>,
    rules: HashMap<AssetKind, CandidateRules>,
    placeholders: HashMap<AssetKind, String>,
    cache: Arc<ResultCache>,
    deadline: Option<Duration>,
}

impl Resolver {
    /// Create a resolver with no providers, default candidate rules and
    /// default placeholders, backed by `cache`.
    pub fn with_cache(cache: Arc<ResultCache>) -> Self {
        let mut rules = HashMap::new();
        let mut placeholders = HashMap::new();
        for kind in AssetKind::ALL {
            rules.insert(kind, CandidateRules::defaults_for(kind));
            placeholders.insert(kind, default_section(kind).placeholder);
        }

        Self {
            chains: HashMap::new(),
            rules,
            placeholders,
            cache,
            deadline: None,
        }
    }

    /// Build a resolver, its provider chains and its cache from `config`.
    pub fn from_config(config: &Config) -> Self {
        let cache = match config.cache.max_entries {
            Some(max) => ResultCache::with_capacity(max),
            None => ResultCache::new(),
        };
        Self::from_config_with_cache(config, Arc::new(cache))
    }

    /// Like [`from_config`](Self::from_config) but with a caller-owned cache.
    pub fn from_config_with_cache(config: &Config, cache: Arc<ResultCache>) -> Self {
        let mut resolver = Self::with_cache(cache);
        resolver.deadline = config.resolver.deadline_secs.map(Duration::from_secs);

        for kind in AssetKind::ALL {
            let section = config.asset(kind);
            let mut chain = ProviderChain::with_mode(config.resolver.mode);
            for provider_config in &section.providers {
                if let Some(provider) = build_provider(provider_config, &config.user_agent) {
                    chain.register(provider);
                }
            }

            debug!(kind = %kind, providers = chain.len(), "Configured provider chain");
            resolver = resolver
                .with_rules(kind, CandidateRules::from(section))
                .with_placeholder(kind, section.placeholder.clone())
                .with_chain(kind, chain);
        }

        resolver
    }

    /// Use `chain` for `kind`, replacing any previous chain.
    #[must_use]
    pub fn with_chain(mut self, kind: AssetKind, chain: ProviderChain) -> Self {
        self.chains.insert(kind, chain);
        self
    }

    /// Use `rules` when generating candidates for `kind`.
    #[must_use]
    pub fn with_rules(mut self, kind: AssetKind, rules: CandidateRules) -> Self {
        self.rules.insert(kind, rules);
        self
    }

    /// Use `url` as the fallback asset for `kind`.
    #[must_use]
    pub fn with_placeholder(mut self, kind: AssetKind, url: impl Into<String>) -> Self {
        self.placeholders.insert(kind, url.into());
        self
    }

    /// Bound each resolution's total provider time.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// The cache shared by this resolver.
    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    /// The provider chain configured for `kind`, if any.
    pub fn chain(&self, kind: AssetKind) -> Option<&ProviderChain> {
        self.chains.get(&kind)
    }

    /// Fallback URL for `kind`.
    pub fn placeholder(&self, kind: AssetKind) -> &str {
        self.placeholders
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Candidate keys that would be tried for `query`.
    pub fn candidates(&self, query: &Query) -> Vec<String> {
        match self.rules.get(&query.asset_kind) {
            Some(rules) => candidates::generate(query, rules),
            None => candidates::generate(query, &CandidateRules::default()),
        }
    }

    /// Resolve from loose arguments; always returns a displayable URL.
    pub async fn resolve(
        &self,
        title: &str,
        author: Option<&str>,
        locale_hint: Option<&str>,
        kind: AssetKind,
    ) -> String {
        let mut query = Query::new(title, kind);
        query.author = author.map(str::to_string);
        query.locale_hint = locale_hint.map(str::to_string);
        self.resolve_asset(&query).await
    }

    /// Resolve `query` to a displayable URL (asset or placeholder).
    pub async fn resolve_asset(&self, query: &Query) -> String {
        self.resolve_detailed(query).await.url
    }

    /// Resolve `query` and report where the URL came from.
    pub async fn resolve_detailed(&self, query: &Query) -> Resolution {
        let key = query.key();
        let kind = query.asset_kind;

        if let Some(entry) = self.cache.get(&key) {
            debug!(key = %key, negative = entry.is_negative(), "Resolution cache hit");
            return match entry.url {
                Some(url) => Resolution {
                    url,
                    source: ResolutionSource::Cache,
                    from_cache: true,
                },
                None => self.placeholder_resolution(kind, true),
            };
        }

        let Some(chain) = self.chains.get(&kind) else {
            info!(key = %key, "No provider chain for asset kind; using placeholder");
            self.cache.put(key, None);
            return self.placeholder_resolution(kind, false);
        };

        let candidates = self.candidates(query);
        debug!(key = %key, candidates = ?candidates, "Resolving asset");

        let lookup = chain.resolve_any(&candidates, query.author.as_deref());
        let result = match self.deadline {
            Some(deadline) => match tokio::time::timeout(deadline, lookup).await {
                Ok(result) => result,
                Err(_) => {
                    info!(
                        key = %key,
                        deadline_ms = deadline.as_millis() as u64,
                        "Resolution deadline elapsed; using placeholder without caching"
                    );
                    return self.placeholder_resolution(kind, false);
                }
            },
            None => lookup.await,
        };

        match result.url.filter(|_| result.found) {
            Some(url) => {
                info!(key = %key, provider = %result.provider_id, url = %url, "Resolved asset");
                self.cache.put(key, Some(url.clone()));
                Resolution {
                    url,
                    source: ResolutionSource::Provider {
                        id: result.provider_id,
                    },
                    from_cache: false,
                }
            }
            None => {
                info!(
                    key = %key,
                    candidates = candidates.len(),
                    "All providers missed; using placeholder"
                );
                self.cache.put(key, None);
                self.placeholder_resolution(kind, false)
            }
        }
    }

    fn placeholder_resolution(&self, kind: AssetKind, from_cache: bool) -> Resolution {
        Resolution {
            url: self.placeholder(kind).to_string(),
            source: ResolutionSource::Placeholder,
            from_cache,
        }
    }
}

fn default_section(kind: AssetKind) -> AssetConfig {
    match kind {
        AssetKind::BookCover => AssetConfig::default_books(),
        AssetKind::Poster => AssetConfig::default_posters(),
    }
}
