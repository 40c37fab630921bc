//! Trait definition and types for asset providers.
//!
//! This module defines the [`AssetProvider`] trait that every lookup backend
//! (Wikipedia, TMDB, Google Books, Open Library, ...) implements, along with
//! the request and result types exchanged with the provider chain.

use std::time::Duration;

use async_trait::async_trait;
use coverhound_common::AssetKind;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default per-call time budget for a provider request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

// ---------------------------------------------------------------------------
// Request / result
// ---------------------------------------------------------------------------

/// One attempt against one provider: a single candidate key, optionally
/// scoped to a locale endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupRequest<'a> {
    /// Candidate key, already in the provider's query form.
    pub candidate: &'a str,
    /// Author of the queried book, if any.
    pub author: Option<&'a str>,
    /// Locale endpoint to query (e.g. `"en"`), for locale-sensitive providers.
    pub locale: Option<&'a str>,
}

impl<'a> LookupRequest<'a> {
    /// A request for `candidate` with no author or locale.
    pub fn new(candidate: &'a str) -> Self {
        Self {
            candidate,
            author: None,
            locale: None,
        }
    }
}

/// Outcome of a single provider attempt.
///
/// `found == false` is a definite miss for that candidate; the chain never
/// asks the same provider again for it within one resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderResult {
    /// Whether the provider produced a URL.
    pub found: bool,
    /// The resolved asset URL, present iff `found`.
    pub url: Option<String>,
    /// Identifier of the provider that answered.
    pub provider_id: String,
}

impl ProviderResult {
    /// A hit from `provider_id`.
    pub fn hit(provider_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            found: true,
            url: Some(url.into()),
            provider_id: provider_id.into(),
        }
    }

    /// A miss from `provider_id`.
    pub fn miss(provider_id: impl Into<String>) -> Self {
        Self {
            found: false,
            url: None,
            provider_id: provider_id.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Async trait that all asset providers must implement.
///
/// Each provider wraps a single external API and exposes one capability:
/// turn a candidate key into an asset URL or a miss. Providers are shared
/// across tasks behind an `Arc`.
#[async_trait]
pub trait AssetProvider: Send + Sync {
    /// Short, lowercase identifier for this provider (e.g. `"wikipedia"`).
    fn id(&self) -> &str;

    /// The asset kind this provider can resolve.
    fn asset_kind(&self) -> AssetKind;

    /// Returns `true` when the provider is configured and ready to serve
    /// requests. Unavailable providers are skipped by the chain.
    fn is_available(&self) -> bool {
        true
    }

    /// Locale endpoints to query, highest priority first. Empty means the
    /// provider is not locale-sensitive.
    fn locales(&self) -> &[String] {
        &[]
    }

    /// Upper bound for one [`lookup`](Self::lookup) call.
    fn timeout(&self) -> Duration {
        DEFAULT_TIMEOUT
    }

    /// Issue one outbound request for `request`.
    ///
    /// `Ok(None)` is a clean miss. Errors cover transport failures, HTTP
    /// error statuses and unexpected bodies.
    async fn lookup(&self, request: &LookupRequest<'_>) -> anyhow::Result<Option<String>>;

    /// Run [`lookup`](Self::lookup) and fold every failure into a miss.
    async fn resolve(&self, request: &LookupRequest<'_>) -> ProviderResult {
        match self.lookup(request).await {
            Ok(Some(url)) => ProviderResult::hit(self.id(), url),
            Ok(None) => ProviderResult::miss(self.id()),
            Err(e) => {
                debug!(
                    provider = self.id(),
                    candidate = request.candidate,
                    locale = ?request.locale,
                    error = %e,
                    transient = e
                        .downcast_ref::<coverhound_common::Error>()
                        .is_some_and(|e| e.is_transient()),
                    "Provider lookup failed; treating as miss"
                );
                ProviderResult::miss(self.id())
            }
        }
    }
}
