//! Provider chain: ordered [`AssetProvider`]s for one asset kind.
//!
//! The chain walks providers in registration order. Within a provider,
//! locales are the outer loop and candidates the inner loop, so a preferred
//! language edition is exhausted before the next one is tried. The first hit
//! short-circuits.

use std::sync::Arc;

use coverhound_common::Error;
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::debug;

use super::provider::{AssetProvider, LookupRequest, ProviderResult};
use crate::config::ChainMode;

/// Provider id reported when every provider missed.
pub const CHAIN_ID: &str = "chain";

/// An ordered list of providers for a single asset kind.
///
/// # Examples
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use coverhound::lookup::ProviderChain;
///
/// let mut chain = ProviderChain::new();
/// chain.register(Arc::new(my_provider));
///
/// let result = chain.resolve_any(&candidates, None).await;
/// ```
pub struct ProviderChain {
    providers: Vec<Arc<dyn AssetProvider>>,
    mode: ChainMode,
}

impl ProviderChain {
    /// Create an empty sequential chain.
    pub fn new() -> Self {
        Self::with_mode(ChainMode::Sequential)
    }

    /// Create an empty chain with the given scheduling mode.
    pub fn with_mode(mode: ChainMode) -> Self {
        Self {
            providers: Vec::new(),
            mode,
        }
    }

    /// Append a provider; later registrations have lower priority.
    pub fn register(&mut self, provider: Arc<dyn AssetProvider>) {
        self.providers.push(provider);
    }

    /// Scheduling mode of this chain.
    pub fn mode(&self) -> ChainMode {
        self.mode
    }

    /// All registered providers, in priority order.
    pub fn providers(&self) -> &[Arc<dyn AssetProvider>] {
        &self.providers
    }

    /// Providers that are currently available, in priority order.
    pub fn available(&self) -> Vec<&dyn AssetProvider> {
        self.providers
            .iter()
            .filter(|p| p.is_available())
            .map(|p| p.as_ref())
            .collect()
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether no provider has been registered.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Try every available provider against `candidates` and return the
    /// first hit, or a miss attributed to [`CHAIN_ID`].
    pub async fn resolve_any(&self, candidates: &[String], author: Option<&str>) -> ProviderResult {
        let available = self.available();

        match self.mode {
            ChainMode::Sequential => {
                for provider in available {
                    let result = run_provider(provider, candidates, author).await;
                    if result.found {
                        return result;
                    }
                }
                ProviderResult::miss(CHAIN_ID)
            }
            ChainMode::Concurrent => race_by_priority(available, candidates, author).await,
        }
    }
}

impl Default for ProviderChain {
    fn default() -> Self {
        Self::new()
    }
}

/// One provider's full pass: locales outer, candidates inner.
async fn run_provider(
    provider: &dyn AssetProvider,
    candidates: &[String],
    author: Option<&str>,
) -> ProviderResult {
    let locales: Vec<Option<&str>> = if provider.locales().is_empty() {
        vec![None]
    } else {
        provider.locales().iter().map(|l| Some(l.as_str())).collect()
    };

    for locale in locales {
        for candidate in candidates {
            if candidate.trim().is_empty() {
                continue;
            }

            let request = LookupRequest {
                candidate: candidate.as_str(),
                author,
                locale,
            };

            let result = match tokio::time::timeout(provider.timeout(), provider.resolve(&request)).await {
                Ok(result) => result,
                Err(_) => {
                    let error = Error::timeout(provider.timeout());
                    debug!(
                        provider = provider.id(),
                        candidate = candidate.as_str(),
                        error = %error,
                        transient = error.is_transient(),
                        "Provider call timed out; treating as miss"
                    );
                    ProviderResult::miss(provider.id())
                }
            };

            if result.found {
                debug!(
                    provider = provider.id(),
                    candidate = candidate.as_str(),
                    locale = ?locale,
                    "Provider hit"
                );
                return result;
            }
        }
    }

    ProviderResult::miss(provider.id())
}

/// Run every provider's pass concurrently and return the hit of the
/// highest-priority provider whose predecessors all missed. Pending passes
/// are dropped once the answer is known.
async fn race_by_priority(
    providers: Vec<&dyn AssetProvider>,
    candidates: &[String],
    author: Option<&str>,
) -> ProviderResult {
    let mut pending: FuturesUnordered<_> = providers
        .into_iter()
        .enumerate()
        .map(|(idx, provider)| async move { (idx, run_provider(provider, candidates, author).await) })
        .collect();

    let mut slots: Vec<Option<ProviderResult>> = vec![None; pending.len()];
    let mut next = 0;

    while let Some((idx, result)) = pending.next().await {
        slots[idx] = Some(result);

        while let Some(Some(result)) = slots.get(next) {
            if result.found {
                return result.clone();
            }
            next += 1;
        }
    }

    ProviderResult::miss(CHAIN_ID)
}
