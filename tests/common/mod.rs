//! Shared test harness for integration tests.
//!
//! Provides [`FakeProvider`], an in-process [`AssetProvider`] that answers
//! from a fixed table and records every call it receives, plus helpers for
//! assembling a [`Resolver`] around fakes.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use coverhound::lookup::{AssetProvider, LookupRequest, ProviderChain, Resolver, ResultCache};
use coverhound_common::AssetKind;

/// Placeholder used by resolvers built with [`resolver_with`].
pub const TEST_POSTER_PLACEHOLDER: &str = "https://placeholder.example/poster.png";

/// A provider whose answers come from a table keyed by candidate.
pub struct FakeProvider {
    id: String,
    kind: AssetKind,
    locales: Vec<String>,
    hits: HashMap<String, String>,
    delay: Duration,
    calls: Mutex<Vec<String>>,
}

impl FakeProvider {
    /// A poster provider that misses everything.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: AssetKind::Poster,
            locales: Vec::new(),
            hits: HashMap::new(),
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer `url` when asked for `candidate` (in any locale).
    pub fn hit(mut self, candidate: &str, url: &str) -> Self {
        self.hits.insert(candidate.to_string(), url.to_string());
        self
    }

    /// Serve `kind` instead of posters.
    pub fn kind(mut self, kind: AssetKind) -> Self {
        self.kind = kind;
        self
    }

    /// Query these locale endpoints, in order.
    pub fn locales(mut self, locales: &[&str]) -> Self {
        self.locales = locales.iter().map(|l| l.to_string()).collect();
        self
    }

    /// Sleep this long before answering each call.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Every call so far, as `candidate` or `locale/candidate`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of lookups issued so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl AssetProvider for FakeProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn asset_kind(&self) -> AssetKind {
        self.kind
    }

    fn locales(&self) -> &[String] {
        &self.locales
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(1)
    }

    async fn lookup(&self, request: &LookupRequest<'_>) -> anyhow::Result<Option<String>> {
        let label = match request.locale {
            Some(locale) => format!("{locale}/{}", request.candidate),
            None => request.candidate.to_string(),
        };
        self.calls.lock().unwrap().push(label);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        Ok(self.hits.get(request.candidate).cloned())
    }
}

/// A poster resolver whose chain is `providers` in the given order.
pub fn resolver_with(providers: &[Arc<FakeProvider>]) -> Resolver {
    let mut chain = ProviderChain::new();
    for provider in providers {
        chain.register(provider.clone());
    }

    Resolver::with_cache(Arc::new(ResultCache::new()))
        .with_placeholder(AssetKind::Poster, TEST_POSTER_PLACEHOLDER)
        .with_chain(AssetKind::Poster, chain)
}
