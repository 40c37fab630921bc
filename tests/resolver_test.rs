//! Resolution tests against in-process fake providers.

mod common;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use common::{resolver_with, FakeProvider, TEST_POSTER_PLACEHOLDER};
use coverhound::config::ChainMode;
use coverhound::lookup::{ProviderChain, ResolutionSource, Resolver, ResultCache};
use coverhound_common::{AssetKind, Query};

// ---------------------------------------------------------------------------
// Candidate handling
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_title_resolves_to_placeholder() {
    let provider = Arc::new(FakeProvider::new("wiki").hit("", "https://wrong.example/empty.jpg"));
    let resolver = resolver_with(&[provider.clone()]);

    let url = resolver.resolve("", None, None, AssetKind::Poster).await;

    assert_eq!(url, TEST_POSTER_PLACEHOLDER);
    assert_eq!(provider.call_count(), 0);

    // Idempotent on repeat.
    let again = resolver.resolve("", None, None, AssetKind::Poster).await;
    assert_eq!(again, TEST_POSTER_PLACEHOLDER);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn no_candidate_is_asked_twice_of_one_provider() {
    let provider = Arc::new(FakeProvider::new("wiki").locales(&["en"]));
    let resolver = resolver_with(&[provider.clone()]);

    resolver
        .resolve("WALL-E", None, None, AssetKind::Poster)
        .await;

    let calls = provider.calls();
    let unique: HashSet<_> = calls.iter().collect();
    assert!(!calls.is_empty());
    assert_eq!(unique.len(), calls.len(), "duplicate calls: {calls:?}");
}

#[test]
fn la_la_land_candidates() {
    let resolver = Resolver::with_cache(Arc::new(ResultCache::new()));
    let candidates = resolver.candidates(&Query::poster("La La Land"));

    assert_eq!(candidates[0], "La La Land");
    assert!(candidates.iter().all(|c| !c.is_empty()));
    let unique: HashSet<_> = candidates.iter().collect();
    assert_eq!(unique.len(), candidates.len());
    assert!(candidates.contains(&"La_La_Land".to_string()));
}

#[tokio::test]
async fn locale_hint_is_tried_first() {
    let provider = Arc::new(FakeProvider::new("wiki"));
    let resolver = resolver_with(&[provider.clone()]);

    resolver
        .resolve("기생충", None, Some("Parasite_(2019_film)"), AssetKind::Poster)
        .await;

    assert_eq!(provider.calls()[0], "Parasite_(2019_film)");
    assert_eq!(provider.calls()[1], "기생충");
}

// ---------------------------------------------------------------------------
// Chain ordering
// ---------------------------------------------------------------------------

#[tokio::test]
async fn second_provider_answers_after_first_exhausts() {
    let first = Arc::new(FakeProvider::new("first"));
    let second = Arc::new(FakeProvider::new("second").hit("Interstellar", "https://example/interstellar.jpg"));
    let resolver = resolver_with(&[first.clone(), second.clone()]);

    let resolution = resolver.resolve_detailed(&Query::poster("Interstellar")).await;

    assert_eq!(resolution.url, "https://example/interstellar.jpg");
    assert_matches!(resolution.source, ResolutionSource::Provider { ref id } if id == "second");
    assert!(!resolution.from_cache);

    // Provider 1 saw every candidate before provider 2 was consulted.
    let candidates = resolver.candidates(&Query::poster("Interstellar"));
    assert_eq!(first.calls(), candidates);
    assert_eq!(second.calls(), vec!["Interstellar"]);
}

#[tokio::test]
async fn locales_outer_candidates_inner() {
    let provider = Arc::new(FakeProvider::new("wiki").locales(&["en", "ko"]));
    let mut chain = ProviderChain::new();
    chain.register(provider.clone());

    let result = chain
        .resolve_any(&["A".to_string(), "B".to_string()], None)
        .await;

    assert!(!result.found);
    assert_eq!(provider.calls(), vec!["en/A", "en/B", "ko/A", "ko/B"]);
}

#[tokio::test]
async fn concurrent_chain_keeps_priority() {
    let slow_primary = Arc::new(
        FakeProvider::new("primary")
            .hit("Interstellar", "https://primary.example/interstellar.jpg")
            .delay(Duration::from_millis(50)),
    );
    let fast_secondary =
        Arc::new(FakeProvider::new("secondary").hit("Interstellar", "https://secondary.example/interstellar.jpg"));

    let mut chain = ProviderChain::with_mode(ChainMode::Concurrent);
    chain.register(slow_primary);
    chain.register(fast_secondary);
    let resolver = Resolver::with_cache(Arc::new(ResultCache::new())).with_chain(AssetKind::Poster, chain);

    let url = resolver
        .resolve("Interstellar", None, None, AssetKind::Poster)
        .await;
    assert_eq!(url, "https://primary.example/interstellar.jpg");
}

// ---------------------------------------------------------------------------
// Caching
// ---------------------------------------------------------------------------

#[tokio::test]
async fn interstellar_is_cached_after_first_resolution() {
    let first = Arc::new(FakeProvider::new("first"));
    let second = Arc::new(FakeProvider::new("second").hit("Interstellar", "https://example/interstellar.jpg"));
    let resolver = resolver_with(&[first.clone(), second.clone()]);

    let url = resolver
        .resolve("Interstellar", None, None, AssetKind::Poster)
        .await;
    assert_eq!(url, "https://example/interstellar.jpg");

    let before = (first.call_count(), second.call_count());
    let resolution = resolver.resolve_detailed(&Query::poster("interstellar ")).await;

    assert_eq!(resolution.url, "https://example/interstellar.jpg");
    assert_matches!(resolution.source, ResolutionSource::Cache);
    assert!(resolution.from_cache);
    assert_eq!((first.call_count(), second.call_count()), before);
}

#[tokio::test]
async fn unknown_film_resolves_to_placeholder_and_stays_cached() {
    let first = Arc::new(FakeProvider::new("first").locales(&["en", "ko"]));
    let second = Arc::new(FakeProvider::new("second"));
    let resolver = resolver_with(&[first.clone(), second.clone()]);

    let url = resolver
        .resolve("Unknown Obscure Film 1923", None, None, AssetKind::Poster)
        .await;
    assert_eq!(url, TEST_POSTER_PLACEHOLDER);

    let calls = first.call_count() + second.call_count();
    assert!(calls > 0);

    let resolution = resolver
        .resolve_detailed(&Query::poster("Unknown Obscure Film 1923"))
        .await;
    assert_eq!(resolution.url, TEST_POSTER_PLACEHOLDER);
    assert_matches!(resolution.source, ResolutionSource::Placeholder);
    assert!(resolution.from_cache);
    assert_eq!(first.call_count() + second.call_count(), calls);
}

#[tokio::test]
async fn kinds_and_authors_are_cached_separately() {
    let poster = Arc::new(FakeProvider::new("poster").hit("Dune", "https://example/dune-poster.jpg"));
    let book = Arc::new(
        FakeProvider::new("book")
            .kind(AssetKind::BookCover)
            .hit("Dune", "https://example/dune-cover.jpg"),
    );

    let mut posters = ProviderChain::new();
    posters.register(poster.clone());
    let mut books = ProviderChain::new();
    books.register(book.clone());
    let resolver = Resolver::with_cache(Arc::new(ResultCache::new()))
        .with_chain(AssetKind::Poster, posters)
        .with_chain(AssetKind::BookCover, books);

    let poster_url = resolver.resolve("Dune", None, None, AssetKind::Poster).await;
    let cover_url = resolver
        .resolve("Dune", Some("Frank Herbert"), None, AssetKind::BookCover)
        .await;
    let other_author = resolver
        .resolve("Dune", Some("Someone Else"), None, AssetKind::BookCover)
        .await;

    assert_eq!(poster_url, "https://example/dune-poster.jpg");
    assert_eq!(cover_url, "https://example/dune-cover.jpg");
    assert_eq!(other_author, "https://example/dune-cover.jpg");
    assert_eq!(resolver.cache().len(), 3);
    assert_eq!(book.call_count(), 2);
}

#[tokio::test]
async fn shared_cache_serves_every_resolver() {
    let cache = Arc::new(ResultCache::new());
    let provider = Arc::new(FakeProvider::new("wiki").hit("Arrival", "https://example/arrival.jpg"));

    let mut chain = ProviderChain::new();
    chain.register(provider.clone());
    let warm = Resolver::with_cache(cache.clone()).with_chain(AssetKind::Poster, chain);
    warm.resolve("Arrival", None, None, AssetKind::Poster).await;

    let cold = Resolver::with_cache(cache);
    let url = cold.resolve("Arrival", None, None, AssetKind::Poster).await;

    assert_eq!(url, "https://example/arrival.jpg");
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn concurrent_resolutions_agree() {
    let provider = Arc::new(FakeProvider::new("wiki").hit("Heat", "https://example/heat.jpg"));
    let resolver = Arc::new(resolver_with(&[provider]));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let resolver = resolver.clone();
            tokio::spawn(async move { resolver.resolve("Heat", None, None, AssetKind::Poster).await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), "https://example/heat.jpg");
    }
    assert_eq!(resolver.cache().len(), 1);
}

// ---------------------------------------------------------------------------
// Deadline
// ---------------------------------------------------------------------------

#[tokio::test]
async fn elapsed_deadline_returns_placeholder_without_caching() {
    let slow = Arc::new(
        FakeProvider::new("slow")
            .hit("Solaris", "https://example/solaris.jpg")
            .delay(Duration::from_millis(500)),
    );
    let resolver = resolver_with(&[slow]).with_deadline(Duration::from_millis(50));

    let url = resolver.resolve("Solaris", None, None, AssetKind::Poster).await;

    assert_eq!(url, TEST_POSTER_PLACEHOLDER);
    assert!(resolver.cache().is_empty());
}
