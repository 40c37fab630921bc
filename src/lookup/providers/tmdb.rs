//! TMDB (The Movie Database) poster provider.
//!
//! Implements [`AssetProvider`] by querying the TMDB v3 movie search endpoint.
//!
//! Features:
//! - Token-bucket rate limiting at 4 requests / second via [`governor`].
//! - Optional `language` locales, queried in priority order by the chain.
//! - Confidence scoring to pick the best-matching result that has a poster.

use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use coverhound_common::AssetKind;
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{get_json, trim_base};
use crate::lookup::provider::{AssetProvider, LookupRequest};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/original";
const REQUESTS_PER_SECOND: u32 = 4;

// ---------------------------------------------------------------------------
// TMDB API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse {
    results: Vec<TmdbMovieSearchResult>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieSearchResult {
    title: Option<String>,
    original_title: Option<String>,
    poster_path: Option<String>,
}

// ---------------------------------------------------------------------------
// Provider implementation
// ---------------------------------------------------------------------------

/// TMDB poster provider.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use coverhound::lookup::providers::TmdbProvider;
///
/// let provider = TmdbProvider::new(
///     reqwest::Client::new(),
///     "your-api-key".into(),
///     None,
///     vec!["en-US".into()],
///     Duration::from_secs(8),
/// );
/// ```
pub struct TmdbProvider {
    client: Client,
    api_key: String,
    base_url: String,
    locales: Vec<String>,
    timeout: Duration,
    rate_limiter: governor::RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl TmdbProvider {
    /// Create a new TMDB provider.
    ///
    /// `locales` are TMDB `language` tags such as `"en-US"`; when empty no
    /// language parameter is sent.
    pub fn new(
        client: Client,
        api_key: String,
        base_url: Option<String>,
        locales: Vec<String>,
        timeout: Duration,
    ) -> Self {
        let quota = Quota::per_second(NonZeroU32::new(REQUESTS_PER_SECOND).unwrap_or(NonZeroU32::MIN));
        let rate_limiter = RateLimiter::direct(quota);

        Self {
            client,
            api_key,
            base_url: base_url.unwrap_or_else(|| TMDB_BASE_URL.to_string()),
            locales,
            timeout,
            rate_limiter,
        }
    }

    fn search_url(&self) -> String {
        format!("{}/search/movie", trim_base(&self.base_url))
    }

    /// Query string for a movie search. The API key only ever travels here.
    fn search_params<'a>(&'a self, query: &'a str, language: Option<&'a str>) -> Vec<(&'a str, &'a str)> {
        let mut params = vec![("api_key", self.api_key.as_str()), ("query", query)];
        if let Some(lang) = language {
            params.push(("language", lang));
        }
        params
    }

    /// Compute confidence score for a search result based on title similarity.
    fn confidence(query_title: &str, result_title: &str) -> f64 {
        if query_title == result_title {
            0.5
        } else if query_title.eq_ignore_ascii_case(result_title) {
            0.4
        } else if result_title
            .to_ascii_lowercase()
            .contains(&query_title.to_ascii_lowercase())
        {
            0.2
        } else {
            0.1
        }
    }
}

/// Convert a TMDB image path fragment to a full URL.
fn image_url(path: &str) -> String {
    format!("{TMDB_IMAGE_BASE}{path}")
}

/// Pick the poster of the best-scoring result; ties keep TMDB's relevance order.
fn best_poster(query: &str, results: Vec<TmdbMovieSearchResult>) -> Option<String> {
    let mut best: Option<(f64, String)> = None;
    for r in results {
        let Some(path) = r.poster_path.filter(|p| !p.is_empty()) else {
            continue;
        };
        let score = [r.title.as_deref(), r.original_title.as_deref()]
            .into_iter()
            .flatten()
            .map(|t| TmdbProvider::confidence(query, t))
            .fold(0.0, f64::max);
        if best.as_ref().map_or(true, |(s, _)| score > *s) {
            best = Some((score, path));
        }
    }
    best.map(|(_, path)| image_url(&path))
}

#[async_trait]
impl AssetProvider for TmdbProvider {
    fn id(&self) -> &str {
        "tmdb"
    }

    fn asset_kind(&self) -> AssetKind {
        AssetKind::Poster
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn locales(&self) -> &[String] {
        &self.locales
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn lookup(&self, request: &LookupRequest<'_>) -> anyhow::Result<Option<String>> {
        self.rate_limiter.until_ready().await;

        let params = self.search_params(request.candidate, request.locale);
        debug!(query = request.candidate, language = ?request.locale, "TMDB search movie");

        let body: Option<TmdbSearchResponse> = get_json(&self.client, &self.search_url(), &params).await?;
        Ok(body.and_then(|b| best_poster(request.candidate, b.results)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(base_url: Option<String>, api_key: &str) -> TmdbProvider {
        TmdbProvider::new(
            Client::new(),
            api_key.into(),
            base_url,
            Vec::new(),
            Duration::from_secs(5),
        )
    }

    #[test]
    fn confidence_prefers_closer_titles() {
        let exact = TmdbProvider::confidence("Heat", "Heat");
        let folded = TmdbProvider::confidence("heat", "Heat");
        let partial = TmdbProvider::confidence("Heat", "Heat Wave");
        let unrelated = TmdbProvider::confidence("Heat", "Ronin");
        assert!(exact > folded && folded > partial && partial > unrelated);
        assert!(unrelated > 0.0);
    }

    #[test]
    fn image_url_construction() {
        assert_eq!(
            image_url("/abc123.jpg"),
            "https://image.tmdb.org/t/p/original/abc123.jpg"
        );
    }

    #[test]
    fn search_request_construction() {
        let p = provider(None, "k");
        assert_eq!(p.search_url(), "https://api.themoviedb.org/3/search/movie");
        assert_eq!(
            p.search_params("La La Land", Some("ko-KR")),
            vec![("api_key", "k"), ("query", "La La Land"), ("language", "ko-KR")]
        );
        assert_eq!(p.search_params("Up", None), vec![("api_key", "k"), ("query", "Up")]);

        let mirrored = provider(Some("http://localhost:8080/3/".into()), "k");
        assert_eq!(mirrored.search_url(), "http://localhost:8080/3/search/movie");
    }

    #[test]
    fn best_poster_skips_results_without_posters() {
        let results = vec![
            TmdbMovieSearchResult {
                title: Some("Interstellar".into()),
                original_title: None,
                poster_path: None,
            },
            TmdbMovieSearchResult {
                title: Some("Interstellar Wars".into()),
                original_title: None,
                poster_path: Some("/wars.jpg".into()),
            },
            TmdbMovieSearchResult {
                title: Some("Interstellar".into()),
                original_title: None,
                poster_path: Some("/real.jpg".into()),
            },
        ];
        assert_eq!(
            best_poster("Interstellar", results).as_deref(),
            Some("https://image.tmdb.org/t/p/original/real.jpg")
        );
    }

    #[test]
    fn unavailable_without_api_key() {
        assert!(provider(None, "k").is_available());
        assert!(!provider(None, "").is_available());
        assert_eq!(provider(None, "k").asset_kind(), AssetKind::Poster);
    }

    #[tokio::test]
    async fn lookup_against_mock() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .and(query_param("query", "Interstellar"))
            .and(query_param("api_key", "key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [
                    { "title": "Interstellar", "original_title": "Interstellar", "poster_path": "/gEU2QniE6E77NI6lCU6MxlNBvIx.jpg" }
                ]
            })))
            .mount(&server)
            .await;

        let p = provider(Some(server.uri()), "key");
        let url = p.lookup(&LookupRequest::new("Interstellar")).await.unwrap();
        assert_eq!(
            url.as_deref(),
            Some("https://image.tmdb.org/t/p/original/gEU2QniE6E77NI6lCU6MxlNBvIx.jpg")
        );
    }

    #[tokio::test]
    async fn empty_results_and_errors_are_misses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("query", "Nothing"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "results": [] })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("query", "Limited"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let p = provider(Some(server.uri()), "key");
        assert!(!p.resolve(&LookupRequest::new("Nothing")).await.found);
        assert!(!p.resolve(&LookupRequest::new("Limited")).await.found);
    }

    #[tokio::test]
    async fn lookup_sends_encoded_query_and_language() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .and(query_param("query", "Tom & Jerry"))
            .and(query_param("language", "ko-KR"))
            .and(query_param("api_key", "a+b/c"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [{ "title": "Tom & Jerry", "poster_path": "/tj.jpg" }]
            })))
            .mount(&server)
            .await;

        let p = provider(Some(server.uri()), "a+b/c");
        let url = p
            .lookup(&LookupRequest {
                locale: Some("ko-KR"),
                ..LookupRequest::new("Tom & Jerry")
            })
            .await
            .unwrap();
        assert_eq!(url.as_deref(), Some("https://image.tmdb.org/t/p/original/tj.jpg"));
    }

    #[tokio::test]
    async fn failed_lookup_does_not_reveal_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let p = provider(Some(server.uri()), "SUPERSECRET");
        let err = p.lookup(&LookupRequest::new("Heat")).await.unwrap_err();

        assert!(!format!("{err:#}").contains("SUPERSECRET"));
        assert!(!format!("{err:?}").contains("SUPERSECRET"));
        assert!(err
            .downcast_ref::<coverhound_common::Error>()
            .is_some_and(|e| e.is_transient()));
    }
}
