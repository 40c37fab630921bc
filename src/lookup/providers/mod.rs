//! Concrete asset provider implementations.
//!
//! Each submodule wraps a single external API and implements the
//! [`AssetProvider`](super::AssetProvider) trait. [`build_provider`] turns a
//! [`ProviderConfig`] entry into a ready adapter.

pub mod google_books;
pub mod open_library;
pub mod tmdb;
pub mod wikipedia;

pub use google_books::GoogleBooksProvider;
pub use open_library::OpenLibraryProvider;
pub use tmdb::TmdbProvider;
pub use wikipedia::WikipediaProvider;

use std::sync::Arc;
use std::time::Duration;

use coverhound_common::{Error, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::{ProviderConfig, ProviderType};

use super::provider::AssetProvider;

/// Create the adapter described by `config`, or `None` when it is disabled.
pub fn build_provider(config: &ProviderConfig, user_agent: &str) -> Option<Arc<dyn AssetProvider>> {
    if !config.enabled {
        return None;
    }

    let timeout = Duration::from_secs(config.timeout_secs);
    let client = http_client(user_agent, timeout);

    let provider: Arc<dyn AssetProvider> = match config.provider_type {
        ProviderType::Wikipedia => Arc::new(WikipediaProvider::new(
            client,
            config.base_url.clone(),
            config.locales.clone(),
            timeout,
        )),
        ProviderType::Tmdb => Arc::new(TmdbProvider::new(
            client,
            config.api_key.clone().unwrap_or_default(),
            config.base_url.clone(),
            config.locales.clone(),
            timeout,
        )),
        ProviderType::GoogleBooks => Arc::new(GoogleBooksProvider::new(
            client,
            config.api_key.clone(),
            config.base_url.clone(),
            config.locales.clone(),
            timeout,
        )),
        ProviderType::OpenLibrary => Arc::new(OpenLibraryProvider::new(
            client,
            config.base_url.clone(),
            timeout,
        )),
    };

    Some(provider)
}

/// Build an HTTP client carrying the identifying `User-Agent` and a request timeout.
pub fn http_client(user_agent: &str, timeout: Duration) -> Client {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to build HTTP client with timeout: {}", e);
            Client::new()
        })
}

/// GET `url` with `params` as its query string and decode a JSON body.
///
/// `404 Not Found` is a clean miss (`Ok(None)`); every other non-success
/// status is an [`Error::Http`]. Errors name `url` only, never `params`,
/// so API keys stay out of logs.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    params: &[(&str, &str)],
) -> Result<Option<T>> {
    let resp = client
        .get(url)
        .query(params)
        .send()
        .await
        .map_err(|e| Error::http(format!("request to {url} failed: {}", e.without_url())))?;

    let status = resp.status();
    if status == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !status.is_success() {
        return Err(Error::http(format!("{url} returned {status}")));
    }

    resp.json::<T>()
        .await
        .map(Some)
        .map_err(|e| Error::parse(format!("unexpected body from {url}: {}", e.without_url())))
}

/// Strip a trailing slash so paths can be appended with `format!`.
pub(crate) fn trim_base(base: &str) -> &str {
    base.trim_end_matches('/')
}
