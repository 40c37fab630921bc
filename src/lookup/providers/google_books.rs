//! Google Books cover provider.
//!
//! Searches `volumes?q=intitle:..+inauthor:..` and returns the first
//! `volumeInfo.imageLinks.thumbnail` (or `smallThumbnail`), upgraded to https.

use std::time::Duration;

use async_trait::async_trait;
use coverhound_common::AssetKind;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{get_json, trim_base};
use crate::lookup::provider::{AssetProvider, LookupRequest};

const GOOGLE_BOOKS_BASE_URL: &str = "https://www.googleapis.com/books/v1";
const MAX_RESULTS: &str = "5";

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    volume_info: Option<VolumeInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    image_links: Option<ImageLinks>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageLinks {
    thumbnail: Option<String>,
    small_thumbnail: Option<String>,
}

/// Book cover provider backed by the Google Books volumes search.
pub struct GoogleBooksProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    locales: Vec<String>,
    timeout: Duration,
}

impl GoogleBooksProvider {
    /// `locales` restrict results by language (`langRestrict`), tried in order.
    pub fn new(
        client: Client,
        api_key: Option<String>,
        base_url: Option<String>,
        locales: Vec<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            api_key: api_key.filter(|k| !k.is_empty()),
            base_url: base_url.unwrap_or_else(|| GOOGLE_BOOKS_BASE_URL.to_string()),
            locales,
            timeout,
        }
    }

    fn volumes_url(&self) -> String {
        format!("{}/volumes", trim_base(&self.base_url))
    }

    fn volumes_params<'a>(&'a self, terms: &'a str, locale: Option<&'a str>) -> Vec<(&'a str, &'a str)> {
        let mut params = vec![("q", terms), ("maxResults", MAX_RESULTS)];
        if let Some(lang) = locale {
            params.push(("langRestrict", lang));
        }
        if let Some(key) = &self.api_key {
            params.push(("key", key.as_str()));
        }
        params
    }
}

/// `intitle:` search terms, narrowed by `inauthor:` when the author is known.
fn search_terms(request: &LookupRequest<'_>) -> String {
    let mut q = format!("intitle:{}", request.candidate);
    if let Some(author) = request.author.filter(|a| !a.trim().is_empty()) {
        q.push_str(" inauthor:");
        q.push_str(author);
    }
    q
}

fn first_cover(volumes: VolumesResponse) -> Option<String> {
    volumes
        .items
        .into_iter()
        .filter_map(|v| v.volume_info?.image_links)
        .find_map(|links| links.thumbnail.or(links.small_thumbnail))
        .filter(|u| !u.is_empty())
        .map(|u| match u.strip_prefix("http://") {
            Some(rest) => format!("https://{rest}"),
            None => u,
        })
}

#[async_trait]
impl AssetProvider for GoogleBooksProvider {
    fn id(&self) -> &str {
        "google_books"
    }

    fn asset_kind(&self) -> AssetKind {
        AssetKind::BookCover
    }

    fn locales(&self) -> &[String] {
        &self.locales
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn lookup(&self, request: &LookupRequest<'_>) -> anyhow::Result<Option<String>> {
        let terms = search_terms(request);
        let params = self.volumes_params(&terms, request.locale);
        debug!(title = request.candidate, author = ?request.author, "Google Books volume search");

        let body: Option<VolumesResponse> = get_json(&self.client, &self.volumes_url(), &params).await?;
        Ok(body.and_then(first_cover))
    }
}
