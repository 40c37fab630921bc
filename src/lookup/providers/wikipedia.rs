//! Wikipedia page-summary poster provider.
//!
//! Queries the REST summary endpoint of one or more language editions and
//! takes the page's lead image: `originalimage.source`, falling back to
//! `thumbnail.source`. Disambiguation pages are treated as misses.

use std::time::Duration;

use async_trait::async_trait;
use coverhound_common::{AssetKind, Error, Result};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use super::get_json;
use crate::lookup::provider::{AssetProvider, LookupRequest};

/// `{locale}` is replaced by the language edition code.
const WIKIPEDIA_BASE_URL: &str = "https://{locale}.wikipedia.org";
const DEFAULT_LOCALE: &str = "en";

#[derive(Debug, Deserialize)]
struct WikiSummary {
    #[serde(rename = "type")]
    page_type: Option<String>,
    originalimage: Option<WikiImage>,
    thumbnail: Option<WikiImage>,
}

#[derive(Debug, Deserialize)]
struct WikiImage {
    source: String,
}

/// Wikipedia summary provider, queried per language edition.
pub struct WikipediaProvider {
    client: Client,
    base_url: String,
    locales: Vec<String>,
    timeout: Duration,
}

impl WikipediaProvider {
    /// Create a provider for `locales` (defaults to `["en"]` when empty).
    ///
    /// `base_url` may contain `{locale}`. Without the placeholder every
    /// locale would hit the same URL, so only the first one is kept.
    pub fn new(
        client: Client,
        base_url: Option<String>,
        locales: Vec<String>,
        timeout: Duration,
    ) -> Self {
        let base_url = base_url.unwrap_or_else(|| WIKIPEDIA_BASE_URL.to_string());
        let mut locales = if locales.is_empty() {
            vec![DEFAULT_LOCALE.to_string()]
        } else {
            locales
        };

        if !base_url.contains("{locale}") && locales.len() > 1 {
            warn!(
                base_url = %base_url,
                ignored = ?&locales[1..],
                "Wikipedia base URL has no {{locale}} placeholder; querying it once"
            );
            locales.truncate(1);
        }

        Self {
            client,
            base_url,
            locales,
            timeout,
        }
    }

    fn summary_url(&self, locale: &str, slug: &str) -> Result<Url> {
        let base = self.base_url.replace("{locale}", locale);
        let mut url = Url::parse(&base)
            .map_err(|e| Error::config(format!("invalid Wikipedia base URL {base:?}: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| Error::config(format!("Wikipedia base URL {base:?} cannot take a path")))?
            .pop_if_empty()
            .extend(["api", "rest_v1", "page", "summary", slug]);
        Ok(url)
    }
}

fn lead_image(summary: WikiSummary) -> Option<String> {
    if summary.page_type.as_deref() == Some("disambiguation") {
        return None;
    }
    summary
        .originalimage
        .or(summary.thumbnail)
        .map(|img| img.source)
        .filter(|src| !src.is_empty())
}

#[async_trait]
impl AssetProvider for WikipediaProvider {
    fn id(&self) -> &str {
        "wikipedia"
    }

    fn asset_kind(&self) -> AssetKind {
        AssetKind::Poster
    }

    fn locales(&self) -> &[String] {
        &self.locales
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn lookup(&self, request: &LookupRequest<'_>) -> anyhow::Result<Option<String>> {
        let locale = request.locale.unwrap_or(DEFAULT_LOCALE);
        let url = self.summary_url(locale, request.candidate)?;
        debug!(url = %url, "Wikipedia page summary");

        let summary: Option<WikiSummary> = get_json(&self.client, url.as_str(), &[]).await?;
        Ok(summary.and_then(lead_image))
    }
}
