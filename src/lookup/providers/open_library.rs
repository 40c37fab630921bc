//! Open Library cover provider.
//!
//! Uses the `search.json` endpoint and builds the cover URL from the first
//! document carrying a `cover_i` id.

use std::time::Duration;

use async_trait::async_trait;
use coverhound_common::AssetKind;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{get_json, trim_base};
use crate::lookup::provider::{AssetProvider, LookupRequest};

const OPEN_LIBRARY_BASE_URL: &str = "https://openlibrary.org";
const COVERS_BASE_URL: &str = "https://covers.openlibrary.org";
const SEARCH_LIMIT: &str = "5";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    cover_i: Option<i64>,
}

/// Book cover provider backed by the Open Library search API.
pub struct OpenLibraryProvider {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl OpenLibraryProvider {
    /// `base_url` defaults to `https://openlibrary.org`; covers always come from the public covers host.
    pub fn new(client: Client, base_url: Option<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.unwrap_or_else(|| OPEN_LIBRARY_BASE_URL.to_string()),
            timeout,
        }
    }

    fn search_url(&self) -> String {
        format!("{}/search.json", trim_base(&self.base_url))
    }
}

fn search_params<'a>(request: &LookupRequest<'a>) -> Vec<(&'static str, &'a str)> {
    let mut params = vec![("title", request.candidate), ("limit", SEARCH_LIMIT)];
    if let Some(author) = request.author.filter(|a| !a.trim().is_empty()) {
        params.push(("author", author));
    }
    params
}

fn cover_url(cover_id: i64) -> String {
    format!("{COVERS_BASE_URL}/b/id/{cover_id}-L.jpg")
}

#[async_trait]
impl AssetProvider for OpenLibraryProvider {
    fn id(&self) -> &str {
        "open_library"
    }

    fn asset_kind(&self) -> AssetKind {
        AssetKind::BookCover
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn lookup(&self, request: &LookupRequest<'_>) -> anyhow::Result<Option<String>> {
        debug!(title = request.candidate, author = ?request.author, "Open Library search");

        let params = search_params(request);
        let body: Option<SearchResponse> = get_json(&self.client, &self.search_url(), &params).await?;
        Ok(body.and_then(|b| {
            b.docs
                .into_iter()
                .find_map(|d| d.cover_i.filter(|id| *id > 0))
                .map(cover_url)
        }))
    }
}
