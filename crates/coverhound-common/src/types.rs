//! Core type definitions for asset lookups.
//!
//! A [`Query`] names the thing to find (a book or a film) and the kind of
//! artwork wanted. Its [`QueryKey`] is the normalized identity under which
//! resolutions are cached.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::text::fold_key;

/// Kind of artwork being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// Front cover of a book.
    BookCover,
    /// Theatrical poster of a film.
    Poster,
}

impl AssetKind {
    /// All asset kinds, in display order.
    pub const ALL: [AssetKind; 2] = [AssetKind::BookCover, AssetKind::Poster];
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BookCover => write!(f, "book_cover"),
            Self::Poster => write!(f, "poster"),
        }
    }
}

impl FromStr for AssetKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "book" | "book_cover" | "book-cover" | "cover" => Ok(Self::BookCover),
            "poster" | "movie" | "film" => Ok(Self::Poster),
            other => Err(Error::invalid_input(format!("unknown asset kind: {other}"))),
        }
    }
}

/// A single lookup request.
///
/// Built once per resolution and never mutated afterwards; the builder
/// methods consume and return `self`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Human-readable title of the book or film.
    pub subject_title: String,
    /// Author, for books.
    pub author: Option<String>,
    /// Authoritative provider-side title (e.g. an English wiki slug for a
    /// Korean title). Tried before any generated candidate.
    pub locale_hint: Option<String>,
    /// Which artwork to resolve.
    pub asset_kind: AssetKind,
}

impl Query {
    /// Create a query for `title` of the given kind.
    pub fn new(title: impl Into<String>, asset_kind: AssetKind) -> Self {
        Self {
            subject_title: title.into(),
            author: None,
            locale_hint: None,
            asset_kind,
        }
    }

    /// Create a film poster query.
    pub fn poster(title: impl Into<String>) -> Self {
        Self::new(title, AssetKind::Poster)
    }

    /// Create a book cover query.
    pub fn book_cover(title: impl Into<String>) -> Self {
        Self::new(title, AssetKind::BookCover)
    }

    /// Attach an author.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Attach a locale hint.
    #[must_use]
    pub fn with_locale_hint(mut self, hint: impl Into<String>) -> Self {
        self.locale_hint = Some(hint.into());
        self
    }

    /// Normalized cache identity of this query.
    pub fn key(&self) -> QueryKey {
        QueryKey {
            title: fold_key(&self.subject_title),
            author: self.author.as_deref().map(fold_key).unwrap_or_default(),
            asset_kind: self.asset_kind,
        }
    }

    /// Whether the title carries no usable text.
    pub fn is_blank(&self) -> bool {
        self.subject_title.trim().is_empty()
    }
}

/// Normalized `(title, author, kind)` identity of a [`Query`].
///
/// The locale hint is intentionally not part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryKey {
    /// Lowercased, trimmed title.
    pub title: String,
    /// Lowercased, trimmed author, or empty.
    pub author: String,
    /// Asset kind.
    pub asset_kind: AssetKind,
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.author.is_empty() {
            write!(f, "{}:{}", self.asset_kind, self.title)
        } else {
            write!(f, "{}:{}/{}", self.asset_kind, self.title, self.author)
        }
    }
}
