//! Coverhound-Common: Shared query types, text helpers, and errors.
//!
//! This crate provides the vocabulary used across coverhound:
//!
//! - **Core Types**: [`AssetKind`], [`Query`] and its cache identity [`QueryKey`]
//! - **Text Utilities**: Whitespace collapsing, punctuation stripping, and
//!   separator joining used to build candidate lookup keys
//! - **Error Handling**: Common error type and result alias
//!
//! # Examples
//!
//! ```
//! use coverhound_common::{AssetKind, Query};
//! use coverhound_common::text::strip_punctuation;
//!
//! let query = Query::poster("La La Land");
//! assert_eq!(query.asset_kind, AssetKind::Poster);
//!
//! assert_eq!(strip_punctuation("WALL-E!"), "WALLE");
//! ```

pub mod error;
pub mod text;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
