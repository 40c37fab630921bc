//! Candidate key generation.
//!
//! Turns a [`Query`] into the ordered list of strings tried against each
//! provider. Earlier candidates are tried first, so the authoritative locale
//! hint leads and the verbatim title follows.

use coverhound_common::text::{join_words, strip_punctuation};
use coverhound_common::{AssetKind, Query};

use crate::config::AssetConfig;

/// Per-kind candidate shaping rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateRules {
    /// Joins words for slug-addressed providers; `None` skips slug variants.
    pub separator: Option<String>,
    /// Disambiguation suffixes, appended in order.
    pub suffixes: Vec<String>,
}

impl CandidateRules {
    /// Rules for film posters as addressed on Wikipedia.
    pub fn poster_defaults() -> Self {
        Self::from(&AssetConfig::default_posters())
    }

    /// Rules for book covers (free-text search providers).
    pub fn book_defaults() -> Self {
        Self::from(&AssetConfig::default_books())
    }

    /// Default rules for `kind`.
    pub fn defaults_for(kind: AssetKind) -> Self {
        match kind {
            AssetKind::BookCover => Self::book_defaults(),
            AssetKind::Poster => Self::poster_defaults(),
        }
    }
}

impl From<&AssetConfig> for CandidateRules {
    fn from(section: &AssetConfig) -> Self {
        Self {
            separator: section.separator.clone().filter(|s| !s.is_empty()),
            suffixes: section.suffixes.clone(),
        }
    }
}

/// Generate the ordered, duplicate-free candidate list for `query`.
///
/// A blank title yields exactly one candidate: the title itself.
pub fn generate(query: &Query, rules: &CandidateRules) -> Vec<String> {
    let title = query.subject_title.as_str();
    if title.trim().is_empty() {
        return vec![title.to_string()];
    }

    let mut out = Vec::new();

    if let Some(hint) = query.locale_hint.as_deref().filter(|h| !h.trim().is_empty()) {
        push_unique(&mut out, hint.to_string());
    }

    push_variants(&mut out, title, rules);

    let stripped = strip_punctuation(title);
    if !stripped.is_empty() && stripped != title {
        push_variants(&mut out, &stripped, rules);
    }

    out
}

fn push_variants(out: &mut Vec<String>, base: &str, rules: &CandidateRules) {
    push_unique(out, base.to_string());
    if let Some(sep) = rules.separator.as_deref() {
        push_unique(out, join_words(base, sep));
    }

    for suffix in &rules.suffixes {
        let suffixed = format!("{base}{suffix}");
        if let Some(sep) = rules.separator.as_deref() {
            let slug = join_words(&suffixed, sep);
            push_unique(out, suffixed);
            push_unique(out, slug);
        } else {
            push_unique(out, suffixed);
        }
    }
}

fn push_unique(out: &mut Vec<String>, value: String) {
    if !out.contains(&value) {
        out.push(value);
    }
}
