use coverhound_common::AssetKind;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Value of the `User-Agent` header sent to every provider
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    /// Keys left out of `[posters]` keep their poster defaults
    #[serde(
        default = "AssetConfig::default_posters",
        deserialize_with = "posters_over_defaults"
    )]
    pub posters: AssetConfig,

    /// Keys left out of `[books]` keep their book defaults
    #[serde(
        default = "AssetConfig::default_books",
        deserialize_with = "books_over_defaults"
    )]
    pub books: AssetConfig,
}

fn default_user_agent() -> String {
    format!(
        "coverhound/{} (+https://github.com/coverhound/coverhound)",
        env!("CARGO_PKG_VERSION")
    )
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            resolver: ResolverConfig::default(),
            cache: CacheConfig::default(),
            posters: AssetConfig::default_posters(),
            books: AssetConfig::default_books(),
        }
    }
}

impl Config {
    /// Per-kind section for `kind`
    pub fn asset(&self, kind: AssetKind) -> &AssetConfig {
        match kind {
            AssetKind::BookCover => &self.books,
            AssetKind::Poster => &self.posters,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ResolverConfig {
    #[serde(default)]
    pub mode: ChainMode,

    /// Overall budget for one resolution; unset means only per-call timeouts apply
    #[serde(default)]
    pub deadline_secs: Option<u64>,
}

/// How a provider chain schedules its adapters.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChainMode {
    /// One adapter at a time, in priority order.
    #[default]
    Sequential,
    /// All adapters at once; the highest-priority hit wins.
    Concurrent,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Evict least recently used entries beyond this size; unset keeps every entry
    #[serde(default)]
    pub max_entries: Option<usize>,
}

/// Per-kind settings. Deserialized as overrides on top of
/// [`AssetConfig::default_posters`] or [`AssetConfig::default_books`].
#[derive(Debug, Clone, Serialize)]
pub struct AssetConfig {
    /// URL shown when no provider can resolve the query
    pub placeholder: String,

    /// Joins title words into provider slugs (e.g. `La_La_Land`); empty disables slugs
    #[serde(serialize_with = "serialize_separator")]
    pub separator: Option<String>,

    /// Disambiguation suffixes appended to the title, e.g. `" (film)"`
    pub suffixes: Vec<String>,

    /// Providers in priority order; `providers = []` disables lookups for the kind
    pub providers: Vec<ProviderConfig>,
}

/// The keys a config file may set in `[posters]` / `[books]`.
#[derive(Debug, Default, Deserialize)]
struct AssetOverrides {
    placeholder: Option<String>,
    separator: Option<String>,
    suffixes: Option<Vec<String>>,
    providers: Option<Vec<ProviderConfig>>,
}

impl AssetOverrides {
    fn apply(self, mut base: AssetConfig) -> AssetConfig {
        if let Some(placeholder) = self.placeholder {
            base.placeholder = placeholder;
        }
        if let Some(separator) = self.separator {
            base.separator = Some(separator).filter(|s| !s.is_empty());
        }
        if let Some(suffixes) = self.suffixes {
            base.suffixes = suffixes;
        }
        if let Some(providers) = self.providers {
            base.providers = providers;
        }
        base
    }
}

fn posters_over_defaults<'de, D: Deserializer<'de>>(deserializer: D) -> Result<AssetConfig, D::Error> {
    AssetOverrides::deserialize(deserializer).map(|o| o.apply(AssetConfig::default_posters()))
}

fn books_over_defaults<'de, D: Deserializer<'de>>(deserializer: D) -> Result<AssetConfig, D::Error> {
    AssetOverrides::deserialize(deserializer).map(|o| o.apply(AssetConfig::default_books()))
}

/// A missing separator is written as `""` so it survives a reload.
fn serialize_separator<S: Serializer>(separator: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(separator.as_deref().unwrap_or_default())
}

impl AssetConfig {
    pub fn default_posters() -> Self {
        Self {
            placeholder: "https://via.placeholder.com/300x450?text=No+Poster".to_string(),
            separator: Some("_".to_string()),
            suffixes: vec![" (film)".to_string(), " (movie)".to_string()],
            providers: vec![ProviderConfig {
                locales: vec!["en".to_string(), "ko".to_string()],
                ..ProviderConfig::new(ProviderType::Wikipedia)
            }],
        }
    }

    pub fn default_books() -> Self {
        Self {
            placeholder: "https://via.placeholder.com/300x450?text=No+Cover".to_string(),
            separator: None,
            suffixes: Vec::new(),
            providers: vec![
                ProviderConfig::new(ProviderType::GoogleBooks),
                ProviderConfig::new(ProviderType::OpenLibrary),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    #[serde(rename = "type")]
    pub provider_type: ProviderType,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Override of the provider's API root, mainly for tests and mirrors
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Locale endpoints in priority order (Wikipedia language editions, TMDB languages)
    #[serde(default)]
    pub locales: Vec<String>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_timeout() -> u64 {
    8
}

impl ProviderConfig {
    pub fn new(provider_type: ProviderType) -> Self {
        Self {
            provider_type,
            enabled: default_enabled(),
            base_url: None,
            api_key: None,
            locales: Vec::new(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    Wikipedia,
    Tmdb,
    GoogleBooks,
    OpenLibrary,
}

impl ProviderType {
    /// The asset kind this provider serves
    pub fn asset_kind(self) -> AssetKind {
        match self {
            Self::Wikipedia | Self::Tmdb => AssetKind::Poster,
            Self::GoogleBooks | Self::OpenLibrary => AssetKind::BookCover,
        }
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Wikipedia => write!(f, "wikipedia"),
            Self::Tmdb => write!(f, "tmdb"),
            Self::GoogleBooks => write!(f, "google_books"),
            Self::OpenLibrary => write!(f, "open_library"),
        }
    }
}

impl std::str::FromStr for ProviderType {
    type Err = coverhound_common::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "wikipedia" | "wiki" => Ok(Self::Wikipedia),
            "tmdb" => Ok(Self::Tmdb),
            "google_books" | "google" => Ok(Self::GoogleBooks),
            "open_library" | "openlibrary" => Ok(Self::OpenLibrary),
            other => Err(coverhound_common::Error::invalid_input(format!(
                "unknown provider type: {other}"
            ))),
        }
    }
}
