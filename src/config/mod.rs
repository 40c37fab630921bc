pub mod persist;
mod types;

pub use types::*;

use anyhow::{Context, Result};
use coverhound_common::{AssetKind, Error};
use std::path::Path;

/// Longest per-call timeout a provider may be configured with
pub const MAX_PROVIDER_TIMEOUT_SECS: u64 = 60;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./coverhound.toml",
        "./config.toml",
        "~/.config/coverhound/config.toml",
        "/etc/coverhound/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

fn invalid(msg: impl Into<String>) -> anyhow::Error {
    Error::config(msg).into()
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.user_agent.trim().is_empty() {
        return Err(invalid("user_agent cannot be empty"));
    }

    if config.resolver.deadline_secs == Some(0) {
        return Err(invalid("resolver.deadline_secs must be greater than 0"));
    }

    if config.cache.max_entries == Some(0) {
        return Err(invalid("cache.max_entries must be greater than 0 when set"));
    }

    for kind in AssetKind::ALL {
        let section = config.asset(kind);

        let placeholder = section.placeholder.trim();
        if placeholder.is_empty() {
            return Err(invalid(format!("{} placeholder cannot be empty", kind)));
        }
        if !placeholder.starts_with("http://") && !placeholder.starts_with("https://") {
            return Err(invalid(format!("{} placeholder must be an http(s) URL: {}", kind, placeholder)));
        }

        if section.providers.is_empty() {
            tracing::warn!("No providers configured for {}; every lookup will use the placeholder", kind);
        }

        for provider in &section.providers {
            if provider.provider_type.asset_kind() != kind {
                return Err(invalid(format!(
                    "Provider '{}' serves {} and cannot be listed under {}",
                    provider.provider_type,
                    provider.provider_type.asset_kind(),
                    kind
                )));
            }

            if provider.timeout_secs == 0 || provider.timeout_secs > MAX_PROVIDER_TIMEOUT_SECS {
                return Err(invalid(format!(
                    "Provider '{}' timeout_secs must be between 1 and {}",
                    provider.provider_type,
                    MAX_PROVIDER_TIMEOUT_SECS
                )));
            }

            if provider.enabled
                && provider.provider_type == ProviderType::Tmdb
                && provider.api_key.as_deref().map_or(true, |k| k.trim().is_empty())
            {
                return Err(invalid("Provider 'tmdb' is enabled but has no API key"));
            }

            if provider.locales.iter().any(|l| l.trim().is_empty()) {
                return Err(invalid(format!("Provider '{}' has an empty locale code", provider.provider_type)));
            }
        }
    }

    Ok(())
}
