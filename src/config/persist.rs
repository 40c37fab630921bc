//! Configuration persistence using toml_edit to preserve formatting and comments.

use super::{AssetConfig, Config};
use anyhow::{Context, Result};
use coverhound_common::AssetKind;
use std::path::Path;
use toml_edit::DocumentMut;

/// Save the entire config to a TOML file
pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    let new_content =
        toml::to_string_pretty(config).with_context(|| "Failed to serialize config")?;
    let new_doc: DocumentMut = new_content
        .parse()
        .with_context(|| "Failed to parse serialized config")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    std::fs::write(path, new_doc.to_string())
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    Ok(())
}

/// Replace one asset section (`[posters]` or `[books]`) in an existing file,
/// leaving every other table and its comments untouched
pub fn update_asset_section(path: &Path, kind: AssetKind, section: &AssetConfig) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut doc: DocumentMut = content
        .parse()
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    let name = section_name(kind);
    let section_toml = toml::to_string(&SectionWrapper { section })
        .with_context(|| format!("Failed to serialize {name}"))?;
    let section_doc: DocumentMut = section_toml
        .parse()
        .with_context(|| format!("Failed to parse serialized {name}"))?;

    match section_doc.get("section") {
        Some(item) => doc[name] = item.clone(),
        None => {
            doc.remove(name);
        }
    }

    std::fs::write(path, doc.to_string())
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    Ok(())
}

fn section_name(kind: AssetKind) -> &'static str {
    match kind {
        AssetKind::BookCover => "books",
        AssetKind::Poster => "posters",
    }
}

#[derive(serde::Serialize)]
struct SectionWrapper<'a> {
    section: &'a AssetConfig,
}
