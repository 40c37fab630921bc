mod cli;

use coverhound::{
    config::{self, persist, Config, ProviderConfig, ProviderType},
    lookup::{ResolutionSource, Resolver},
};
use coverhound_common::{AssetKind, Query};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};

/// Config file written to and edited when no `--config` is given
const DEFAULT_CONFIG_FILE: &str = "./coverhound.toml";

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "coverhound=trace,coverhound_common=debug".to_string()
        } else {
            "coverhound=info".to_string()
        }
    });

    // Logs go to stderr so resolved URLs on stdout stay pipeable
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Resolve {
            title,
            kind,
            author,
            hint,
            json,
        } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let query = build_query(title, kind, author, hint);

            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(resolve(&config, &query, json))
        }
        Commands::Candidates {
            title,
            kind,
            author,
            hint,
        } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let query = build_query(title, kind, author, hint);
            let resolver = Resolver::from_config(&config);
            for candidate in resolver.candidates(&query) {
                println!("{}", candidate);
            }
            Ok(())
        }
        Commands::Providers => list_providers(cli.config.as_deref()),
        Commands::Validate { config } => validate_config(config.as_deref().or(cli.config.as_deref())),
        Commands::InitConfig { path, force } => init_config(&path, force),
        Commands::EnableProvider {
            provider,
            api_key,
            locales,
        } => {
            let path = cli
                .config
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            enable_provider(&path, provider, api_key, locales)
        }
        Commands::Version => {
            println!("coverhound {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn build_query(
    title: String,
    kind: AssetKind,
    author: Option<String>,
    hint: Option<String>,
) -> Query {
    let mut query = Query::new(title, kind);
    if let Some(author) = author {
        query = query.with_author(author);
    }
    if let Some(hint) = hint {
        query = query.with_locale_hint(hint);
    }
    query
}

async fn resolve(config: &Config, query: &Query, json: bool) -> Result<()> {
    let resolver = Resolver::from_config(config);
    let resolution = resolver.resolve_detailed(query).await;

    if json {
        let json_str = serde_json::to_string_pretty(&resolution)?;
        println!("{}", json_str);
    } else {
        println!("{}", resolution.url);
        match resolution.source {
            ResolutionSource::Provider { id } => tracing::debug!("Resolved by {}", id),
            ResolutionSource::Cache => tracing::debug!("Served from cache"),
            ResolutionSource::Placeholder => {
                tracing::warn!("No provider resolved {:?}; printed placeholder", query.subject_title)
            }
        }
    }

    Ok(())
}

fn list_providers(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    println!("Mode: {:?}", config.resolver.mode);
    if let Some(deadline) = config.resolver.deadline_secs {
        println!("Deadline: {}s", deadline);
    }

    for kind in AssetKind::ALL {
        let section = config.asset(kind);
        println!("\n{}:", kind);
        println!("  Placeholder: {}", section.placeholder);

        if section.providers.is_empty() {
            println!("  (no providers configured)");
            continue;
        }

        for (i, provider) in section.providers.iter().enumerate() {
            print!("  {}. {}", i + 1, provider.provider_type);
            if !provider.locales.is_empty() {
                print!(" [{}]", provider.locales.join(", "));
            }
            print!(" timeout {}s", provider.timeout_secs);
            if !provider.enabled {
                print!(" (disabled)");
            }
            println!();
        }
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  User-Agent: {}", config.user_agent);
            println!("  Mode: {:?}", config.resolver.mode);
            match config.cache.max_entries {
                Some(max) => println!("  Cache: up to {} entries", max),
                None => println!("  Cache: unbounded"),
            }
            for kind in AssetKind::ALL {
                let section = config.asset(kind);
                println!(
                    "  {}: {} providers ({} enabled)",
                    kind,
                    section.providers.len(),
                    section.providers.iter().filter(|p| p.enabled).count()
                );
            }
        }
        None => {
            println!("No config file specified, using defaults");
            let config = Config::default();
            println!("Default config:");
            println!("  User-Agent: {}", config.user_agent);
        }
    }

    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists: {:?} (use --force to overwrite)",
            path
        );
    }

    persist::save_config(path, &Config::default())?;
    println!("Wrote default configuration to {:?}", path);
    Ok(())
}

fn enable_provider(
    path: &Path,
    provider_type: ProviderType,
    api_key: Option<String>,
    locales: Vec<String>,
) -> Result<()> {
    if !path.exists() {
        anyhow::bail!(
            "Config file does not exist: {:?} (create one with `coverhound init-config`)",
            path
        );
    }

    let mut config = config::load_config(path)?;
    let kind = provider_type.asset_kind();
    let section = match kind {
        AssetKind::BookCover => &mut config.books,
        AssetKind::Poster => &mut config.posters,
    };

    let entry = match section
        .providers
        .iter()
        .position(|p| p.provider_type == provider_type)
    {
        Some(idx) => &mut section.providers[idx],
        None => {
            section.providers.push(ProviderConfig::new(provider_type));
            let last = section.providers.len() - 1;
            &mut section.providers[last]
        }
    };

    entry.enabled = true;
    if let Some(key) = api_key {
        entry.api_key = Some(key);
    }
    if !locales.is_empty() {
        entry.locales = locales;
    }

    config::validate_config(&config)
        .with_context(|| format!("Refusing to enable provider '{}'", provider_type))?;
    persist::update_asset_section(path, kind, config.asset(kind))?;

    println!("Enabled provider '{}' for {}", provider_type, kind);
    Ok(())
}
