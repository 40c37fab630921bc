use clap::{Parser, Subcommand};
use coverhound::config::ProviderType;
use coverhound_common::AssetKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "coverhound")]
#[command(author, version, about = "Resolve book covers and film posters from public providers")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a title to a displayable image URL
    Resolve {
        /// Book or film title
        #[arg(required = true)]
        title: String,

        /// Asset kind (poster, book)
        #[arg(short, long, default_value = "poster")]
        kind: AssetKind,

        /// Author, for books
        #[arg(short, long)]
        author: Option<String>,

        /// Provider-side title to try first (e.g. an English wiki slug)
        #[arg(long)]
        hint: Option<String>,

        /// Output the detailed resolution as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the lookup keys that would be tried, without network access
    Candidates {
        /// Book or film title
        #[arg(required = true)]
        title: String,

        /// Asset kind (poster, book)
        #[arg(short, long, default_value = "poster")]
        kind: AssetKind,

        /// Author, for books
        #[arg(short, long)]
        author: Option<String>,

        /// Provider-side title to try first
        #[arg(long)]
        hint: Option<String>,
    },

    /// List configured providers in priority order
    Providers,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Write the default configuration to a file
    InitConfig {
        /// Destination path
        #[arg(required = true)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Enable a provider in a config file, appending it if missing
    EnableProvider {
        /// Provider type (wikipedia, tmdb, google_books, open_library)
        #[arg(required = true)]
        provider: ProviderType,

        /// API key for the provider
        #[arg(long)]
        api_key: Option<String>,

        /// Locale endpoints in priority order (repeatable)
        #[arg(long = "locale")]
        locales: Vec<String>,
    },

    /// Display version information
    Version,
}
