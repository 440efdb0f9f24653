//! Front-end configuration, read from CLI arguments and the environment.

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::store::DEFAULT_PAYMENT_URL;

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Storefront settings.
#[derive(Debug, Parser)]
#[command(name = "storefront", version, about = "Browse the catalog and fill a cart")]
pub struct Config {
    /// YAML catalog to load instead of the built-in one
    #[arg(short, long, env = "STOREFRONT_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Where payment continues after checkout
    #[arg(long, env = "STOREFRONT_PAYMENT_URL", default_value = DEFAULT_PAYMENT_URL)]
    pub payment_url: String,

    /// Contact details shown by the help command
    #[arg(
        long,
        env = "STOREFRONT_SUPPORT_CONTACT",
        default_value = "support@example.com"
    )]
    pub support_contact: String,

    /// Logging settings
    #[command(flatten)]
    pub logging: LoggingConfig,
}
