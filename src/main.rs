//! Storefront
//!
//! Interactive storefront over stdin and stdout.
//!
//! Use `--catalog` to load a YAML catalog instead of the built-in one.

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use storefront::{
    config::Config,
    fixtures::{default_catalog, load_catalog},
    logging::init_subscriber,
    shell::Shell,
};

/// Run the storefront shell.
pub fn main() -> Result<()> {
    let config = Config::parse();

    init_subscriber(&config.logging)?;

    let catalog = match config.catalog.as_deref() {
        Some(path) => load_catalog(path)
            .with_context(|| format!("failed to load catalog from {}", path.display()))?,
        None => default_catalog().context("failed to load built-in catalog")?,
    };

    info!(
        products = catalog.len(),
        categories = catalog.categories().len(),
        currency = catalog.currency().iso_alpha_code,
        "catalog loaded"
    );

    let mut shell = Shell::new(catalog, config.payment_url, config.support_contact);

    shell.run(io::stdin().lock(), io::stdout().lock())?;

    Ok(())
}
