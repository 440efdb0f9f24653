//! Fixtures
//!
//! Catalogs are described in YAML. The default assortment ships embedded in the crate;
//! other catalogs can be loaded from a file at startup.

use std::{fs, path::Path};

use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogError},
    fixtures::catalog::CatalogFixture,
};

pub mod catalog;

pub use catalog::parse_price;

/// Default catalog, embedded at build time.
pub const DEFAULT_CATALOG: &str = include_str!("../../fixtures/catalog/default.yml");

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Invalid promotion data
    #[error("Invalid promotion data: {0}")]
    InvalidPromotion(String),

    /// No products defined, so the currency is unknown
    #[error("No products defined; currency unknown")]
    NoCurrency,

    /// The catalog rejected the fixture contents
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Parse a catalog from YAML.
///
/// # Errors
///
/// Returns an error if the YAML is malformed, a price cannot be parsed, or the catalog
/// rejects the contents (duplicate names, mixed currencies, unknown promoted product).
pub fn parse_catalog(contents: &str) -> Result<Catalog<'static>, FixtureError> {
    let fixture: CatalogFixture = serde_norway::from_str(contents)?;

    fixture.try_into()
}

/// Load a catalog from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or its contents cannot be parsed.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog<'static>, FixtureError> {
    let contents = fs::read_to_string(path.as_ref())?;

    parse_catalog(&contents)
}

/// The built-in catalog.
///
/// # Errors
///
/// Returns an error if the embedded fixture is invalid.
pub fn default_catalog() -> Result<Catalog<'static>, FixtureError> {
    parse_catalog(DEFAULT_CATALOG)
}
