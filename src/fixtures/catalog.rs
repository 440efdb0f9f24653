//! Catalog Fixtures

use std::num::NonZeroU32;

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, RUB, USD},
};
use serde::Deserialize;

use crate::{
    catalog::Catalog,
    fixtures::FixtureError,
    products::Product,
    promotions::{BundlePromotion, PAIR},
};

/// Catalog Fixture
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Categories in display order
    #[serde(default)]
    pub categories: Vec<CategoryFixture>,

    /// Products listed outside any category
    #[serde(default)]
    pub standalone: Vec<ProductFixture>,

    /// Optional bundle promotion
    #[serde(default)]
    pub promotion: Option<PromotionFixture>,
}

/// Category Fixture
#[derive(Debug, Deserialize)]
pub struct CategoryFixture {
    /// Category name
    pub name: String,

    /// Products in display order
    #[serde(default)]
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Quantity per sale unit (e.g., "1 kg")
    pub unit: String,

    /// Unit price (e.g., "89.99 RUB")
    pub price: String,
}

/// Promotion Fixture
#[derive(Debug, Deserialize)]
pub struct PromotionFixture {
    /// Name of the promoted product
    pub product: String,

    /// Units per bundle
    #[serde(default = "default_bundle_size")]
    pub bundle_size: u32,

    /// Price of one full bundle (e.g., "259.99 RUB")
    pub bundle_price: String,
}

fn default_bundle_size() -> u32 {
    PAIR.get()
}

impl TryFrom<ProductFixture> for Product<'_> {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;

        Ok(Product::new(
            fixture.name,
            fixture.unit,
            Money::from_minor(minor_units, currency),
        ))
    }
}

impl TryFrom<PromotionFixture> for BundlePromotion<'_> {
    type Error = FixtureError;

    fn try_from(fixture: PromotionFixture) -> Result<Self, Self::Error> {
        let size = NonZeroU32::new(fixture.bundle_size).ok_or_else(|| {
            FixtureError::InvalidPromotion(format!(
                "bundle size for {} must be at least 1",
                fixture.product
            ))
        })?;

        let (minor_units, currency) = parse_price(&fixture.bundle_price)?;

        Ok(BundlePromotion::new(
            fixture.product,
            size,
            Money::from_minor(minor_units, currency),
        ))
    }
}

impl TryFrom<CatalogFixture> for Catalog<'_> {
    type Error = FixtureError;

    fn try_from(fixture: CatalogFixture) -> Result<Self, Self::Error> {
        let currency = fixture
            .categories
            .iter()
            .flat_map(|category| category.products.iter())
            .chain(fixture.standalone.iter())
            .next()
            .map(|product| parse_price(&product.price))
            .transpose()?
            .map(|(_minor_units, currency)| currency)
            .ok_or(FixtureError::NoCurrency)?;

        let mut catalog = Catalog::new(currency);

        for category in fixture.categories {
            let products = category
                .products
                .into_iter()
                .map(Product::try_from)
                .collect::<Result<Vec<_>, _>>()?;

            catalog.add_category(category.name, products)?;
        }

        for product in fixture.standalone {
            catalog.add_standalone(product.try_into()?)?;
        }

        if let Some(promotion) = fixture.promotion {
            catalog.set_promotion(promotion.try_into()?)?;
        }

        Ok(catalog)
    }
}

/// Parse price string (e.g., "89.99 RUB") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a non-negative decimal with at most as many decimal
/// places as the currency has, or if the currency code is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "RUB" => RUB,
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    // Amounts finer than the currency's minor unit are rejected rather than rounded.
    if amount.normalize().scale() > currency.exponent {
        return Err(FixtureError::InvalidPrice(format!(
            "{s} has more than {} decimal places",
            currency.exponent
        )));
    }

    let minor_units = 10_i64
        .checked_pow(currency.exponent)
        .and_then(|factor| amount.checked_mul(Decimal::from(factor)))
        .and_then(|value| value.to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}
