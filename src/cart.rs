//! Cart

use std::{collections::hash_map::Entry, num::NonZeroU32};

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::{
    pricing::{PricingError, total_price},
    products::Product,
    promotions::BundleTerms,
};

/// Errors related to cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The named product has no line in the cart.
    #[error("{0} is not in the cart")]
    ItemNotInCart(String),

    /// A product's currency differs from the cart currency (product, product currency, cart currency).
    #[error("{0} has currency {1}, but the cart has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),

    /// The line quantity cannot grow any further.
    #[error("quantity of {0} is too large")]
    QuantityOverflow(String),
}

/// Result of taking one unit off a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decrement {
    /// The line is still in the cart with this many units.
    Decreased(u32),

    /// The last unit was taken and the line is gone.
    Removed,
}

/// One product's quantity and price state within a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine<'a> {
    name: String,
    unit_label: String,
    unit_price: Money<'a, Currency>,
    count: u32,
    bundle: Option<BundleTerms<'a>>,
    sequence: u64,
}

impl<'a> CartLine<'a> {
    /// Product name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Quantity per sale unit, as captured when the line was created.
    pub fn unit_label(&self) -> &str {
        &self.unit_label
    }

    /// Unit price, as captured when the line was created.
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Number of units, always at least one.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Bundle terms, if this line is the promoted product.
    pub fn bundle(&self) -> Option<&BundleTerms<'a>> {
        self.bundle.as_ref()
    }

    /// Whether this line is priced in bundles.
    pub fn is_promo(&self) -> bool {
        self.bundle.is_some()
    }
}

/// In-memory shopping cart keyed by product name.
#[derive(Debug, Clone)]
pub struct Cart<'a> {
    lines: FxHashMap<String, CartLine<'a>>,
    currency: &'a Currency,
    next_sequence: u64,
}

impl<'a> Cart<'a> {
    /// Create an empty cart in the given currency.
    pub fn new(currency: &'a Currency) -> Self {
        Self {
            lines: FxHashMap::default(),
            currency,
            next_sequence: 0,
        }
    }

    /// Add `units` of a product, creating its line on first add.
    ///
    /// Price, unit label and bundle terms are captured from the product when the line is
    /// created; later adds only grow the count.
    ///
    /// # Errors
    ///
    /// - [`CartError::CurrencyMismatch`]: the product is priced in another currency.
    /// - [`CartError::QuantityOverflow`]: the line count would overflow.
    pub fn add(
        &mut self,
        product: &Product<'a>,
        bundle: Option<BundleTerms<'a>>,
        units: NonZeroU32,
    ) -> Result<&CartLine<'a>, CartError> {
        if product.currency() != self.currency {
            return Err(CartError::CurrencyMismatch(
                product.name.clone(),
                product.currency().iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        let line = match self.lines.entry(product.name.clone()) {
            Entry::Occupied(entry) => {
                let line = entry.into_mut();

                line.count = line
                    .count
                    .checked_add(units.get())
                    .ok_or_else(|| CartError::QuantityOverflow(product.name.clone()))?;

                line
            }
            Entry::Vacant(entry) => {
                let sequence = self.next_sequence;
                self.next_sequence += 1;

                entry.insert(CartLine {
                    name: product.name.clone(),
                    unit_label: product.unit_label.clone(),
                    unit_price: product.price,
                    count: units.get(),
                    bundle,
                    sequence,
                })
            }
        };

        debug!(product = %line.name, count = line.count, "added to cart");

        Ok(line)
    }

    /// Add one unit to a line already in the cart.
    ///
    /// # Errors
    ///
    /// - [`CartError::ItemNotInCart`]: there is no line for `name`.
    /// - [`CartError::QuantityOverflow`]: the line count would overflow.
    pub fn increment(&mut self, name: &str) -> Result<u32, CartError> {
        let line = self
            .lines
            .get_mut(name)
            .ok_or_else(|| CartError::ItemNotInCart(name.to_string()))?;

        line.count = line
            .count
            .checked_add(1)
            .ok_or_else(|| CartError::QuantityOverflow(name.to_string()))?;

        debug!(product = name, count = line.count, "increased quantity");

        Ok(line.count)
    }

    /// Take one unit off a line, removing the line when its last unit goes.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotInCart`] if there is no line for `name`.
    pub fn decrement(&mut self, name: &str) -> Result<Decrement, CartError> {
        let line = self
            .lines
            .get_mut(name)
            .ok_or_else(|| CartError::ItemNotInCart(name.to_string()))?;

        if line.count > 1 {
            line.count -= 1;

            debug!(product = name, count = line.count, "decreased quantity");

            return Ok(Decrement::Decreased(line.count));
        }

        self.lines.remove(name);

        debug!(product = name, "removed from cart");

        Ok(Decrement::Removed)
    }

    /// Remove a whole line regardless of its count.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotInCart`] if there is no line for `name`.
    pub fn remove(&mut self, name: &str) -> Result<CartLine<'a>, CartError> {
        let line = self
            .lines
            .remove(name)
            .ok_or_else(|| CartError::ItemNotInCart(name.to_string()))?;

        debug!(product = name, count = line.count, "removed line from cart");

        Ok(line)
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Get the line for a product.
    pub fn get(&self, name: &str) -> Option<&CartLine<'a>> {
        self.lines.get(name)
    }

    /// Number of units of a product in the cart, zero when absent.
    pub fn count(&self, name: &str) -> u32 {
        self.lines.get(name).map_or(0, CartLine::count)
    }

    /// Check whether the cart has a line for a product.
    pub fn contains(&self, name: &str) -> bool {
        self.lines.contains_key(name)
    }

    /// Iterate over lines in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine<'a>> {
        self.lines.values()
    }

    /// Lines in the order their products were first added.
    pub fn lines(&self) -> Vec<&CartLine<'a>> {
        let mut lines: Vec<_> = self.lines.values().collect();

        lines.sort_unstable_by_key(|line| line.sequence);

        lines
    }

    /// Number of distinct products in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Currency of the cart.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    /// Total price of the cart, with bundle pricing applied to the promoted line.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the total does not fit in minor units.
    pub fn total(&self) -> Result<Money<'a, Currency>, PricingError> {
        total_price(self.lines.values(), self.currency)
    }
}
