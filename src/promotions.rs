//! Promotions
//!
//! A catalog may carry a single bundle promotion: every full bundle of the
//! promoted product is charged a fixed price, and any units left over are
//! charged at the unit price.

use std::num::NonZeroU32;

use rusty_money::{Money, iso::Currency};

/// Units in the reference "1 + 1" bundle.
pub const PAIR: NonZeroU32 = NonZeroU32::MIN.saturating_add(1);

/// Bundle pricing terms, captured by a cart line when the promoted product is added.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BundleTerms<'a> {
    size: NonZeroU32,
    price: Money<'a, Currency>,
}

impl<'a> BundleTerms<'a> {
    /// Create new bundle terms.
    pub fn new(size: NonZeroU32, price: Money<'a, Currency>) -> Self {
        Self { size, price }
    }

    /// Units per bundle.
    pub fn size(&self) -> NonZeroU32 {
        self.size
    }

    /// Price charged for one full bundle.
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }

    /// Split a unit count into full bundles and leftover units.
    pub fn split(&self, count: u32) -> (u32, u32) {
        (count / self.size, count % self.size)
    }
}

/// Fixed price for every bundle of one product.
#[derive(Debug, Clone, PartialEq)]
pub struct BundlePromotion<'a> {
    product: String,
    terms: BundleTerms<'a>,
}

impl<'a> BundlePromotion<'a> {
    /// Create a new bundle promotion for the named product.
    pub fn new(product: impl Into<String>, size: NonZeroU32, price: Money<'a, Currency>) -> Self {
        Self {
            product: product.into(),
            terms: BundleTerms::new(size, price),
        }
    }

    /// Create a "buy two for a fixed price" promotion.
    pub fn pair(product: impl Into<String>, price: Money<'a, Currency>) -> Self {
        Self::new(product, PAIR, price)
    }

    /// Name of the promoted product.
    pub fn product(&self) -> &str {
        &self.product
    }

    /// Pricing terms.
    pub fn terms(&self) -> BundleTerms<'a> {
        self.terms
    }

    /// Whether this promotion applies to the named product.
    pub fn applies_to(&self, name: &str) -> bool {
        self.product == name
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::RUB;

    use super::*;

    #[test]
    fn pair_has_two_units() {
        let promotion = BundlePromotion::pair("Kinder", Money::from_minor(25_999, RUB));

        assert_eq!(promotion.terms().size().get(), 2);
        assert_eq!(promotion.terms().price(), &Money::from_minor(25_999, RUB));
    }

    #[test]
    fn applies_only_to_named_product() {
        let promotion = BundlePromotion::pair("Kinder", Money::from_minor(25_999, RUB));

        assert!(promotion.applies_to("Kinder"));
        assert!(!promotion.applies_to("kinder"));
        assert!(!promotion.applies_to("Snickers"));
    }

    #[test]
    fn split_separates_bundles_from_leftovers() {
        let terms = BundleTerms::new(PAIR, Money::from_minor(25_999, RUB));

        assert_eq!(terms.split(0), (0, 0));
        assert_eq!(terms.split(1), (0, 1));
        assert_eq!(terms.split(2), (1, 0));
        assert_eq!(terms.split(3), (1, 1));
        assert_eq!(terms.split(6), (3, 0));
    }
}
