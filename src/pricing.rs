//! Prices

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::cart::CartLine;

/// Errors that can occur while calculating total price.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// A line or cart total does not fit in minor units.
    #[error("price of {0} overflowed")]
    Overflow(String),
}

/// Calculates the price of a single cart line.
///
/// Bundle lines are charged `bundles × bundle price + leftover units × unit price`;
/// every other line is charged `count × unit price`.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the line total does not fit in minor units.
pub fn line_total<'a>(line: &CartLine<'a>) -> Result<Money<'a, Currency>, PricingError> {
    let minor_units = line_minor_units(line)?;

    Ok(Money::from_minor(minor_units, line.unit_price().currency()))
}

/// Calculates the full-price value of a line, ignoring any bundle terms.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the value does not fit in minor units.
pub fn line_subtotal<'a>(line: &CartLine<'a>) -> Result<Money<'a, Currency>, PricingError> {
    let minor_units = scale(line.unit_price(), line.count(), line.name())?;

    Ok(Money::from_minor(minor_units, line.unit_price().currency()))
}

/// Calculates the total price of a set of cart lines.
///
/// Summation happens in integer minor units, so the result does not depend on the order
/// in which lines are visited.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if any line or the sum does not fit in minor units.
pub fn total_price<'a, 'l>(
    lines: impl IntoIterator<Item = &'l CartLine<'a>>,
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, PricingError>
where
    'a: 'l,
{
    let total = lines.into_iter().try_fold(0_i64, |acc, line| {
        let line_minor = line_minor_units(line)?;

        acc.checked_add(line_minor)
            .ok_or_else(|| PricingError::Overflow("cart total".to_string()))
    })?;

    Ok(Money::from_minor(total, currency))
}

fn line_minor_units(line: &CartLine<'_>) -> Result<i64, PricingError> {
    let Some(terms) = line.bundle() else {
        return scale(line.unit_price(), line.count(), line.name());
    };

    let (bundles, leftover) = terms.split(line.count());

    let bundled = scale(terms.price(), bundles, line.name())?;
    let loose = scale(line.unit_price(), leftover, line.name())?;

    bundled
        .checked_add(loose)
        .ok_or_else(|| PricingError::Overflow(line.name().to_string()))
}

fn scale(price: &Money<'_, Currency>, count: u32, name: &str) -> Result<i64, PricingError> {
    price
        .to_minor_units()
        .checked_mul(i64::from(count))
        .ok_or_else(|| PricingError::Overflow(name.to_string()))
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use rusty_money::iso::RUB;
    use testresult::TestResult;

    use crate::{
        cart::Cart,
        products::Product,
        promotions::{BundleTerms, PAIR},
    };

    use super::*;

    fn kinder<'a>() -> (Product<'a>, BundleTerms<'a>) {
        (
            Product::new("Kinder", "1 pc", Money::from_minor(8_999, RUB)),
            BundleTerms::new(PAIR, Money::from_minor(25_999, RUB)),
        )
    }

    fn promo_cart<'a>(count: u32) -> TestResult<Cart<'a>> {
        let (product, terms) = kinder();
        let mut cart = Cart::new(RUB);

        cart.add(&product, Some(terms), NonZeroU32::new(count).ok_or("zero count")?)?;

        Ok(cart)
    }

    #[test]
    fn plain_line_is_count_times_unit_price() -> TestResult {
        let mut cart = Cart::new(RUB);
        let apples = Product::new("Apples", "1 kg", Money::from_minor(10_000, RUB));

        cart.add(&apples, None, NonZeroU32::MIN)?;
        cart.increment("Apples")?;

        let line = cart.get("Apples").ok_or("missing line")?;

        assert_eq!(line_total(line)?, Money::from_minor(20_000, RUB));

        Ok(())
    }

    #[test]
    fn pair_is_charged_bundle_price() -> TestResult {
        let cart = promo_cart(2)?;

        assert_eq!(cart.total()?, Money::from_minor(25_999, RUB));

        Ok(())
    }

    #[test]
    fn odd_promo_count_is_bundles_plus_leftover() -> TestResult {
        assert_eq!(promo_cart(1)?.total()?, Money::from_minor(8_999, RUB));
        assert_eq!(
            promo_cart(3)?.total()?,
            Money::from_minor(25_999 + 8_999, RUB)
        );
        assert_eq!(
            promo_cart(5)?.total()?,
            Money::from_minor(2 * 25_999 + 8_999, RUB)
        );

        Ok(())
    }

    #[test]
    fn subtotal_ignores_bundle_terms() -> TestResult {
        let cart = promo_cart(2)?;
        let line = cart.get("Kinder").ok_or("missing line")?;

        assert_eq!(line_subtotal(line)?, Money::from_minor(17_998, RUB));

        Ok(())
    }

    #[test]
    fn total_is_independent_of_line_order() -> TestResult {
        let (kinder, terms) = kinder();
        let apples = Product::new("Apples", "1 kg", Money::from_minor(10_000, RUB));
        let bread = Product::new("Bread", "1 pc", Money::from_minor(3_000, RUB));

        let mut cart = Cart::new(RUB);
        cart.add(&apples, None, PAIR)?;
        cart.add(&kinder, Some(terms), NonZeroU32::new(3).ok_or("zero count")?)?;
        cart.add(&bread, None, NonZeroU32::MIN)?;

        let forward = total_price(cart.lines(), RUB)?;
        let backward = total_price(cart.lines().into_iter().rev(), RUB)?;

        assert_eq!(forward, backward);
        assert_eq!(forward, cart.total()?);
        assert_eq!(forward, Money::from_minor(20_000 + 25_999 + 8_999 + 3_000, RUB));

        Ok(())
    }

    #[test]
    fn empty_total_is_zero_in_given_currency() -> TestResult {
        let lines: [&CartLine<'static>; 0] = [];

        assert_eq!(total_price(lines, RUB)?, Money::from_minor(0, RUB));

        Ok(())
    }

    #[test]
    fn overflow_is_reported() -> TestResult {
        let mut cart = Cart::new(RUB);
        let expensive = Product::new("Gold", "1 kg", Money::from_minor(i64::MAX, RUB));

        cart.add(&expensive, None, PAIR)?;

        assert_eq!(
            cart.total(),
            Err(PricingError::Overflow("Gold".to_string()))
        );

        Ok(())
    }
}
