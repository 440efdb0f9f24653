//! Receipt
//!
//! Tabular view of the cart: one row per line in the order products were first added,
//! followed by the subtotal at unit prices, the bundle savings and the total to pay.

use std::io;

use rusty_money::{Money, MoneyError, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::{
    cart::{Cart, CartLine},
    pricing::{PricingError, line_subtotal, line_total},
};

/// Errors that can occur when building or writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error calculating a line or cart total.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// One cart line as shown on the receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLine<'a> {
    /// Product name
    pub name: String,

    /// Quantity per sale unit
    pub unit_label: String,

    /// Price description, per unit or per bundle
    pub price: String,

    /// Units in the cart
    pub count: u32,

    /// Value of the line at unit prices
    pub subtotal: Money<'a, Currency>,

    /// Amount charged for the line
    pub total: Money<'a, Currency>,
}

/// Snapshot of the cart for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt<'a> {
    lines: Vec<ReceiptLine<'a>>,
    subtotal: Money<'a, Currency>,
    total: Money<'a, Currency>,
}

impl<'a> Receipt<'a> {
    /// Build a receipt from the current cart.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if a line or the cart total does not fit in minor units.
    pub fn from_cart(cart: &Cart<'a>) -> Result<Self, PricingError> {
        let lines = cart
            .lines()
            .into_iter()
            .map(|line| -> Result<ReceiptLine<'a>, PricingError> {
                Ok(ReceiptLine {
                    name: line.name().to_string(),
                    unit_label: line.unit_label().to_string(),
                    price: price_text(line),
                    count: line.count(),
                    subtotal: line_subtotal(line)?,
                    total: line_total(line)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let subtotal = lines.iter().try_fold(0_i64, |acc, line| {
            acc.checked_add(line.subtotal.to_minor_units())
                .ok_or_else(|| PricingError::Overflow("cart subtotal".to_string()))
        })?;

        Ok(Receipt {
            lines,
            subtotal: Money::from_minor(subtotal, cart.currency()),
            total: cart.total()?,
        })
    }

    /// Lines in display order.
    pub fn lines(&self) -> &[ReceiptLine<'a>] {
        &self.lines
    }

    /// Value of the cart at unit prices.
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Amount to pay.
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Amount saved through bundle pricing.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.subtotal.sub(self.total)
    }

    /// Write the receipt as a table followed by the totals.
    ///
    /// # Errors
    ///
    /// Returns an error if savings cannot be calculated or the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        if self.lines.is_empty() {
            writeln!(out, "Your cart is empty.")?;
        } else {
            let mut builder = Builder::default();

            builder.push_record(["Item", "Unit", "Price", "Qty", "Total"]);

            for line in &self.lines {
                builder.push_record([
                    line.name.clone(),
                    line.unit_label.clone(),
                    line.price.clone(),
                    line.count.to_string(),
                    line.total.to_string(),
                ]);
            }

            let mut table = builder.build();

            table.with(Style::modern_rounded());
            table.modify(Columns::new(3..5), Alignment::right());

            writeln!(out, "{table}")?;
        }

        let savings = self.savings()?;

        if savings.to_minor_units() > 0 {
            writeln!(out, " Subtotal: {}", self.subtotal)?;
            writeln!(out, " Savings:  {savings}")?;
        }

        writeln!(out, " Total:    {}", self.total)?;

        Ok(())
    }
}

fn price_text(line: &CartLine<'_>) -> String {
    let Some(terms) = line.bundle() else {
        return format!("{} each", line.unit_price());
    };

    match terms.split(line.count()) {
        (0, _) => format!("{} each", line.unit_price()),
        (_, 0) => format!("{} per {}", terms.price(), terms.size()),
        _ => format!(
            "{} per {} + {} each",
            terms.price(),
            terms.size(),
            line.unit_price()
        ),
    }
}
