//! Products

use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    /// Product name, unique within a catalog
    pub name: String,

    /// Quantity per sale unit (e.g. "1 kg")
    pub unit_label: String,

    /// Price of a single unit
    pub price: Money<'a, Currency>,
}

impl<'a> Product<'a> {
    /// Create a new product.
    pub fn new(
        name: impl Into<String>,
        unit_label: impl Into<String>,
        price: Money<'a, Currency>,
    ) -> Self {
        Self {
            name: name.into(),
            unit_label: unit_label.into(),
            price,
        }
    }

    /// Currency of the unit price.
    pub fn currency(&self) -> &'a Currency {
        self.price.currency()
    }
}
