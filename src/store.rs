//! Store
//!
//! Application state shared by every front-end handler: the catalog, the cart, where
//! notifications go and where payment continues. Each handler finishes its cart mutation
//! and returns the recomputed total before the next event is handled.

use std::num::NonZeroU32;

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    cart::{Cart, CartError, Decrement},
    catalog::{Catalog, CatalogError},
    notifications::{LogSink, Notification, NotificationSink},
    pricing::PricingError,
    receipt::Receipt,
};

/// Where payment continues when no other URL is configured.
pub const DEFAULT_PAYMENT_URL: &str = "https://example.com/payment";

/// Errors returned by store handlers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The product is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The product has no line in the cart.
    #[error("{0} is not in the cart")]
    ItemNotInCart(String),

    /// Any other catalog error.
    #[error(transparent)]
    Catalog(CatalogError),

    /// Any other cart error.
    #[error(transparent)]
    Cart(CartError),

    /// The total could not be computed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

impl From<CatalogError> for StoreError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::ProductNotFound(name) => StoreError::ProductNotFound(name),
            other => StoreError::Catalog(other),
        }
    }
}

impl From<CartError> for StoreError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::ItemNotInCart(name) => StoreError::ItemNotInCart(name),
            other => StoreError::Cart(other),
        }
    }
}

/// Final total handed off to the payment page.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkout<'a> {
    /// Amount to pay
    pub total: Money<'a, Currency>,

    /// Where payment continues
    pub payment_url: String,
}

/// Storefront application state
#[derive(Debug)]
pub struct Store<'a, S = LogSink> {
    catalog: Catalog<'a>,
    cart: Cart<'a>,
    sink: S,
    payment_url: String,
}

impl<'a, S: NotificationSink> Store<'a, S> {
    /// Create a store with an empty cart over the given catalog.
    pub fn new(catalog: Catalog<'a>, sink: S) -> Self {
        let cart = Cart::new(catalog.currency());

        Self {
            catalog,
            cart,
            sink,
            payment_url: DEFAULT_PAYMENT_URL.to_string(),
        }
    }

    /// Use a different payment URL.
    #[must_use]
    pub fn with_payment_url(mut self, payment_url: impl Into<String>) -> Self {
        self.payment_url = payment_url.into();
        self
    }

    /// The catalog.
    pub fn catalog(&self) -> &Catalog<'a> {
        &self.catalog
    }

    /// The cart.
    pub fn cart(&self) -> &Cart<'a> {
        &self.cart
    }

    /// The notification sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the notification sink, e.g. to drain collected notifications.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Where payment continues.
    pub fn payment_url(&self) -> &str {
        &self.payment_url
    }

    /// Add a catalog product to the cart.
    ///
    /// With `promo` set on the promoted product, a whole bundle is added at once. The flag
    /// is ignored for every other product.
    ///
    /// On any error the cart is left unchanged and nothing is notified.
    ///
    /// # Errors
    ///
    /// - [`StoreError::ProductNotFound`]: the product is not in the catalog.
    /// - [`StoreError::Cart`]: the line quantity would overflow.
    /// - [`StoreError::Pricing`]: the new total could not be computed.
    pub fn add_to_cart(
        &mut self,
        name: &str,
        promo: bool,
    ) -> Result<Money<'a, Currency>, StoreError> {
        let product = self.catalog.lookup(name).inspect_err(|err| {
            warn!(product = name, %err, "rejected add to cart");
        })?;

        let bundle = self.catalog.bundle_terms(name);

        let units = match bundle {
            Some(terms) if promo => terms.size(),
            _ => NonZeroU32::MIN,
        };

        let mut cart = self.cart.clone();
        let count = cart.add(product, bundle, units)?.count();

        self.commit(
            cart,
            Notification::Added {
                product: name.to_string(),
                count,
            },
        )
    }

    /// Take one unit of a product off the cart from the catalog screen.
    ///
    /// Behaves exactly like [`Store::decrease_quantity`].
    ///
    /// # Errors
    ///
    /// See [`Store::decrease_quantity`].
    pub fn remove_from_cart(&mut self, name: &str) -> Result<Money<'a, Currency>, StoreError> {
        self.decrease_quantity(name)
    }

    /// Add one unit to a line already in the cart.
    ///
    /// # Errors
    ///
    /// - [`StoreError::ItemNotInCart`]: there is no line for the product.
    /// - [`StoreError::Cart`]: the line quantity would overflow.
    /// - [`StoreError::Pricing`]: the new total could not be computed.
    pub fn increase_quantity(&mut self, name: &str) -> Result<Money<'a, Currency>, StoreError> {
        let mut cart = self.cart.clone();
        let count = cart.increment(name)?;

        self.commit(
            cart,
            Notification::Increased {
                product: name.to_string(),
                count,
            },
        )
    }

    /// Take one unit off a line, removing it when the last unit goes.
    ///
    /// # Errors
    ///
    /// - [`StoreError::ItemNotInCart`]: there is no line for the product; the cart is
    ///   left unchanged.
    /// - [`StoreError::Pricing`]: the new total could not be computed.
    pub fn decrease_quantity(&mut self, name: &str) -> Result<Money<'a, Currency>, StoreError> {
        let mut cart = self.cart.clone();

        let notification = match cart.decrement(name)? {
            Decrement::Decreased(count) => Notification::Decreased {
                product: name.to_string(),
                count,
            },
            Decrement::Removed => Notification::Removed {
                product: name.to_string(),
            },
        };

        self.commit(cart, notification)
    }

    /// Remove a whole line regardless of its quantity.
    ///
    /// # Errors
    ///
    /// - [`StoreError::ItemNotInCart`]: there is no line for the product.
    /// - [`StoreError::Pricing`]: the new total could not be computed.
    pub fn remove_line(&mut self, name: &str) -> Result<Money<'a, Currency>, StoreError> {
        let mut cart = self.cart.clone();
        cart.remove(name)?;

        self.commit(
            cart,
            Notification::Removed {
                product: name.to_string(),
            },
        )
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Pricing`] if the new total could not be computed.
    pub fn clear_cart(&mut self) -> Result<Money<'a, Currency>, StoreError> {
        let cart = Cart::new(self.cart.currency());

        self.commit(cart, Notification::Cleared)
    }

    /// Current cart total.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Pricing`] if the total could not be computed.
    pub fn total(&self) -> Result<Money<'a, Currency>, StoreError> {
        Ok(self.cart.total()?)
    }

    /// Build the cart receipt.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Pricing`] if a line total could not be computed.
    pub fn receipt(&self) -> Result<Receipt<'a>, StoreError> {
        Ok(Receipt::from_cart(&self.cart)?)
    }

    /// Hand the final total off for payment.
    ///
    /// Nothing is sent anywhere and the cart is left as it is.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Pricing`] if the total could not be computed.
    pub fn checkout(&mut self) -> Result<Checkout<'a>, StoreError> {
        let total = self.cart.total()?;

        info!(%total, payment_url = %self.payment_url, "checkout");

        self.sink.notify(Notification::CheckedOut {
            total: total.to_string(),
            payment_url: self.payment_url.clone(),
        });

        Ok(Checkout {
            total,
            payment_url: self.payment_url.clone(),
        })
    }

    /// Replace the cart with a mutated copy once its total is known.
    ///
    /// A copy that cannot be priced is dropped, leaving the cart and the sink untouched.
    fn commit(
        &mut self,
        cart: Cart<'a>,
        notification: Notification,
    ) -> Result<Money<'a, Currency>, StoreError> {
        let total = cart.total()?;

        self.cart = cart;
        self.sink.notify(notification);

        Ok(total)
    }
}
