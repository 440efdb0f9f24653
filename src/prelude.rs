//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartLine, Decrement},
    catalog::{Catalog, CatalogError, Category},
    fixtures::{FixtureError, default_catalog, load_catalog, parse_catalog},
    notifications::{LogSink, Notification, NotificationSink},
    pricing::{PricingError, total_price},
    products::{Product, ProductKey},
    promotions::{BundlePromotion, BundleTerms, PAIR},
    receipt::{Receipt, ReceiptError},
    shell::{Shell, ShellError},
    store::{Checkout, Store, StoreError},
};
