//! Storefront
//!
//! A grocery storefront: browse a catalog of products grouped into categories, fill a cart,
//! and price it with support for a single bundle promotion ("two for").

pub mod cart;
pub mod catalog;
pub mod config;
pub mod fixtures;
pub mod logging;
pub mod notifications;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod promotions;
pub mod receipt;
pub mod shell;
pub mod store;
