//! Catalog
//!
//! Read-only product listing: ordered categories, standalone promotional items outside
//! any category, and at most one bundle promotion. Product names are the primary key.

use rustc_hash::{FxHashMap, FxHashSet};
use rusty_money::iso::Currency;
use slotmap::SlotMap;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    products::{Product, ProductKey},
    promotions::{BundlePromotion, BundleTerms},
};

/// Errors related to catalog construction and lookup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// No product with this name exists in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// No category with this name exists in the catalog.
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// A product with this name already exists.
    #[error("Duplicate product: {0}")]
    DuplicateProduct(String),

    /// A price is in a different currency to the catalog (expected, found).
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(&'static str, &'static str),
}

/// Named group of products, in display order.
#[derive(Debug, Clone)]
pub struct Category {
    name: String,
    products: SmallVec<[ProductKey; 8]>,
}

impl Category {
    /// Category name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of products in the category.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the category has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Product catalog
#[derive(Debug, Clone)]
pub struct Catalog<'a> {
    products: SlotMap<ProductKey, Product<'a>>,
    keys: FxHashMap<String, ProductKey>,
    categories: Vec<Category>,
    standalone: SmallVec<[ProductKey; 4]>,
    promotion: Option<BundlePromotion<'a>>,
    currency: &'a Currency,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog priced in the given currency.
    pub fn new(currency: &'a Currency) -> Self {
        Self {
            products: SlotMap::with_key(),
            keys: FxHashMap::default(),
            categories: Vec::new(),
            standalone: SmallVec::new(),
            promotion: None,
            currency,
        }
    }

    /// Add a category with its products.
    ///
    /// Either every product is added or none is.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::DuplicateProduct`]: a product name is already taken.
    /// - [`CatalogError::CurrencyMismatch`]: a product is priced in another currency.
    pub fn add_category(
        &mut self,
        name: impl Into<String>,
        products: impl IntoIterator<Item = Product<'a>>,
    ) -> Result<&mut Self, CatalogError> {
        let keys = self.insert_products(products.into_iter().collect())?;

        self.categories.push(Category {
            name: name.into(),
            products: keys.into_iter().collect(),
        });

        Ok(self)
    }

    /// Add a product that sits outside every category.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::DuplicateProduct`]: the product name is already taken.
    /// - [`CatalogError::CurrencyMismatch`]: the product is priced in another currency.
    pub fn add_standalone(&mut self, product: Product<'a>) -> Result<&mut Self, CatalogError> {
        let keys = self.insert_products(vec![product])?;

        self.standalone.extend(keys);

        Ok(self)
    }

    /// Set the bundle promotion, replacing any previous one.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::ProductNotFound`]: the promoted product is not in the catalog.
    /// - [`CatalogError::CurrencyMismatch`]: the bundle price is in another currency.
    pub fn set_promotion(
        &mut self,
        promotion: BundlePromotion<'a>,
    ) -> Result<&mut Self, CatalogError> {
        self.lookup(promotion.product())?;
        self.check_currency(promotion.terms().price().currency())?;

        self.promotion = Some(promotion);

        Ok(self)
    }

    fn insert_products(
        &mut self,
        products: Vec<Product<'a>>,
    ) -> Result<Vec<ProductKey>, CatalogError> {
        self.validate(&products)?;

        let keys = products
            .into_iter()
            .map(|product| {
                let name = product.name.clone();
                let key = self.products.insert(product);

                self.keys.insert(name, key);

                key
            })
            .collect();

        Ok(keys)
    }

    fn validate(&self, products: &[Product<'a>]) -> Result<(), CatalogError> {
        let mut seen = FxHashSet::default();

        for product in products {
            self.check_currency(product.currency())?;

            if self.keys.contains_key(&product.name) || !seen.insert(product.name.as_str()) {
                return Err(CatalogError::DuplicateProduct(product.name.clone()));
            }
        }

        Ok(())
    }

    fn check_currency(&self, currency: &Currency) -> Result<(), CatalogError> {
        if currency == self.currency {
            Ok(())
        } else {
            Err(CatalogError::CurrencyMismatch(
                self.currency.iso_alpha_code,
                currency.iso_alpha_code,
            ))
        }
    }

    /// Look up a product by exact name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProductNotFound`] if no product has this name.
    pub fn lookup(&self, name: &str) -> Result<&Product<'a>, CatalogError> {
        self.keys
            .get(name)
            .and_then(|key| self.products.get(*key))
            .ok_or_else(|| CatalogError::ProductNotFound(name.to_string()))
    }

    /// All products: categories in order, then standalone items.
    pub fn products(&self) -> impl Iterator<Item = &Product<'a>> {
        self.categories
            .iter()
            .flat_map(|category| category.products.iter())
            .chain(self.standalone.iter())
            .filter_map(|key| self.products.get(*key))
    }

    /// Categories in display order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Products of the named category, in display order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::CategoryNotFound`] if there is no such category.
    pub fn category(&self, name: &str) -> Result<Vec<&Product<'a>>, CatalogError> {
        let category = self
            .categories
            .iter()
            .find(|category| category.name == name)
            .ok_or_else(|| CatalogError::CategoryNotFound(name.to_string()))?;

        Ok(self.resolve(&category.products))
    }

    /// Products outside every category.
    pub fn standalone(&self) -> Vec<&Product<'a>> {
        self.resolve(&self.standalone)
    }

    fn resolve(&self, keys: &[ProductKey]) -> Vec<&Product<'a>> {
        keys.iter()
            .filter_map(|key| self.products.get(*key))
            .collect()
    }

    /// Products whose name contains `query`, ignoring case, in catalog order.
    ///
    /// A blank query matches nothing.
    pub fn search(&self, query: &str) -> Vec<&Product<'a>> {
        let query = query.trim().to_lowercase();

        if query.is_empty() {
            return Vec::new();
        }

        self.products()
            .filter(|product| product.name.to_lowercase().contains(&query))
            .collect()
    }

    /// The bundle promotion, if any.
    pub fn promotion(&self) -> Option<&BundlePromotion<'a>> {
        self.promotion.as_ref()
    }

    /// Bundle terms for the named product, if it is the promoted one.
    pub fn bundle_terms(&self, name: &str) -> Option<BundleTerms<'a>> {
        self.promotion
            .as_ref()
            .filter(|promotion| promotion.applies_to(name))
            .map(BundlePromotion::terms)
    }

    /// Number of products in the catalog.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Currency every price in the catalog is quoted in.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{
        Money,
        iso::{RUB, USD},
    };
    use testresult::TestResult;

    use super::*;

    fn rub(minor: i64) -> Money<'static, Currency> {
        Money::from_minor(minor, RUB)
    }

    fn test_catalog() -> TestResult<Catalog<'static>> {
        let mut catalog = Catalog::new(RUB);

        catalog
            .add_category(
                "Fruit",
                [
                    Product::new("Apples", "1 kg", rub(10_000)),
                    Product::new("Oranges", "1 kg", rub(12_000)),
                ],
            )?
            .add_category("Bakery", [Product::new("Bread", "1 pc", rub(3_000))])?
            .add_standalone(Product::new("Kinder", "1 pc", rub(15_000)))?
            .set_promotion(BundlePromotion::pair("Kinder", rub(25_999)))?;

        Ok(catalog)
    }

    #[test]
    fn lookup_finds_categorised_and_standalone_products() -> TestResult {
        let catalog = test_catalog()?;

        assert_eq!(catalog.lookup("Bread")?.price, rub(3_000));
        assert_eq!(catalog.lookup("Kinder")?.unit_label, "1 pc");

        Ok(())
    }

    #[test]
    fn lookup_unknown_product_errors() -> TestResult {
        let catalog = test_catalog()?;

        assert_eq!(
            catalog.lookup("Caviar"),
            Err(CatalogError::ProductNotFound("Caviar".to_string()))
        );

        Ok(())
    }

    #[test]
    fn products_are_flattened_in_display_order() -> TestResult {
        let catalog = test_catalog()?;

        let names: Vec<_> = catalog.products().map(|p| p.name.as_str()).collect();

        assert_eq!(names, ["Apples", "Oranges", "Bread", "Kinder"]);
        assert_eq!(catalog.len(), 4);

        Ok(())
    }

    #[test]
    fn category_lists_its_products() -> TestResult {
        let catalog = test_catalog()?;

        let fruit: Vec<_> = catalog
            .category("Fruit")?
            .into_iter()
            .map(|p| p.name.as_str())
            .collect();

        assert_eq!(fruit, ["Apples", "Oranges"]);
        assert_eq!(
            catalog.category("Toys").err(),
            Some(CatalogError::CategoryNotFound("Toys".to_string()))
        );

        Ok(())
    }

    #[test]
    fn duplicate_names_are_rejected_atomically() -> TestResult {
        let mut catalog = test_catalog()?;

        let result = catalog
            .add_category(
                "More",
                [
                    Product::new("Pears", "1 kg", rub(9_000)),
                    Product::new("Apples", "1 kg", rub(9_000)),
                ],
            )
            .map(|_| ());

        assert_eq!(
            result,
            Err(CatalogError::DuplicateProduct("Apples".to_string()))
        );
        assert!(catalog.lookup("Pears").is_err());
        assert_eq!(catalog.categories().len(), 2);

        Ok(())
    }

    #[test]
    fn duplicate_names_within_one_category_are_rejected() {
        let mut catalog = Catalog::new(RUB);

        let result = catalog
            .add_category(
                "Fruit",
                [
                    Product::new("Apples", "1 kg", rub(10_000)),
                    Product::new("Apples", "2 kg", rub(19_000)),
                ],
            )
            .map(|_| ());

        assert_eq!(
            result,
            Err(CatalogError::DuplicateProduct("Apples".to_string()))
        );
        assert!(catalog.is_empty());
    }

    #[test]
    fn foreign_currency_is_rejected() {
        let mut catalog = Catalog::new(RUB);

        let result = catalog
            .add_standalone(Product::new("Gum", "1 pc", Money::from_minor(100, USD)))
            .map(|_| ());

        assert_eq!(
            result,
            Err(CatalogError::CurrencyMismatch(
                RUB.iso_alpha_code,
                USD.iso_alpha_code
            ))
        );
    }

    #[test]
    fn promotion_must_reference_known_product() {
        let mut catalog = Catalog::new(RUB);

        let result = catalog
            .set_promotion(BundlePromotion::pair("Kinder", rub(25_999)))
            .map(|_| ());

        assert_eq!(
            result,
            Err(CatalogError::ProductNotFound("Kinder".to_string()))
        );
        assert!(catalog.promotion().is_none());
    }

    #[test]
    fn bundle_terms_only_for_promoted_product() -> TestResult {
        let catalog = test_catalog()?;

        let terms = catalog.bundle_terms("Kinder").ok_or("missing terms")?;

        assert_eq!(terms.price(), &rub(25_999));
        assert!(catalog.bundle_terms("Apples").is_none());

        Ok(())
    }

    #[test]
    fn search_is_case_insensitive_substring() -> TestResult {
        let catalog = test_catalog()?;

        let names: Vec<_> = catalog
            .search("  AN ")
            .into_iter()
            .map(|p| p.name.as_str())
            .collect();

        assert_eq!(names, ["Oranges"]);
        assert_eq!(catalog.search("e").len(), 4);
        assert!(catalog.search("   ").is_empty());
        assert!(catalog.search("zzz").is_empty());

        Ok(())
    }

    #[test]
    fn search_handles_cyrillic_names() -> TestResult {
        let mut catalog = Catalog::new(RUB);

        catalog.add_category("Фрукты", [Product::new("Яблоки", "1 кг", rub(10_000))])?;

        assert_eq!(catalog.search("ябл").len(), 1);

        Ok(())
    }
}
