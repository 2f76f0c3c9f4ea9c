//! Shared test utilities for domain testing
//!
//! - `TestMongo`: MongoDB container with automatic cleanup (feature: "mongo")
//! - `TestDataBuilder`: deterministic test data generation (always available)
//! - `fixtures`: the reference product catalog (always available)
//!
//! # Features
//!
//! - `mongo` (default): Enables MongoDB container infrastructure
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDataBuilder, TestMongo, fixtures};
//!
//! #[tokio::test]
//! async fn my_mongo_test() {
//!     let mongo = TestMongo::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let db = mongo.database(&builder.name("db", "main"));
//!     mongo.seed(&db, "Products", fixtures::catalog_documents()).await;
//! }
//! ```

#[cfg(feature = "mongo")]
mod mongo;

#[cfg(feature = "mongo")]
pub use mongo::TestMongo;

use mongodb::bson::{Bson, Document, doc};

/// Builder for test data with deterministic variation
///
/// The same seed always produces the same documents.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_list_products");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate a unique name for testing
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.name("db", "main"), "test-db-7-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// `count` product documents with seed-dependent prices.
    pub fn products(&self, count: usize) -> Vec<Document> {
        (0..count)
            .map(|i| {
                let cents = (self.seed.wrapping_add(i as u64) % 10_000) as f64;
                doc! {
                    "productName": format!("Product {:03}", i),
                    "brand": fixtures::BRANDS[i % fixtures::BRANDS.len()],
                    "category": fixtures::CATEGORIES[i % fixtures::CATEGORIES.len()],
                    "price": cents / 100.0,
                }
            })
            .collect()
    }
}

/// Reference catalog shared by the catalog tests.
pub mod fixtures {
    use super::*;

    pub const BRANDS: [&str; 5] = ["Medtronic", "Abbott", "Philips", "Siemens", "Stryker"];
    pub const CATEGORIES: [&str; 3] = ["Cardiology", "Neurology", "Orthopedics"];
    pub const KINDS: [&str; 5] = [
        "Cardiac Stent",
        "Pulse Oximeter",
        "Bone Screw",
        "Nerve Stimulator",
        "Blood Pressure Monitor",
    ];

    /// Twenty-five products, five per brand.
    ///
    /// Document `i` has brand `BRANDS[i % 5]`, category `CATEGORIES[i % 3]`,
    /// name `"{brand} {KINDS[i / 5]}"` and price `10 * (i + 1)`. Every fourth
    /// document (`i % 4 == 3`) has a fractional price with 0.5 added. Even
    /// documents carry a `rating` of `i % 5`; odd ones have no rating.
    pub fn catalog_documents() -> Vec<Document> {
        (0..25)
            .map(|i: usize| {
                let brand = BRANDS[i % BRANDS.len()];
                let base = 10 * (i as i32 + 1);
                let price = if i % 4 == 3 {
                    Bson::Double(f64::from(base) + 0.5)
                } else {
                    Bson::Int32(base)
                };

                let mut document = doc! {
                    "productName": format!("{} {}", brand, KINDS[i / 5]),
                    "brand": brand,
                    "category": CATEGORIES[i % CATEGORIES.len()],
                    "price": price,
                    "sku": format!("SKU-{:03}", i),
                };
                if i % 2 == 0 {
                    document.insert("rating", (i % 5) as i32);
                }
                document
            })
            .collect()
    }

    /// Fixture documents for which `keep` holds.
    pub fn catalog_where(keep: impl Fn(&Document) -> bool) -> Vec<Document> {
        catalog_documents().into_iter().filter(|d| keep(d)).collect()
    }
}

/// Test assertion helpers
pub mod assertions {
    use mongodb::bson::Document;

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// The `productName` of each document, in order.
    pub fn product_names(documents: &[Document]) -> Vec<String> {
        documents
            .iter()
            .filter_map(|d| d.get_str("productName").ok().map(str::to_string))
            .collect()
    }
}
