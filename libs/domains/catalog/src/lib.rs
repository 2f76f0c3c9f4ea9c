//! Catalog Domain
//!
//! Read-only product catalog: free-text search, brand/category/price
//! filtering, single-key sorting and page-based pagination over a MongoDB
//! collection.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← GET /products
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Normalization, limit cap, timeout, page envelope
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Filter    │  ← Store-independent predicate and sort
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB and in-memory implementations)
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_catalog::{handlers, CatalogService, MongoProductRepository};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("OrganStore");
//!
//! let repository = MongoProductRepository::new(&db);
//! let service = CatalogService::new(repository);
//!
//! let app = axum::Router::new().nest("/products", handlers::router(service));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod filter;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod query;
pub mod repository;
pub mod service;

pub use error::{CatalogError, CatalogResult};
pub use filter::{Facet, FindSpec, ProductFilter, SortSpec};
pub use handlers::ApiDoc;
pub use memory::InMemoryProductRepository;
pub use models::{Product, ProductPage, RawProductQuery};
pub use mongodb::MongoProductRepository;
pub use query::{PriceRange, ProductQuery, SortDirection};
pub use repository::ProductRepository;
pub use service::{CatalogService, CatalogSettings};
