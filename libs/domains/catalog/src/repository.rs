use async_trait::async_trait;

use crate::error::CatalogResult;
use crate::filter::{FindSpec, ProductFilter};
use crate::models::Product;

/// Read access to the product collection.
///
/// Implementations must evaluate `filter` exactly as
/// [`ProductFilter::matches`] does.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Number of documents matching `filter`, ignoring pagination
    async fn count(&self, filter: &ProductFilter) -> CatalogResult<u64>;

    /// Matching documents, sorted, then skipped, then limited
    async fn find(&self, filter: &ProductFilter, spec: &FindSpec) -> CatalogResult<Vec<Product>>;
}
