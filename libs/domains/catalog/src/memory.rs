//! In-process ProductRepository over a fixed list of documents.
//!
//! Insertion order is the natural order. Sorting is stable, so documents
//! with equal keys keep their insertion order.

use async_trait::async_trait;
use mongodb::bson::{self, Document};
use std::time::Duration;
use tracing::instrument;

use crate::error::CatalogResult;
use crate::filter::{FindSpec, ProductFilter};
use crate::models::Product;
use crate::repository::ProductRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryProductRepository {
    products: Vec<Product>,
    latency: Option<Duration>,
}

impl InMemoryProductRepository {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            latency: None,
        }
    }

    /// Decode stored documents the same way the MongoDB adapter does.
    pub fn from_documents(documents: Vec<Document>) -> Result<Self, bson::de::Error> {
        let products = documents
            .into_iter()
            .map(bson::from_document)
            .collect::<Result<Vec<Product>, _>>()?;
        Ok(Self::new(products))
    }

    /// Delay every call, to simulate a slow store.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    #[instrument(skip_all)]
    async fn count(&self, filter: &ProductFilter) -> CatalogResult<u64> {
        self.simulate_latency().await;
        Ok(self.products.iter().filter(|p| filter.matches(p)).count() as u64)
    }

    #[instrument(skip(self, filter))]
    async fn find(&self, filter: &ProductFilter, spec: &FindSpec) -> CatalogResult<Vec<Product>> {
        self.simulate_latency().await;

        let mut matched: Vec<&Product> = self.products.iter().filter(|p| filter.matches(p)).collect();

        if let Some(sort) = &spec.sort {
            matched.sort_by(|a, b| sort.compare(a, b));
        }

        let skip = usize::try_from(spec.skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(spec.limit).unwrap_or(usize::MAX);

        Ok(matched.into_iter().skip(skip).take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::SortSpec;
    use crate::query::SortDirection;
    use mongodb::bson::doc;

    fn repo() -> InMemoryProductRepository {
        InMemoryProductRepository::from_documents(vec![
            doc! { "productName": "B", "price": 20, "rating": 4 },
            doc! { "productName": "A", "price": 10 },
            doc! { "productName": "C", "price": 20, "rating": 5 },
            doc! { "productName": "D" },
        ])
        .unwrap()
    }

    fn names(products: &[Product]) -> Vec<&str> {
        products
            .iter()
            .map(|p| p.product_name.as_deref().unwrap_or_default())
            .collect()
    }

    fn spec(sort: Option<(&str, SortDirection)>, skip: u64, limit: u64) -> FindSpec {
        FindSpec {
            sort: sort.map(|(field, direction)| SortSpec {
                field: field.into(),
                direction,
            }),
            skip,
            limit,
        }
    }

    #[tokio::test]
    async fn test_count_uses_price_facet() {
        let repo = repo();
        assert_eq!(repo.len(), 4);
        // "D" has no price
        assert_eq!(repo.count(&ProductFilter::from_query(&Default::default())).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_find_natural_order() {
        let repo = repo();
        let filter = ProductFilter::from_query(&Default::default());
        let found = repo.find(&filter, &spec(None, 0, 10)).await.unwrap();
        assert_eq!(names(&found), ["B", "A", "C"]);
    }

    #[tokio::test]
    async fn test_find_sort_is_stable() {
        let repo = repo();
        let filter = ProductFilter::from_query(&Default::default());

        let asc = repo
            .find(&filter, &spec(Some(("price", SortDirection::Ascending)), 0, 10))
            .await
            .unwrap();
        assert_eq!(names(&asc), ["A", "B", "C"]);

        let desc = repo
            .find(&filter, &spec(Some(("price", SortDirection::Descending)), 0, 10))
            .await
            .unwrap();
        assert_eq!(names(&desc), ["B", "C", "A"]);
    }

    #[tokio::test]
    async fn test_find_missing_sort_field_sorts_lowest() {
        let repo = repo();
        let filter = ProductFilter::from_query(&Default::default());
        let found = repo
            .find(&filter, &spec(Some(("rating", SortDirection::Ascending)), 0, 10))
            .await
            .unwrap();
        assert_eq!(names(&found), ["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_find_skip_and_limit() {
        let repo = repo();
        let filter = ProductFilter::from_query(&Default::default());

        let found = repo.find(&filter, &spec(None, 1, 1)).await.unwrap();
        assert_eq!(names(&found), ["A"]);

        let found = repo.find(&filter, &spec(None, u64::MAX, 5)).await.unwrap();
        assert!(found.is_empty());
    }
}
