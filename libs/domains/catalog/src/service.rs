//! Catalog Service - query pipeline and pagination

use core_config::{ConfigError, FromEnv, env_parse_opt, env_parse_or};
use std::sync::Arc;
use std::time::Duration;
use tracing::{instrument, warn};

use crate::error::{CatalogError, CatalogResult};
use crate::filter::{FindSpec, ProductFilter};
use crate::models::{ProductPage, RawProductQuery};
use crate::query::ProductQuery;
use crate::repository::ProductRepository;

/// Request-independent policy for catalog queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSettings {
    /// Upper bound on `limit`; `None` leaves it unbounded
    pub max_page_limit: Option<u64>,
    /// Budget for the count and fetch round trips together
    pub query_timeout: Duration,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            max_page_limit: None,
            query_timeout: Duration::from_secs(10),
        }
    }
}

impl FromEnv for CatalogSettings {
    /// - `CATALOG_MAX_PAGE_LIMIT` (optional, must be at least 1)
    /// - `CATALOG_QUERY_TIMEOUT_MS` (default: 10000)
    fn from_env() -> Result<Self, ConfigError> {
        let max_page_limit: Option<u64> = env_parse_opt("CATALOG_MAX_PAGE_LIMIT")?;
        if max_page_limit == Some(0) {
            return Err(ConfigError::ParseError {
                key: "CATALOG_MAX_PAGE_LIMIT".to_string(),
                details: "must be at least 1".to_string(),
            });
        }

        let timeout_ms: u64 = env_parse_or("CATALOG_QUERY_TIMEOUT_MS", 10_000)?;

        Ok(Self {
            max_page_limit,
            query_timeout: Duration::from_millis(timeout_ms),
        })
    }
}

/// Runs catalog queries against a repository.
pub struct CatalogService<R: ProductRepository> {
    repository: Arc<R>,
    settings: CatalogSettings,
}

impl<R: ProductRepository> CatalogService<R> {
    pub fn new(repository: R) -> Self {
        Self::with_settings(repository, CatalogSettings::default())
    }

    pub fn with_settings(repository: R, settings: CatalogSettings) -> Self {
        Self {
            repository: Arc::new(repository),
            settings,
        }
    }

    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    /// Normalize raw parameters and apply the configured limit cap.
    pub fn normalize(&self, raw: &RawProductQuery) -> ProductQuery {
        let mut query = ProductQuery::from_raw(raw);

        if let Some(max) = self.settings.max_page_limit
            && query.limit > max
        {
            warn!(requested = query.limit, max, "Page limit capped");
            query.limit = max;
        }

        query
    }

    /// Answer `GET /products`.
    #[instrument(skip(self, raw))]
    pub async fn list_products(&self, raw: &RawProductQuery) -> CatalogResult<ProductPage> {
        let query = self.normalize(raw);
        self.query(&query).await
    }

    /// Count and fetch one page for an already normalized request.
    ///
    /// Count and fetch are independent reads issued concurrently; a write
    /// landing between them can make the total disagree with the page.
    #[instrument(skip(self, query), fields(page = query.page, limit = query.limit))]
    pub async fn query(&self, query: &ProductQuery) -> CatalogResult<ProductPage> {
        let filter = ProductFilter::from_query(query);
        let spec = FindSpec::from_query(query);

        let reads = async {
            tokio::try_join!(
                self.repository.count(&filter),
                self.repository.find(&filter, &spec)
            )
        };

        let timeout = self.settings.query_timeout;
        let (total_products, products) = tokio::time::timeout(timeout, reads)
            .await
            .map_err(|_| CatalogError::Timeout(timeout))??;

        tracing::debug!(
            total_products,
            returned = products.len(),
            "Catalog query completed"
        );

        Ok(ProductPage::new(products, total_products, query.page, query.limit))
    }
}

impl<R: ProductRepository> Clone for CatalogService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            settings: self.settings.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Facet;
    use crate::models::Product;
    use crate::repository::MockProductRepository;

    fn products(n: usize) -> Vec<Product> {
        (0..n)
            .map(|i| Product {
                product_name: Some(format!("Product {}", i)),
                price: Some(i as f64),
                ..Default::default()
            })
            .collect()
    }

    fn raw_page(page: &str, limit: &str) -> RawProductQuery {
        RawProductQuery {
            page: Some(page.into()),
            limit: Some(limit.into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_list_products_builds_envelope() {
        let mut mock_repo = MockProductRepository::new();

        mock_repo.expect_count().times(1).returning(|_| Ok(25));
        mock_repo
            .expect_find()
            .withf(|_, spec| spec.skip == 12 && spec.limit == 12 && spec.sort.is_none())
            .times(1)
            .returning(|_, _| Ok(products(12)));

        let service = CatalogService::new(mock_repo);
        let page = service.list_products(&raw_page("2", "12")).await.unwrap();

        assert_eq!(page.total_products, 25);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.products.len(), 12);
    }

    #[tokio::test]
    async fn test_page_past_end_keeps_metadata() {
        let mut mock_repo = MockProductRepository::new();

        mock_repo.expect_count().returning(|_| Ok(5));
        mock_repo
            .expect_find()
            .withf(|_, spec| spec.skip == 108)
            .returning(|_, _| Ok(vec![]));

        let service = CatalogService::new(mock_repo);
        let page = service.list_products(&raw_page("10", "12")).await.unwrap();

        assert!(page.products.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 10);
        assert_eq!(page.total_products, 5);
    }

    #[tokio::test]
    async fn test_count_and_find_receive_same_filter() {
        let mut mock_repo = MockProductRepository::new();

        mock_repo
            .expect_count()
            .withf(|filter| filter.facets().len() == 2)
            .returning(|_| Ok(0));
        mock_repo
            .expect_find()
            .withf(|filter, _| matches!(filter.facets().last(), Some(Facet::Brand(b)) if b.contains("Medtronic")))
            .returning(|_, _| Ok(vec![]));

        let service = CatalogService::new(mock_repo);
        let raw = RawProductQuery {
            brands: Some("Medtronic".into()),
            ..Default::default()
        };
        let page = service.list_products(&raw).await.unwrap();
        assert_eq!(page.total_pages, 0);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut mock_repo = MockProductRepository::new();

        mock_repo
            .expect_count()
            .returning(|_| Err(CatalogError::Database("connection refused".into())));
        mock_repo.expect_find().returning(|_, _| Ok(vec![]));

        let service = CatalogService::new(mock_repo);
        let err = service
            .list_products(&RawProductQuery::default())
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::Database(msg) if msg.contains("refused")));
    }

    #[tokio::test]
    async fn test_limit_cap_applies() {
        let mut mock_repo = MockProductRepository::new();

        mock_repo.expect_count().returning(|_| Ok(1000));
        mock_repo
            .expect_find()
            .withf(|_, spec| spec.limit == 100 && spec.skip == 100)
            .returning(|_, _| Ok(vec![]));

        let service = CatalogService::with_settings(
            mock_repo,
            CatalogSettings {
                max_page_limit: Some(100),
                ..Default::default()
            },
        );
        let page = service.list_products(&raw_page("2", "5000")).await.unwrap();

        assert_eq!(page.total_pages, 10);
    }

    #[test]
    fn test_normalize_without_cap_is_unbounded() {
        let service = CatalogService::new(MockProductRepository::new());
        let query = service.normalize(&raw_page("1", "5000"));
        assert_eq!(query.limit, 5000);
    }

    #[tokio::test]
    async fn test_query_timeout() {
        let service = CatalogService::with_settings(
            crate::memory::InMemoryProductRepository::new(products(3))
                .with_latency(Duration::from_millis(200)),
            CatalogSettings {
                query_timeout: Duration::from_millis(20),
                ..Default::default()
            },
        );

        let err = service
            .list_products(&RawProductQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Timeout(_)));
    }

    #[test]
    fn test_settings_from_env() {
        temp_env::with_vars(
            [
                ("CATALOG_MAX_PAGE_LIMIT", Some("50")),
                ("CATALOG_QUERY_TIMEOUT_MS", Some("2500")),
            ],
            || {
                let settings = CatalogSettings::from_env().unwrap();
                assert_eq!(settings.max_page_limit, Some(50));
                assert_eq!(settings.query_timeout, Duration::from_millis(2500));
            },
        );

        temp_env::with_vars_unset(["CATALOG_MAX_PAGE_LIMIT", "CATALOG_QUERY_TIMEOUT_MS"], || {
            assert_eq!(CatalogSettings::from_env().unwrap(), CatalogSettings::default());
        });

        temp_env::with_var("CATALOG_MAX_PAGE_LIMIT", Some("0"), || {
            assert!(CatalogSettings::from_env().is_err());
        });
    }
}
