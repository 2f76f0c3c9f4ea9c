//! Integration tests for the Catalog domain
//!
//! These tests use real MongoDB via testcontainers to ensure the query
//! documents built by `MongoProductRepository` select, order and page
//! exactly like the in-memory reading of the same filter.

use domain_catalog::mongodb::DEFAULT_COLLECTION;
use domain_catalog::{
    CatalogService, InMemoryProductRepository, MongoProductRepository, ProductPage, RawProductQuery,
};
use mongodb::Database;
use test_utils::{TestDataBuilder, TestMongo, assertions::*, fixtures};

async fn seeded(mongo: &TestMongo, test_name: &str) -> Database {
    let builder = TestDataBuilder::from_test_name(test_name);
    let db = mongo.database(&builder.name("db", "catalog"));
    mongo
        .seed(&db, DEFAULT_COLLECTION, fixtures::catalog_documents())
        .await;
    db
}

fn raw(pairs: &[(&str, &str)]) -> RawProductQuery {
    RawProductQuery::from_pairs(pairs.iter().copied())
}

fn names(page: &ProductPage) -> Vec<String> {
    page.products
        .iter()
        .map(|p| assert_some(p.product_name.clone(), "productName"))
        .collect()
}

#[tokio::test]
async fn test_mongo_agrees_with_in_memory() {
    let mongo = TestMongo::new().await;
    let db = seeded(&mongo, "mongo_agrees").await;

    let stored = CatalogService::new(MongoProductRepository::new(&db));
    let memory = CatalogService::new(
        InMemoryProductRepository::from_documents(fixtures::catalog_documents()).unwrap(),
    );

    let queries = [
        raw(&[]),
        raw(&[("brands", "Medtronic"), ("limit", "10")]),
        raw(&[("search", "sTeNt")]),
        raw(&[("search", "Stent (")]),
        raw(&[("minPrice", "40.5"), ("maxPrice", "80.5")]),
        raw(&[("brands", "Abbott"), ("categories", "Neurology,Orthopedics")]),
        raw(&[("sortBy", "price"), ("order", "asc"), ("limit", "5"), ("page", "2")]),
        raw(&[("sortBy", "price"), ("limit", "25")]),
        raw(&[("page", "10")]),
        raw(&[("page", "1000000000000000000")]),
        raw(&[("brands", "Medtronic"), ("brands", "Abbott")]),
        raw(&[("maxPrice", "100abc"), ("page", "2.5"), ("limit", "4")]),
    ];

    for query in &queries {
        let expected = memory.list_products(query).await.unwrap();
        let actual = stored.list_products(query).await.unwrap();

        assert_eq!(actual.total_products, expected.total_products, "{:?}", query);
        assert_eq!(actual.total_pages, expected.total_pages, "{:?}", query);
        assert_eq!(names(&actual), names(&expected), "{:?}", query);
    }
}

#[tokio::test]
async fn test_mongo_products_keep_stored_fields() {
    let mongo = TestMongo::new().await;
    let db = seeded(&mongo, "stored_fields").await;
    let service = CatalogService::new(MongoProductRepository::new(&db));

    let page = service
        .list_products(&raw(&[("brands", "Medtronic"), ("limit", "1")]))
        .await
        .unwrap();

    let product = &page.products[0];
    assert!(product.id.is_some());
    assert_eq!(product.price, Some(10.0));
    assert_eq!(product.attributes.get_str("sku").ok(), Some("SKU-000"));
}

#[tokio::test]
async fn test_mongo_custom_collection() {
    let mongo = TestMongo::new().await;
    let db = mongo.database("custom_collection");
    let neurology = fixtures::catalog_where(|d| d.get_str("category").ok() == Some("Neurology"));
    mongo.seed(&db, "Inventory", neurology).await;

    let service = CatalogService::new(MongoProductRepository::with_collection(&db, "Inventory"));
    let page = service.list_products(&RawProductQuery::default()).await.unwrap();

    assert_eq!(page.total_products, 8);
}
