//! MongoDB test infrastructure
//!
//! Provides a `TestMongo` helper that creates a MongoDB container for testing.

use mongodb::bson::Document;
use mongodb::{Client, Database};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::mongo::Mongo;

/// Test MongoDB wrapper that ensures proper cleanup
///
/// The container is automatically stopped and removed when this struct is dropped.
///
/// # Example
///
/// ```no_run
/// use test_utils::{TestMongo, fixtures};
///
/// # async fn example() {
/// let mongo = TestMongo::new().await;
/// let db = mongo.database("OrganStore");
/// mongo.seed(&db, "Products", fixtures::catalog_documents()).await;
/// # }
/// ```
pub struct TestMongo {
    #[allow(dead_code)]
    container: ContainerAsync<Mongo>,
    client: Client,
    pub connection_string: String,
}

impl TestMongo {
    /// Create a new test MongoDB instance
    pub async fn new() -> Self {
        let mongo_image = Mongo::default().with_tag("7.0");

        let container = mongo_image
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let host_port = container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");

        let connection_string = format!("mongodb://127.0.0.1:{}", host_port);

        let client = Client::with_uri_str(&connection_string)
            .await
            .expect("Failed to create MongoDB client");

        tracing::info!(port = host_port, "Test MongoDB ready (mongo 7.0)");

        Self {
            container,
            client,
            connection_string,
        }
    }

    pub fn client(&self) -> Client {
        self.client.clone()
    }

    pub fn database(&self, name: &str) -> Database {
        self.client.database(name)
    }

    /// Insert documents in order, so natural order equals slice order.
    pub async fn seed(&self, db: &Database, collection: &str, documents: Vec<Document>) {
        if documents.is_empty() {
            return;
        }

        db.collection::<Document>(collection)
            .insert_many(documents)
            .await
            .expect("Failed to seed test collection");
    }

    /// Get the connection string for manual client creation
    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }
}

impl Drop for TestMongo {
    fn drop(&mut self) {
        tracing::debug!("Cleaning up test MongoDB container");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use mongodb::bson::doc;

    #[tokio::test]
    async fn test_seed_preserves_count() {
        let mongo = TestMongo::new().await;
        let db = mongo.database("seed_test");
        mongo.seed(&db, "Products", fixtures::catalog_documents()).await;

        let total = db
            .collection::<Document>("Products")
            .count_documents(doc! {})
            .await
            .unwrap();
        assert_eq!(total, 25);
    }
}
