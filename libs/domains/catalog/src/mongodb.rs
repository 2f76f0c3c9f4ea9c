//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{Bson, Document, doc},
    options::FindOptions,
};
use tracing::instrument;

use crate::error::CatalogResult;
use crate::filter::{Facet, FindSpec, ProductFilter, SortSpec};
use crate::models::Product;
use crate::repository::ProductRepository;

/// Collection name used when none is configured.
pub const DEFAULT_COLLECTION: &str = "Products";

pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, DEFAULT_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<Product>(collection_name);
        Self { collection }
    }

    pub fn collection(&self) -> &Collection<Product> {
        &self.collection
    }

    /// Render a ProductFilter as a MongoDB query document.
    pub fn build_filter(filter: &ProductFilter) -> Document {
        let mut doc = doc! {};

        for facet in filter.facets() {
            match facet {
                Facet::Text(text) => {
                    doc.insert(
                        "productName",
                        doc! { "$regex": text.pattern(), "$options": "i" },
                    );
                }
                Facet::Price(range) => {
                    doc.insert("price", doc! { "$gte": range.min, "$lte": range.max });
                }
                Facet::Brand(brands) => {
                    doc.insert("brand", doc! { "$in": string_array(brands) });
                }
                Facet::Category(categories) => {
                    doc.insert("category", doc! { "$in": string_array(categories) });
                }
            }
        }

        doc
    }

    /// `{field: 1 | -1}`, or `None` for natural order.
    pub fn build_sort(sort: Option<&SortSpec>) -> Option<Document> {
        sort.map(|spec| {
            let mut doc = Document::new();
            doc.insert(spec.field.clone(), spec.direction.as_i32());
            doc
        })
    }

    /// Skip and limit are clamped to `i64::MAX`, the largest value the
    /// driver can put on the wire.
    fn find_options(spec: &FindSpec) -> FindOptions {
        FindOptions::builder()
            .sort(Self::build_sort(spec.sort.as_ref()))
            .skip(spec.skip.min(i64::MAX as u64))
            .limit(i64::try_from(spec.limit).unwrap_or(i64::MAX))
            .build()
    }
}

fn string_array<'a>(values: impl IntoIterator<Item = &'a String>) -> Vec<Bson> {
    values.into_iter().map(|v| Bson::String(v.clone())).collect()
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, filter))]
    async fn count(&self, filter: &ProductFilter) -> CatalogResult<u64> {
        let mongo_filter = Self::build_filter(filter);
        let count = self.collection.count_documents(mongo_filter).await?;
        Ok(count)
    }

    #[instrument(skip(self, filter), fields(skip = spec.skip, limit = spec.limit))]
    async fn find(&self, filter: &ProductFilter, spec: &FindSpec) -> CatalogResult<Vec<Product>> {
        let mongo_filter = Self::build_filter(filter);

        let cursor = self
            .collection
            .find(mongo_filter)
            .with_options(Self::find_options(spec))
            .await?;
        let products: Vec<Product> = cursor.try_collect().await?;

        Ok(products)
    }
}
