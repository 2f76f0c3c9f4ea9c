//! Catalog routes

use axum::Router;
use domain_catalog::{CatalogService, MongoProductRepository, handlers};

use crate::state::AppState;

/// Create the catalog router over the configured collection
pub fn router(state: &AppState) -> Router {
    let repository = MongoProductRepository::with_collection(&state.db, &state.config.collection);
    let service = CatalogService::with_settings(repository, state.config.catalog.clone());
    handlers::router(service)
}
