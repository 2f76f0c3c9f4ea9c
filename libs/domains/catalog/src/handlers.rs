//! HTTP handlers for the Catalog API

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use axum_helpers::{
    AppError, ErrorResponse,
    errors::responses::{
        BadRequestQueryResponse, InternalServerErrorResponse, ServiceUnavailableResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{Product, ProductPage, RawProductQuery};
use crate::repository::ProductRepository;
use crate::service::CatalogService;

/// OpenAPI documentation for the Catalog API
#[derive(OpenApi)]
#[openapi(
    paths(list_products),
    components(
        schemas(Product, ProductPage, ErrorResponse),
        responses(
            BadRequestQueryResponse,
            InternalServerErrorResponse,
            ServiceUnavailableResponse
        )
    ),
    tags(
        (name = "Products", description = "Catalog search and browsing")
    )
)]
pub struct ApiDoc;

/// Create the catalog router. Mount it under `/products`.
pub fn router<R: ProductRepository + 'static>(service: CatalogService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products))
        .with_state(shared_service)
}

/// Search, filter, sort and paginate the catalog
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(RawProductQuery),
    responses(
        (status = 200, description = "One page of matching products", body = ProductPage),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<ProductPage>, AppError> {
    let Query(pairs) = query?;
    let raw = RawProductQuery::from_pairs(pairs);
    let page = service.list_products(&raw).await?;
    Ok(Json(page))
}
