//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for Catalog API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Read-only product catalog with search, filtering, sorting and pagination",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:4000", description = "Local development server")
    ),
    nest(
        (path = "/products", api = domain_catalog::ApiDoc)
    ),
    tags(
        (name = "Products", description = "Catalog search and browsing")
    )
)]
pub struct ApiDoc;
