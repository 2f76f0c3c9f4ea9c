//! API routes module

pub mod health;
pub mod products;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Plain-text greeting served at `/`
pub const GREETING: &str = "Hi OrganStore users";

async fn greeting() -> &'static str {
    GREETING
}

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    compose(products::router(state), health::router(state.clone()))
}

fn compose(products: Router, health: Router) -> Router {
    Router::new()
        .route("/", get(greeting))
        .nest("/products", products)
        .merge(health)
}
