//! HTTP surface for rentcal.

pub mod jobs;
pub mod routes;
pub mod singleton;
pub mod state;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::properties::router())
        .merge(routes::sync::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
