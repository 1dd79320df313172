pub mod bookmark_tags;
pub mod bookmarks;
pub mod health;

use crate::{db::gateway::Gateway, error::AppError};
use axum::{
    Router,
    routing::{any, get},
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

#[derive(Clone, Debug)]
pub struct AppState {
    pub gateway: Gateway,
}

/// Every route is served both at the root and under `/api`. Methods a route does not handle get the
/// same JSON 404 as unknown paths.
pub fn router(gateway: Gateway) -> Router {
    let routes = Router::new()
        .route("/bookmarks", get(bookmarks::list).post(bookmarks::create))
        .route("/bookmarks/tags", get(bookmark_tags::handler))
        .route("/health", any(health::handler))
        .method_not_allowed_fallback(not_found);

    Router::new()
        .nest("/api", routes.clone())
        .merge(routes)
        .fallback(not_found)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { gateway })
}

async fn not_found() -> AppError {
    AppError::NotFound
}
