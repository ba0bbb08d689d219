//! API endpoints.

mod admin;
mod meta;
mod nominations;
mod wall;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/meta", meta::router())
        .nest("/nominations", nominations::router())
        .nest("/admin", admin::router())
        .nest("/wall", wall::router())
}
