//! Route definitions for image uploads.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::uploads;
use crate::state::AppState;

/// ```text
/// GET  /upload        -> upload_page
/// POST /upload/image  -> upload_image
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", get(uploads::upload_page))
        .route("/upload/image", post(uploads::upload_image))
}
