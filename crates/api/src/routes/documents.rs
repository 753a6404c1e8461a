//! Route definitions for documents and versions.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::documents;
use crate::state::AppState;

/// ```text
/// GET  /                          -> index
/// GET  /new                       -> new_page
/// POST /new                       -> create
/// GET  /{filename}                -> show
/// POST /{filename}                -> update
/// GET  /{filename}/edit           -> edit
/// POST /{filename}/delete         -> delete
/// POST /{filename}/copy           -> copy
/// GET  /{filename}/{version}/view -> view_version
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(documents::index))
        .route("/new", get(documents::new_page).post(documents::create))
        .route(
            "/{filename}",
            get(documents::show).post(documents::update),
        )
        .route("/{filename}/edit", get(documents::edit))
        .route("/{filename}/delete", post(documents::delete))
        .route("/{filename}/copy", post(documents::copy))
        // First segment is the document stem, i.e. its version folder.
        .route("/{filename}/{version}/view", get(documents::view_version))
}
