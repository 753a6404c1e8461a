//! Handlers for `/upload` (image-by-URL documents).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Form;
use filecms_core::error::CoreError;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::session::SignedIn;
use crate::response::{page, redirect_with_flash};
use crate::state::AppState;
use crate::views;

/// Form body for `POST /upload/image`.
#[derive(Debug, Deserialize)]
pub struct UploadForm {
    #[serde(default)]
    pub upload: String,
}

/// GET /upload
pub async fn upload_page(
    State(state): State<AppState>,
    SignedIn(session): SignedIn,
) -> AppResult<Response> {
    page(&state, session, StatusCode::OK, "Upload Image", &views::upload_form(""))
}

/// POST /upload/image
///
/// Writes a markdown document embedding the image. A URL that fails
/// validation re-renders the form with a 415.
pub async fn upload_image(
    State(state): State<AppState>,
    SignedIn(mut session): SignedIn,
    Form(input): Form<UploadForm>,
) -> AppResult<Response> {
    match state.documents.create_image_document(&input.upload) {
        Ok(filename) => redirect_with_flash(
            &state,
            session,
            "/",
            format!("Image {filename} has been successfully uploaded!"),
        ),
        Err(err @ CoreError::InvalidImageUrl) => {
            session.flash(err.to_string());
            page(
                &state,
                session,
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Upload Image",
                &views::upload_form(&input.upload),
            )
        }
        Err(other) => Err(other.into()),
    }
}
