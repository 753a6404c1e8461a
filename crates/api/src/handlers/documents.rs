//! Handlers for documents and their versions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Form;
use filecms_core::error::CoreError;
use filecms_core::naming::split_name;
use filecms_core::store::UpdateOutcome;
use serde::Deserialize;

use crate::auth::session::Session;
use crate::error::AppResult;
use crate::handlers::recover_not_found;
use crate::middleware::session::SignedIn;
use crate::response::{found, page, redirect_with_flash, rendered};
use crate::state::AppState;
use crate::views;

/// Flash for an update that left the document unchanged.
pub const NO_CHANGES: &str = "No changes detected.";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Form body for `POST /new`.
#[derive(Debug, Deserialize)]
pub struct NewDocumentForm {
    #[serde(default)]
    pub filename: String,
}

/// Form body for `POST /{filename}`.
#[derive(Debug, Deserialize)]
pub struct UpdateForm {
    #[serde(default)]
    pub content: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /
///
/// Lists documents. Anonymous visitors are sent to the sign-in page with
/// their session (and any pending flash) left intact.
pub async fn index(State(state): State<AppState>, session: Session) -> AppResult<Response> {
    if !session.is_signed_in() {
        return Ok(found("/users/signin"));
    }

    let files = state.documents.list()?;
    page(&state, session, StatusCode::OK, "Documents", &views::index(&files))
}

/// GET /new
pub async fn new_page(
    State(state): State<AppState>,
    SignedIn(session): SignedIn,
) -> AppResult<Response> {
    page(&state, session, StatusCode::OK, "New Document", &views::new_form(""))
}

/// POST /new
///
/// Creates an empty document. An existing document of the same name is
/// truncated.
pub async fn create(
    State(state): State<AppState>,
    SignedIn(mut session): SignedIn,
    Form(input): Form<NewDocumentForm>,
) -> AppResult<Response> {
    match state.documents.create(&input.filename) {
        Ok(filename) => {
            redirect_with_flash(&state, session, "/", format!("{filename} was created."))
        }
        Err(err @ CoreError::InvalidName) => {
            session.flash(err.to_string());
            page(
                &state,
                session,
                StatusCode::UNPROCESSABLE_ENTITY,
                "New Document",
                &views::new_form(&input.filename),
            )
        }
        Err(other) => Err(other.into()),
    }
}

/// GET /{filename}
///
/// Markdown is rendered inside the layout; plain text is served as-is.
pub async fn show(
    State(state): State<AppState>,
    SignedIn(session): SignedIn,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    match state.documents.read(&filename) {
        Ok(content) => rendered(&state, session, &filename, content),
        Err(err) => recover_not_found(&state, session, err),
    }
}

/// GET /{filename}/edit
pub async fn edit(
    State(state): State<AppState>,
    SignedIn(session): SignedIn,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    let content = match state.documents.source(&filename) {
        Ok(content) => content,
        Err(err) => return recover_not_found(&state, session, err),
    };
    edit_page(&state, session, StatusCode::OK, &filename, &content)
}

/// POST /{filename}
///
/// Saves new content. When nothing changed the edit form comes back with a
/// 422 and no version is recorded.
pub async fn update(
    State(state): State<AppState>,
    SignedIn(mut session): SignedIn,
    Path(filename): Path<String>,
    Form(input): Form<UpdateForm>,
) -> AppResult<Response> {
    match state.documents.update(&filename, input.content.as_bytes()) {
        Ok(UpdateOutcome::Updated { .. }) => redirect_with_flash(
            &state,
            session,
            "/",
            format!("{filename} has been updated!"),
        ),
        Ok(UpdateOutcome::NoChange) => {
            session.flash(NO_CHANGES);
            edit_page(
                &state,
                session,
                StatusCode::UNPROCESSABLE_ENTITY,
                &filename,
                &input.content,
            )
        }
        Err(err) => recover_not_found(&state, session, err),
    }
}

/// POST /{filename}/delete
pub async fn delete(
    State(state): State<AppState>,
    SignedIn(session): SignedIn,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    match state.documents.delete(&filename) {
        Ok(()) => redirect_with_flash(&state, session, "/", format!("{filename} was deleted.")),
        Err(err) => recover_not_found(&state, session, err),
    }
}

/// POST /{filename}/copy
pub async fn copy(
    State(state): State<AppState>,
    SignedIn(session): SignedIn,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    match state.documents.copy(&filename) {
        Ok(copy) => redirect_with_flash(
            &state,
            session,
            "/",
            format!("{filename} was copied to {copy}."),
        ),
        Err(err) => recover_not_found(&state, session, err),
    }
}

/// GET /{filename}/{version}/view
///
/// Read-only view of a version snapshot.
pub async fn view_version(
    State(state): State<AppState>,
    SignedIn(session): SignedIn,
    Path((folder, version)): Path<(String, String)>,
) -> AppResult<Response> {
    match state.documents.view_version(&folder, &version) {
        Ok(content) => rendered(&state, session, &version, content),
        Err(err) => recover_not_found(&state, session, err),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn edit_page(
    state: &AppState,
    session: Session,
    status: StatusCode,
    filename: &str,
    content: &str,
) -> AppResult<Response> {
    let (stem, ext) = split_name(filename);
    let versions = state.documents.list_versions(stem, ext)?;
    page(
        state,
        session,
        status,
        &format!("Edit {filename}"),
        &views::edit_form(filename, content, &versions),
    )
}
