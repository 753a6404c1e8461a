//! Shared response builders for HTML handlers.
//!
//! Every response that changes the session (setting or consuming a flash,
//! signing in or out) re-issues the session cookie. Use these helpers rather
//! than assembling `Set-Cookie` headers by hand.

use axum::http::header::{CONTENT_TYPE, LOCATION, SET_COOKIE};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use filecms_core::render::{ContentKind, RenderedContent};

use crate::auth::session::{session_cookie, Session};
use crate::error::AppResult;
use crate::state::AppState;
use crate::views;

/// `302 Found` to `location` without touching the session.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}

/// `302 Found` to `location`, persisting `session`.
pub fn redirect(state: &AppState, session: &Session, location: &str) -> AppResult<Response> {
    let cookie = session_cookie(session, &state.config.session)?;
    Ok((
        StatusCode::FOUND,
        [(LOCATION, location.to_string()), (SET_COOKIE, cookie)],
    )
        .into_response())
}

/// Queue `message` and redirect to `location`.
pub fn redirect_with_flash(
    state: &AppState,
    mut session: Session,
    location: &str,
    message: impl Into<String>,
) -> AppResult<Response> {
    session.flash(message);
    redirect(state, &session, location)
}

/// Render `body` inside the site layout, consuming any pending flash.
pub fn page(
    state: &AppState,
    mut session: Session,
    status: StatusCode,
    title: &str,
    body: &str,
) -> AppResult<Response> {
    let flash = session.take_flash();
    let html = views::layout(title, flash.as_deref(), session.username.as_deref(), body);
    let cookie = session_cookie(&session, &state.config.session)?;
    Ok((status, [(SET_COOKIE, cookie)], Html(html)).into_response())
}

/// Serve a document or snapshot: HTML inside the layout, anything else raw.
pub fn rendered(
    state: &AppState,
    session: Session,
    title: &str,
    content: RenderedContent,
) -> AppResult<Response> {
    match content.kind {
        ContentKind::Html => {
            let body = String::from_utf8_lossy(&content.body);
            page(state, session, StatusCode::OK, title, &body)
        }
        kind => Ok((
            StatusCode::OK,
            [(CONTENT_TYPE, kind.content_type())],
            content.body,
        )
            .into_response()),
    }
}
