//! Cookie-session extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};

use crate::auth::session::{session_from_headers, Session};
use crate::error::AppError;
use crate::response::redirect_with_flash;
use crate::state::AppState;

/// Flash shown when a protected route is hit without a session.
pub const SIGN_IN_REQUIRED: &str = "You must be signed in to do that.";

impl FromRequestParts<AppState> for Session {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(session_from_headers(&parts.headers, &state.config.session))
    }
}

/// Session of a signed-in user.
///
/// The username is checked against the credential file on every request, so
/// a session naming an unknown user counts as signed out. Rejects with a
/// `302` to `/` carrying [`SIGN_IN_REQUIRED`].
///
/// ```ignore
/// async fn my_handler(SignedIn(session): SignedIn) -> AppResult<Response> {
///     tracing::info!(user = ?session.username, "handling request");
///     ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SignedIn(pub Session);

impl FromRequestParts<AppState> for SignedIn {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let mut session = session_from_headers(&parts.headers, &state.config.session);

        if let Some(username) = session.username.clone() {
            match state.credentials.hash_for(&username) {
                Ok(Some(_)) => return Ok(SignedIn(session)),
                Ok(None) => {
                    tracing::warn!(%username, "Session names an unknown user");
                    session.username = None;
                }
                Err(e) => return Err(AppError::from(e).into_response()),
            }
        }

        Err(redirect_with_flash(state, session, "/", SIGN_IN_REQUIRED)
            .unwrap_or_else(IntoResponse::into_response))
    }
}
