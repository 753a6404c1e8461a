//! Request handlers, one module per resource.

pub mod documents;
pub mod uploads;
pub mod users;

use axum::response::Response;
use filecms_core::error::CoreError;

use crate::auth::session::Session;
use crate::error::AppResult;
use crate::response::redirect_with_flash;
use crate::state::AppState;

/// Turn a missing document into a flash redirect to `/`; propagate anything else.
pub(crate) fn recover_not_found(
    state: &AppState,
    session: Session,
    err: CoreError,
) -> AppResult<Response> {
    match err {
        CoreError::NotFound { .. } => redirect_with_flash(state, session, "/", err.to_string()),
        other => Err(other.into()),
    }
}
