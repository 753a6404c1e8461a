//! Handlers for `/users` (sign in, sign out, sign up).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Form;
use filecms_core::error::CoreError;
use serde::Deserialize;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::Session;
use crate::error::{AppError, AppResult};
use crate::response::{page, redirect, redirect_with_flash};
use crate::state::AppState;
use crate::views;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Form body for `POST /users/signin` and `POST /users/signup`.
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /users/signin
pub async fn signin_page(State(state): State<AppState>, session: Session) -> AppResult<Response> {
    page(&state, session, StatusCode::OK, "Sign In", &views::signin_form(""))
}

/// POST /users/signin
///
/// Checks the password against the credential file. On success the session
/// records the username; on failure the form is re-rendered with a 422.
pub async fn signin(
    State(state): State<AppState>,
    mut session: Session,
    Form(input): Form<CredentialsForm>,
) -> AppResult<Response> {
    if credentials_match(&state, &input.username, &input.password)? {
        tracing::info!(username = %input.username, "User signed in");
        session.username = Some(input.username);
        return redirect_with_flash(&state, session, "/", "Welcome!");
    }

    tracing::info!(username = %input.username, "Rejected sign-in");
    session.flash("Invalid Credentials");
    page(
        &state,
        session,
        StatusCode::UNPROCESSABLE_ENTITY,
        "Sign In",
        &views::signin_form(&input.username),
    )
}

/// POST /users/signout
pub async fn signout(State(state): State<AppState>, mut session: Session) -> AppResult<Response> {
    if let Some(username) = session.username.take() {
        tracing::info!(%username, "User signed out");
    }
    session.flash("You have been signed out.");
    redirect(&state, &session, "/")
}

/// GET /users/signup
pub async fn signup_page(State(state): State<AppState>, session: Session) -> AppResult<Response> {
    page(&state, session, StatusCode::OK, "Sign Up", &views::signup_form(""))
}

/// POST /users/signup
///
/// Validates the request, hashes the password and appends a credential
/// record. Validation failures re-render the form with a 422.
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Form(input): Form<CredentialsForm>,
) -> AppResult<Response> {
    if let Err(err) = state
        .credentials
        .validate_signup(&input.username, &input.password)
    {
        return signup_rejected(&state, session, &input.username, err);
    }

    let hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    // A concurrent signup may have taken the name since validation.
    if let Err(err) = state.credentials.append(&input.username, &hash) {
        return signup_rejected(&state, session, &input.username, err);
    }

    tracing::info!(username = %input.username, "User signed up");
    redirect_with_flash(
        &state,
        session,
        "/",
        format!("The user '{}' has been created!", input.username),
    )
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `true` if `username` exists and `password` matches its stored hash.
///
/// A stored hash that cannot be parsed counts as a mismatch.
fn credentials_match(state: &AppState, username: &str, password: &str) -> AppResult<bool> {
    let Some(hash) = state.credentials.hash_for(username)? else {
        return Ok(false);
    };

    match verify_password(password, &hash) {
        Ok(matched) => Ok(matched),
        Err(e) => {
            tracing::warn!(username, error = %e, "Unreadable password hash");
            Ok(false)
        }
    }
}

/// Re-render the signup form for a validation failure; propagate anything else.
fn signup_rejected(
    state: &AppState,
    mut session: Session,
    username: &str,
    err: CoreError,
) -> AppResult<Response> {
    match err {
        CoreError::InvalidUsername | CoreError::DuplicateUsername | CoreError::InvalidPassword => {
            session.flash(err.to_string());
            page(
                state,
                session,
                StatusCode::UNPROCESSABLE_ENTITY,
                "Sign Up",
                &views::signup_form(username),
            )
        }
        other => Err(other.into()),
    }
}
