//! Route definitions for the `/users` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET  /signin   -> signin_page
/// POST /signin   -> signin
/// POST /signout  -> signout
/// GET  /signup   -> signup_page
/// POST /signup   -> signup
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signin", get(users::signin_page).post(users::signin))
        .route("/signout", post(users::signout))
        .route("/signup", get(users::signup_page).post(users::signup))
}
