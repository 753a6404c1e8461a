pub mod documents;
pub mod health;
pub mod uploads;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the application route tree.
///
/// Route hierarchy:
///
/// ```text
/// /users/signin                     sign-in form, sign in
/// /users/signout                    sign out (POST)
/// /users/signup                     sign-up form, create user
///
/// /                                 document listing
/// /new                              new-document form, create
/// /upload                           image upload form
/// /upload/image                     create image document (POST)
///
/// /{filename}                       view, update (POST)
/// /{filename}/edit                  edit form + version list
/// /{filename}/delete                delete with versions (POST)
/// /{filename}/copy                  copy to next free name(N) (POST)
/// /{filename}/{version}/view        view a version snapshot
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .merge(uploads::router())
        .merge(documents::router())
}
