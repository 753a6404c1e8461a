//! Session extractors.
//!
//! - [`session::Session`] -- The visitor's session, anonymous if absent.
//! - [`session::SignedIn`] -- Requires a signed-in user, otherwise redirects.

pub mod session;
