//! Authentication primitives.
//!
//! - [`password`] -- Argon2id hashing for the credential file.
//! - [`session`] -- Signed session cookies (username + flash message).

pub mod password;
pub mod session;
