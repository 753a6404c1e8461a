//! Domain logic for the file-based content manager.
//!
//! Everything here is free of HTTP concerns so the API crate and the tests
//! can drive documents, versions and credentials directly.

pub mod credentials;
pub mod error;
pub mod fs;
pub mod naming;
pub mod render;
pub mod store;
pub mod version;
