use std::sync::Arc;

use filecms_core::credentials::CredentialStore;
use filecms_core::error::CoreError;
use filecms_core::store::DocumentStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (session secret, paths, timeouts).
    pub config: Arc<ServerConfig>,
    /// Documents and their version history.
    pub documents: Arc<DocumentStore>,
    /// Flat credential file.
    pub credentials: Arc<CredentialStore>,
}

impl AppState {
    /// Open the document store and credential file named by `config`.
    ///
    /// Creates the data directory if it does not exist yet.
    pub fn from_config(config: ServerConfig) -> Result<Self, CoreError> {
        let documents = DocumentStore::open(&config.data_dir)?;
        let credentials = CredentialStore::new(&config.credentials_path);

        Ok(Self {
            config: Arc::new(config),
            documents: Arc::new(documents),
            credentials: Arc::new(credentials),
        })
    }
}
