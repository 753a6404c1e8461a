use std::path::PathBuf;

use crate::auth::session::SessionConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the session secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `4567`).
    pub port: u16,
    /// Directory holding documents and their version folders (default: `data`).
    pub data_dir: PathBuf,
    /// Flat `username: hash` credential file (default: `users.yml`).
    pub credentials_path: PathBuf,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Session cookie signing and lifetime.
    pub session: SessionConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default      |
    /// |------------------------|--------------|
    /// | `HOST`                 | `0.0.0.0`    |
    /// | `PORT`                 | `4567`       |
    /// | `DATA_DIR`             | `data`       |
    /// | `CREDENTIALS_PATH`     | `users.yml`  |
    /// | `REQUEST_TIMEOUT_SECS` | `30`         |
    ///
    /// Session variables are documented on [`SessionConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "4567".into())
            .parse()
            .expect("PORT must be a valid u16");

        let data_dir = std::env::var("DATA_DIR")
            .unwrap_or_else(|_| "data".into())
            .into();

        let credentials_path = std::env::var("CREDENTIALS_PATH")
            .unwrap_or_else(|_| "users.yml".into())
            .into();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let session = SessionConfig::from_env();

        Self {
            host,
            port,
            data_dir,
            credentials_path,
            request_timeout_secs,
            session,
        }
    }
}
