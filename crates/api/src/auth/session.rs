//! Signed cookie sessions.
//!
//! The whole session (signed-in username and a one-shot flash message) lives
//! client-side in an HS256 token, so the server keeps no session table. A
//! cookie that fails signature or expiry checks is treated as an anonymous
//! session.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Default session lifetime in hours.
const DEFAULT_SESSION_EXPIRY_HOURS: i64 = 24;

/// Longest accepted session lifetime (one year).
const MAX_SESSION_EXPIRY_HOURS: i64 = 24 * 365;

/// Default name of the session cookie.
pub const DEFAULT_COOKIE_NAME: &str = "filecms_session";

/// Configuration for signing and naming session cookies.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HMAC-SHA256 secret used to sign and verify session tokens.
    pub secret: String,
    /// Session lifetime in hours (default: 24).
    pub expiry_hours: i64,
    /// Cookie name (default: `filecms_session`).
    pub cookie_name: String,
}

impl SessionConfig {
    /// Load session configuration from environment variables.
    ///
    /// | Env Var                | Required | Default           |
    /// |------------------------|----------|-------------------|
    /// | `SESSION_SECRET`       | **yes**  | --                |
    /// | `SESSION_EXPIRY_HOURS` | no       | `24`              |
    /// | `SESSION_COOKIE_NAME`  | no       | `filecms_session` |
    ///
    /// # Panics
    ///
    /// Panics if `SESSION_SECRET` is not set or is empty, or if
    /// `SESSION_EXPIRY_HOURS` is not between 1 and 8760.
    pub fn from_env() -> Self {
        let secret = std::env::var("SESSION_SECRET")
            .expect("SESSION_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "SESSION_SECRET must not be empty");

        let expiry_hours = parse_expiry_hours(
            &std::env::var("SESSION_EXPIRY_HOURS")
                .unwrap_or_else(|_| DEFAULT_SESSION_EXPIRY_HOURS.to_string()),
        );

        let cookie_name =
            std::env::var("SESSION_COOKIE_NAME").unwrap_or_else(|_| DEFAULT_COOKIE_NAME.into());

        Self {
            secret,
            expiry_hours,
            cookie_name,
        }
    }

    /// Session lifetime in seconds.
    pub fn expiry_secs(&self) -> i64 {
        self.expiry_hours.saturating_mul(3600)
    }
}

/// Parse `SESSION_EXPIRY_HOURS`.
///
/// # Panics
///
/// Panics unless `raw` is an integer in `1..=MAX_SESSION_EXPIRY_HOURS`.
fn parse_expiry_hours(raw: &str) -> i64 {
    let hours: i64 = raw
        .parse()
        .expect("SESSION_EXPIRY_HOURS must be a valid i64");
    assert!(
        (1..=MAX_SESSION_EXPIRY_HOURS).contains(&hours),
        "SESSION_EXPIRY_HOURS must be between 1 and {MAX_SESSION_EXPIRY_HOURS}"
    );
    hours
}

/// Per-visitor session state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Signed-in user, `None` when anonymous.
    pub username: Option<String>,
    /// Status message shown once on the next rendered page.
    pub flash: Option<String>,
}

impl Session {
    pub fn signed_in(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            flash: None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.username.is_some()
    }

    /// Queue a message for the next rendered page.
    pub fn flash(&mut self, message: impl Into<String>) {
        self.flash = Some(message.into());
    }

    /// Remove and return the pending flash message.
    pub fn take_flash(&mut self) -> Option<String> {
        self.flash.take()
    }
}

/// Claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flash: Option<String>,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
}

/// Sign `session` into a token valid for `config.expiry_hours`.
pub fn encode_session(
    session: &Session,
    config: &SessionConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = SessionClaims {
        username: session.username.clone(),
        flash: session.flash.clone(),
        exp: now.saturating_add(config.expiry_secs()),
        iat: now,
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify and decode a session token.
pub fn decode_session(
    token: &str,
    config: &SessionConfig,
) -> Result<Session, jsonwebtoken::errors::Error> {
    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(Session {
        username: data.claims.username,
        flash: data.claims.flash,
    })
}

/// Session carried by the request's `Cookie` headers, or an anonymous one.
pub fn session_from_headers(headers: &HeaderMap, config: &SessionConfig) -> Session {
    let Some(token) = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|raw| cookie_value(raw, &config.cookie_name))
    else {
        return Session::default();
    };

    match decode_session(token, config) {
        Ok(session) => session,
        Err(e) => {
            tracing::debug!(error = %e, "Discarding invalid session cookie");
            Session::default()
        }
    }
}

/// `Set-Cookie` value carrying a signed `session`.
pub fn session_cookie(
    session: &Session,
    config: &SessionConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let token = encode_session(session, config)?;
    Ok(format!(
        "{}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        config.cookie_name,
        config.expiry_secs()
    ))
}

/// Value of cookie `name` in a `Cookie` header value.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}
