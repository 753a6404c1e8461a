#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::LazyLock;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use filecms_api::auth::password::hash_password;
use filecms_api::auth::session::{
    cookie_value, decode_session, encode_session, Session, SessionConfig, DEFAULT_COOKIE_NAME,
};
use filecms_api::config::ServerConfig;
use filecms_api::router::build_app_router;
use filecms_api::state::AppState;
use filecms_api::views::encode_segment;

pub const ADMIN: &str = "admin";
pub const ADMIN_PASSWORD: &str = "secret";

/// Argon2 is slow in debug builds; hash the fixture password once.
static ADMIN_HASH: LazyLock<String> =
    LazyLock::new(|| hash_password(ADMIN_PASSWORD).expect("hashing should succeed"));

/// An isolated application: its own data directory and credential file.
pub struct TestApp {
    pub dir: TempDir,
    pub state: AppState,
}

impl TestApp {
    /// Fresh app whose credential file holds `admin` / `secret`.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config = test_config(dir.path().join("data"), dir.path().join("users.yml"));
        std::fs::write(&config.credentials_path, format!("{ADMIN}: {}\n", *ADMIN_HASH))
            .expect("write credential file");

        let state = AppState::from_config(config).expect("open app state");
        Self { dir, state }
    }

    pub fn app(&self) -> Router {
        build_app_router(self.state.clone())
    }

    pub fn data_dir(&self) -> PathBuf {
        self.state.config.data_dir.clone()
    }

    /// Write a document straight into the data directory.
    pub fn create_document(&self, name: &str, content: &str) {
        std::fs::write(self.data_dir().join(name), content).expect("write document");
    }

    pub fn read_document(&self, name: &str) -> String {
        std::fs::read_to_string(self.data_dir().join(name)).expect("read document")
    }

    /// `Cookie` header value for a signed-in admin session.
    pub fn admin_cookie(&self) -> String {
        self.cookie_for(&Session::signed_in(ADMIN))
    }

    pub fn cookie_for(&self, session: &Session) -> String {
        let token = encode_session(session, &self.state.config.session)
            .expect("encoding should succeed");
        format!("{}={token}", self.state.config.session.cookie_name)
    }

    /// Session carried by a response's `Set-Cookie` header.
    pub fn session_of<B>(&self, response: &Response<B>) -> Session {
        let header = response
            .headers()
            .get(SET_COOKIE)
            .expect("response should set the session cookie")
            .to_str()
            .unwrap();
        let token = cookie_value(header, &self.state.config.session.cookie_name)
            .expect("Set-Cookie should carry the session");
        decode_session(token, &self.state.config.session).expect("session should decode")
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        send(self.app(), "GET", uri, None, cookie).await
    }

    pub async fn post(&self, uri: &str, fields: &[(&str, &str)], cookie: Option<&str>) -> Response<Body> {
        send(self.app(), "POST", uri, Some(form(fields)), cookie).await
    }

    /// GET as the signed-in admin.
    pub async fn admin_get(&self, uri: &str) -> Response<Body> {
        let cookie = self.admin_cookie();
        self.get(uri, Some(&cookie)).await
    }

    /// POST as the signed-in admin.
    pub async fn admin_post(&self, uri: &str, fields: &[(&str, &str)]) -> Response<Body> {
        let cookie = self.admin_cookie();
        self.post(uri, fields, Some(&cookie)).await
    }
}

/// Build a test `ServerConfig` with a fixed session secret.
pub fn test_config(data_dir: PathBuf, credentials_path: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        data_dir,
        credentials_path,
        request_timeout_secs: 30,
        session: SessionConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            expiry_hours: 1,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
        },
    }
}

/// `application/x-www-form-urlencoded` body from field pairs.
pub fn form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{}={}", encode_segment(key), encode_segment(value)))
        .collect::<Vec<_>>()
        .join("&")
}

async fn send(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<String>,
    cookie: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body)),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    app.oneshot(request).await.unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn location<B>(response: &Response<B>) -> &str {
    response
        .headers()
        .get(LOCATION)
        .expect("response should redirect")
        .to_str()
        .unwrap()
}

pub fn content_type<B>(response: &Response<B>) -> &str {
    response
        .headers()
        .get(CONTENT_TYPE)
        .expect("response should have a content type")
        .to_str()
        .unwrap()
}
