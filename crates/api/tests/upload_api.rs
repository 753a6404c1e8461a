//! HTTP-level integration tests for image uploads.

mod common;

use axum::http::StatusCode;
use common::{body_text, location, TestApp};

#[tokio::test]
async fn upload_page_has_form() {
    let t = TestApp::new();

    let response = t.admin_get("/upload").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains(r#"action="/upload/image""#));
    assert!(body.contains(r#"name="upload""#));
}

#[tokio::test]
async fn upload_valid_image_url() {
    let t = TestApp::new();
    let url = "https://example.com/images/sunset_photo.png";

    let response = t.admin_post("/upload/image", &[("upload", url)]).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/");
    let session = t.session_of(&response);
    let flash = session.flash.expect("upload should flash");
    assert!(flash.starts_with("Image "));
    assert!(flash.ends_with(" has been successfully uploaded!"));

    let filename = t
        .state
        .documents
        .list()
        .unwrap()
        .into_iter()
        .find(|name| name.ends_with(".md"))
        .expect("an image document should exist");
    assert!(flash.contains(&filename));
    assert_eq!(
        t.read_document(&filename),
        format!("![{filename}]({url})")
    );

    // Viewing renders an <img> pointing at the URL.
    let body = body_text(t.admin_get(&format!("/{filename}")).await).await;
    assert!(body.contains(&format!(r#"<img src="{url}""#)));
}

#[tokio::test]
async fn upload_invalid_url_is_415() {
    let t = TestApp::new();

    for url in ["", "not a url", "https://example.com/doc.pdf", "ftp://example.com/a.png"] {
        let response = t.admin_post("/upload/image", &[("upload", url)]).await;

        assert_eq!(
            response.status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "url {url:?}"
        );
        let body = body_text(response).await;
        assert!(body.contains("Invalid image url. Please try again."));
        assert!(body.contains(r#"action="/upload/image""#));
    }

    assert!(t.state.documents.list().unwrap().is_empty());
}

#[tokio::test]
async fn upload_overlong_url_is_415() {
    let t = TestApp::new();
    let url = format!("https://example.com/{}.png", "a".repeat(300));

    let response = t.admin_post("/upload/image", &[("upload", &url)]).await;

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn upload_requires_signin() {
    let t = TestApp::new();

    let response = t
        .post(
            "/upload/image",
            &[("upload", "https://example.com/cat.jpg")],
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(t.state.documents.list().unwrap().is_empty());
}
