mod common;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};

use common::TestEnv;

// Minimal 1x1 PNG
fn png_bytes() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // PNG signature
        0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR chunk
        0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, // 1x1
        0x08, 0x02, 0x00, 0x00, 0x00, 0x90, 0x77, 0x53, 0xDE, // bit depth, color type, CRC
        0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, // IDAT chunk
        0x08, 0xD7, 0x63, 0xF8, 0xCF, 0xC0, 0x00, 0x00, // compressed data
        0x00, 0x02, 0x00, 0x01, 0xE2, 0x21, 0xBC, 0x33, // CRC
        0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, // IEND chunk
        0xAE, 0x42, 0x60, 0x82,
    ]
}

fn slide_form(order: &str) -> MultipartForm {
    MultipartForm::new()
        .add_part(
            "image",
            Part::bytes(png_bytes())
                .file_name("hero.png")
                .mime_type("image/png"),
        )
        .add_text("order", order)
}

async fn create_slide(
    server: &axum_test::TestServer,
    token: &str,
    order: &str,
) -> axum_test::TestResponse {
    server
        .post("/api/hero-slides")
        .authorization_bearer(token)
        .multipart(slide_form(order))
        .await
}

#[tokio::test]
async fn test_slide_create_and_serve_image() {
    let env = TestEnv::start().await;
    let server = env.server();
    let token = env.login(&server).await;

    let response = create_slide(&server, &token, "1").await;
    response.assert_status(StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["order"], 1);
    let image_url = body["data"]["imageUrl"].as_str().unwrap();
    assert!(image_url.starts_with("/api/hero-slides/image/"));
    assert!(image_url.contains("hero.png"));

    let image = server.get(image_url).await;
    image.assert_status_ok();
    assert_eq!(image.header("content-type"), "image/png");
    assert_eq!(image.as_bytes().to_vec(), png_bytes());
}

#[tokio::test]
async fn test_slide_listing_sorted_by_order() {
    let env = TestEnv::start().await;
    let server = env.server();
    let token = env.login(&server).await;

    create_slide(&server, &token, "3").await;
    create_slide(&server, &token, "1").await;
    create_slide(&server, &token, "2").await;

    let body: serde_json::Value = server.get("/api/hero-slides").await.json();
    let orders: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["order"].as_i64().unwrap())
        .collect();
    assert_eq!(orders, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_slide_create_rejections() {
    let env = TestEnv::start().await;
    let server = env.server_permissive();
    let token = env.login(&server).await;

    // No image part at all.
    let form = MultipartForm::new().add_text("order", "1");
    server
        .post("/api/hero-slides")
        .authorization_bearer(&token)
        .multipart(form)
        .await
        .assert_status_bad_request();

    // Image present, order missing.
    let form = MultipartForm::new().add_part(
        "image",
        Part::bytes(png_bytes())
            .file_name("hero.png")
            .mime_type("image/png"),
    );
    server
        .post("/api/hero-slides")
        .authorization_bearer(&token)
        .multipart(form)
        .await
        .assert_status_bad_request();

    // Non-image payload in the image field.
    let form = MultipartForm::new()
        .add_part(
            "image",
            Part::bytes(b"hello".to_vec())
                .file_name("notes.txt")
                .mime_type("text/plain"),
        )
        .add_text("order", "1");
    server
        .post("/api/hero-slides")
        .authorization_bearer(&token)
        .multipart(form)
        .await
        .assert_status_bad_request();

    // Order must be at least 1.
    create_slide(&server, &token, "0")
        .await
        .assert_status_bad_request();

    // And of course: no token, no slide.
    server
        .post("/api/hero-slides")
        .multipart(slide_form("1"))
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn test_slide_update_order_and_image() {
    let env = TestEnv::start().await;
    let server = env.server();
    let token = env.login(&server).await;

    let created: serde_json::Value = create_slide(&server, &token, "1").await.json();
    let id = created["data"]["_id"].as_str().unwrap();
    let old_image_url = created["data"]["imageUrl"].as_str().unwrap().to_string();

    // Order-only update keeps the image.
    let form = MultipartForm::new().add_text("order", "5");
    let updated: serde_json::Value = server
        .put(&format!("/api/hero-slides/{id}"))
        .authorization_bearer(&token)
        .multipart(form)
        .await
        .json();
    assert_eq!(updated["data"]["order"], 5);
    assert_eq!(updated["data"]["imageUrl"], old_image_url);

    // Replacing the image swaps the URL and removes the old object.
    let form = MultipartForm::new().add_part(
        "image",
        Part::bytes(png_bytes())
            .file_name("replacement.png")
            .mime_type("image/png"),
    );
    let replaced: serde_json::Value = server
        .put(&format!("/api/hero-slides/{id}"))
        .authorization_bearer(&token)
        .multipart(form)
        .await
        .json();
    let new_image_url = replaced["data"]["imageUrl"].as_str().unwrap();
    assert_ne!(new_image_url, old_image_url);
    assert!(new_image_url.contains("replacement.png"));

    let permissive = env.server_permissive();
    permissive.get(&old_image_url).await.assert_status_not_found();
    permissive.get(new_image_url).await.assert_status_ok();
}

#[tokio::test]
async fn test_slide_delete_removes_stored_image() {
    let env = TestEnv::start().await;
    let server = env.server_permissive();
    let token = env.login(&server).await;

    let created: serde_json::Value = create_slide(&server, &token, "1").await.json();
    let id = created["data"]["_id"].as_str().unwrap();
    let image_url = created["data"]["imageUrl"].as_str().unwrap().to_string();

    let deleted = server
        .delete(&format!("/api/hero-slides/{id}"))
        .authorization_bearer(&token)
        .await;
    deleted.assert_status_ok();

    let listing: serde_json::Value = server.get("/api/hero-slides").await.json();
    assert_eq!(listing["data"].as_array().unwrap().len(), 0);
    server.get(&image_url).await.assert_status_not_found();

    // Deleting again is a 404.
    server
        .delete(&format!("/api/hero-slides/{id}"))
        .authorization_bearer(&token)
        .await
        .assert_status_not_found();
}
