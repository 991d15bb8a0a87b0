use axum::extract::{Multipart, Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;

use crate::api::response::ApiResponse;
use crate::auth::token::AdminClaims;
use crate::error::AppError;
use crate::models::hero_slide::{validate_order, HeroSlide};
use crate::models::parse_object_id;
use crate::state::AppState;

const IMAGE_KEY_PREFIX: &str = "hero-slides/";
const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// `GET /api/hero-slides`
pub async fn list_hero_slides(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<HeroSlide>>>, AppError> {
    let slides = state.hero_slides.list().await?;
    Ok(Json(ApiResponse::ok(
        "Hero slides retrieved successfully",
        slides,
    )))
}

/// Parsed multipart form for slide create/update: an optional image part
/// named `image` plus an optional `order` field.
struct SlideForm {
    image: Option<(String, Vec<u8>)>,
    order: Option<i32>,
}

async fn read_slide_form(mut multipart: Multipart) -> Result<SlideForm, AppError> {
    let mut form = SlideForm {
        image: None,
        order: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Multipart error: {e}")))?
    {
        match field.name().unwrap_or("") {
            "image" => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                if !content_type.starts_with("image/") {
                    return Err(AppError::Validation(
                        "Only image files are allowed (JPEG, PNG, WebP)".into(),
                    ));
                }

                let file_name = field.file_name().unwrap_or("upload.bin").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file: {e}")))?;
                if data.len() > MAX_IMAGE_BYTES {
                    return Err(AppError::Validation("Image exceeds the 5MB limit".into()));
                }

                form.image = Some((file_name, data.to_vec()));
            }
            "order" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read field: {e}")))?;
                let order: i32 = raw
                    .trim()
                    .parse()
                    .map_err(|_| AppError::Validation("Order must be a positive number".into()))?;
                form.order = Some(order);
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Store image bytes and return the API path they will be served from.
async fn store_image(
    state: &AppState,
    file_name: &str,
    data: Vec<u8>,
) -> Result<String, AppError> {
    let sanitized: String = file_name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let key = format!(
        "{IMAGE_KEY_PREFIX}{}_{sanitized}",
        Utc::now().timestamp_millis()
    );

    state.storage.put_object(&key, data).await?;

    Ok(format!(
        "/api/hero-slides/image/{}",
        key.trim_start_matches(IMAGE_KEY_PREFIX)
    ))
}

/// Best-effort removal of a previously stored image. A failure here never
/// blocks the database mutation; it only gets a warning log.
async fn remove_image(state: &AppState, image_url: &str) {
    let Some(filename) = image_url.rsplit('/').next() else {
        return;
    };
    let key = format!("{IMAGE_KEY_PREFIX}{filename}");
    if let Err(e) = state.storage.delete_object(&key).await {
        tracing::warn!("Could not delete slide image '{key}': {e}");
    }
}

/// `POST /api/hero-slides` — multipart: image + order.
pub async fn create_hero_slide(
    State(state): State<AppState>,
    _claims: AdminClaims,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<HeroSlide>>), AppError> {
    let form = read_slide_form(multipart).await?;

    let (file_name, data) = form
        .image
        .ok_or_else(|| AppError::Validation("No image file provided".into()))?;
    let order = form
        .order
        .ok_or_else(|| AppError::Validation("Order number is required".into()))?;
    validate_order(order)?;

    // Bytes land in storage first; only then does the document exist.
    let image_url = store_image(&state, &file_name, data).await?;
    let slide = state
        .hero_slides
        .create(HeroSlide::new(image_url, order)?)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Hero slide created successfully", slide)),
    ))
}

/// `PUT /api/hero-slides/{id}` — update order and/or replace the image.
pub async fn update_hero_slide(
    State(state): State<AppState>,
    _claims: AdminClaims,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<HeroSlide>>, AppError> {
    let id = parse_object_id(&id, "hero slide")?;
    let form = read_slide_form(multipart).await?;

    let existing = state
        .hero_slides
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Hero slide not found".into()))?;

    if let Some(order) = form.order {
        validate_order(order)?;
    }

    let new_image_url = match form.image {
        Some((file_name, data)) => {
            remove_image(&state, &existing.image_url).await;
            Some(store_image(&state, &file_name, data).await?)
        }
        None => None,
    };

    let slide = state
        .hero_slides
        .update(id, form.order, new_image_url.as_deref())
        .await?
        .ok_or_else(|| AppError::NotFound("Hero slide not found".into()))?;

    Ok(Json(ApiResponse::ok(
        "Hero slide updated successfully",
        slide,
    )))
}

/// `DELETE /api/hero-slides/{id}`
pub async fn delete_hero_slide(
    State(state): State<AppState>,
    _claims: AdminClaims,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let id = parse_object_id(&id, "hero slide")?;

    let slide = state
        .hero_slides
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Hero slide not found".into()))?;

    remove_image(&state, &slide.image_url).await;
    state.hero_slides.delete(id).await?;

    Ok(Json(ApiResponse::ok(
        "Hero slide deleted successfully",
        serde_json::json!({ "id": id.to_hex() }),
    )))
}

/// `GET /api/hero-slides/image/{filename}` — proxy bytes out of storage.
pub async fn serve_slide_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<axum::response::Response, AppError> {
    let key = format!("{IMAGE_KEY_PREFIX}{filename}");

    let data = state
        .storage
        .get_object(&key)
        .await?
        .ok_or_else(|| AppError::NotFound("Image not found".into()))?;

    let content_type = if filename.ends_with(".png") {
        "image/png"
    } else if filename.ends_with(".jpg") || filename.ends_with(".jpeg") {
        "image/jpeg"
    } else if filename.ends_with(".gif") {
        "image/gif"
    } else if filename.ends_with(".webp") {
        "image/webp"
    } else if filename.ends_with(".svg") {
        "image/svg+xml"
    } else {
        "application/octet-stream"
    };

    Ok(([(CONTENT_TYPE, content_type)], data).into_response())
}
