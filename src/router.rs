use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, StatusCode, Uri};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api::{files, health, hero_slides, projects};
use crate::auth::handlers as auth_handlers;
use crate::state::AppState;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Assemble the full application router.
///
/// `allowed_origins` is the CORS allowlist; `None` accepts any origin
/// (local development).
pub fn build_router(state: AppState, allowed_origins: Option<&[String]>) -> Router {
    let cors = cors_layer(allowed_origins);

    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/auth/login", post(auth_handlers::login_handler))
        .route("/api/auth/verify", get(auth_handlers::verify_handler))
        .route(
            "/api/files",
            get(files::list_files)
                .post(files::create_file)
                .delete(files::delete_all_files),
        )
        .route("/api/files/bulk-upload", post(files::bulk_upload))
        .route("/api/files/stats/overview", get(files::file_stats))
        .route(
            "/api/files/{id}",
            get(files::get_file)
                .put(files::update_file)
                .delete(files::delete_file),
        )
        .route(
            "/api/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route(
            "/api/projects/{id}",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        .route(
            "/api/projects/{id}/files",
            post(projects::replace_project_files),
        )
        .route("/api/projects/{id}/tree", get(projects::get_project_tree))
        .route(
            "/api/hero-slides",
            get(hero_slides::list_hero_slides).post(hero_slides::create_hero_slide),
        )
        .route(
            "/api/hero-slides/{id}",
            put(hero_slides::update_hero_slide).delete(hero_slides::delete_hero_slide),
        )
        .route(
            "/api/hero-slides/image/{filename}",
            get(hero_slides::serve_slide_image),
        )
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

fn cors_layer(allowed_origins: Option<&[String]>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    match allowed_origins {
        Some(origins) => layer.allow_origin(AllowOrigin::list(
            origins.iter().filter_map(|origin| origin.parse().ok()),
        )),
        None => layer.allow_origin(Any),
    }
}

async fn not_found(method: Method, uri: Uri) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "success": false,
            "message": "Route not found",
            "path": uri.path(),
            "method": method.as_str(),
        })),
    )
}
