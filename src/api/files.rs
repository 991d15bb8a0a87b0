use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::response::{ApiResponse, Pagination};
use crate::auth::token::AdminClaims;
use crate::db::code_files::{FileListOptions, FileStats, SortField, SortOrder};
use crate::error::AppError;
use crate::models::code_file::{
    CodeFile, CodeFileSummary, CreateFileRequest, Language, UpdateFileRequest,
};
use crate::models::parse_object_id;
use crate::state::AppState;

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Raw listing query parameters. Numbers arrive as strings so malformed
/// values fall back to defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListParams {
    pub language: Option<String>,
    /// Alias for `language`; wins when both are present.
    pub programming_language: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Outcome of normalizing the raw params: either a query to run, or proof
/// the filter can never match (unknown language).
pub enum ListQuery {
    Run(FileListOptions),
    NeverMatches { page: u64, limit: u64 },
}

pub fn normalize_list_params(params: &FileListParams) -> ListQuery {
    let page = params
        .page
        .as_deref()
        .and_then(|p| p.parse::<u64>().ok())
        .unwrap_or(1)
        .max(1);
    let limit = params
        .limit
        .as_deref()
        .and_then(|l| l.parse::<u64>().ok())
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let raw_language = params
        .programming_language
        .as_deref()
        .or(params.language.as_deref());

    let language = match raw_language {
        // An unknown language matches no stored document at all.
        Some(raw) => match Language::from_str_ci(raw) {
            Some(lang) => Some(lang),
            None => return ListQuery::NeverMatches { page, limit },
        },
        None => None,
    };

    ListQuery::Run(FileListOptions {
        language,
        sort_by: SortField::parse(params.sort_by.as_deref().unwrap_or("createdAt")),
        order: SortOrder::parse(params.order.as_deref().unwrap_or("desc")),
        page,
        limit,
    })
}

/// `GET /api/files`
pub async fn list_files(
    State(state): State<AppState>,
    Query(params): Query<FileListParams>,
) -> Result<Json<ApiResponse<Vec<CodeFileSummary>>>, AppError> {
    let (files, total, page, limit) = match normalize_list_params(&params) {
        ListQuery::Run(opts) => {
            let (files, total) = state.code_files.list(&opts).await?;
            (files, total, opts.page, opts.limit)
        }
        ListQuery::NeverMatches { page, limit } => (Vec::new(), 0, page, limit),
    };

    Ok(Json(ApiResponse::paginated(
        "Files retrieved successfully",
        files,
        Pagination::new(total, page, limit),
    )))
}

/// `POST /api/files`
pub async fn create_file(
    State(state): State<AppState>,
    _claims: AdminClaims,
    Json(req): Json<CreateFileRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CodeFile>>), AppError> {
    let file = CodeFile::from_request(req)?;
    let file = state.code_files.create(file).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("File created successfully", file)),
    ))
}

/// `GET /api/files/{id}`
pub async fn get_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<CodeFile>>, AppError> {
    let id = parse_object_id(&id, "file")?;
    let file = state
        .code_files
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".into()))?;

    Ok(Json(ApiResponse::ok("File retrieved successfully", file)))
}

/// `PUT /api/files/{id}`
pub async fn update_file(
    State(state): State<AppState>,
    _claims: AdminClaims,
    Path(id): Path<String>,
    Json(req): Json<UpdateFileRequest>,
) -> Result<Json<ApiResponse<CodeFile>>, AppError> {
    let id = parse_object_id(&id, "file")?;
    let language = req.validate()?;

    let file = state
        .code_files
        .update(id, &req, language)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".into()))?;

    Ok(Json(ApiResponse::ok("File updated successfully", file)))
}

/// `DELETE /api/files/{id}`
pub async fn delete_file(
    State(state): State<AppState>,
    _claims: AdminClaims,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let id = parse_object_id(&id, "file")?;
    let file = state
        .code_files
        .delete(id)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".into()))?;

    let deleted_id = file.id.map(|oid| oid.to_hex()).unwrap_or_default();
    Ok(Json(ApiResponse::ok(
        "File deleted successfully",
        serde_json::json!({ "id": deleted_id }),
    )))
}

/// `DELETE /api/files`
pub async fn delete_all_files(
    State(state): State<AppState>,
    _claims: AdminClaims,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let deleted = state.code_files.delete_all().await?;

    Ok(Json(ApiResponse::ok(
        "All files deleted successfully",
        serde_json::json!({ "deletedCount": deleted }),
    )))
}

#[derive(Debug, Deserialize)]
pub struct BulkUploadRequest {
    #[serde(default)]
    pub files: Vec<CreateFileRequest>,
}

/// `POST /api/files/bulk-upload`
///
/// All entries are validated before any insert, so a bad entry rejects the
/// whole batch.
pub async fn bulk_upload(
    State(state): State<AppState>,
    Json(req): Json<BulkUploadRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<CodeFile>>>), AppError> {
    if req.files.is_empty() {
        return Err(AppError::Validation(
            "Files must be a non-empty array".into(),
        ));
    }

    let files = req
        .files
        .into_iter()
        .map(CodeFile::from_request)
        .collect::<Result<Vec<_>, _>>()?;

    let inserted = state.code_files.insert_many(files).await?;
    let message = format!("Successfully uploaded {} file(s)", inserted.len());

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(&message, inserted)),
    ))
}

/// `GET /api/files/stats/overview`
pub async fn file_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<FileStats>>, AppError> {
    let stats = state.code_files.stats().await?;
    Ok(Json(ApiResponse::ok(
        "Statistics retrieved successfully",
        stats,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> FileListParams {
        let mut p = FileListParams::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "language" => p.language = value,
                "programmingLanguage" => p.programming_language = value,
                "sortBy" => p.sort_by = value,
                "order" => p.order = value,
                "page" => p.page = value,
                "limit" => p.limit = value,
                other => panic!("unknown param {other}"),
            }
        }
        p
    }

    fn run(p: &FileListParams) -> FileListOptions {
        match normalize_list_params(p) {
            ListQuery::Run(opts) => opts,
            ListQuery::NeverMatches { .. } => panic!("expected a runnable query"),
        }
    }

    #[test]
    fn defaults_when_no_params() {
        let opts = run(&params(&[]));
        assert_eq!(opts.page, 1);
        assert_eq!(opts.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(opts.sort_by, SortField::CreatedAt);
        assert_eq!(opts.order, SortOrder::Desc);
        assert!(opts.language.is_none());
    }

    #[test]
    fn limit_clamped_to_bounds() {
        assert_eq!(run(&params(&[("limit", "1000")])).limit, MAX_PAGE_SIZE);
        assert_eq!(run(&params(&[("limit", "0")])).limit, 1);
        assert_eq!(run(&params(&[("limit", "nope")])).limit, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn page_floor_is_one() {
        assert_eq!(run(&params(&[("page", "0")])).page, 1);
        assert_eq!(run(&params(&[("page", "-2")])).page, 1);
        assert_eq!(run(&params(&[("page", "3")])).page, 3);
    }

    #[test]
    fn language_filter_case_insensitive() {
        let opts = run(&params(&[("language", "RUST")]));
        assert_eq!(opts.language, Some(Language::Rust));
    }

    #[test]
    fn programming_language_alias_wins() {
        let opts = run(&params(&[
            ("language", "rust"),
            ("programmingLanguage", "go"),
        ]));
        assert_eq!(opts.language, Some(Language::Go));
    }

    #[test]
    fn unknown_language_never_matches() {
        match normalize_list_params(&params(&[("language", "cobol"), ("page", "2")])) {
            ListQuery::NeverMatches { page, limit } => {
                assert_eq!(page, 2);
                assert_eq!(limit, DEFAULT_PAGE_SIZE);
            }
            ListQuery::Run(_) => panic!("cobol should match nothing"),
        }
    }
}
