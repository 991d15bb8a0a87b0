use std::fmt;

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const MAX_FILE_NAME_LEN: usize = 100;
pub const MAX_FOLDER_PATH_LEN: usize = 500;
pub const MAX_DESCRIPTION_LEN: usize = 1000;
pub const MAX_CODE_CONTENT_LEN: usize = 1_000_000;
pub const MAX_TAGS: usize = 20;

/// The set of languages a code file may declare.
///
/// Stored lowercase; parsing is case-insensitive so `?language=TypeScript`
/// filters the same documents as `?language=typescript`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Javascript,
    Typescript,
    Python,
    Cpp,
    Java,
    Csharp,
    Php,
    Ruby,
    Go,
    Rust,
    Sql,
    Html,
    Css,
    Json,
    Xml,
    Yaml,
    Markdown,
}

impl Language {
    pub fn from_str_ci(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "javascript" => Some(Self::Javascript),
            "typescript" => Some(Self::Typescript),
            "python" => Some(Self::Python),
            "cpp" => Some(Self::Cpp),
            "java" => Some(Self::Java),
            "csharp" => Some(Self::Csharp),
            "php" => Some(Self::Php),
            "ruby" => Some(Self::Ruby),
            "go" => Some(Self::Go),
            "rust" => Some(Self::Rust),
            "sql" => Some(Self::Sql),
            "html" => Some(Self::Html),
            "css" => Some(Self::Css),
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            "yaml" => Some(Self::Yaml),
            "markdown" => Some(Self::Markdown),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Javascript => "javascript",
            Self::Typescript => "typescript",
            Self::Python => "python",
            Self::Cpp => "cpp",
            Self::Java => "java",
            Self::Csharp => "csharp",
            Self::Php => "php",
            Self::Ruby => "ruby",
            Self::Go => "go",
            Self::Rust => "rust",
            Self::Sql => "sql",
            Self::Html => "html",
            Self::Css => "css",
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Yaml => "yaml",
            Self::Markdown => "markdown",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A code snippet in the library, stored in the `codefiles` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeFile {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "super::serialize_oid_as_hex",
        default
    )]
    pub id: Option<ObjectId>,
    pub file_name: String,
    pub folder_path: String,
    pub programming_language: Language,
    pub description: String,
    pub code_content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List-view projection of a `CodeFile`: everything except the (up to 1 MB)
/// content body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeFileSummary {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "super::serialize_oid_as_hex",
        default
    )]
    pub id: Option<ObjectId>,
    pub file_name: String,
    pub folder_path: String,
    pub programming_language: Language,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for `POST /api/files` and each entry of the bulk upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFileRequest {
    pub file_name: String,
    pub folder_path: String,
    /// Free-form on the wire; normalized to a `Language` on write.
    pub programming_language: String,
    pub description: String,
    pub code_content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial-update payload for `PUT /api/files/{id}`; absent fields are left
/// untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFileRequest {
    pub file_name: Option<String>,
    pub folder_path: Option<String>,
    pub programming_language: Option<String>,
    pub description: Option<String>,
    pub code_content: Option<String>,
    pub tags: Option<Vec<String>>,
}

fn valid_file_name_chars(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ' '))
}

pub fn validate_file_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("File name is required".into()));
    }
    if name.len() > MAX_FILE_NAME_LEN {
        return Err(AppError::Validation(format!(
            "File name cannot exceed {MAX_FILE_NAME_LEN} characters"
        )));
    }
    if !valid_file_name_chars(name) {
        return Err(AppError::Validation(
            "File name contains invalid characters".into(),
        ));
    }
    Ok(())
}

pub fn validate_folder_path(path: &str) -> Result<(), AppError> {
    if path.trim().is_empty() {
        return Err(AppError::Validation("Folder path is required".into()));
    }
    if path.len() > MAX_FOLDER_PATH_LEN {
        return Err(AppError::Validation(format!(
            "Folder path cannot exceed {MAX_FOLDER_PATH_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), AppError> {
    if description.trim().is_empty() {
        return Err(AppError::Validation("Description is required".into()));
    }
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(AppError::Validation(format!(
            "Description cannot exceed {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_code_content(content: &str) -> Result<(), AppError> {
    if content.is_empty() {
        return Err(AppError::Validation("Code content is required".into()));
    }
    if content.len() > MAX_CODE_CONTENT_LEN {
        return Err(AppError::Validation(
            "Code content is too large (max 1MB)".into(),
        ));
    }
    Ok(())
}

pub fn validate_tags(tags: &[String]) -> Result<(), AppError> {
    if tags.len() > MAX_TAGS {
        return Err(AppError::Validation(format!(
            "Maximum {MAX_TAGS} tags allowed"
        )));
    }
    Ok(())
}

pub fn parse_language(raw: &str) -> Result<Language, AppError> {
    Language::from_str_ci(raw).ok_or_else(|| {
        AppError::Validation(format!("'{raw}' is not a supported programming language"))
    })
}

impl CodeFile {
    /// Validate a create request and build the document to insert.
    pub fn from_request(req: CreateFileRequest) -> Result<Self, AppError> {
        validate_file_name(&req.file_name)?;
        validate_folder_path(&req.folder_path)?;
        let language = parse_language(&req.programming_language)?;
        validate_description(&req.description)?;
        validate_code_content(&req.code_content)?;
        validate_tags(&req.tags)?;

        let now = Utc::now();
        Ok(Self {
            id: None,
            file_name: req.file_name.trim().to_string(),
            folder_path: req.folder_path.trim().to_string(),
            programming_language: language,
            description: req.description.trim().to_string(),
            code_content: req.code_content,
            tags: req.tags,
            created_at: now,
            updated_at: now,
        })
    }
}

impl UpdateFileRequest {
    /// Validate the provided fields. Returns the parsed language when the
    /// request includes one.
    pub fn validate(&self) -> Result<Option<Language>, AppError> {
        if let Some(name) = &self.file_name {
            validate_file_name(name)?;
        }
        if let Some(path) = &self.folder_path {
            validate_folder_path(path)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(content) = &self.code_content {
            validate_code_content(content)?;
        }
        if let Some(tags) = &self.tags {
            validate_tags(tags)?;
        }
        self.programming_language
            .as_deref()
            .map(parse_language)
            .transpose()
    }
}
