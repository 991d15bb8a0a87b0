use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AppError;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_PROJECT_DESCRIPTION_LEN: usize = 2000;
pub const MAX_KEY_FEATURES: usize = 10;
pub const MAX_LEARNED_LEN: usize = 1000;
pub const MAX_TECH_STACK: usize = 20;
pub const MAX_TAG_LEN: usize = 50;

/// One file of an uploaded project folder, embedded in the project document.
///
/// `language` is free-form here (unlike `CodeFile`): the viewer maps unknown
/// values to plain text. Duplicate paths are allowed at this layer; the tree
/// builder keeps the first occurrence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectFile {
    pub path: String,
    #[serde(default = "default_file_language")]
    pub language: String,
    #[serde(default)]
    pub content: String,
}

fn default_file_language() -> String {
    "javascript".to_string()
}

/// A portfolio project, stored in the `projects` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "super::serialize_oid_as_hex",
        default
    )]
    pub id: Option<ObjectId>,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub key_features: Vec<String>,
    #[serde(default)]
    pub what_i_learned: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    pub code_link: String,
    #[serde(default)]
    pub live_link: String,
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default)]
    pub files: Vec<ProjectFile>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_tag() -> String {
    "Project".to_string()
}

/// Payload for `POST /api/projects`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub key_features: Vec<String>,
    #[serde(default)]
    pub what_i_learned: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    pub code_link: String,
    #[serde(default)]
    pub live_link: String,
    pub tag: Option<String>,
}

/// Partial-update payload for `PUT /api/projects/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub key_features: Option<Vec<String>>,
    pub what_i_learned: Option<String>,
    pub tech_stack: Option<Vec<String>>,
    pub code_link: Option<String>,
    pub live_link: Option<String>,
    pub tag: Option<String>,
}

fn is_http_url(raw: &str) -> bool {
    Url::parse(raw)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

pub fn validate_title(title: &str) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::Validation("Project title is required".into()));
    }
    if title.len() > MAX_TITLE_LEN {
        return Err(AppError::Validation(format!(
            "Title cannot exceed {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_project_description(description: &str) -> Result<(), AppError> {
    if description.trim().is_empty() {
        return Err(AppError::Validation(
            "Project description is required".into(),
        ));
    }
    if description.len() > MAX_PROJECT_DESCRIPTION_LEN {
        return Err(AppError::Validation(format!(
            "Description cannot exceed {MAX_PROJECT_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_code_link(link: &str) -> Result<(), AppError> {
    if link.trim().is_empty() {
        return Err(AppError::Validation("Code link is required".into()));
    }
    if !is_http_url(link.trim()) {
        return Err(AppError::Validation("Code link must be a valid URL".into()));
    }
    Ok(())
}

pub fn validate_live_link(link: &str) -> Result<(), AppError> {
    let trimmed = link.trim();
    if !trimmed.is_empty() && !is_http_url(trimmed) {
        return Err(AppError::Validation("Live link must be a valid URL".into()));
    }
    Ok(())
}

pub fn validate_key_features(features: &[String]) -> Result<(), AppError> {
    if features.len() > MAX_KEY_FEATURES {
        return Err(AppError::Validation(format!(
            "Maximum {MAX_KEY_FEATURES} key features allowed"
        )));
    }
    Ok(())
}

pub fn validate_what_i_learned(text: &str) -> Result<(), AppError> {
    if text.len() > MAX_LEARNED_LEN {
        return Err(AppError::Validation(format!(
            "Learning notes cannot exceed {MAX_LEARNED_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_tech_stack(stack: &[String]) -> Result<(), AppError> {
    if stack.len() > MAX_TECH_STACK {
        return Err(AppError::Validation(format!(
            "Maximum {MAX_TECH_STACK} tech stack items allowed"
        )));
    }
    Ok(())
}

pub fn validate_tag(tag: &str) -> Result<(), AppError> {
    if tag.len() > MAX_TAG_LEN {
        return Err(AppError::Validation(format!(
            "Tag cannot exceed {MAX_TAG_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a replacement file list for `POST /api/projects/{id}/files`.
pub fn validate_project_files(files: &[ProjectFile]) -> Result<(), AppError> {
    for file in files {
        if file.path.trim().is_empty() || file.language.trim().is_empty() {
            return Err(AppError::Validation(
                "Each file must have path, language, and content".into(),
            ));
        }
    }
    Ok(())
}

impl Project {
    pub fn from_request(req: CreateProjectRequest) -> Result<Self, AppError> {
        validate_title(&req.title)?;
        validate_project_description(&req.description)?;
        validate_key_features(&req.key_features)?;
        validate_what_i_learned(&req.what_i_learned)?;
        validate_tech_stack(&req.tech_stack)?;
        validate_code_link(&req.code_link)?;
        validate_live_link(&req.live_link)?;
        let tag = req.tag.unwrap_or_else(default_tag);
        validate_tag(&tag)?;

        let now = Utc::now();
        Ok(Self {
            id: None,
            title: req.title.trim().to_string(),
            description: req.description.trim().to_string(),
            key_features: req.key_features,
            what_i_learned: req.what_i_learned.trim().to_string(),
            tech_stack: req.tech_stack,
            code_link: req.code_link.trim().to_string(),
            live_link: req.live_link.trim().to_string(),
            tag: tag.trim().to_string(),
            files: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }
}

impl UpdateProjectRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(description) = &self.description {
            validate_project_description(description)?;
        }
        if let Some(features) = &self.key_features {
            validate_key_features(features)?;
        }
        if let Some(text) = &self.what_i_learned {
            validate_what_i_learned(text)?;
        }
        if let Some(stack) = &self.tech_stack {
            validate_tech_stack(stack)?;
        }
        if let Some(link) = &self.code_link {
            validate_code_link(link)?;
        }
        if let Some(link) = &self.live_link {
            validate_live_link(link)?;
        }
        if let Some(tag) = &self.tag {
            validate_tag(tag)?;
        }
        Ok(())
    }
}
