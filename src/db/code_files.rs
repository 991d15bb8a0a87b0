use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Document};
use chrono::Utc;
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::code_file::{CodeFile, CodeFileSummary, Language, UpdateFileRequest};

/// Whitelisted sort keys for the file listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    FileName,
    FolderPath,
    ProgrammingLanguage,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Parse a `sortBy` query value. Anything outside the whitelist falls
    /// back to `createdAt` rather than erroring.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "fileName" => Self::FileName,
            "folderPath" => Self::FolderPath,
            "programmingLanguage" => Self::ProgrammingLanguage,
            "updatedAt" => Self::UpdatedAt,
            _ => Self::CreatedAt,
        }
    }

    pub fn as_key(&self) -> &'static str {
        match self {
            Self::FileName => "fileName",
            Self::FolderPath => "folderPath",
            Self::ProgrammingLanguage => "programmingLanguage",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Self {
        if raw == "asc" {
            Self::Asc
        } else {
            Self::Desc
        }
    }

    fn as_bson(&self) -> i32 {
        match self {
            Self::Asc => 1,
            Self::Desc => -1,
        }
    }
}

/// Normalized listing parameters: `page` is 1-based and `limit` already
/// clamped to 1..=100 by the HTTP layer.
#[derive(Debug, Clone, Default)]
pub struct FileListOptions {
    pub language: Option<Language>,
    pub sort_by: SortField,
    pub order: SortOrder,
    pub page: u64,
    pub limit: u64,
}

/// A `{_id, count}` bucket from the stats aggregations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupCount {
    #[serde(rename = "_id")]
    pub key: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStats {
    pub total_files: u64,
    pub by_language: Vec<GroupCount>,
    pub by_folder: Vec<GroupCount>,
}

/// Repository for the code-file collection.
///
/// A trait so handlers can be exercised against an in-memory fake.
#[async_trait]
pub trait CodeFileRepository: Send + Sync {
    async fn create(&self, file: CodeFile) -> Result<CodeFile, AppError>;

    /// Page of summaries plus the total matching count. The two queries run
    /// concurrently; a page past the end yields an empty vector.
    async fn list(&self, opts: &FileListOptions) -> Result<(Vec<CodeFileSummary>, u64), AppError>;

    async fn get(&self, id: ObjectId) -> Result<Option<CodeFile>, AppError>;

    /// Apply the provided fields; `None` means the document did not exist.
    async fn update(
        &self,
        id: ObjectId,
        patch: &UpdateFileRequest,
        language: Option<Language>,
    ) -> Result<Option<CodeFile>, AppError>;

    async fn delete(&self, id: ObjectId) -> Result<Option<CodeFile>, AppError>;

    async fn delete_all(&self) -> Result<u64, AppError>;

    async fn insert_many(&self, files: Vec<CodeFile>) -> Result<Vec<CodeFile>, AppError>;

    async fn stats(&self) -> Result<FileStats, AppError>;
}

pub struct MongoCodeFileRepository {
    collection: mongodb::Collection<CodeFile>,
    summaries: mongodb::Collection<CodeFileSummary>,
}

impl MongoCodeFileRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("codefiles"),
            summaries: db.collection("codefiles"),
        }
    }

    fn filter_for(language: Option<Language>) -> Document {
        match language {
            Some(lang) => doc! { "programmingLanguage": lang.as_str() },
            None => doc! {},
        }
    }

    /// Documents to skip for a page. Saturates and stays within i64 so an
    /// absurd `page` yields an empty page instead of an overflow.
    fn skip_for(opts: &FileListOptions) -> u64 {
        opts.page
            .saturating_sub(1)
            .saturating_mul(opts.limit)
            .min(i64::MAX as u64)
    }
}

#[async_trait]
impl CodeFileRepository for MongoCodeFileRepository {
    async fn create(&self, mut file: CodeFile) -> Result<CodeFile, AppError> {
        let result = self.collection.insert_one(&file).await?;
        file.id = result.inserted_id.as_object_id();
        Ok(file)
    }

    async fn list(&self, opts: &FileListOptions) -> Result<(Vec<CodeFileSummary>, u64), AppError> {
        let filter = Self::filter_for(opts.language);
        let skip = Self::skip_for(opts);

        let find = async {
            let mut cursor = self
                .summaries
                .find(filter.clone())
                .projection(doc! { "codeContent": 0 })
                .sort(doc! { opts.sort_by.as_key(): opts.order.as_bson() })
                .skip(skip)
                .limit(opts.limit as i64)
                .await?;

            let mut files = Vec::new();
            while let Some(file) = cursor.try_next().await? {
                files.push(file);
            }
            Ok::<_, mongodb::error::Error>(files)
        };
        let count = async { self.collection.count_documents(filter.clone()).await };

        // Count and find in parallel; purely a latency optimization.
        let (files, total) = tokio::try_join!(find, count)?;
        Ok((files, total))
    }

    async fn get(&self, id: ObjectId) -> Result<Option<CodeFile>, AppError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn update(
        &self,
        id: ObjectId,
        patch: &UpdateFileRequest,
        language: Option<Language>,
    ) -> Result<Option<CodeFile>, AppError> {
        let mut set = doc! { "updatedAt": super::timestamp_string(Utc::now()) };
        if let Some(name) = &patch.file_name {
            set.insert("fileName", name.trim());
        }
        if let Some(path) = &patch.folder_path {
            set.insert("folderPath", path.trim());
        }
        if let Some(lang) = language {
            set.insert("programmingLanguage", lang.as_str());
        }
        if let Some(description) = &patch.description {
            set.insert("description", description.trim());
        }
        if let Some(content) = &patch.code_content {
            set.insert("codeContent", content.as_str());
        }
        if let Some(tags) = &patch.tags {
            set.insert("tags", tags.clone());
        }

        let options = mongodb::options::FindOneAndUpdateOptions::builder()
            .return_document(mongodb::options::ReturnDocument::After)
            .build();

        Ok(self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .with_options(options)
            .await?)
    }

    async fn delete(&self, id: ObjectId) -> Result<Option<CodeFile>, AppError> {
        Ok(self
            .collection
            .find_one_and_delete(doc! { "_id": id })
            .await?)
    }

    async fn delete_all(&self) -> Result<u64, AppError> {
        let result = self.collection.delete_many(doc! {}).await?;
        Ok(result.deleted_count)
    }

    async fn insert_many(&self, mut files: Vec<CodeFile>) -> Result<Vec<CodeFile>, AppError> {
        if files.is_empty() {
            return Ok(files);
        }
        let result = self.collection.insert_many(&files).await?;
        for (index, id) in result.inserted_ids {
            if let Some(file) = files.get_mut(index) {
                file.id = id.as_object_id();
            }
        }
        Ok(files)
    }

    async fn stats(&self) -> Result<FileStats, AppError> {
        let total_files = self.collection.count_documents(doc! {}).await?;

        let by_language = self
            .group_counts(vec![
                doc! { "$group": { "_id": "$programmingLanguage", "count": { "$sum": 1 } } },
                doc! { "$sort": { "count": -1 } },
            ])
            .await?;

        let by_folder = self
            .group_counts(vec![
                doc! { "$group": { "_id": "$folderPath", "count": { "$sum": 1 } } },
                doc! { "$sort": { "count": -1 } },
                doc! { "$limit": 10 },
            ])
            .await?;

        Ok(FileStats {
            total_files,
            by_language,
            by_folder,
        })
    }
}

impl MongoCodeFileRepository {
    async fn group_counts(&self, pipeline: Vec<Document>) -> Result<Vec<GroupCount>, AppError> {
        let mut cursor = self.collection.aggregate(pipeline).await?;
        let mut buckets = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            let bucket = bson::from_document(document)
                .map_err(|e| AppError::Database(format!("Malformed aggregation bucket: {e}")))?;
            buckets.push(bucket);
        }
        Ok(buckets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_field_whitelist() {
        assert_eq!(SortField::parse("fileName"), SortField::FileName);
        assert_eq!(SortField::parse("updatedAt"), SortField::UpdatedAt);
        // Unknown or unlisted fields fall back to createdAt.
        assert_eq!(SortField::parse("codeContent"), SortField::CreatedAt);
        assert_eq!(SortField::parse("$where"), SortField::CreatedAt);
    }

    #[test]
    fn skip_never_overflows() {
        let opts = FileListOptions {
            page: u64::MAX,
            limit: 100,
            ..Default::default()
        };
        assert_eq!(MongoCodeFileRepository::skip_for(&opts), i64::MAX as u64);

        let opts = FileListOptions {
            page: 3,
            limit: 20,
            ..Default::default()
        };
        assert_eq!(MongoCodeFileRepository::skip_for(&opts), 40);
    }

    #[test]
    fn sort_order_defaults_to_desc() {
        assert_eq!(SortOrder::parse("asc"), SortOrder::Asc);
        assert_eq!(SortOrder::parse("desc"), SortOrder::Desc);
        assert_eq!(SortOrder::parse("sideways"), SortOrder::Desc);
    }
}
