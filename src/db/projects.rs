use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::doc;
use chrono::Utc;
use futures::TryStreamExt;

use crate::error::AppError;
use crate::models::project::{Project, ProjectFile, UpdateProjectRequest};

/// Repository for the project collection.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create(&self, project: Project) -> Result<Project, AppError>;

    /// All projects, newest first.
    async fn list(&self) -> Result<Vec<Project>, AppError>;

    async fn get(&self, id: ObjectId) -> Result<Option<Project>, AppError>;

    async fn update(
        &self,
        id: ObjectId,
        patch: &UpdateProjectRequest,
    ) -> Result<Option<Project>, AppError>;

    async fn delete(&self, id: ObjectId) -> Result<Option<Project>, AppError>;

    /// Replace the embedded file list wholesale. Returns the file count, or
    /// `None` when the project does not exist.
    async fn replace_files(
        &self,
        id: ObjectId,
        files: Vec<ProjectFile>,
    ) -> Result<Option<usize>, AppError>;
}

pub struct MongoProjectRepository {
    collection: mongodb::Collection<Project>,
}

impl MongoProjectRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("projects"),
        }
    }
}

#[async_trait]
impl ProjectRepository for MongoProjectRepository {
    async fn create(&self, mut project: Project) -> Result<Project, AppError> {
        let result = self.collection.insert_one(&project).await?;
        project.id = result.inserted_id.as_object_id();
        Ok(project)
    }

    async fn list(&self) -> Result<Vec<Project>, AppError> {
        let mut cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .await?;

        let mut projects = Vec::new();
        while let Some(project) = cursor.try_next().await? {
            projects.push(project);
        }
        Ok(projects)
    }

    async fn get(&self, id: ObjectId) -> Result<Option<Project>, AppError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn update(
        &self,
        id: ObjectId,
        patch: &UpdateProjectRequest,
    ) -> Result<Option<Project>, AppError> {
        let mut set = doc! { "updatedAt": super::timestamp_string(Utc::now()) };
        if let Some(title) = &patch.title {
            set.insert("title", title.trim());
        }
        if let Some(description) = &patch.description {
            set.insert("description", description.trim());
        }
        if let Some(features) = &patch.key_features {
            set.insert("keyFeatures", features.clone());
        }
        if let Some(text) = &patch.what_i_learned {
            set.insert("whatILearned", text.trim());
        }
        if let Some(stack) = &patch.tech_stack {
            set.insert("techStack", stack.clone());
        }
        if let Some(link) = &patch.code_link {
            set.insert("codeLink", link.trim());
        }
        if let Some(link) = &patch.live_link {
            set.insert("liveLink", link.trim());
        }
        if let Some(tag) = &patch.tag {
            set.insert("tag", tag.trim());
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

    async fn delete(&self, id: ObjectId) -> Result<Option<Project>, AppError> {
        Ok(self
            .collection
            .find_one_and_delete(doc! { "_id": id })
            .await?)
    }

    async fn replace_files(
        &self,
        id: ObjectId,
        files: Vec<ProjectFile>,
    ) -> Result<Option<usize>, AppError> {
        let count = files.len();
        let files_bson = bson::to_bson(&files)
            .map_err(|e| AppError::Internal(format!("Failed to encode files: {e}")))?;

        let result = self
            .collection
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "files": files_bson, "updatedAt": super::timestamp_string(Utc::now()) } },
            )
            .await?;

        if result.matched_count == 0 {
            Ok(None)
        } else {
            Ok(Some(count))
        }
    }
}
