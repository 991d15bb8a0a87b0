use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::doc;
use chrono::Utc;
use futures::TryStreamExt;

use crate::error::AppError;
use crate::models::hero_slide::HeroSlide;

/// Repository for the hero-slideshow collection.
#[async_trait]
pub trait HeroSlideRepository: Send + Sync {
    async fn create(&self, slide: HeroSlide) -> Result<HeroSlide, AppError>;

    /// All slides, ascending display order.
    async fn list(&self) -> Result<Vec<HeroSlide>, AppError>;

    async fn get(&self, id: ObjectId) -> Result<Option<HeroSlide>, AppError>;

    /// Update order and/or image URL; absent fields are untouched.
    async fn update(
        &self,
        id: ObjectId,
        order: Option<i32>,
        image_url: Option<&str>,
    ) -> Result<Option<HeroSlide>, AppError>;

    async fn delete(&self, id: ObjectId) -> Result<Option<HeroSlide>, AppError>;
}

pub struct MongoHeroSlideRepository {
    collection: mongodb::Collection<HeroSlide>,
}

impl MongoHeroSlideRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("heroslides"),
        }
    }
}

#[async_trait]
impl HeroSlideRepository for MongoHeroSlideRepository {
    async fn create(&self, mut slide: HeroSlide) -> Result<HeroSlide, AppError> {
        let result = self.collection.insert_one(&slide).await?;
        slide.id = result.inserted_id.as_object_id();
        Ok(slide)
    }

    async fn list(&self) -> Result<Vec<HeroSlide>, AppError> {
        let mut cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "order": 1 })
            .await?;

        let mut slides = Vec::new();
        while let Some(slide) = cursor.try_next().await? {
            slides.push(slide);
        }
        Ok(slides)
    }

    async fn get(&self, id: ObjectId) -> Result<Option<HeroSlide>, AppError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn update(
        &self,
        id: ObjectId,
        order: Option<i32>,
        image_url: Option<&str>,
    ) -> Result<Option<HeroSlide>, AppError> {
        let mut set = doc! { "updatedAt": super::timestamp_string(Utc::now()) };
        if let Some(order) = order {
            set.insert("order", order);
        }
        if let Some(url) = image_url {
            set.insert("imageUrl", url);
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

    async fn delete(&self, id: ObjectId) -> Result<Option<HeroSlide>, AppError> {
        Ok(self
            .collection
            .find_one_and_delete(doc! { "_id": id })
            .await?)
    }
}
