use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// One image of the home-page slideshow, stored in the `heroslides`
/// collection. The bytes live in object storage; `image_url` is the API
/// path they are served from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSlide {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "super::serialize_oid_as_hex",
        default
    )]
    pub id: Option<ObjectId>,
    pub image_url: String,
    /// Display order, ascending. Not unique: ties keep insertion order.
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HeroSlide {
    pub fn new(image_url: String, order: i32) -> Result<Self, AppError> {
        validate_order(order)?;
        if image_url.trim().is_empty() {
            return Err(AppError::Validation("Image URL is required".into()));
        }
        let now = Utc::now();
        Ok(Self {
            id: None,
            image_url,
            order,
            created_at: now,
            updated_at: now,
        })
    }
}

pub fn validate_order(order: i32) -> Result<(), AppError> {
    if order < 1 {
        return Err(AppError::Validation(
            "Order must be a positive number".into(),
        ));
    }
    Ok(())
}
