use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::photos::PhotoEntity;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoDto {
    pub id: i64,
    pub questionnaire_id: i64,
    pub path: String,
    pub scene: String,
    pub type_photo: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<PhotoEntity> for PhotoDto {
    fn from(value: PhotoEntity) -> Self {
        Self {
            id: value.id,
            questionnaire_id: value.questionnaire_id,
            path: value.path,
            scene: value.scene,
            type_photo: value.type_photo,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PhotosResponse {
    pub photos: Vec<PhotoDto>,
}

/// Metadata sent alongside a single uploaded photo.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadPhotoModel {
    pub questionnaire_id: i64,
    pub scene: String,
    pub type_photo: String,
}
