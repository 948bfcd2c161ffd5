use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::videos::VideoEntity;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoDto {
    pub id: i64,
    pub questionnaire_id: i64,
    pub path: String,
    pub type_video: String,
    pub created_at: DateTime<Utc>,
}

impl From<VideoEntity> for VideoDto {
    fn from(value: VideoEntity) -> Self {
        Self {
            id: value.id,
            questionnaire_id: value.questionnaire_id,
            path: value.path,
            type_video: value.type_video,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VideosResponse {
    pub videos: Vec<VideoDto>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadVideoModel {
    pub questionnaire_id: i64,
    pub type_video: String,
}
