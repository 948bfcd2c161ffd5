use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    entities::videos::{InsertVideoEntity, VideoEntity},
    value_objects::enums::video_types::VideoType,
};

#[automock]
#[async_trait]
pub trait VideoRepository {
    async fn list_by_questionnaire(
        &self,
        questionnaire_id: i64,
        video_type: Option<VideoType>,
    ) -> Result<Vec<VideoEntity>>;
    async fn insert(&self, video: InsertVideoEntity) -> Result<i64>;
}
