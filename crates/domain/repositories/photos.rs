use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    entities::photos::{InsertPhotoEntity, PhotoEntity},
    value_objects::enums::photo_types::PhotoType,
};

#[automock]
#[async_trait]
pub trait PhotoRepository {
    /// `None` lists every type.
    async fn list_by_questionnaire(
        &self,
        questionnaire_id: i64,
        photo_type: Option<PhotoType>,
    ) -> Result<Vec<PhotoEntity>>;
    async fn insert(&self, photo: InsertPhotoEntity) -> Result<i64>;
}
