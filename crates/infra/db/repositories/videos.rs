use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*};

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::videos},
};
use domain::{
    entities::videos::{InsertVideoEntity, VideoEntity},
    repositories::videos::VideoRepository,
    value_objects::enums::video_types::VideoType,
};

pub struct VideoPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl VideoPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl VideoRepository for VideoPostgres {
    async fn list_by_questionnaire(
        &self,
        questionnaire_id: i64,
        video_type: Option<VideoType>,
    ) -> Result<Vec<VideoEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = videos::table
            .filter(videos::questionnaire_id.eq(questionnaire_id))
            .select(VideoEntity::as_select())
            .into_boxed();

        if let Some(video_type) = video_type {
            query = query.filter(videos::type_video.eq(video_type.to_string()));
        }

        let results = query
            .order((videos::created_at.asc(), videos::path.asc()))
            .load::<VideoEntity>(&mut conn)?;

        Ok(results)
    }

    async fn insert(&self, video: InsertVideoEntity) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let video_id = insert_into(videos::table)
            .values(&video)
            .returning(videos::id)
            .get_result::<i64>(&mut conn)?;

        Ok(video_id)
    }
}
