use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*};

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::photos},
};
use domain::{
    entities::photos::{InsertPhotoEntity, PhotoEntity},
    repositories::photos::PhotoRepository,
    value_objects::enums::photo_types::PhotoType,
};

pub struct PhotoPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PhotoPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PhotoRepository for PhotoPostgres {
    async fn list_by_questionnaire(
        &self,
        questionnaire_id: i64,
        photo_type: Option<PhotoType>,
    ) -> Result<Vec<PhotoEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = photos::table
            .filter(photos::questionnaire_id.eq(questionnaire_id))
            .select(PhotoEntity::as_select())
            .into_boxed();

        if let Some(photo_type) = photo_type {
            query = query.filter(photos::type_.eq(photo_type.to_string()));
        }

        let results = query
            .order((photos::created_at.asc().nulls_last(), photos::path.asc()))
            .load::<PhotoEntity>(&mut conn)?;

        Ok(results)
    }

    async fn insert(&self, photo: InsertPhotoEntity) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let photo_id = insert_into(photos::table)
            .values(&photo)
            .returning(photos::id)
            .get_result::<i64>(&mut conn)?;

        Ok(photo_id)
    }
}
