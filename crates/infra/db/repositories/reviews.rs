use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, pg::Pg, prelude::*};

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::reviews},
};
use domain::{
    entities::reviews::ReviewEntity,
    errors::DomainError,
    repositories::reviews::ReviewRepository,
    value_objects::{pagination::Pagination, reviews::ReviewFilter},
};

pub struct ReviewPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ReviewPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

fn filtered_reviews(filter: &ReviewFilter) -> reviews::BoxedQuery<'static, Pg> {
    let mut query = reviews::table.into_boxed();

    if let Some(user_id) = filter.user_id {
        query = query.filter(reviews::user_id.eq(user_id));
    }

    if let Some(date_from) = filter.date_from {
        query = query.filter(reviews::created_at.ge(date_from));
    }

    if let Some(date_to) = filter.date_to {
        query = query.filter(reviews::created_at.lt(date_to));
    }

    query
}

#[async_trait]
impl ReviewRepository for ReviewPostgres {
    async fn find_by_id(&self, review_id: i64) -> Result<ReviewEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let review = reviews::table
            .find(review_id)
            .select(ReviewEntity::as_select())
            .first::<ReviewEntity>(&mut conn)
            .optional()?
            .ok_or(DomainError::NotFound("review"))?;

        Ok(review)
    }

    async fn list(&self, filter: ReviewFilter, pagination: Pagination) -> Result<Vec<ReviewEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = filtered_reviews(&filter)
            .select(ReviewEntity::as_select())
            .order(reviews::created_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset())
            .load::<ReviewEntity>(&mut conn)?;

        Ok(results)
    }

    async fn count(&self, filter: ReviewFilter) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = filtered_reviews(&filter).count().get_result::<i64>(&mut conn)?;

        Ok(total)
    }
}
