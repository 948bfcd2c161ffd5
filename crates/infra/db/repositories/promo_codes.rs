use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, pg::Pg, prelude::*, update};

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::promo_codes},
};
use domain::{
    entities::promo_codes::{InsertPromoCodeEntity, PromoCodeChangeset, PromoCodeEntity},
    errors::DomainError,
    repositories::promo_codes::PromoCodeRepository,
    value_objects::{pagination::Pagination, promo_codes::PromoCodeFilter},
};

pub struct PromoCodePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PromoCodePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

fn filtered_promo_codes(filter: &PromoCodeFilter) -> promo_codes::BoxedQuery<'static, Pg> {
    let mut query = promo_codes::table.into_boxed();

    if let Some(status) = filter.status {
        query = query.filter(promo_codes::status.eq(status));
    }

    query
}

#[async_trait]
impl PromoCodeRepository for PromoCodePostgres {
    async fn find_by_id(&self, promo_code_id: i64) -> Result<PromoCodeEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let promo_code = promo_codes::table
            .find(promo_code_id)
            .select(PromoCodeEntity::as_select())
            .first::<PromoCodeEntity>(&mut conn)
            .optional()?
            .ok_or(DomainError::NotFound("promo code"))?;

        Ok(promo_code)
    }

    async fn list(
        &self,
        filter: PromoCodeFilter,
        pagination: Pagination,
    ) -> Result<Vec<PromoCodeEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = filtered_promo_codes(&filter)
            .select(PromoCodeEntity::as_select())
            .order(promo_codes::id.asc())
            .limit(pagination.limit)
            .offset(pagination.offset())
            .load::<PromoCodeEntity>(&mut conn)?;

        Ok(results)
    }

    async fn count(&self, filter: PromoCodeFilter) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = filtered_promo_codes(&filter)
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(total)
    }

    async fn create(&self, promo_code: InsertPromoCodeEntity) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let promo_code_id = insert_into(promo_codes::table)
            .values(&promo_code)
            .returning(promo_codes::id)
            .get_result::<i64>(&mut conn)?;

        Ok(promo_code_id)
    }

    async fn update(&self, promo_code_id: i64, changeset: PromoCodeChangeset) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = update(promo_codes::table.find(promo_code_id))
            .set(&changeset)
            .execute(&mut conn)?;

        if affected == 0 {
            return Err(DomainError::NotFound("promo code").into());
        }

        Ok(())
    }
}
