use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, pg::Pg, prelude::*, update};

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::questionnaires},
};
use domain::{
    entities::questionnaires::{QuestionnaireChangeset, QuestionnaireEntity},
    errors::DomainError,
    repositories::questionnaires::QuestionnaireRepository,
    value_objects::{pagination::Pagination, questionnaires::QuestionnaireFilter},
};

pub struct QuestionnairePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl QuestionnairePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

fn filtered_questionnaires(filter: &QuestionnaireFilter) -> questionnaires::BoxedQuery<'static, Pg> {
    let mut query = questionnaires::table.into_boxed();

    if let Some(user_id) = filter.user_id {
        query = query.filter(questionnaires::user_id.eq(user_id));
    }

    if let Some(payment) = filter.payment {
        query = query.filter(questionnaires::payment.eq(payment));
    }

    if let Some(status) = filter.status {
        query = query.filter(questionnaires::status.eq(status));
    }

    if let Some(date_from) = filter.date_from {
        query = query.filter(questionnaires::created_at.ge(date_from));
    }

    if let Some(date_to) = filter.date_to {
        query = query.filter(questionnaires::created_at.lt(date_to));
    }

    query
}

#[async_trait]
impl QuestionnaireRepository for QuestionnairePostgres {
    async fn find_by_id(&self, questionnaire_id: i64) -> Result<QuestionnaireEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let questionnaire = questionnaires::table
            .find(questionnaire_id)
            .select(QuestionnaireEntity::as_select())
            .first::<QuestionnaireEntity>(&mut conn)
            .optional()?
            .ok_or(DomainError::NotFound("questionnaire"))?;

        Ok(questionnaire)
    }

    async fn list(
        &self,
        filter: QuestionnaireFilter,
        pagination: Pagination,
    ) -> Result<Vec<QuestionnaireEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = filtered_questionnaires(&filter)
            .select(QuestionnaireEntity::as_select())
            .order(questionnaires::created_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset())
            .load::<QuestionnaireEntity>(&mut conn)?;

        Ok(results)
    }

    async fn count(&self, filter: QuestionnaireFilter) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = filtered_questionnaires(&filter)
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(total)
    }

    async fn update(&self, questionnaire_id: i64, changeset: QuestionnaireChangeset) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        if changeset.is_empty() {
            let exists =
                diesel::select(diesel::dsl::exists(questionnaires::table.find(questionnaire_id)))
                    .get_result::<bool>(&mut conn)?;
            return if exists {
                Ok(())
            } else {
                Err(DomainError::NoRowsAffected.into())
            };
        }

        let affected = update(questionnaires::table.find(questionnaire_id))
            .set(&changeset)
            .execute(&mut conn)?;

        if affected == 0 {
            return Err(DomainError::NoRowsAffected.into());
        }

        Ok(())
    }

    async fn set_status(&self, questionnaire_id: i64, status: bool) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = update(questionnaires::table.find(questionnaire_id))
            .set(questionnaires::status.eq(status))
            .execute(&mut conn)?;

        if affected == 0 {
            return Err(DomainError::NotFound("questionnaire").into());
        }

        Ok(())
    }
}
