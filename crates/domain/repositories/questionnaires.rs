use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    entities::questionnaires::{QuestionnaireChangeset, QuestionnaireEntity},
    value_objects::{pagination::Pagination, questionnaires::QuestionnaireFilter},
};

#[automock]
#[async_trait]
pub trait QuestionnaireRepository {
    async fn find_by_id(&self, questionnaire_id: i64) -> Result<QuestionnaireEntity>;
    async fn list(
        &self,
        filter: QuestionnaireFilter,
        pagination: Pagination,
    ) -> Result<Vec<QuestionnaireEntity>>;
    async fn count(&self, filter: QuestionnaireFilter) -> Result<i64>;
    async fn update(&self, questionnaire_id: i64, changeset: QuestionnaireChangeset) -> Result<()>;
    /// Touches only `status`. A missing row is `DomainError::NotFound`.
    async fn set_status(&self, questionnaire_id: i64, status: bool) -> Result<()>;
}
