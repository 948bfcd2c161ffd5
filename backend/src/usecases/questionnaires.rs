use std::sync::Arc;

use anyhow::Result;
use crates::domain::{
    errors::DomainError,
    repositories::questionnaires::QuestionnaireRepository,
    value_objects::{
        pagination::Pagination,
        questionnaires::{
            QuestionnaireDto, QuestionnaireFilter, QuestionnaireResponse,
            QuestionnairesListResponse, UpdateQuestionnaireModel,
        },
        status::StatusResponse,
    },
};
use tracing::{error, info};

pub struct QuestionnairesUseCase<Q>
where
    Q: QuestionnaireRepository + Send + Sync + 'static,
{
    questionnaire_repository: Arc<Q>,
}

impl<Q> QuestionnairesUseCase<Q>
where
    Q: QuestionnaireRepository + Send + Sync + 'static,
{
    pub fn new(questionnaire_repository: Arc<Q>) -> Self {
        Self {
            questionnaire_repository,
        }
    }

    pub async fn get_questionnaire(&self, questionnaire_id: i64) -> Result<QuestionnaireResponse> {
        if questionnaire_id <= 0 {
            return Err(DomainError::validation("invalid questionnaire id").into());
        }

        let questionnaire = self
            .questionnaire_repository
            .find_by_id(questionnaire_id)
            .await?;

        Ok(QuestionnaireResponse {
            questionnaire: QuestionnaireDto::from(questionnaire),
        })
    }

    pub async fn list_questionnaires(
        &self,
        filter: QuestionnaireFilter,
        pagination: Pagination,
    ) -> Result<QuestionnairesListResponse> {
        let questionnaires = self
            .questionnaire_repository
            .list(filter.clone(), pagination)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "questionnaires: failed to list questionnaires");
                err
            })?;

        let total = self
            .questionnaire_repository
            .count(filter)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "questionnaires: failed to count questionnaires");
                err
            })?;

        Ok(QuestionnairesListResponse {
            questionnaires: questionnaires.into_iter().map(QuestionnaireDto::from).collect(),
            total,
        })
    }

    pub async fn update_questionnaire(
        &self,
        model: UpdateQuestionnaireModel,
    ) -> Result<StatusResponse> {
        let questionnaire_id = model.id;
        if questionnaire_id == 0 {
            return Err(DomainError::validation("invalid questionnaire id").into());
        }

        match self
            .questionnaire_repository
            .update(questionnaire_id, model.to_changeset())
            .await
        {
            Ok(()) => {
                info!(%questionnaire_id, "questionnaires: questionnaire updated");
                Ok(StatusResponse::ok("updated"))
            }
            Err(err) if DomainError::find(&err) == Some(&DomainError::NoRowsAffected) => {
                Ok(StatusResponse::failed("questionnaire not found"))
            }
            Err(err) => {
                error!(%questionnaire_id, db_error = ?err, "questionnaires: failed to update questionnaire");
                Err(err)
            }
        }
    }
}
