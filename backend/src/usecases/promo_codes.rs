use std::sync::Arc;

use anyhow::Result;
use crates::domain::{
    errors::DomainError,
    repositories::promo_codes::PromoCodeRepository,
    value_objects::{
        pagination::Pagination,
        promo_codes::{
            PromoCodeDto, PromoCodeFilter, PromoCodeModel, PromoCodeResponse,
            PromoCodesListResponse,
        },
        status::StatusResponse,
    },
};
use tracing::{error, info, warn};

pub struct PromoCodesUseCase<R>
where
    R: PromoCodeRepository + Send + Sync + 'static,
{
    promo_code_repository: Arc<R>,
}

impl<R> PromoCodesUseCase<R>
where
    R: PromoCodeRepository + Send + Sync + 'static,
{
    pub fn new(promo_code_repository: Arc<R>) -> Self {
        Self {
            promo_code_repository,
        }
    }

    pub async fn get_promo_code(&self, promo_code_id: i64) -> Result<PromoCodeResponse> {
        if promo_code_id <= 0 {
            return Err(DomainError::validation("invalid promo code id").into());
        }

        let promo_code = self.promo_code_repository.find_by_id(promo_code_id).await?;

        Ok(PromoCodeResponse {
            promo_code: PromoCodeDto::from(promo_code),
        })
    }

    pub async fn list_promo_codes(
        &self,
        filter: PromoCodeFilter,
        pagination: Pagination,
    ) -> Result<PromoCodesListResponse> {
        let promo_codes = self
            .promo_code_repository
            .list(filter.clone(), pagination)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "promo_codes: failed to list promo codes");
                err
            })?;

        let total = self.promo_code_repository.count(filter).await?;

        Ok(PromoCodesListResponse {
            promo_codes: promo_codes.into_iter().map(PromoCodeDto::from).collect(),
            total,
        })
    }

    pub async fn create_promo_code(&self, model: PromoCodeModel) -> Result<StatusResponse> {
        model.validate().inspect_err(|err| {
            warn!(error = %err, "promo_codes: invalid promo code");
        })?;

        let promo_code_id = self
            .promo_code_repository
            .create(model.to_insert_entity())
            .await
            .map_err(|err| {
                error!(db_error = ?err, "promo_codes: failed to create promo code");
                err
            })?;

        info!(%promo_code_id, "promo_codes: promo code created");
        Ok(StatusResponse::ok("promo code created successfully"))
    }

    pub async fn update_promo_code(&self, model: PromoCodeModel) -> Result<StatusResponse> {
        let promo_code_id = model.id;
        if promo_code_id <= 0 {
            return Err(DomainError::validation("invalid promo code id").into());
        }
        model.validate()?;

        self.promo_code_repository
            .update(promo_code_id, model.to_changeset())
            .await?;

        info!(%promo_code_id, "promo_codes: promo code updated");
        Ok(StatusResponse::ok("promo code updated successfully"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crates::domain::repositories::promo_codes::MockPromoCodeRepository;

    fn model() -> PromoCodeModel {
        PromoCodeModel {
            id: 3,
            value: "SPRING".to_string(),
            number_uses: Some(10),
            status: Some(true),
            percent: 20,
            description: "spring sale".to_string(),
        }
    }

    #[tokio::test]
    async fn create_rejects_invalid_fields_without_repository_call() {
        let invalid = [
            PromoCodeModel { value: String::new(), ..model() },
            PromoCodeModel { percent: 0, ..model() },
            PromoCodeModel { percent: -1, ..model() },
            PromoCodeModel { description: "  ".to_string(), ..model() },
        ];

        for candidate in invalid {
            let mut repo = MockPromoCodeRepository::new();
            repo.expect_create().never();

            let err = PromoCodesUseCase::new(Arc::new(repo))
                .create_promo_code(candidate)
                .await
                .unwrap_err();

            assert!(matches!(DomainError::find(&err), Some(DomainError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn create_persists_valid_model() {
        let mut repo = MockPromoCodeRepository::new();
        repo.expect_create()
            .withf(|entity| entity.value == "SPRING" && entity.percent == 20)
            .times(1)
            .returning(|_| Ok(1));

        let status = PromoCodesUseCase::new(Arc::new(repo))
            .create_promo_code(model())
            .await
            .unwrap();

        assert_eq!(status, StatusResponse::ok("promo code created successfully"));
    }

    #[tokio::test]
    async fn update_missing_row_is_not_found() {
        let mut repo = MockPromoCodeRepository::new();
        repo.expect_update()
            .returning(|_, _| Err(DomainError::NotFound("promo code").into()));

        let err = PromoCodesUseCase::new(Arc::new(repo))
            .update_promo_code(model())
            .await
            .unwrap_err();

        assert_eq!(DomainError::find(&err), Some(&DomainError::NotFound("promo code")));
    }

    #[tokio::test]
    async fn update_validates_before_repository_call() {
        let mut repo = MockPromoCodeRepository::new();
        repo.expect_update().never();

        let result = PromoCodesUseCase::new(Arc::new(repo))
            .update_promo_code(PromoCodeModel { percent: 0, ..model() })
            .await;

        assert!(result.is_err());
    }
}
