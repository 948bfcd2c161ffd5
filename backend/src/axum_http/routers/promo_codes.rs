use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use crates::{
    domain::{
        repositories::promo_codes::PromoCodeRepository,
        value_objects::{
            pagination::Pagination,
            promo_codes::{
                DEFAULT_PROMO_CODES_LIMIT, PromoCodeFilter, PromoCodeModel, PromoCodeResponse,
                PromoCodesListResponse,
            },
            status::StatusResponse,
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad, repositories::promo_codes::PromoCodePostgres,
    },
};
use serde::Deserialize;

use crate::{
    axum_http::{
        error_responses::AppError,
        query_params::{parse_bool, parse_i64},
        routers::parse_path_id,
    },
    usecases::promo_codes::PromoCodesUseCase,
};

#[derive(Debug, Default, Deserialize)]
pub struct PromoCodesQuery {
    page: Option<String>,
    limit: Option<String>,
    status: Option<String>,
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let promo_code_repository = PromoCodePostgres::new(Arc::clone(&db_pool));
    let usecase = PromoCodesUseCase::new(Arc::new(promo_code_repository));

    router(Arc::new(usecase))
}

pub fn router<R>(usecase: Arc<PromoCodesUseCase<R>>) -> Router
where
    R: PromoCodeRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(list_promo_codes).post(create_promo_code))
        .route("/update", post(update_promo_code))
        .route("/:id", get(get_promo_code))
        .with_state(usecase)
}

pub async fn get_promo_code<R>(
    State(usecase): State<Arc<PromoCodesUseCase<R>>>,
    Path(raw_id): Path<String>,
) -> Result<Json<PromoCodeResponse>, AppError>
where
    R: PromoCodeRepository + Send + Sync + 'static,
{
    let promo_code_id = parse_path_id(&raw_id, "promo code id")?;

    Ok(Json(usecase.get_promo_code(promo_code_id).await?))
}

pub async fn list_promo_codes<R>(
    State(usecase): State<Arc<PromoCodesUseCase<R>>>,
    Query(query): Query<PromoCodesQuery>,
) -> Result<Json<PromoCodesListResponse>, AppError>
where
    R: PromoCodeRepository + Send + Sync + 'static,
{
    let filter = PromoCodeFilter {
        status: parse_bool(query.status.as_deref()),
    };
    let pagination = Pagination::new(
        parse_i64(query.page.as_deref()),
        parse_i64(query.limit.as_deref()),
        DEFAULT_PROMO_CODES_LIMIT,
    );

    Ok(Json(usecase.list_promo_codes(filter, pagination).await?))
}

pub async fn create_promo_code<R>(
    State(usecase): State<Arc<PromoCodesUseCase<R>>>,
    Json(model): Json<PromoCodeModel>,
) -> Result<(StatusCode, Json<StatusResponse>), AppError>
where
    R: PromoCodeRepository + Send + Sync + 'static,
{
    let response = usecase.create_promo_code(model).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn update_promo_code<R>(
    State(usecase): State<Arc<PromoCodesUseCase<R>>>,
    Json(model): Json<PromoCodeModel>,
) -> Result<Json<StatusResponse>, AppError>
where
    R: PromoCodeRepository + Send + Sync + 'static,
{
    Ok(Json(usecase.update_promo_code(model).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crates::domain::{errors::DomainError, repositories::promo_codes::MockPromoCodeRepository};
    use serde_json::json;

    use crate::axum_http::test_support::{json_body, post_json, send};

    fn app(repo: MockPromoCodeRepository) -> Router {
        router(Arc::new(PromoCodesUseCase::new(Arc::new(repo))))
    }

    #[tokio::test]
    async fn create_returns_201() {
        let mut repo = MockPromoCodeRepository::new();
        repo.expect_create().times(1).returning(|_| Ok(12));

        let response = send(
            app(repo),
            post_json("/", json!({"value": "SUMMER", "percent": 10, "description": "summer"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            json_body(response).await,
            json!({"ok": true, "message": "promo code created successfully"})
        );
    }

    #[tokio::test]
    async fn create_with_zero_percent_is_400() {
        let mut repo = MockPromoCodeRepository::new();
        repo.expect_create().never();

        let response = send(
            app(repo),
            post_json("/", json!({"value": "SUMMER", "percent": 0, "description": "summer"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({"message": "promo code percent must be positive"})
        );
    }

    #[tokio::test]
    async fn update_of_missing_code_is_404() {
        let mut repo = MockPromoCodeRepository::new();
        repo.expect_update()
            .returning(|_, _| Err(DomainError::NotFound("promo code").into()));

        let response = send(
            app(repo),
            post_json(
                "/update",
                json!({"id": 99, "value": "X", "percent": 5, "description": "x"}),
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
